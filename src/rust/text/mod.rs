//! Text normalization applied to statements before vectorization.
//!
//! The normalizer must run (or not run) exactly as it did when the
//! vectorizer vocabulary was fitted. Whether it runs is decided by
//! [`Preprocessing`](crate::Preprocessing), never inferred.

mod lemmatizer;
mod stopwords;

pub use lemmatizer::lemmatize;
pub use stopwords::is_stopword;

/// Normalizes a statement:
/// 1. lowercases it
/// 2. drops every character other than `a-z` and the space character
/// 3. splits on whitespace
/// 4. removes stopwords
/// 5. lemmatizes the remaining tokens (a token whose lemma is a stopword is dropped)
/// 6. joins the tokens with single spaces
///
/// The output contains only `a-z` and single interior spaces, and
/// `normalize(&normalize(s)) == normalize(s)` for every `s`.
///
/// # Example
/// ```
/// use veracity::text::normalize;
///
/// assert_eq!(normalize("Water boils at 100 degrees Celsius"), "water boil degree celsius");
/// ```
pub fn normalize(text: &str) -> String {
    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect();

    letters
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(lemmatize)
        .filter(|lemma| !lemma.is_empty() && !is_stopword(lemma))
        .collect::<Vec<_>>()
        .join(" ")
}
