use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

/// One dictionary noun per line, WordNet `index.noun` lemma spelling.
const NOUN_LEMMAS: &str = include_str!("data/noun_lemmas.txt");
/// `inflected lemma...` per line, the layout of WordNet's `noun.exc`.
const NOUN_EXCEPTIONS: &str = include_str!("data/noun_exceptions.txt");

lazy_static! {
    static ref LEMMAS: HashSet<&'static str> = NOUN_LEMMAS
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    static ref EXCEPTIONS: HashMap<&'static str, Vec<&'static str>> = NOUN_EXCEPTIONS
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let inflected = fields.next()?;
            Some((inflected, fields.collect()))
        })
        .collect();
}

/// Noun detachment rules, applied to the end of a form.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Whether `word` is a known dictionary noun.
pub fn is_dictionary_noun(word: &str) -> bool {
    LEMMAS.contains(word)
}

fn apply_rules(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            SUBSTITUTIONS.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{}{}", stem, new))
            })
        })
        .collect()
}

fn known<I>(forms: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for form in forms {
        if is_dictionary_noun(&form) && !out.contains(&form) {
            out.push(form);
        }
    }
    out
}

/// Every dictionary noun `word` can be an inflection of, in discovery order.
fn candidates(word: &str) -> Vec<String> {
    if let Some(bases) = EXCEPTIONS.get(word) {
        let forms = std::iter::once(word.to_string()).chain(bases.iter().map(|b| b.to_string()));
        return known(forms);
    }

    let mut forms = apply_rules(&[word.to_string()]);
    let found = known(std::iter::once(word.to_string()).chain(forms.iter().cloned()));
    if !found.is_empty() {
        return found;
    }
    // Rules strip at least one character or rewrite a `men` ending once
    while !forms.is_empty() {
        forms = apply_rules(&forms);
        let found = known(forms.iter().cloned());
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn reduce(word: &str) -> String {
    candidates(word)
        .into_iter()
        .min_by_key(|form| form.len())
        .unwrap_or_else(|| word.to_string())
}

/// Reduces a lowercase word to its dictionary noun form.
///
/// Candidates come from the irregular table and the detachment rules, and
/// only forms found in the noun dictionary count; the shortest wins. A word
/// with no dictionary form is returned unchanged. A reduction is only
/// accepted when the result is itself stable, so
/// `lemmatize(lemmatize(w)) == lemmatize(w)` for every `w`.
pub fn lemmatize(word: &str) -> String {
    let lemma = reduce(word);
    if lemma != word && reduce(&lemma) != lemma {
        return word.to_string();
    }
    lemma
}
