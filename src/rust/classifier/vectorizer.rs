use std::collections::HashMap;
use std::collections::HashSet;

use ndarray::{Array1, Array2};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{l1_normalize, l2_normalize};

/// Turns raw documents into fixed-width numeric feature rows.
///
/// Implementors must return exactly one row per input document, and every row
/// must have `n_features()` columns. The classifier consuming the rows relies
/// on that width matching the width it was fitted on.
pub trait TextVectorizer: Send + Sync {
    /// Width of every row produced by `transform`
    fn n_features(&self) -> usize;

    /// Transforms a batch of documents into a `[documents, n_features]` matrix
    fn transform(&self, documents: &[&str]) -> Result<Array2<f32>, ClassifierError>;

    /// Transforms a single document and returns its feature row.
    fn transform_one(&self, document: &str) -> Result<Array1<f32>, ClassifierError> {
        let matrix = self.transform(&[document])?;
        if matrix.nrows() != 1 {
            return Err(ClassifierError::VectorizerError(format!(
                "Expected 1 feature row, got {}",
                matrix.nrows()
            )));
        }
        Ok(matrix.row(0).to_owned())
    }
}

/// Row normalization applied after tf-idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// The fitted state of a tf-idf vectorizer as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizerConfig {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column, indexed like `vocabulary`
    #[serde(default)]
    pub idf: Vec<f32>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default = "default_true")]
    pub use_idf: bool,
}

impl TfidfVectorizerConfig {
    /// Creates a config with the default analyzer settings and uniform idf weights.
    pub fn new(vocabulary: HashMap<String, usize>) -> Self {
        let idf = vec![1.0; vocabulary.len()];
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: None,
            sublinear_tf: false,
            norm: Norm::L2,
            use_idf: true,
        }
    }
}

/// A fitted tf-idf transform over word n-grams.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f32>>,
    lowercase: bool,
    token_regex: Regex,
    ngram_range: (usize, usize),
    stop_words: Option<HashSet<String>>,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    /// Builds a vectorizer from its stored state, validating that the
    /// vocabulary, idf weights and analyzer settings are consistent.
    pub fn from_config(config: TfidfVectorizerConfig) -> Result<Self, ClassifierError> {
        let n_features = config.vocabulary.len();
        if n_features == 0 {
            return Err(ClassifierError::ValidationError("Vocabulary cannot be empty".into()));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &config.vocabulary {
            if index >= n_features || seen[index] {
                return Err(ClassifierError::ValidationError(format!(
                    "Vocabulary index {} for term '{}' is out of range or duplicated",
                    index, term
                )));
            }
            seen[index] = true;
        }

        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        let idf = if config.use_idf {
            if config.idf.len() != n_features {
                return Err(ClassifierError::ValidationError(format!(
                    "idf has {} weights but the vocabulary has {} terms",
                    config.idf.len(),
                    n_features
                )));
            }
            if config.idf.iter().any(|w| !w.is_finite()) {
                return Err(ClassifierError::ValidationError("idf weights must be finite".into()));
            }
            Some(Array1::from_vec(config.idf))
        } else {
            None
        };

        let token_regex = Regex::new(&config.token_pattern)?;

        Ok(Self {
            vocabulary: config.vocabulary,
            idf,
            lowercase: config.lowercase,
            token_regex,
            ngram_range: config.ngram_range,
            stop_words: config.stop_words.map(|words| words.into_iter().collect()),
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
        })
    }

    /// Splits a document into the terms the vocabulary was built from.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| match &self.stop_words {
                Some(stop) => !stop.contains(*t),
                None => true,
            })
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    fn weigh(&self, document: &str) -> Array1<f32> {
        let mut row = Array1::<f32>::zeros(self.vocabulary.len());
        for term in self.analyze(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                row[index] += 1.0;
            }
        }

        if self.sublinear_tf {
            row.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { 0.0 });
        }
        if let Some(idf) = &self.idf {
            row *= idf;
        }

        match self.norm {
            Norm::L2 => l2_normalize(&row),
            Norm::L1 => l1_normalize(&row),
            Norm::None => row,
        }
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, documents: &[&str]) -> Result<Array2<f32>, ClassifierError> {
        let mut matrix = Array2::<f32>::zeros((documents.len(), self.n_features()));
        for (i, document) in documents.iter().enumerate() {
            matrix.row_mut(i).assign(&self.weigh(document));
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    #[test]
    fn test_default_analyzer_drops_single_characters() {
        let config = TfidfVectorizerConfig::new(vocabulary(&["water"]));
        let vectorizer = TfidfVectorizer::from_config(config).unwrap();
        assert_eq!(vectorizer.analyze("A Water, I boils!"), vec!["water", "boils"]);
    }

    #[test]
    fn test_transform_counts_and_normalizes() {
        let vectorizer = TfidfVectorizer::from_config(TfidfVectorizerConfig::new(vocabulary(&[
            "water", "boils", "celsius",
        ])))
        .unwrap();
        let row = vectorizer.transform_one("water water boils").unwrap();
        let expected_norm = (4.0_f32 + 1.0).sqrt();
        assert!((row[0] - 2.0 / expected_norm).abs() < 1e-6);
        assert!((row[1] - 1.0 / expected_norm).abs() < 1e-6);
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_unknown_text_gives_zero_row() {
        let config = TfidfVectorizerConfig::new(vocabulary(&["water"]));
        let vectorizer = TfidfVectorizer::from_config(config).unwrap();
        let row = vectorizer.transform_one("").unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row[0], 0.0);
    }

    #[test]
    fn test_sublinear_tf_and_idf() {
        let mut config = TfidfVectorizerConfig::new(vocabulary(&["tax", "cut"]));
        config.idf = vec![2.0, 1.0];
        config.sublinear_tf = true;
        config.norm = Norm::None;
        let vectorizer = TfidfVectorizer::from_config(config).unwrap();
        let row = vectorizer.transform_one("tax tax tax cut").unwrap();
        assert!((row[0] - 2.0 * (1.0 + 3.0_f32.ln())).abs() < 1e-5);
        assert!((row[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bigrams() {
        let mut config = TfidfVectorizerConfig::new(vocabulary(&["tax", "tax cut"]));
        config.ngram_range = (1, 2);
        config.norm = Norm::None;
        let vectorizer = TfidfVectorizer::from_config(config).unwrap();
        let row = vectorizer.transform_one("Tax cut").unwrap();
        assert_eq!(row.to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_stop_words_are_skipped_before_ngrams() {
        let mut config = TfidfVectorizerConfig::new(vocabulary(&["tax cut"]));
        config.ngram_range = (2, 2);
        config.stop_words = Some(vec!["the".into()]);
        config.norm = Norm::None;
        let vectorizer = TfidfVectorizer::from_config(config).unwrap();
        assert_eq!(vectorizer.transform_one("tax the cut").unwrap()[0], 1.0);
    }

    #[test]
    fn test_rejects_inconsistent_idf() {
        let mut config = TfidfVectorizerConfig::new(vocabulary(&["a1", "b2"]));
        config.idf = vec![1.0];
        assert!(matches!(
            TfidfVectorizer::from_config(config),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_empty_vocabulary() {
        let config = TfidfVectorizerConfig::new(HashMap::new());
        assert!(TfidfVectorizer::from_config(config).is_err());
    }

    #[test]
    fn test_rejects_bad_token_pattern() {
        let mut config = TfidfVectorizerConfig::new(vocabulary(&["ab"]));
        config.token_pattern = "(".into();
        assert!(matches!(
            TfidfVectorizer::from_config(config),
            Err(ClassifierError::VectorizerError(_))
        ));
    }
}
