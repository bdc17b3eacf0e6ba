#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::json;
use veracity::artifacts::{DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE};
use veracity::{ArtifactLoader, InferencePipeline, Preprocessing};

/// Weight on each of the four reference terms. With l2-normalized unit
/// counts the class 1 logit is `2 * weight = ln(0.87 * 4 / 0.13)`, which
/// gives class 1 a softmax probability of 0.87 against four zero logits.
pub const REFERENCE_WEIGHT: f32 = 1.643_626_6;

pub const REFERENCE_STATEMENT: &str = "Water boils at 100 degrees Celsius";

/// Writes a five-class logistic regression and its vectorizer, fitted on
/// normalized text, into `dir`.
pub fn write_fixture_artifacts(dir: &Path) {
    let w = REFERENCE_WEIGHT;
    let model = json!({
        "kind": "logistic_regression",
        "classes": [0, 1, 2, 3, 4],
        "coef": [
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [w, w, w, w, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 3.0]
        ],
        "intercept": [0.0, 0.0, 0.0, 0.0, 0.0],
        "multi_class": "multinomial"
    });
    let vectorizer = json!({
        "vocabulary": {"water": 0, "boil": 1, "degree": 2, "celsius": 3, "fire": 4},
        "idf": [1.0, 1.0, 1.0, 1.0, 1.0],
        "lowercase": true,
        "ngram_range": [1, 1],
        "norm": "l2"
    });
    fs::write(dir.join(DEFAULT_MODEL_FILE), model.to_string()).unwrap();
    fs::write(dir.join(DEFAULT_VECTORIZER_FILE), vectorizer.to_string()).unwrap();
}

/// Overwrites the vectorizer with a two-term one the five-feature
/// classifier cannot accept.
pub fn write_mismatched_vectorizer(dir: &Path) {
    fs::write(
        dir.join(DEFAULT_VECTORIZER_FILE),
        r#"{"vocabulary": {"water": 0, "boil": 1}, "idf": [1.0, 1.0]}"#,
    )
    .unwrap();
}

pub fn load_pipeline(dir: &Path, preprocessing: Preprocessing) -> InferencePipeline {
    let artifacts = ArtifactLoader::new(dir).load().expect("fixture artifacts should load");
    InferencePipeline::builder()
        .with_artifacts(&artifacts)
        .with_preprocessing(preprocessing)
        .build()
        .expect("Failed to create pipeline")
}
