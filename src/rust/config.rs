use std::path::PathBuf;

use clap::ValueEnum;

use crate::artifacts::{ArtifactLoader, DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE};

/// Whether statements are normalized before vectorization.
///
/// This has to match what was done to the training text when the vectorizer
/// was fitted. There is no default: a mismatch silently degrades every
/// prediction, so the deployment must state which one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preprocessing {
    /// Feed the statement to the vectorizer as typed
    Raw,
    /// Run [`text::normalize`](crate::text::normalize) first
    Normalize,
}

impl Preprocessing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Normalize => "normalize",
        }
    }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct AppConfig {
    /// Directory holding the model and vectorizer files
    #[arg(long, env = "VERACITY_ARTIFACT_DIR", default_value = ".")]
    pub artifact_dir: PathBuf,

    /// Classifier artifact file name, relative to the artifact directory
    #[arg(long, env = "VERACITY_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Vectorizer artifact file name, relative to the artifact directory
    #[arg(long, env = "VERACITY_VECTORIZER_FILE", default_value = DEFAULT_VECTORIZER_FILE)]
    pub vectorizer_file: String,

    /// Expected SHA-256 of the classifier file
    #[arg(long, env = "VERACITY_MODEL_SHA256")]
    pub model_sha256: Option<String>,

    /// Expected SHA-256 of the vectorizer file
    #[arg(long, env = "VERACITY_VECTORIZER_SHA256")]
    pub vectorizer_sha256: Option<String>,

    /// Preprocessing the artifacts were fitted with
    #[arg(long, env = "VERACITY_PREPROCESSING", value_enum)]
    pub preprocessing: Preprocessing,
}

impl AppConfig {
    pub fn artifact_loader(&self) -> ArtifactLoader {
        let mut loader = ArtifactLoader::new(&self.artifact_dir)
            .with_model_file(self.model_file.clone())
            .with_vectorizer_file(self.vectorizer_file.clone());
        if let Some(hash) = &self.model_sha256 {
            loader = loader.with_model_sha256(hash.clone());
        }
        if let Some(hash) = &self.vectorizer_sha256 {
            loader = loader.with_vectorizer_sha256(hash.clone());
        }
        loader
    }
}
