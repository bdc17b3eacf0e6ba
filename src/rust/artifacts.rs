use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use crate::classifier::{
    ClassifierConfig, ClassifierModel, TextClassifier, TextVectorizer, TfidfVectorizer,
    TfidfVectorizerConfig,
};

pub const DEFAULT_MODEL_FILE: &str = "logistic_regression_model.json";
pub const DEFAULT_VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Artifact {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Where the two artifacts live and, optionally, what they must hash to.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    artifact_dir: PathBuf,
    model_file: String,
    vectorizer_file: String,
    model_sha256: Option<String>,
    vectorizer_sha256: Option<String>,
}

impl ArtifactLoader {
    /// Creates a loader for the default file names inside `artifact_dir`
    pub fn new<P: AsRef<Path>>(artifact_dir: P) -> Self {
        Self {
            artifact_dir: artifact_dir.as_ref().to_path_buf(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            vectorizer_file: DEFAULT_VECTORIZER_FILE.to_string(),
            model_sha256: None,
            vectorizer_sha256: None,
        }
    }

    pub fn with_model_file(mut self, file: impl Into<String>) -> Self {
        self.model_file = file.into();
        self
    }

    pub fn with_vectorizer_file(mut self, file: impl Into<String>) -> Self {
        self.vectorizer_file = file.into();
        self
    }

    /// Requires the model file to hash to `sha256` (lowercase hex)
    pub fn with_model_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.model_sha256 = Some(sha256.into().to_lowercase());
        self
    }

    /// Requires the vectorizer file to hash to `sha256` (lowercase hex)
    pub fn with_vectorizer_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.vectorizer_sha256 = Some(sha256.into().to_lowercase());
        self
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    pub fn get_vectorizer_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.vectorizer_file)
    }

    pub fn artifacts_present(&self) -> bool {
        let model_path = self.get_model_path();
        let vectorizer_path = self.get_vectorizer_path();
        log::debug!("Checking artifacts:");
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::debug!(
            "  Vectorizer path: {:?} (exists: {})",
            vectorizer_path,
            vectorizer_path.exists()
        );
        model_path.is_file() && vectorizer_path.is_file()
    }

    /// Loads both artifacts. Either both are returned or an error is; a
    /// classifier is never handed out without its vectorizer.
    pub fn load(&self) -> Result<ArtifactSet, ArtifactError> {
        let model_path = self.get_model_path();
        let vectorizer_path = self.get_vectorizer_path();

        log::info!("Loading classifier from {:?}", model_path);
        let classifier = self.load_classifier(&model_path)?;
        log::info!(
            "Classifier loaded: {} with {} classes over {} features",
            classifier.kind(),
            classifier.classes().len(),
            classifier.n_features()
        );

        log::info!("Loading vectorizer from {:?}", vectorizer_path);
        let vectorizer = self.load_vectorizer(&vectorizer_path)?;
        log::info!("Vectorizer loaded: {} features", vectorizer.n_features());

        Ok(ArtifactSet {
            model_path,
            vectorizer_path,
            classifier: Arc::new(classifier),
            vectorizer: Arc::new(vectorizer),
        })
    }

    fn load_classifier(&self, path: &Path) -> Result<ClassifierModel, ArtifactError> {
        let bytes = self.read_verified(path, self.model_sha256.as_deref(), "model")?;
        let config: ClassifierConfig = parse_json(path, &bytes)?;
        ClassifierModel::from_config(config).map_err(|e| corrupt(path, e))
    }

    fn load_vectorizer(&self, path: &Path) -> Result<TfidfVectorizer, ArtifactError> {
        let bytes = self.read_verified(path, self.vectorizer_sha256.as_deref(), "vectorizer")?;
        let config: TfidfVectorizerConfig = parse_json(path, &bytes)?;
        TfidfVectorizer::from_config(config).map_err(|e| corrupt(path, e))
    }

    fn read_verified(
        &self,
        path: &Path,
        expected_hash: Option<&str>,
        file_type: &str,
    ) -> Result<Vec<u8>, ArtifactError> {
        if !path.exists() {
            log::error!("{} file not found at {:?}", file_type, path);
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read {} bytes from {:?}", bytes.len(), path);

        if let Some(expected) = expected_hash {
            let actual = sha256_hex(&bytes);
            log::debug!("Calculated hash: {}", actual);
            log::debug!("Expected hash:   {}", expected);
            if actual != expected {
                log::error!("{} hash mismatch: expected {}, got {}", file_type, expected, actual);
                return Err(ArtifactError::HashMismatch {
                    file_type: file_type.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }
        Ok(bytes)
    }
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|e| corrupt(path, e))
}

fn corrupt(path: &Path, reason: impl ToString) -> ArtifactError {
    let reason = reason.to_string();
    log::error!("Artifact {:?} is corrupt: {}", path, reason);
    ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// A fully loaded classifier/vectorizer pair, shared read-only.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub classifier: Arc<ClassifierModel>,
    pub vectorizer: Arc<TfidfVectorizer>,
}

impl ArtifactSet {
    /// `(vectorizer width, classifier width)`; the pair is only usable when
    /// the two are equal. Loading does not enforce this.
    pub fn feature_widths(&self) -> (usize, usize) {
        (self.vectorizer.n_features(), self.classifier.n_features())
    }

    pub fn widths_match(&self) -> bool {
        let (vectorizer, classifier) = self.feature_widths();
        vectorizer == classifier
    }
}
