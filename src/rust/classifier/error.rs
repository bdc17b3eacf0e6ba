use std::fmt;

/// Represents the different types of errors that can occur while running a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The analyzer could not be built from the vectorizer's settings
    VectorizerError(String),
    /// The feature vector width does not match what the classifier was fitted on
    DimensionMismatch { expected: usize, actual: usize },
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid model parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VectorizerError(msg) => write!(f, "Vectorizer error: {}", msg),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: classifier expects {} features, got {}",
                expected, actual
            ),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<regex::Error> for ClassifierError {
    fn from(err: regex::Error) -> Self {
        ClassifierError::VectorizerError(err.to_string())
    }
}
