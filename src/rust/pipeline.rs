use std::borrow::Cow;
use std::sync::Arc;

use log::{debug, warn};

use crate::artifacts::ArtifactSet;
use crate::classifier::{ClassifierError, TextClassifier, TextVectorizer};
use crate::config::Preprocessing;
use crate::labels::LabelTable;
use crate::text::normalize;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Input statement is empty")]
    EmptyInput,
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("Build error: {0}")]
    BuildError(String),
}

/// The outcome of classifying one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Raw label index returned by the classifier
    pub label_index: i64,
    /// Display name for `label_index`, or the index itself when unknown
    pub label: String,
    /// Highest class probability, in `[0, 1]`
    pub confidence: f32,
    /// The text actually handed to the vectorizer
    pub processed_text: String,
}

impl Prediction {
    /// Confidence as a percentage rounded to two decimals
    pub fn confidence_percent(&self) -> f64 {
        (f64::from(self.confidence) * 100.0 * 100.0).round() / 100.0
    }

    /// Confidence percentage as displayed, e.g. `87.0` or `33.33`
    pub fn confidence_display(&self) -> String {
        let percent = self.confidence_percent();
        if percent.fract() == 0.0 {
            format!("{:.1}", percent)
        } else {
            format!("{}", percent)
        }
    }
}

/// Vectorizer + classifier + label table, run once per statement.
///
/// Cloning is cheap; the artifacts are shared read-only behind `Arc`.
#[derive(Clone)]
pub struct InferencePipeline {
    vectorizer: Arc<dyn TextVectorizer>,
    classifier: Arc<dyn TextClassifier>,
    preprocessing: Preprocessing,
    labels: LabelTable,
}

impl std::fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("n_features", &self.vectorizer.n_features())
            .field("classes", &self.classifier.classes())
            .field("preprocessing", &self.preprocessing)
            .finish()
    }
}

impl InferencePipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn preprocessing(&self) -> Preprocessing {
        self.preprocessing
    }

    /// Classifies one statement.
    ///
    /// # Errors
    /// - `EmptyInput` if the statement is empty or whitespace only; the
    ///   models are not called
    /// - `Classifier` if the vectorizer or classifier fails, including a
    ///   feature width mismatch between the two
    pub fn predict(&self, statement: &str) -> Result<Prediction, PipelineError> {
        if is_blank(statement) {
            warn!("Rejected empty statement");
            return Err(PipelineError::EmptyInput);
        }

        let text: Cow<str> = match self.preprocessing {
            Preprocessing::Normalize => Cow::Owned(normalize(statement)),
            Preprocessing::Raw => Cow::Borrowed(statement),
        };
        debug!("Vectorizing {:?}", text);

        let features = self.vectorizer.transform(&[text.as_ref()])?;

        let label_index = self
            .classifier
            .predict(&features)?
            .first()
            .copied()
            .ok_or_else(|| {
                ClassifierError::PredictionError("Classifier returned no label".into())
            })?;

        let proba = self.classifier.predict_proba(&features)?;
        if proba.nrows() == 0 {
            return Err(ClassifierError::PredictionError(
                "Classifier returned no probabilities".into(),
            )
            .into());
        }
        let confidence = proba
            .row(0)
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        if !confidence.is_finite() {
            return Err(ClassifierError::PredictionError(format!(
                "Invalid class probability: {}",
                confidence
            ))
            .into());
        }

        let prediction = Prediction {
            label_index,
            label: self.labels.display(label_index),
            confidence: confidence.clamp(0.0, 1.0),
            processed_text: text.into_owned(),
        };
        debug!(
            "Predicted {} ({}) with confidence {}",
            prediction.label, prediction.label_index, prediction.confidence
        );
        Ok(prediction)
    }
}

/// Whitespace-only check that also counts the ASCII separators
/// `\x1c`..=`\x1f` as whitespace.
fn is_blank(statement: &str) -> bool {
    statement
        .trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
        .is_empty()
}

/// A builder for constructing an InferencePipeline with a fluent interface.
#[derive(Default)]
pub struct PipelineBuilder {
    vectorizer: Option<Arc<dyn TextVectorizer>>,
    classifier: Option<Arc<dyn TextClassifier>>,
    preprocessing: Option<Preprocessing>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a loaded artifact pair
    pub fn with_artifacts(mut self, artifacts: &ArtifactSet) -> Self {
        let vectorizer: Arc<dyn TextVectorizer> = artifacts.vectorizer.clone();
        let classifier: Arc<dyn TextClassifier> = artifacts.classifier.clone();
        self.vectorizer = Some(vectorizer);
        self.classifier = Some(classifier);
        self
    }

    pub fn with_vectorizer(mut self, vectorizer: Arc<dyn TextVectorizer>) -> Self {
        self.vectorizer = Some(vectorizer);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = Some(preprocessing);
        self
    }

    /// Builds the pipeline.
    ///
    /// Fails if the vectorizer, the classifier or the preprocessing mode
    /// was not provided.
    pub fn build(self) -> Result<InferencePipeline, PipelineError> {
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| PipelineError::BuildError("Vectorizer must be set".into()))?;
        let classifier = self
            .classifier
            .ok_or_else(|| PipelineError::BuildError("Classifier must be set".into()))?;
        let preprocessing = self
            .preprocessing
            .ok_or_else(|| {
                PipelineError::BuildError("Preprocessing mode must be chosen explicitly".into())
            })?;

        if vectorizer.n_features() != classifier.n_features() {
            warn!(
                "Vectorizer produces {} features but the classifier expects {}; predictions will fail",
                vectorizer.n_features(),
                classifier.n_features()
            );
        }

        Ok(InferencePipeline {
            vectorizer,
            classifier,
            preprocessing,
            labels: LabelTable,
        })
    }
}
