use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{argmax, sigmoid, softmax};

/// A fitted classifier over fixed-width feature rows.
///
/// `predict` returns one class label per row and `predict_proba` one
/// probability per class per row, with columns ordered like `classes()`.
pub trait TextClassifier: Send + Sync {
    /// Number of features the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Class labels, in probability column order
    fn classes(&self) -> &[i64];

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError>;

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Array2<f32>, ClassifierError>;

    /// Rejects feature matrices whose width differs from `n_features()`.
    fn check_width(&self, features: &Array2<f32>) -> Result<(), ClassifierError> {
        if features.ncols() != self.n_features() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.ncols(),
            });
        }
        Ok(())
    }
}

/// How a multiclass logistic regression turns decision values into probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    pub classes: Vec<i64>,
    /// One row per class, or a single row for a binary model
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
    #[serde(default)]
    pub multi_class: MultiClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNbConfig {
    pub classes: Vec<i64>,
    pub class_log_prior: Vec<f32>,
    /// One row per class
    pub feature_log_prob: Vec<Vec<f32>>,
}

/// Stored form of a classifier artifact, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierConfig {
    LogisticRegression(LogisticRegressionConfig),
    MultinomialNb(MultinomialNbConfig),
}

fn matrix_from_rows(rows: Vec<Vec<f32>>, what: &str) -> Result<Array2<f32>, ClassifierError> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(Vec::len).unwrap_or(0);
    if n_rows == 0 || n_cols == 0 {
        return Err(ClassifierError::ValidationError(format!("{} cannot be empty", what)));
    }
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(ClassifierError::ValidationError(format!(
            "{} rows must all have the same length",
            what
        )));
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    if flat.iter().any(|v| !v.is_finite()) {
        return Err(ClassifierError::ValidationError(format!(
            "{} must contain finite values",
            what
        )));
    }
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| ClassifierError::ValidationError(format!("Failed to shape {}: {}", what, e)))
}

fn validate_classes(classes: &[i64]) -> Result<(), ClassifierError> {
    if classes.len() < 2 {
        return Err(ClassifierError::ValidationError(format!(
            "A classifier needs at least 2 classes, found {}",
            classes.len()
        )));
    }
    Ok(())
}

fn class_at(classes: &[i64], index: Option<usize>) -> Result<i64, ClassifierError> {
    index
        .and_then(|i| classes.get(i).copied())
        .ok_or_else(|| ClassifierError::PredictionError("No class scores produced".into()))
}

/// Linear model with logistic link, as fitted by a standard logistic regression.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<i64>,
    coef: Array2<f32>,
    intercept: Array1<f32>,
    multi_class: MultiClass,
}

impl LogisticRegression {
    pub fn from_config(config: LogisticRegressionConfig) -> Result<Self, ClassifierError> {
        validate_classes(&config.classes)?;
        let coef = matrix_from_rows(config.coef, "coef")?;

        let expected_rows = if config.classes.len() == 2 { 1 } else { config.classes.len() };
        if coef.nrows() != expected_rows {
            return Err(ClassifierError::ValidationError(format!(
                "coef has {} rows, expected {} for {} classes",
                coef.nrows(),
                expected_rows,
                config.classes.len()
            )));
        }
        if config.intercept.len() != expected_rows {
            return Err(ClassifierError::ValidationError(format!(
                "intercept has {} values, expected {}",
                config.intercept.len(),
                expected_rows
            )));
        }

        Ok(Self {
            classes: config.classes,
            coef,
            intercept: Array1::from_vec(config.intercept),
            multi_class: config.multi_class,
        })
    }

    /// Signed distance of each row to each class hyperplane
    pub fn decision_function(
        &self,
        features: &Array2<f32>,
    ) -> Result<Array2<f32>, ClassifierError> {
        self.check_width(features)?;
        let mut scores = features.dot(&self.coef.t());
        scores += &self.intercept;
        Ok(scores)
    }

    fn is_binary(&self) -> bool {
        self.coef.nrows() == 1
    }
}

impl TextClassifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError> {
        let scores = self.decision_function(features)?;
        scores
            .axis_iter(Axis(0))
            .map(|row| {
                if self.is_binary() {
                    Ok(if row[0] > 0.0 { self.classes[1] } else { self.classes[0] })
                } else {
                    class_at(&self.classes, argmax(row))
                }
            })
            .collect()
    }

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Array2<f32>, ClassifierError> {
        let scores = self.decision_function(features)?;
        let mut proba = Array2::<f32>::zeros((scores.nrows(), self.classes.len()));

        for (i, row) in scores.axis_iter(Axis(0)).enumerate() {
            let mut out = proba.row_mut(i);
            if self.is_binary() {
                let p = sigmoid(row[0]);
                out[0] = 1.0 - p;
                out[1] = p;
                continue;
            }
            match self.multi_class {
                MultiClass::Multinomial => out.assign(&softmax(row)),
                MultiClass::Ovr => {
                    let p = row.mapv(sigmoid);
                    let sum = p.sum();
                    if sum > 0.0 {
                        out.assign(&(p / sum));
                    } else {
                        out.fill(1.0 / self.classes.len() as f32);
                    }
                }
            }
        }
        Ok(proba)
    }
}

/// Multinomial naive Bayes over tf-idf or count features.
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    classes: Vec<i64>,
    class_log_prior: Array1<f32>,
    feature_log_prob: Array2<f32>,
}

impl MultinomialNb {
    pub fn from_config(config: MultinomialNbConfig) -> Result<Self, ClassifierError> {
        validate_classes(&config.classes)?;
        let feature_log_prob = matrix_from_rows(config.feature_log_prob, "feature_log_prob")?;
        if feature_log_prob.nrows() != config.classes.len()
            || config.class_log_prior.len() != config.classes.len()
        {
            return Err(ClassifierError::ValidationError(format!(
                "Expected {} rows of feature_log_prob and class_log_prior, found {} and {}",
                config.classes.len(),
                feature_log_prob.nrows(),
                config.class_log_prior.len()
            )));
        }
        Ok(Self {
            classes: config.classes,
            class_log_prior: Array1::from_vec(config.class_log_prior),
            feature_log_prob,
        })
    }

    fn joint_log_likelihood(&self, features: &Array2<f32>) -> Result<Array2<f32>, ClassifierError> {
        self.check_width(features)?;
        let mut jll = features.dot(&self.feature_log_prob.t());
        jll += &self.class_log_prior;
        Ok(jll)
    }
}

impl TextClassifier for MultinomialNb {
    fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError> {
        let jll = self.joint_log_likelihood(features)?;
        jll.axis_iter(Axis(0))
            .map(|row| class_at(&self.classes, argmax(row)))
            .collect()
    }

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Array2<f32>, ClassifierError> {
        let jll = self.joint_log_likelihood(features)?;
        let mut proba = Array2::<f32>::zeros(jll.raw_dim());
        for (i, row) in jll.axis_iter(Axis(0)).enumerate() {
            proba.row_mut(i).assign(&softmax(row));
        }
        Ok(proba)
    }
}

/// Any of the supported classifier artifacts.
#[derive(Debug, Clone)]
pub enum ClassifierModel {
    LogisticRegression(LogisticRegression),
    MultinomialNb(MultinomialNb),
}

impl ClassifierModel {
    pub fn from_config(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        match config {
            ClassifierConfig::LogisticRegression(c) => {
                LogisticRegression::from_config(c).map(Self::LogisticRegression)
            }
            ClassifierConfig::MultinomialNb(c) => {
                MultinomialNb::from_config(c).map(Self::MultinomialNb)
            }
        }
    }

    /// Short name of the model family, used in logs and the health payload
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::MultinomialNb(_) => "multinomial_nb",
        }
    }

    fn inner(&self) -> &dyn TextClassifier {
        match self {
            Self::LogisticRegression(m) => m,
            Self::MultinomialNb(m) => m,
        }
    }
}

impl TextClassifier for ClassifierModel {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner().classes()
    }

    fn predict(&self, features: &Array2<f32>) -> Result<Vec<i64>, ClassifierError> {
        self.inner().predict(features)
    }

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Array2<f32>, ClassifierError> {
        self.inner().predict_proba(features)
    }
}
