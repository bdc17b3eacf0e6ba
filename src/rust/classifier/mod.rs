mod error;
mod model;
mod utils;
mod vectorizer;

pub use error::ClassifierError;
pub use model::{
    ClassifierConfig, ClassifierModel, LogisticRegression, LogisticRegressionConfig, MultiClass,
    MultinomialNb, MultinomialNbConfig, TextClassifier,
};
pub use vectorizer::{Norm, TextVectorizer, TfidfVectorizer, TfidfVectorizerConfig};
