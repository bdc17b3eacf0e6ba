//! Classifies short statements by truthfulness using a TF-IDF vectorizer and
//! a linear classifier loaded from disk.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use veracity::{ArtifactLoader, InferencePipeline, Preprocessing};
//!
//! let artifacts = ArtifactLoader::new("models").load()?;
//! let pipeline = InferencePipeline::builder()
//!     .with_artifacts(&artifacts)
//!     .with_preprocessing(Preprocessing::Normalize)
//!     .build()?;
//!
//! let prediction = pipeline.predict("Water boils at 100 degrees Celsius")?;
//! println!("{} ({}%)", prediction.label, prediction.confidence_display());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `InferencePipeline` only holds read-only artifacts behind `Arc`, so clones
//! can be handed to any number of threads or request handlers:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use veracity::{ArtifactLoader, InferencePipeline, Preprocessing};
//! use std::thread;
//!
//! let artifacts = ArtifactLoader::new("models").load()?;
//! let pipeline = InferencePipeline::builder()
//!     .with_artifacts(&artifacts)
//!     .with_preprocessing(Preprocessing::Raw)
//!     .build()?;
//!
//! let handles: Vec<_> = (0..3)
//!     .map(|_| {
//!         let pipeline = pipeline.clone();
//!         thread::spawn(move || pipeline.predict("test text").is_ok())
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod labels;
pub mod pipeline;
pub mod text;
pub mod web;

pub use artifacts::{ArtifactError, ArtifactLoader, ArtifactSet};
pub use classifier::{
    ClassifierError, ClassifierModel, TextClassifier, TextVectorizer, TfidfVectorizer,
};
pub use config::{AppConfig, Preprocessing};
pub use labels::LabelTable;
pub use pipeline::{InferencePipeline, PipelineBuilder, PipelineError, Prediction};
pub use web::{build_router, AppState};

/// Initializes `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
