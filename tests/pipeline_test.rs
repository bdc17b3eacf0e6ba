mod common;

use std::fs;
use std::sync::Arc;
use std::thread;

use common::{
    load_pipeline, write_fixture_artifacts, write_mismatched_vectorizer, REFERENCE_STATEMENT,
};
use veracity::artifacts::DEFAULT_VECTORIZER_FILE;
use veracity::{ArtifactError, ArtifactLoader, ClassifierError, PipelineError, Preprocessing};

#[test]
fn test_end_to_end_reference_statement() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_fixture_artifacts(dir.path());
    let pipeline = load_pipeline(dir.path(), Preprocessing::Normalize);

    let prediction = pipeline.predict(REFERENCE_STATEMENT)?;
    assert_eq!(prediction.processed_text, "water boil degree celsius");
    assert_eq!(prediction.label_index, 1);
    assert_eq!(prediction.label, "True");
    assert!((prediction.confidence - 0.87).abs() < 1e-4);
    assert_eq!(prediction.confidence_display(), "87.0");
    Ok(())
}

#[test]
fn test_raw_mode_sees_different_features() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_fixture_artifacts(dir.path());
    let pipeline = load_pipeline(dir.path(), Preprocessing::Raw);

    // Only "water" and "celsius" match a vocabulary fitted on lemmas.
    let prediction = pipeline.predict(REFERENCE_STATEMENT)?;
    assert_eq!(prediction.processed_text, REFERENCE_STATEMENT);
    assert_eq!(prediction.label, "True");
    assert!(prediction.confidence < 0.8);
    Ok(())
}

#[test]
fn test_other_label() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_fixture_artifacts(dir.path());
    let pipeline = load_pipeline(dir.path(), Preprocessing::Normalize);

    let prediction = pipeline.predict("The house is on FIRE!")?;
    assert_eq!(prediction.label, "Pants on Fire");
    assert!((0.0..=1.0).contains(&prediction.confidence));
    Ok(())
}

#[test]
fn test_out_of_vocabulary_statement_still_predicts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_fixture_artifacts(dir.path());
    let pipeline = load_pipeline(dir.path(), Preprocessing::Normalize);

    // All-zero features: every logit is zero, so the first class wins at 20%.
    let prediction = pipeline.predict("it is what it is")?;
    assert_eq!(prediction.processed_text, "");
    assert_eq!(prediction.label, "False");
    assert_eq!(prediction.confidence_display(), "20.0");
    Ok(())
}

#[test]
fn test_empty_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_artifacts(dir.path());
    let pipeline = load_pipeline(dir.path(), Preprocessing::Normalize);

    for input in ["", "   ", "\n\t "] {
        assert!(matches!(pipeline.predict(input), Err(PipelineError::EmptyInput)));
    }
}

#[test]
fn test_missing_vectorizer_prevents_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_artifacts(dir.path());
    fs::remove_file(dir.path().join(DEFAULT_VECTORIZER_FILE)).unwrap();

    let result = ArtifactLoader::new(dir.path()).load();
    assert!(matches!(result, Err(ArtifactError::NotFound(_))));
}

#[test]
fn test_width_mismatch_fails_at_prediction() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    write_fixture_artifacts(dir.path());
    write_mismatched_vectorizer(dir.path());

    let artifacts = ArtifactLoader::new(dir.path()).load()?;
    assert_eq!(artifacts.feature_widths(), (2, 5));
    assert!(!artifacts.widths_match());

    let pipeline = veracity::InferencePipeline::builder()
        .with_artifacts(&artifacts)
        .with_preprocessing(Preprocessing::Normalize)
        .build()?;
    let err = pipeline.predict(REFERENCE_STATEMENT).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Classifier(ClassifierError::DimensionMismatch { expected: 5, actual: 2 })
    ));
    Ok(())
}

#[test]
fn test_thread_safety() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_artifacts(dir.path());
    let pipeline = Arc::new(load_pipeline(dir.path(), Preprocessing::Normalize));
    let mut handles = vec![];

    for _ in 0..3 {
        let pipeline = Arc::clone(&pipeline);
        let handle = thread::spawn(move || {
            let result = pipeline.predict(REFERENCE_STATEMENT);
            assert_eq!(result.unwrap().label, "True");
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
