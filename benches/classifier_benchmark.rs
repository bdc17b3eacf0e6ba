use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use veracity::classifier::{
    ClassifierModel, LogisticRegression, LogisticRegressionConfig, MultiClass,
    TfidfVectorizerConfig,
};
use veracity::text::normalize;
use veracity::{InferencePipeline, Preprocessing, TfidfVectorizer};

const SHORT_TEXT: &str = "The senator voted against the bill";
const LONG_TEXT: &str = "This is a much longer statement that contains several clauses and should \
     take noticeably more time to process. It mentions taxes, budgets, elections, \
     unemployment figures and healthcare policies, which are the kinds of subjects \
     that show up in political fact-checking datasets over and over again.";

fn setup_benchmark_pipeline(n_features: usize, preprocessing: Preprocessing) -> InferencePipeline {
    let vocabulary: HashMap<String, usize> =
        (0..n_features).map(|i| (format!("term{}", i), i)).collect();
    let vectorizer = TfidfVectorizer::from_config(TfidfVectorizerConfig::new(vocabulary)).unwrap();

    let coef = (0..5)
        .map(|c| (0..n_features).map(|f| ((c * 31 + f * 7) % 13) as f32 / 13.0 - 0.5).collect())
        .collect();
    let classifier = LogisticRegression::from_config(LogisticRegressionConfig {
        classes: vec![0, 1, 2, 3, 4],
        coef,
        intercept: vec![0.0; 5],
        multi_class: MultiClass::Multinomial,
    })
    .unwrap();

    InferencePipeline::builder()
        .with_vectorizer(Arc::new(vectorizer))
        .with_classifier(Arc::new(ClassifierModel::LogisticRegression(classifier)))
        .with_preprocessing(preprocessing)
        .build()
        .unwrap()
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalization");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| normalize(black_box(SHORT_TEXT))));
    group.bench_function("long_text", |b| b.iter(|| normalize(black_box(LONG_TEXT))));

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let modes = [("raw", Preprocessing::Raw), ("normalize", Preprocessing::Normalize)];
    for (name, preprocessing) in modes {
        let pipeline = setup_benchmark_pipeline(5_000, preprocessing);
        group.bench_function(format!("predict_{}", name), |b| {
            b.iter(|| pipeline.predict(black_box(LONG_TEXT)).unwrap())
        });
    }

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scaling");
    group.sample_size(30);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Vocabulary size drives both the tf-idf row and the coefficient product
    for &n_features in &[1_000, 10_000, 50_000] {
        let pipeline = setup_benchmark_pipeline(n_features, Preprocessing::Normalize);
        group.bench_function(format!("features_{}", n_features), |b| {
            b.iter(|| pipeline.predict(black_box(SHORT_TEXT)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalization, bench_prediction, bench_scaling);
criterion_main!(benches);
