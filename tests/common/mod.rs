#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use burn::backend::NdArray;
use burn_fact_check::{
    models::bert,
    pipelines::sequence_classification::{
        Bundle, Classifier, Classify, ClassifyError, Config, Label, LabelMap, Prediction,
    },
    server::{router, AppState},
};
use tokio::net::TcpListener;

pub type TestBackend = NdArray;

/// A tiny BERT architecture and word-level tokenizer
pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tiny-bert")
}

/// A fresh, empty directory unique to this test process
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fact-check-{}-{}", std::process::id(), name));

    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }

    std::fs::create_dir_all(&dir).unwrap();

    dir
}

pub fn canonical_id2label() -> BTreeMap<usize, String> {
    LabelMap::default().to_id2label()
}

/// Write a bundle with randomly initialized weights and an `n_classes` output head
pub fn write_bundle(name: &str, n_classes: usize, id2label: BTreeMap<usize, String>) -> PathBuf {
    let dir = temp_dir(name);

    let architecture = bert::Config::load(fixture_dir().join("config.json")).unwrap();
    let model = architecture.init::<TestBackend>(n_classes, &Default::default());

    let config = Config::new(fixture_dir().to_string_lossy().into_owned(), id2label);

    Bundle::new(&dir).save(&config, model).unwrap();

    dir
}

pub async fn load_classifier(name: &str) -> Classifier<TestBackend> {
    let dir = write_bundle(name, 3, canonical_id2label());

    Classifier::load(&dir, Default::default()).await.unwrap()
}

/// Serve the router on an ephemeral port
pub async fn spawn_server(classifier: Arc<dyn Classify>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(AppState::new(classifier)))
            .await
            .unwrap();
    });

    addr
}

/// Records how often it is invoked and always predicts `Neutral`
#[derive(Default)]
pub struct CountingClassifier {
    pub calls: AtomicUsize,
}

impl CountingClassifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classify for CountingClassifier {
    fn classify(&self, _text: &str) -> Result<Prediction, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(Prediction {
            label: Label::Neutral,
            confidence: 0.8732,
        })
    }
}

/// Fails every forward pass
pub struct FailingClassifier;

impl Classify for FailingClassifier {
    fn classify(&self, _text: &str) -> Result<Prediction, ClassifyError> {
        Err(ClassifyError::Inference("forward pass exploded".to_string()))
    }
}

/// True when the value has at most 4 decimal places
pub fn is_rounded_to_4dp(value: f64) -> bool {
    let scaled = value * 10_000.0;

    (scaled - scaled.round()).abs() < 1e-6
}
