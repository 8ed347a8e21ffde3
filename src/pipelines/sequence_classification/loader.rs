use std::path::{Path, PathBuf};

use burn::{
    config::Config as _,
    module::Module,
    record::{CompactRecorder, FileRecorder, Recorder},
    tensor::backend::Backend,
};
use log::info;
use tokenizers::{Tokenizer, TruncationParams};

use crate::{
    models::bert::{self, Model, ModelRecord},
    utils::hugging_face::resolve_pretrained,
};

use super::{Batcher, BundleLoadError, Classifier, Config, LabelMap};

/// The default bundle location, relative to the working directory
pub const DEFAULT_BUNDLE: &str = "fact_checking_model";

/// The manifest file inside a bundle
pub const MANIFEST_FILE: &str = "bundle.json";

/// The weights file inside a bundle, without the extension the recorder appends (`.mpk`)
pub const WEIGHTS_FILE: &str = "model";

/// A persisted model bundle: a manifest plus a `CompactRecorder` snapshot of the model weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    dir: PathBuf,
}

impl Bundle {
    /// Refer to a bundle directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the manifest
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Path passed to the recorder for the weights
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    /// The weights file as written by the recorder, extension included
    pub fn weights_file<B: Backend>(&self) -> PathBuf {
        self.weights_path()
            .with_extension(<CompactRecorder as FileRecorder<B>>::file_extension())
    }

    /// Read and validate the manifest
    pub fn manifest(&self) -> Result<Config, BundleLoadError> {
        let path = self.manifest_path();

        if !path.is_file() {
            return Err(BundleLoadError::Missing(path));
        }

        Config::load(&path).map_err(|e| BundleLoadError::Manifest {
            path,
            reason: e.to_string(),
        })
    }

    /// Write a manifest and a trained model into the bundle directory
    pub fn save<B: Backend>(&self, config: &Config, model: Model<B>) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        config
            .save(self.manifest_path())
            .map_err(|e| anyhow!("Unable to save bundle manifest: {}", e))?;

        CompactRecorder::new()
            .record(model.into_record(), self.weights_path())
            .map_err(|e| anyhow!("Unable to save model weights: {}", e))?;

        Ok(())
    }

    /// Reconstruct the tokenizer and model described by this bundle
    pub async fn load<B: Backend>(&self, device: B::Device) -> Result<Classifier<B>, BundleLoadError> {
        if !self.dir.is_dir() {
            return Err(BundleLoadError::Missing(self.dir.clone()));
        }

        let config = self.manifest()?;
        let labels = LabelMap::from_id2label(&config.id2label)?;

        let pretrained = resolve_pretrained(&config.tokenizer_name)
            .await
            .map_err(|e| BundleLoadError::Resolve {
                name: config.tokenizer_name.clone(),
                reason: format!("{:#}", e),
            })?;

        let architecture = bert::Config::load(&pretrained.config_file)?.for_inference();

        let max_seq_length = config.max_seq_len.min(architecture.max_tokens());

        let mut tokenizer = Tokenizer::from_file(&pretrained.tokenizer_file)
            .map_err(|e| BundleLoadError::Tokenizer(e.to_string()))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_seq_length,
                ..Default::default()
            }))
            .map_err(|e| BundleLoadError::Tokenizer(e.to_string()))?;

        // Batches hold a single text, so padding to the longest sequence never adds tokens
        tokenizer.with_padding(None);

        let weights_file = self.weights_file::<B>();
        if !weights_file.is_file() {
            return Err(BundleLoadError::Missing(weights_file));
        }

        let initialized: Model<B> = architecture.init(labels.len(), &device);
        let expected = parameter_shapes(&initialized);

        let record: ModelRecord<B> = CompactRecorder::new()
            .load(self.weights_path(), &device)
            .map_err(|e| BundleLoadError::Weights(e.to_string()))?;

        let model = initialized.load_record(record);

        check_shapes(&expected, &parameter_shapes(&model))?;

        let batcher = Batcher::new(
            tokenizer,
            max_seq_length,
            architecture.pad_token_id,
            device,
        );

        info!(
            "Model and tokenizer loaded successfully from {} (tokenizer: {}, labels: {})",
            self.dir.display(),
            config.tokenizer_name,
            labels
                .iter()
                .map(|label| label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Classifier::new(batcher, model, labels, config.tokenizer_name))
    }
}

impl<B: Backend> Classifier<B> {
    /// Load a classifier from a bundle directory
    pub async fn load(dir: impl AsRef<Path>, device: B::Device) -> Result<Self, BundleLoadError> {
        Bundle::new(dir.as_ref()).load(device).await
    }
}

/// Named shapes of the parameters that depend on the architecture and label count
fn parameter_shapes<B: Backend>(model: &Model<B>) -> Vec<(&'static str, Vec<usize>)> {
    let embeddings = &model.embeddings;

    vec![
        ("embeddings.word", embeddings.word.weight.val().dims().to_vec()),
        (
            "embeddings.position",
            embeddings.position.weight.val().dims().to_vec(),
        ),
        (
            "embeddings.token_type",
            embeddings.token_type.weight.val().dims().to_vec(),
        ),
        ("pooler", model.pooler.weight.val().dims().to_vec()),
        ("output", model.output.weight.val().dims().to_vec()),
        // Covers the encoder layers, whose internals are not exposed
        ("total", vec![model.num_params()]),
    ]
}

fn check_shapes(
    expected: &[(&'static str, Vec<usize>)],
    found: &[(&'static str, Vec<usize>)],
) -> Result<(), BundleLoadError> {
    for ((name, expected), (_, found)) in expected.iter().zip(found) {
        if expected != found {
            return Err(BundleLoadError::ShapeMismatch {
                name: name.to_string(),
                expected: expected.clone(),
                found: found.clone(),
            });
        }
    }

    Ok(())
}
