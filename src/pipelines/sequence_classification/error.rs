use std::path::PathBuf;

use crate::models::bert;

use super::LabelError;

/// Failures while reconstructing a classifier from a bundle. These are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum BundleLoadError {
    /// The bundle directory or one of its files does not exist
    #[error("model bundle not found at {}", .0.display())]
    Missing(PathBuf),

    /// The manifest could not be parsed
    #[error("invalid bundle manifest {}: {}", .path.display(), .reason)]
    Manifest {
        /// Path of the manifest
        path: PathBuf,
        /// Why parsing failed
        reason: String,
    },

    /// The stored label map is not a valid ordering of the label set
    #[error("invalid label map: {0}")]
    Labels(#[from] LabelError),

    /// The pretrained tokenizer files could not be located or downloaded
    #[error("unable to resolve pretrained tokenizer {name:?}: {reason}")]
    Resolve {
        /// The tokenizer identifier from the manifest
        name: String,
        /// Why resolution failed
        reason: String,
    },

    /// The tokenizer could not be constructed
    #[error("unable to load tokenizer: {0}")]
    Tokenizer(String),

    /// The architecture config is unusable
    #[error(transparent)]
    Architecture(#[from] bert::ConfigError),

    /// The parameter snapshot could not be read
    #[error("unable to load trained model weights: {0}")]
    Weights(String),

    /// The parameter snapshot does not fit the architecture
    #[error("parameter {name} has shape {found:?}, the architecture expects {expected:?}")]
    ShapeMismatch {
        /// The parameter that does not fit
        name: String,
        /// The shape the architecture defines
        expected: Vec<usize>,
        /// The shape stored in the bundle
        found: Vec<usize>,
    },
}

/// Failures while classifying a single text
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The input text is empty. No model computation takes place.
    #[error("No text provided")]
    MissingInput,

    /// Tokenization or the forward pass failed
    #[error("inference failed: {0}")]
    Inference(String),
}
