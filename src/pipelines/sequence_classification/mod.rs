/// Common batcher operations for Sequence Classification
pub mod batcher;

/// The bundle manifest
pub mod config;

/// Loader and inference errors
pub mod error;

/// Inference over a loaded bundle
pub mod inference;

/// The fixed inference label set and its index mapping
pub mod labels;

/// Reconstruct a classifier from a persisted bundle
pub mod loader;

pub use batcher::Batcher;
pub use config::Config;
pub use error::{BundleLoadError, ClassifyError};
pub use inference::{Classifier, Classify, Prediction};
pub use labels::{Label, LabelError, LabelMap};
pub use loader::Bundle;
