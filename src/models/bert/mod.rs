/// Architecture configuration read from a Hugging Face `config.json`
pub mod config;

/// Token, position and segment embeddings
pub mod embeddings;

/// BERT for Sequence Classification
pub mod model;

pub use config::{Config, ConfigError};
pub use embeddings::Embeddings;
pub use model::{Model, ModelRecord};
