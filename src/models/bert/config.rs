//! The encoder architecture, as described by the `config.json` that accompanies a pretrained
//! tokenizer on the Hugging Face Hub

use std::{fs::File, io::BufReader, path::Path};

use burn::{
    nn::{transformer::TransformerEncoderConfig, DropoutConfig, EmbeddingConfig, LayerNormConfig, LinearConfig},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};

use super::{Embeddings, Model};

/// The Model Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Size of the vocabulary
    pub vocab_size: usize,
    /// Size of bert embedding (e.g., 768 for bert-base)
    pub hidden_size: usize,
    /// Number of transformer encoder layers/blocks
    pub num_hidden_layers: usize,
    /// Number of attention heads in the multi-head attention
    pub num_attention_heads: usize,
    /// Size of the intermediate position wise feedforward layer
    pub intermediate_size: usize,
    /// Dropout value across layers, typically 0.1
    #[serde(default = "default_hidden_dropout_prob")]
    pub hidden_dropout_prob: f64,
    /// Max position embeddings, in RoBERTa equal to max_seq_len + 2 (514), for BERT equal to max_seq_len(512)
    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,
    /// Identifier for sentence type in input (e.g., 0 for single sentence, 1 for pair)
    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size: usize,
    /// Layer normalization epsilon
    #[serde(default = "default_layer_norm_eps")]
    pub layer_norm_eps: f64,
    /// Index of the padding token
    #[serde(default)]
    pub pad_token_id: usize,
    /// BERT model name (bert, roberta)
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

fn default_hidden_dropout_prob() -> f64 {
    0.1
}

fn default_max_position_embeddings() -> usize {
    512
}

fn default_type_vocab_size() -> usize {
    2
}

fn default_layer_norm_eps() -> f64 {
    1e-12
}

fn default_model_type() -> String {
    "bert".to_string()
}

/// Architecture config errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("unable to read {path}: {source}")]
    Io {
        /// Path of the config file
        path: String,
        /// The underlying io error
        source: std::io::Error,
    },

    /// The config file is not a valid architecture description
    #[error("unable to parse {path}: {source}")]
    Parse {
        /// Path of the config file
        path: String,
        /// The underlying json error
        source: serde_json::Error,
    },

    /// The hidden size cannot be split evenly across attention heads
    #[error("hidden_size {hidden_size} is not divisible by num_attention_heads {num_attention_heads}")]
    Heads {
        /// Size of the hidden state
        hidden_size: usize,
        /// Number of attention heads
        num_attention_heads: usize,
    },
}

impl Config {
    /// Load a Hugging Face `config.json`. Fields this model does not use are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse { path: display, source })?;

        if config.num_attention_heads == 0 || config.hidden_size % config.num_attention_heads != 0 {
            return Err(ConfigError::Heads {
                hidden_size: config.hidden_size,
                num_attention_heads: config.num_attention_heads,
            });
        }

        Ok(config)
    }

    /// Disable every dropout layer
    pub fn for_inference(mut self) -> Self {
        self.hidden_dropout_prob = 0.0;
        self
    }

    /// RoBERTa numbers positions from `pad_token_id + 1`, BERT from zero
    pub fn position_offset(&self) -> usize {
        if self.model_type == "roberta" {
            self.pad_token_id + 1
        } else {
            0
        }
    }

    /// The longest token sequence the position embeddings can address
    pub fn max_tokens(&self) -> usize {
        self.max_position_embeddings
            .saturating_sub(self.position_offset())
    }

    /// Initialize the model with a classification head of `n_classes` outputs
    pub fn init<B: Backend>(&self, n_classes: usize, device: &B::Device) -> Model<B> {
        let embeddings = Embeddings {
            word: EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device),
            position: EmbeddingConfig::new(self.max_position_embeddings, self.hidden_size)
                .init(device),
            token_type: EmbeddingConfig::new(self.type_vocab_size, self.hidden_size).init(device),
            layer_norm: LayerNormConfig::new(self.hidden_size)
                .with_epsilon(self.layer_norm_eps)
                .init(device),
            dropout: DropoutConfig::new(self.hidden_dropout_prob).init(),
            position_offset: self.position_offset(),
        };

        let encoder = TransformerEncoderConfig::new(
            self.hidden_size,
            self.intermediate_size,
            self.num_attention_heads,
            self.num_hidden_layers,
        )
        .with_dropout(self.hidden_dropout_prob)
        .with_norm_first(false)
        .init(device);

        Model {
            embeddings,
            encoder,
            pooler: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            dropout: DropoutConfig::new(self.hidden_dropout_prob).init(),
            output: LinearConfig::new(self.hidden_size, n_classes).init(device),
            n_classes,
        }
    }
}
