use std::collections::BTreeMap;

/// The bundle manifest, stored as `bundle.json` next to the model weights
#[derive(burn::config::Config)]
pub struct Config {
    /// The pretrained tokenizer and base architecture, as a Hugging Face Hub id (e.g.,
    /// "bert-base-uncased") or a local directory holding `tokenizer.json` and `config.json`
    pub tokenizer_name: String,

    /// A map from class ids to class name labels
    pub id2label: BTreeMap<usize, String>,

    /// Maximum number of tokens per input, special tokens included
    #[config(default = 512)]
    pub max_seq_len: usize,
}
