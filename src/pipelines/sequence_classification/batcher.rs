use burn::{
    nn::attention::generate_padding_mask,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;
use tokenizers::Tokenizer;

/// An inference batch for sequence classification
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized text as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized text containing booleans for padding locations
    pub mask_pad: Tensor<B, 2, Bool>,
}

/// Struct for batching sequence classification inputs
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to token IDs, with truncation configured
    tokenizer: Tokenizer,

    /// Maximum sequence length for tokenized text
    max_seq_length: usize,

    /// ID of the padding token
    pad_token_id: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Tokenizer,
        max_seq_length: usize,
        pad_token_id: usize,
        device: B::Device,
    ) -> Self {
        Self {
            tokenizer,
            max_seq_length,
            pad_token_id,
            device,
        }
    }

    /// The maximum number of tokens fed to the model, special tokens included
    pub fn max_seq_length(&self) -> usize {
        self.max_seq_length
    }

    /// Tokenize a single text, adding special tokens and truncating to the maximum length
    pub fn encode(&self, text: &str) -> tokenizers::Result<Vec<usize>> {
        let encoding = self.tokenizer.encode(text, true)?;

        Ok(encoding.get_ids().iter().map(|t| *t as usize).collect())
    }

    /// Collects a list of texts into an inference batch
    pub fn batch(&self, items: Vec<String>) -> tokenizers::Result<Infer<B>> {
        let token_ids_list = items
            .iter()
            .map(|input| self.encode(input))
            .collect::<tokenizers::Result<Vec<_>>>()?;

        let padding = generate_padding_mask(
            self.pad_token_id,
            token_ids_list,
            Some(self.max_seq_length),
            &self.device,
        );

        Ok(Infer {
            tokens: padding.tensor,
            mask_pad: padding.mask,
        })
    }
}
