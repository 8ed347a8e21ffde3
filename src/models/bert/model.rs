use burn::{
    module::Module,
    nn::{
        transformer::{TransformerEncoder, TransformerEncoderInput},
        Dropout, Linear,
    },
    tensor::{activation::softmax, backend::Backend, Tensor},
};

use crate::pipelines::sequence_classification::batcher::Infer;

use super::Embeddings;

/// BERT for sequence Classification
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Token, position and segment embeddings
    pub embeddings: Embeddings<B>,

    /// The transformer encoder stack
    pub encoder: TransformerEncoder<B>,

    /// Dense layer applied to the first ([CLS]) token
    pub pooler: Linear<B>,

    /// Dropout before the classification head
    pub dropout: Dropout,

    /// Linear layer for sequence classification
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Raw class scores: [batch_size, n_classes]
    pub fn forward(&self, input: Infer<B>) -> Tensor<B, 2> {
        let [batch_size, _seq_length] = input.tokens.dims();

        let embedded = self.embeddings.forward(input.tokens);

        let hidden_states = self
            .encoder
            .forward(TransformerEncoderInput::new(embedded).mask_pad(input.mask_pad));

        let [_, _, hidden_size] = hidden_states.dims();

        let first_token = hidden_states
            .slice([0..batch_size, 0..1, 0..hidden_size])
            .reshape([batch_size, hidden_size]);

        let pooled_output = self.pooler.forward(first_token).tanh();

        self.output.forward(self.dropout.forward(pooled_output))
    }

    /// Defines forward pass for inference: class probabilities, [batch_size, n_classes]
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 2> {
        softmax(self.forward(input), 1)
    }
}
