use burn::{
    module::Module,
    nn::{Dropout, Embedding, LayerNorm},
    tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor},
};

/// Sum of word, position and token type embeddings, normalized
#[derive(Module, Debug)]
pub struct Embeddings<B: Backend> {
    /// Word embeddings
    pub word: Embedding<B>,

    /// Absolute position embeddings
    pub position: Embedding<B>,

    /// Token type (segment) embeddings
    pub token_type: Embedding<B>,

    /// Layer normalization applied to the summed embeddings
    pub layer_norm: LayerNorm<B>,

    /// Embedding dropout
    pub dropout: Dropout,

    /// The position id assigned to the first token
    pub position_offset: usize,
}

impl<B: Backend> Embeddings<B> {
    /// Embed a batch of token ids: [batch_size, seq_length] -> [batch_size, seq_length, hidden_size]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_length] = tokens.dims();
        let device = tokens.device();

        let positions = Tensor::<B, 1, Int>::from_data(
            Data::new(
                (0..seq_length)
                    .map(|i| ((i + self.position_offset) as i64).elem())
                    .collect(),
                Shape::new([seq_length]),
            ),
            &device,
        )
        .reshape([1, seq_length])
        .repeat(0, batch_size);

        // Single-segment input
        let token_types = Tensor::<B, 2, Int>::zeros([batch_size, seq_length], &device);

        let embeddings = self.word.forward(tokens)
            + self.position.forward(positions)
            + self.token_type.forward(token_types);

        self.dropout.forward(self.layer_norm.forward(embeddings))
    }
}
