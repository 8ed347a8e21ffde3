/// Sequence Classification
pub mod sequence_classification;
