use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Mutex, PoisonError},
};

use burn::tensor::backend::Backend;
use serde::Serialize;

use crate::models::bert::Model;

use super::{Batcher, ClassifyError, Label, LabelMap};

/// The result of classifying one text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// The most probable label
    pub label: Label,

    /// The probability of `label`, rounded to 4 decimal places
    pub confidence: f64,
}

/// A text classifier shared by every request handler
pub trait Classify: Send + Sync {
    /// Classify a single text
    fn classify(&self, text: &str) -> Result<Prediction, ClassifyError>;

    /// Labels in model output order
    fn labels(&self) -> LabelMap {
        LabelMap::default()
    }
}

/// A loaded tokenizer and model pair. Immutable once constructed.
pub struct Classifier<B: Backend> {
    /// Tokenizes and pads inputs
    batcher: Batcher<B>,

    /// Forward passes are serialized because concurrent use of a backend is not guaranteed to be
    /// thread-safe
    model: Mutex<Model<B>>,

    /// Model output index to label
    labels: LabelMap,

    /// The pretrained tokenizer this model was built on
    tokenizer_name: String,
}

impl<B: Backend> Classifier<B> {
    /// Assemble a classifier from already-constructed parts
    pub fn new(batcher: Batcher<B>, model: Model<B>, labels: LabelMap, tokenizer_name: String) -> Self {
        Self {
            batcher,
            model: Mutex::new(model),
            labels,
            tokenizer_name,
        }
    }

    /// The batcher used to tokenize inputs
    pub fn batcher(&self) -> &Batcher<B> {
        &self.batcher
    }

    /// The pretrained tokenizer identifier from the bundle
    pub fn tokenizer_name(&self) -> &str {
        &self.tokenizer_name
    }
}

impl<B: Backend> Classify for Classifier<B> {
    fn classify(&self, text: &str) -> Result<Prediction, ClassifyError> {
        if text.is_empty() {
            return Err(ClassifyError::MissingInput);
        }

        let input = self
            .batcher
            .batch(vec![text.to_string()])
            .map_err(|e| ClassifyError::Inference(format!("tokenization failed: {}", e)))?;

        let probabilities = {
            // Inference never mutates the model, so a lock poisoned by an earlier panic is safe
            let model = self.model.lock().unwrap_or_else(PoisonError::into_inner);

            panic::catch_unwind(AssertUnwindSafe(|| model.infer(input)))
                .map_err(|cause| ClassifyError::Inference(panic_message(cause.as_ref())))?
        };

        let probabilities = probabilities.into_data().convert::<f32>().value;

        if probabilities.len() != self.labels.len() {
            return Err(ClassifyError::Inference(format!(
                "expected {} class probabilities, the model produced {}",
                self.labels.len(),
                probabilities.len()
            )));
        }

        let (index, probability) = argmax(&probabilities)
            .ok_or_else(|| ClassifyError::Inference("non-finite class probabilities".to_string()))?;

        let label = self
            .labels
            .get(index)
            .ok_or_else(|| ClassifyError::Inference(format!("no label for class {}", index)))?;

        Ok(Prediction {
            label,
            confidence: round_confidence(probability),
        })
    }

    fn labels(&self) -> LabelMap {
        self.labels
    }
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    let detail = cause
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());

    format!("forward pass panicked: {}", detail)
}

/// Index and value of the largest probability. Exact ties go to the lowest index, so the label
/// listed first wins. Returns `None` for an empty slice or any non-finite value.
pub fn argmax(probabilities: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (index, &p) in probabilities.iter().enumerate() {
        if !p.is_finite() {
            return None;
        }

        match best {
            Some((_, max)) if p <= max => {}
            _ => best = Some((index, p)),
        }
    }

    best
}

/// Round a probability to 4 decimal places
pub fn round_confidence(probability: f32) -> f64 {
    (f64::from(probability) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
    }

    #[test]
    fn test_argmax_ties_go_to_first_label() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some((0, 0.4)));
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some((1, 0.4)));
        assert_eq!(argmax(&[1.0 / 3.0; 3]), Some((0, 1.0 / 3.0)));
    }

    #[test]
    fn test_argmax_rejects_empty_and_nan() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[0.5, f32::NAN, 0.5]), None);
    }

    #[test]
    fn test_panic_message_reads_payload() {
        let cause = panic::catch_unwind(|| panic!("index out of bounds")).unwrap_err();

        assert_eq!(
            panic_message(cause.as_ref()),
            "forward pass panicked: index out of bounds"
        );
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.873_21), 0.8732);
        assert_eq!(round_confidence(0.999_99), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(1.0 / 3.0), 0.3333);
    }

    #[test]
    fn test_prediction_serializes_label_name() {
        let prediction = Prediction {
            label: Label::Neutral,
            confidence: 0.8732,
        };

        assert_eq!(
            serde_json::to_value(prediction).unwrap(),
            serde_json::json!({ "label": "Neutral", "confidence": 0.8732 })
        );
    }
}
