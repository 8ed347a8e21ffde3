use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::utils::classes::invert_map;

/// Natural language inference classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// The text contradicts the reference facts
    Contradiction,

    /// The text is neither supported nor contradicted
    Neutral,

    /// The text is supported by the reference facts
    Entailment,
}

impl Label {
    /// All labels, in their canonical index order
    pub const ALL: [Label; 3] = [Label::Contradiction, Label::Neutral, Label::Entailment];

    /// The display name, as returned to API clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Contradiction => "Contradiction",
            Label::Neutral => "Neutral",
            Label::Entailment => "Entailment",
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| LabelError::Unknown(value.to_string()))
    }
}

/// Label map errors
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    /// The map does not have one entry per label
    #[error("expected {expected} labels, found {found}")]
    Count {
        /// The size of the label set
        expected: usize,
        /// The number of entries in the map
        found: usize,
    },

    /// Class ids must run from zero without gaps
    #[error("class ids must be 0..{expected}, found id {found}")]
    Ids {
        /// The size of the label set
        expected: usize,
        /// The first out-of-range id
        found: usize,
    },

    /// The name is not part of the label set
    #[error("unknown label {0:?}")]
    Unknown(String),

    /// The same label appears under two ids
    #[error("label {0} is mapped more than once")]
    Duplicate(Label),
}

/// A validated mapping from model output index to label. Every label appears exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMap([Label; 3]);

impl Default for LabelMap {
    fn default() -> Self {
        Self(Label::ALL)
    }
}

impl LabelMap {
    /// Validate a map from class ids to class name labels. An empty map means the canonical order.
    pub fn from_id2label(id2label: &BTreeMap<usize, String>) -> Result<Self, LabelError> {
        if id2label.is_empty() {
            return Ok(Self::default());
        }

        let expected = Label::ALL.len();

        if id2label.len() != expected {
            return Err(LabelError::Count {
                expected,
                found: id2label.len(),
            });
        }

        // BTreeMap keys are sorted, so any gap shows up as an id past the end
        if let Some(&found) = id2label.keys().find(|id| **id >= expected) {
            return Err(LabelError::Ids { expected, found });
        }

        let entries = id2label
            .iter()
            .map(|(id, name)| Ok((*id, name.parse::<Label>()?)))
            .collect::<Result<Vec<(usize, Label)>, LabelError>>()?;

        let label2id: BTreeMap<Label, usize> = invert_map(entries.iter().copied());

        if label2id.len() != expected {
            let duplicate = entries
                .iter()
                .find(|(id, label)| label2id[label] != *id)
                .map(|(_, label)| *label)
                .unwrap_or(Label::ALL[0]);

            return Err(LabelError::Duplicate(duplicate));
        }

        let mut labels = Label::ALL;
        for (id, label) in entries {
            labels[id] = label;
        }

        Ok(Self(labels))
    }

    /// The label for a model output index
    pub fn get(&self, index: usize) -> Option<Label> {
        self.0.get(index).copied()
    }

    /// The number of labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, the label set is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Labels in output index order
    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.iter().copied()
    }

    /// The map in the form stored in a bundle manifest
    pub fn to_id2label(&self) -> BTreeMap<usize, String> {
        self.iter()
            .enumerate()
            .map(|(id, label)| (id, label.to_string()))
            .collect()
    }
}
