//! Ordered class labels shared by dataset encoding and inference decoding.
//!
//! The ordinal position of a label is its only identity: one-hot training
//! targets and arg-max indices both go through [`ClassLabel::ALL`].
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Circle,
    Square,
    Triangle,
}

impl ClassLabel {
    /// Canonical label order.
    pub const ALL: [ClassLabel; 3] = [ClassLabel::Circle, ClassLabel::Square, ClassLabel::Triangle];

    pub fn index(self) -> usize {
        match self {
            ClassLabel::Circle => 0,
            ClassLabel::Square => 1,
            ClassLabel::Triangle => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ClassLabel::Circle => "circle",
            ClassLabel::Square => "square",
            ClassLabel::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Index of the largest score. Ties resolve to the lowest index; an empty
/// slice has no winner.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best = 0;
    let mut best_score = *first;
    for (i, &s) in rest.iter().enumerate() {
        if s > best_score {
            best = i + 1;
            best_score = s;
        }
    }
    Some(best)
}

/// One-hot targets `[N, C]` for a sequence of labels.
pub fn one_hot(labels: &[ClassLabel]) -> Array2<f32> {
    let mut out = Array2::zeros((labels.len(), ClassLabel::ALL.len()));
    for (row, label) in labels.iter().enumerate() {
        out[[row, label.index()]] = 1.0;
    }
    out
}
