use super::domain::ConfusionCounts;
use serde::Serialize;

/// Confusion-matrix rates for a single targeting cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    /// Rates with an empty denominator are reported as 0.
    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        let tp = counts.true_positive as f64;
        let fp = counts.false_positive as f64;
        let tn = counts.true_negative as f64;
        let fn_ = counts.false_negative as f64;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);

        Self {
            accuracy: ratio(tp + tn, counts.total() as f64),
            precision,
            recall,
            specificity: ratio(tn, tn + fp),
            f1: ratio(2.0 * precision * recall, precision + recall),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
