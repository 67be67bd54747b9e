use super::domain::{ConfusionCounts, EvaluationError, ScoredRecord};
use serde::Serialize;
use tracing::warn;

/// Float error allowed when deciding that `fraction * N` sits on a half.
const HALF_TOLERANCE: f64 = 1e-9;

/// Holdout population ranked by score, highest first.
///
/// Ranking uses a stable sort, so records with equal scores keep their input
/// order and "the top K records" is reproducible for identical input.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDataset {
    records: Vec<ScoredRecord>,
    #[serde(skip)]
    cumulative_positives: Vec<usize>,
    positives: usize,
    negatives: usize,
}

impl ScoredDataset {
    pub fn new(mut records: Vec<ScoredRecord>) -> Result<Self, EvaluationError> {
        if records.is_empty() {
            warn!("rejecting empty scored dataset");
            return Err(EvaluationError::invalid_input("scored dataset is empty"));
        }

        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, record)| !record.score.is_finite())
        {
            warn!(index, score = record.score, "rejecting non-finite score");
            return Err(EvaluationError::invalid_input(format!(
                "record {index} has non-finite score {}",
                record.score
            )));
        }

        records.sort_by(|left, right| right.score.total_cmp(&left.score));

        let mut cumulative_positives = Vec::with_capacity(records.len() + 1);
        let mut running = 0usize;
        cumulative_positives.push(running);
        for record in &records {
            if record.label.is_positive() {
                running += 1;
            }
            cumulative_positives.push(running);
        }

        let positives = running;
        let negatives = records.len() - positives;

        Ok(Self {
            records,
            cumulative_positives,
            positives,
            negatives,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    pub fn positives(&self) -> usize {
        self.positives
    }

    pub fn negatives(&self) -> usize {
        self.negatives
    }

    pub fn base_rate(&self) -> f64 {
        self.positives as f64 / self.records.len() as f64
    }

    /// Partition into the top `targeted` records and the remainder.
    pub fn counts_at(&self, targeted: usize) -> Result<ConfusionCounts, EvaluationError> {
        if targeted > self.records.len() {
            return Err(EvaluationError::out_of_range(
                "targeted count",
                targeted as f64,
            ));
        }

        let true_positive = self.cumulative_positives[targeted];
        let false_positive = targeted - true_positive;

        Ok(ConfusionCounts {
            true_positive,
            false_positive,
            true_negative: self.negatives - false_positive,
            false_negative: self.positives - true_positive,
        })
    }

    /// Number of records targeted when acting on `fraction` of the population.
    ///
    /// Rounds half up like `FractionGrid::targeted_count`. Products that miss
    /// a half by float error alone (`0.29 * 50`) still round up.
    pub fn targeted_count(&self, fraction: f64) -> usize {
        let population = self.records.len();
        let raw = fraction * population as f64;
        ((raw + 0.5 + HALF_TOLERANCE).floor() as usize).min(population)
    }
}
