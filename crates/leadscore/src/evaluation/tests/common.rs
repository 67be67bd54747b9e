use crate::evaluation::{
    CostModel, FractionGrid, Label, ProfitCurveEngine, ScoredDataset, ScoredRecord,
};

/// Rank of each holdout record and whether it converted.
///
/// Top 10 hold 8 buyers, the next 10 are all buyers, and the remaining 80
/// convert on every fifth record: 34 buyers out of 100.
pub(super) fn holdout_label(rank: usize) -> Label {
    let positive = match rank {
        0..=9 => rank != 3 && rank != 7,
        10..=19 => true,
        _ => rank % 5 == 0,
    };
    Label::from(positive)
}

/// Scores descending by rank, handed over in reverse so ranking has work to do.
pub(super) fn holdout_records() -> Vec<ScoredRecord> {
    (0..100)
        .rev()
        .map(|rank| ScoredRecord::new((100 - rank) as f64 / 100.0, holdout_label(rank)))
        .collect()
}

pub(super) fn holdout() -> ScoredDataset {
    ScoredDataset::new(holdout_records()).expect("holdout ranks")
}

/// Same population, but every buyer outranks every non-buyer.
pub(super) fn perfect_holdout() -> ScoredDataset {
    let records = (0..100)
        .map(|rank| {
            let label = holdout_label(rank);
            let score = if label.is_positive() { 0.9 } else { 0.1 };
            ScoredRecord::new(score, label)
        })
        .collect();
    ScoredDataset::new(records).expect("perfect holdout ranks")
}

pub(super) fn engine() -> ProfitCurveEngine {
    ProfitCurveEngine::new(CostModel::reference()).expect("reference model is valid")
}

pub(super) fn percent_grid() -> FractionGrid {
    FractionGrid::from_step(0.01).expect("percent grid")
}
