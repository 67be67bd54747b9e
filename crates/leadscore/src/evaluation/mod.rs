//! Profit-curve evaluation of scored leads.
//!
//! A classifier's holdout scores are ranked once, then swept across a grid of
//! targeting fractions under a cost model. Curves are compared against the
//! random-targeting line and read for their optimum and budget-bound points.

pub mod budget;
pub mod curve;
pub mod dataset;
pub mod domain;
pub mod engine;
pub mod grid;
pub mod metrics;
pub mod report;

#[cfg(test)]
mod tests;

pub use budget::{BudgetConstraint, TargetingBudget};
pub use curve::ProfitCurve;
pub use dataset::ScoredDataset;
pub use domain::{
    ConfusionCounts, CostModel, EvaluationError, Label, ProfitCurvePoint, ScoredRecord,
    MODEL_SERIES, RANDOM_SERIES,
};
pub use engine::ProfitCurveEngine;
pub use grid::{FractionGrid, MAX_GRID_STEPS};
pub use metrics::ClassificationMetrics;
pub use report::views::{ModelSummary, PopulationView};
pub use report::{LeadPrioritizationReport, ReportOptions, ScoredModel};
