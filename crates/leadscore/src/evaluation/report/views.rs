use crate::evaluation::domain::ProfitCurvePoint;
use crate::evaluation::metrics::ClassificationMetrics;
use serde::Serialize;

/// Per-model extraction results attached to a report.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub optimum: ProfitCurvePoint,
    pub metrics_at_optimum: ClassificationMetrics,
    /// Optimum profit minus the random baseline at the same fraction.
    pub gain_over_random: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_point: Option<ProfitCurvePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lift_over_historical: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulationView {
    pub size: usize,
    pub positives: usize,
    pub negatives: usize,
    pub base_rate: f64,
}
