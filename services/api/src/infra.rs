use leadscore::config::EconomicsConfig;
use leadscore::evaluation::{
    BudgetConstraint, CostModel, EvaluationError, FractionGrid, Label, LeadPrioritizationReport,
    ProfitCurveEngine, ReportOptions, ScoredDataset, ScoredModel, ScoredRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) economics: Arc<EconomicsConfig>,
}

/// Classifier output for one model, labels as 0/1 flags.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModelScores {
    pub(crate) name: String,
    pub(crate) records: Vec<RecordPayload>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RecordPayload {
    pub(crate) score: f64,
    pub(crate) label: i64,
}

impl ModelScores {
    pub(crate) fn into_scored_model(self) -> Result<ScoredModel, EvaluationError> {
        let records = self
            .records
            .into_iter()
            .map(|record| {
                Label::try_from(record.label).map(|label| ScoredRecord::new(record.score, label))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScoredModel::new(self.name, ScoredDataset::new(records)?))
    }
}

/// Per-request overrides layered over the configured economics.
#[derive(Debug, Clone, Default)]
pub(crate) struct EconomicsOverrides {
    pub(crate) cost_model: Option<CostModel>,
    pub(crate) grid_step: Option<f64>,
    pub(crate) budget: Option<BudgetConstraint>,
    pub(crate) mean_historical_profit: Option<f64>,
}

pub(crate) fn build_report(
    economics: &EconomicsConfig,
    overrides: EconomicsOverrides,
    models: &[ScoredModel],
) -> Result<LeadPrioritizationReport, EvaluationError> {
    let engine = ProfitCurveEngine::new(overrides.cost_model.unwrap_or(economics.cost_model))?;
    let grid = match overrides.grid_step {
        Some(step) => FractionGrid::from_step(step)?,
        None => economics.grid,
    };

    let options = ReportOptions {
        grid,
        budget: overrides.budget.or(economics.budget),
        mean_historical_profit: overrides
            .mean_historical_profit
            .or(economics.mean_historical_profit),
    };

    LeadPrioritizationReport::build(&engine, models, &options)
}
