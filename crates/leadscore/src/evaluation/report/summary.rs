use super::views::{ModelSummary, PopulationView};
use crate::evaluation::budget::BudgetConstraint;
use crate::evaluation::curve::{lift, ProfitCurve};
use crate::evaluation::dataset::ScoredDataset;
use crate::evaluation::domain::{CostModel, EvaluationError};
use crate::evaluation::engine::ProfitCurveEngine;
use crate::evaluation::grid::FractionGrid;
use crate::evaluation::metrics::ClassificationMetrics;
use serde::Serialize;
use tracing::{info, warn};

/// A classifier's scores for the shared holdout population.
#[derive(Debug, Clone)]
pub struct ScoredModel {
    pub name: String,
    pub dataset: ScoredDataset,
}

impl ScoredModel {
    pub fn new(name: impl Into<String>, dataset: ScoredDataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub grid: FractionGrid,
    pub budget: Option<BudgetConstraint>,
    pub mean_historical_profit: Option<f64>,
}

/// Side-by-side profit curves for several classifiers plus the random line.
#[derive(Debug, Clone, Serialize)]
pub struct LeadPrioritizationReport {
    pub cost_model: CostModel,
    pub population: PopulationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_fraction: Option<f64>,
    pub curves: Vec<ProfitCurve>,
    pub baseline: ProfitCurve,
    pub models: Vec<ModelSummary>,
    pub best_model: String,
}

impl LeadPrioritizationReport {
    pub fn build(
        engine: &ProfitCurveEngine,
        models: &[ScoredModel],
        options: &ReportOptions,
    ) -> Result<Self, EvaluationError> {
        let reference = shared_population(models)?;
        let budget_fraction = options
            .budget
            .map(|budget| budget.fraction_of(reference.len()))
            .transpose()?;

        let baseline = engine.random_baseline(reference, &options.grid);
        let mut curves = Vec::with_capacity(models.len());
        let mut summaries = Vec::with_capacity(models.len());

        for model in models {
            let curve = engine.sweep_named(&model.dataset, &options.grid, model.name.as_str());
            let optimum = curve.argmax_profit()?.clone();
            let counts = model.dataset.counts_at(optimum.targeted_count)?;
            let random_profit = baseline.profit_at_fraction(optimum.fraction)?.profit;

            let budget_point = budget_fraction
                .map(|fraction| {
                    engine.profit_at_fraction_named(&model.dataset, fraction, model.name.as_str())
                })
                .transpose()?;

            // Lift is read at the budget point when one is set, otherwise at the optimum.
            let lift_over_historical = options
                .mean_historical_profit
                .map(|mean| {
                    let profit = budget_point
                        .as_ref()
                        .map_or(optimum.profit, |point| point.profit);
                    lift(profit, mean)
                })
                .transpose()?;

            summaries.push(ModelSummary {
                model: model.name.clone(),
                gain_over_random: optimum.profit - random_profit,
                metrics_at_optimum: ClassificationMetrics::from_counts(&counts),
                optimum,
                budget_point,
                lift_over_historical,
            });
            curves.push(curve);
        }

        let best_model = best_model(&summaries);
        info!(
            models = summaries.len(),
            population = reference.len(),
            best_model = %best_model,
            "lead prioritization report built"
        );

        Ok(Self {
            cost_model: *engine.cost_model(),
            population: PopulationView {
                size: reference.len(),
                positives: reference.positives(),
                negatives: reference.negatives(),
                base_rate: reference.base_rate(),
            },
            budget_fraction,
            curves,
            baseline,
            models: summaries,
            best_model,
        })
    }

    pub fn summary_for(&self, model: &str) -> Option<&ModelSummary> {
        self.models.iter().find(|summary| summary.model == model)
    }

    pub fn curve_for(&self, model: &str) -> Option<&ProfitCurve> {
        self.curves.iter().find(|curve| curve.model() == model)
    }
}

fn shared_population(models: &[ScoredModel]) -> Result<&ScoredDataset, EvaluationError> {
    let (first, rest) = models.split_first().ok_or_else(|| {
        warn!("report requested without any scored models");
        EvaluationError::invalid_input("at least one scored model is required")
    })?;

    for model in rest {
        if model.dataset.len() != first.dataset.len()
            || model.dataset.positives() != first.dataset.positives()
        {
            warn!(
                model = %model.name,
                expected = first.dataset.len(),
                actual = model.dataset.len(),
                "scored model describes a different holdout population"
            );
            return Err(EvaluationError::invalid_input(format!(
                "model {} was scored on a different population than {}",
                model.name, first.name
            )));
        }
    }

    Ok(&first.dataset)
}

fn best_model(summaries: &[ModelSummary]) -> String {
    let mut best: Option<&ModelSummary> = None;
    for summary in summaries {
        match best {
            Some(current) if summary.optimum.profit <= current.optimum.profit => {}
            _ => best = Some(summary),
        }
    }
    best.map(|summary| summary.model.clone())
        .unwrap_or_default()
}
