use super::curve::ProfitCurve;
use super::dataset::ScoredDataset;
use super::domain::{
    check_fraction, ConfusionCounts, CostModel, EvaluationError, Label, ProfitCurvePoint,
    MODEL_SERIES, RANDOM_SERIES,
};
use super::grid::FractionGrid;
use tracing::debug;

/// Turns a ranked population into profit curves under a fixed cost model.
#[derive(Debug, Clone)]
pub struct ProfitCurveEngine {
    cost: CostModel,
}

impl ProfitCurveEngine {
    pub fn new(cost: CostModel) -> Result<Self, EvaluationError> {
        cost.validate()?;
        Ok(Self { cost })
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    pub fn profit_at_count(
        &self,
        dataset: &ScoredDataset,
        targeted: usize,
    ) -> Result<f64, EvaluationError> {
        let counts = dataset.counts_at(targeted)?;
        Ok(self.cost.payoff(&counts))
    }

    /// Sweep the grid and name the resulting series "Model".
    pub fn sweep(&self, dataset: &ScoredDataset, grid: &FractionGrid) -> ProfitCurve {
        self.sweep_named(dataset, grid, MODEL_SERIES)
    }

    /// Sweep the grid once, advancing the cut record by record.
    ///
    /// Each step only reclassifies the newly targeted records, so the whole
    /// sweep is linear in the population plus the grid size.
    pub fn sweep_named(
        &self,
        dataset: &ScoredDataset,
        grid: &FractionGrid,
        model: impl Into<String>,
    ) -> ProfitCurve {
        let model = model.into();
        let records = dataset.records();
        let population = records.len();

        let mut counts = ConfusionCounts {
            true_positive: 0,
            false_positive: 0,
            true_negative: dataset.negatives(),
            false_negative: dataset.positives(),
        };
        let mut cursor = 0usize;
        let mut points = Vec::with_capacity(grid.len());

        for (index, fraction) in grid.fractions() {
            let target = grid.targeted_count(index, population);
            while cursor < target {
                match records[cursor].label {
                    Label::Positive => {
                        counts.true_positive += 1;
                        counts.false_negative -= 1;
                    }
                    Label::Negative => {
                        counts.false_positive += 1;
                        counts.true_negative -= 1;
                    }
                }
                cursor += 1;
            }

            points.push(ProfitCurvePoint {
                fraction,
                targeted_count: target,
                profit: self.cost.payoff(&counts),
                model: model.clone(),
            });
        }

        debug!(
            model = %model,
            population,
            points = points.len(),
            "profit curve swept"
        );

        ProfitCurve::new(model, points)
    }

    /// Expected profit of targeting a uniformly random subset.
    ///
    /// A random subset has the population's base rate in expectation, so the
    /// line through the "nobody" and "everybody" payoffs is exact.
    pub fn random_baseline(&self, dataset: &ScoredDataset, grid: &FractionGrid) -> ProfitCurve {
        let population = dataset.len();
        let (nobody, everybody) = self.baseline_anchors(dataset);

        let points = grid
            .fractions()
            .map(|(index, fraction)| ProfitCurvePoint {
                fraction,
                targeted_count: grid.targeted_count(index, population),
                profit: (1.0 - fraction) * nobody + fraction * everybody,
                model: RANDOM_SERIES.to_string(),
            })
            .collect();

        ProfitCurve::new(RANDOM_SERIES, points)
    }

    /// Payoffs when nobody is targeted and when everybody is.
    pub fn baseline_anchors(&self, dataset: &ScoredDataset) -> (f64, f64) {
        let nobody = ConfusionCounts {
            true_positive: 0,
            false_positive: 0,
            true_negative: dataset.negatives(),
            false_negative: dataset.positives(),
        };
        let everybody = ConfusionCounts {
            true_positive: dataset.positives(),
            false_positive: dataset.negatives(),
            true_negative: 0,
            false_negative: 0,
        };
        (self.cost.payoff(&nobody), self.cost.payoff(&everybody))
    }

    /// Profit at an arbitrary fraction, recomputed rather than read off a grid.
    pub fn profit_at_fraction(
        &self,
        dataset: &ScoredDataset,
        fraction: f64,
    ) -> Result<ProfitCurvePoint, EvaluationError> {
        self.profit_at_fraction_named(dataset, fraction, MODEL_SERIES)
    }

    pub fn profit_at_fraction_named(
        &self,
        dataset: &ScoredDataset,
        fraction: f64,
        model: impl Into<String>,
    ) -> Result<ProfitCurvePoint, EvaluationError> {
        let fraction = check_fraction("fraction", fraction)?;
        let targeted_count = dataset.targeted_count(fraction);
        let profit = self.profit_at_count(dataset, targeted_count)?;

        Ok(ProfitCurvePoint {
            fraction,
            targeted_count,
            profit,
            model: model.into(),
        })
    }
}

impl Default for ProfitCurveEngine {
    fn default() -> Self {
        Self {
            cost: CostModel::reference(),
        }
    }
}
