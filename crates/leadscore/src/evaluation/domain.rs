use serde::{Deserialize, Serialize};

/// Series name used for curves produced from classifier scores.
pub const MODEL_SERIES: &str = "Model";
/// Series name used for the random-targeting comparison line.
pub const RANDOM_SERIES: &str = "Random";

/// Ground truth for a lead in the holdout population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl TryFrom<i64> for Label {
    type Error = EvaluationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Positive),
            0 => Ok(Self::Negative),
            other => Err(EvaluationError::invalid_input(format!(
                "label {other} is not a binary outcome (expected 0 or 1)"
            ))),
        }
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        if value {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// One member of the evaluation population as emitted by an external classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub score: f64,
    pub label: Label,
}

impl ScoredRecord {
    pub fn new(score: f64, label: Label) -> Self {
        Self { score, label }
    }
}

/// Payoffs for each cell of the confusion matrix.
///
/// No sign rule is enforced. The conventional reading is a positive
/// `benefit_true_positive` and a non-positive `cost_false_positive`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub benefit_true_positive: f64,
    pub cost_false_positive: f64,
    #[serde(default)]
    pub benefit_true_negative: f64,
    #[serde(default)]
    pub cost_false_negative: f64,
}

impl CostModel {
    pub fn new(
        benefit_true_positive: f64,
        cost_false_positive: f64,
        benefit_true_negative: f64,
        cost_false_negative: f64,
    ) -> Result<Self, EvaluationError> {
        let model = Self {
            benefit_true_positive,
            cost_false_positive,
            benefit_true_negative,
            cost_false_negative,
        };
        model.validate()?;
        Ok(model)
    }

    /// A closed sale nets 400 while a wasted approach costs 600.
    pub fn reference() -> Self {
        Self {
            benefit_true_positive: 400.0,
            cost_false_positive: -600.0,
            benefit_true_negative: 0.0,
            cost_false_negative: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        let fields = [
            ("benefit_true_positive", self.benefit_true_positive),
            ("cost_false_positive", self.cost_false_positive),
            ("benefit_true_negative", self.benefit_true_negative),
            ("cost_false_negative", self.cost_false_negative),
        ];

        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(EvaluationError::invalid_input(format!(
                "cost model field {name} must be finite, got {value}"
            ))),
            None => Ok(()),
        }
    }

    pub fn payoff(&self, counts: &ConfusionCounts) -> f64 {
        counts.true_positive as f64 * self.benefit_true_positive
            + counts.false_positive as f64 * self.cost_false_positive
            + counts.true_negative as f64 * self.benefit_true_negative
            + counts.false_negative as f64 * self.cost_false_negative
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::reference()
    }
}

/// Confusion matrix for a cut that targets the top `K` ranked records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn targeted(&self) -> usize {
        self.true_positive + self.false_positive
    }
}

/// Sample on a profit curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitCurvePoint {
    pub fraction: f64,
    pub targeted_count: usize,
    pub profit: f64,
    pub model: String,
}

/// Errors raised while ranking, sweeping, or reading a profit curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("{what} {value} is outside the accepted range")]
    OutOfRange { what: &'static str, value: f64 },
    #[error("profit curve has no points")]
    EmptyCurve,
}

impl EvaluationError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: f64) -> Self {
        Self::OutOfRange { what, value }
    }
}

pub(crate) fn check_fraction(what: &'static str, value: f64) -> Result<f64, EvaluationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EvaluationError::out_of_range(what, value))
    }
}
