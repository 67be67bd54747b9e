use super::domain::{check_fraction, EvaluationError, ProfitCurvePoint};
use serde::Serialize;

/// Ordered `(fraction, profit)` samples for one named series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitCurve {
    model: String,
    points: Vec<ProfitCurvePoint>,
}

impl ProfitCurve {
    /// Points are expected in ascending fraction order, as a sweep produces them.
    pub fn new(model: impl Into<String>, points: Vec<ProfitCurvePoint>) -> Self {
        Self {
            model: model.into(),
            points,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn points(&self) -> &[ProfitCurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most profitable point; the smallest fraction wins a tie.
    pub fn argmax_profit(&self) -> Result<&ProfitCurvePoint, EvaluationError> {
        let mut points = self.points.iter();
        let mut best = points.next().ok_or(EvaluationError::EmptyCurve)?;

        for point in points {
            if point.profit > best.profit {
                best = point;
            }
        }

        Ok(best)
    }

    /// Nearest grid point to `fraction`; the smaller fraction wins when equidistant.
    pub fn profit_at_fraction(&self, fraction: f64) -> Result<&ProfitCurvePoint, EvaluationError> {
        let fraction = check_fraction("fraction", fraction)?;
        let mut points = self.points.iter();
        let mut nearest = points.next().ok_or(EvaluationError::EmptyCurve)?;
        let mut distance = (nearest.fraction - fraction).abs();

        for point in points {
            let candidate = (point.fraction - fraction).abs();
            if candidate < distance {
                nearest = point;
                distance = candidate;
            }
        }

        Ok(nearest)
    }

    /// `|profit(f) - mean| / mean` against a historical reference profit.
    pub fn lift_over_baseline(
        &self,
        fraction: f64,
        mean_historical_profit: f64,
    ) -> Result<f64, EvaluationError> {
        let point = self.profit_at_fraction(fraction)?;
        lift(point.profit, mean_historical_profit)
    }
}

pub(crate) fn lift(profit: f64, mean_historical_profit: f64) -> Result<f64, EvaluationError> {
    if !mean_historical_profit.is_finite() || mean_historical_profit == 0.0 {
        return Err(EvaluationError::invalid_input(format!(
            "mean historical profit must be finite and non-zero, got {mean_historical_profit}"
        )));
    }
    Ok((profit - mean_historical_profit).abs() / mean_historical_profit)
}
