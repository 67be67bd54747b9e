use super::domain::EvaluationError;
use serde::Serialize;

/// Finest grid accepted: one thousandth of a percentage point.
pub const MAX_GRID_STEPS: usize = 100_000;

/// Largest gap between `steps * step` and 1 for a step to count as dividing `[0, 1]`.
const STEP_TOLERANCE: f64 = 1e-9;

/// Discretization of the targeting range `[0, 1]` into `steps` equal intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FractionGrid {
    steps: usize,
}

impl FractionGrid {
    pub fn with_steps(steps: usize) -> Result<Self, EvaluationError> {
        if steps == 0 {
            return Err(EvaluationError::invalid_input(
                "fraction grid needs at least one step",
            ));
        }
        if steps > MAX_GRID_STEPS {
            return Err(EvaluationError::invalid_input(format!(
                "fraction grid of {steps} steps exceeds the limit of {MAX_GRID_STEPS}"
            )));
        }
        Ok(Self { steps })
    }

    /// Build a grid from a step width such as `0.01`.
    ///
    /// The step must divide `[0, 1]` into whole intervals: `0.25` is accepted,
    /// `0.4` is not.
    pub fn from_step(step: f64) -> Result<Self, EvaluationError> {
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err(EvaluationError::invalid_input(format!(
                "grid step must lie in (0, 1], got {step}"
            )));
        }

        let intervals = (1.0 / step).round();
        if intervals > MAX_GRID_STEPS as f64 {
            return Err(EvaluationError::invalid_input(format!(
                "grid step {step} is finer than 1/{MAX_GRID_STEPS}"
            )));
        }
        if (intervals * step - 1.0).abs() > STEP_TOLERANCE {
            return Err(EvaluationError::invalid_input(format!(
                "grid step {step} does not divide [0, 1] into whole intervals"
            )));
        }

        Self::with_steps(intervals as usize)
    }

    /// Percentage points, 101 samples.
    pub fn percent() -> Self {
        Self { steps: 100 }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn fraction(&self, index: usize) -> f64 {
        index as f64 / self.steps as f64
    }

    /// `round(index * population / steps)` with halves rounded up, in integers.
    pub fn targeted_count(&self, index: usize, population: usize) -> usize {
        let steps = self.steps as u128;
        let scaled = 2 * index as u128 * population as u128 + steps;
        (scaled / (2 * steps)) as usize
    }

    pub fn fractions(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..=self.steps).map(move |index| (index, self.fraction(index)))
    }
}

impl Default for FractionGrid {
    fn default() -> Self {
        Self::percent()
    }
}
