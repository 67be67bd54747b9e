use super::domain::{check_fraction, EvaluationError};
use serde::{Deserialize, Serialize};

/// Outreach budget expressed in money rather than as a fraction of leads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetingBudget {
    pub budget: f64,
    pub cost_per_lead: f64,
}

impl TargetingBudget {
    pub fn new(budget: f64, cost_per_lead: f64) -> Self {
        Self {
            budget,
            cost_per_lead,
        }
    }

    /// Leads the budget pays for, before rounding.
    pub fn affordable_leads(&self) -> Result<f64, EvaluationError> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(EvaluationError::out_of_range("budget", self.budget));
        }
        if !self.cost_per_lead.is_finite() || self.cost_per_lead <= 0.0 {
            return Err(EvaluationError::out_of_range(
                "cost per lead",
                self.cost_per_lead,
            ));
        }
        Ok(self.budget / self.cost_per_lead)
    }

    /// Share of a population of `population` leads that the budget covers.
    pub fn fraction_of(&self, population: usize) -> Result<f64, EvaluationError> {
        if population == 0 {
            return Err(EvaluationError::invalid_input(
                "budget needs a non-empty population",
            ));
        }
        let fraction = self.affordable_leads()? / population as f64;
        check_fraction("budget fraction", fraction)
    }
}

/// A targeting limit given either directly as a fraction or as a spend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetConstraint {
    Fraction(f64),
    Spend(TargetingBudget),
}

impl BudgetConstraint {
    pub fn fraction_of(&self, population: usize) -> Result<f64, EvaluationError> {
        match self {
            Self::Fraction(fraction) => check_fraction("budget fraction", *fraction),
            Self::Spend(budget) => budget.fraction_of(population),
        }
    }
}
