use crate::infra::{build_report, EconomicsOverrides};
use clap::Args;
use leadscore::config::AppConfig;
use leadscore::error::AppError;
use leadscore::evaluation::{
    BudgetConstraint, Label, LeadPrioritizationReport, ProfitCurve, ScoredDataset, ScoredModel,
    ScoredRecord,
};
use leadscore::telemetry;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Size of the synthetic holdout population
    #[arg(long, default_value_t = 2000)]
    pub(crate) leads: usize,
    /// Share of leads the sales team can afford to contact (0-1)
    #[arg(long)]
    pub(crate) budget_fraction: Option<f64>,
    /// Historical mean campaign profit used for lift
    #[arg(long)]
    pub(crate) mean_historical_profit: Option<f64>,
    /// Write every curve point (models and random baseline) to this CSV file
    #[arg(long)]
    pub(crate) curve_csv: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        leads,
        budget_fraction,
        mean_historical_profit,
        curve_csv,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let models = synthetic_models(leads)?;
    let overrides = EconomicsOverrides {
        budget: budget_fraction.map(BudgetConstraint::Fraction),
        mean_historical_profit,
        ..EconomicsOverrides::default()
    };
    let report = build_report(&config.economics, overrides, &models)?;

    render_report(&report);

    if let Some(path) = curve_csv {
        write_curves(&path, &report)?;
        println!("\nCurve points written to {}", path.display());
    }

    Ok(())
}

/// Deterministic stand-in for classifier output on a holdout set.
///
/// About 30% of leads convert. The "Random Forest" separates buyers better
/// and emits fine-grained scores; the "Decision Tree" is noisier and only
/// emits leaf probabilities in steps of 0.1, so it produces many ties.
pub(crate) fn synthetic_models(leads: usize) -> Result<Vec<ScoredModel>, AppError> {
    let labels: Vec<Label> = (0..leads)
        .map(|lead| Label::from(unit_noise(lead, 1) < 0.3))
        .collect();

    let forest = labels
        .iter()
        .enumerate()
        .map(|(lead, label)| {
            let signal = if label.is_positive() { 0.55 } else { 0.0 };
            ScoredRecord::new(signal + 0.45 * unit_noise(lead, 2), *label)
        })
        .collect();

    let tree = labels
        .iter()
        .enumerate()
        .map(|(lead, label)| {
            let signal = if label.is_positive() { 0.35 } else { 0.0 };
            let raw = signal + 0.65 * unit_noise(lead, 3);
            ScoredRecord::new((raw * 10.0).floor() / 10.0, *label)
        })
        .collect();

    Ok(vec![
        ScoredModel::new("Decision Tree", ScoredDataset::new(tree)?),
        ScoredModel::new("Random Forest", ScoredDataset::new(forest)?),
    ])
}

/// Multiplicative hash of `(lead, salt)` folded into `[0, 1)`.
fn unit_noise(lead: usize, salt: u64) -> f64 {
    let mixed = (lead as u64 ^ salt.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_mul(0xbf58_476d_1ce4_e5b9)
        .rotate_left(31)
        .wrapping_mul(0x94d0_49bb_1331_11eb);
    (mixed >> 11) as f64 / (1u64 << 53) as f64
}

fn render_report(report: &LeadPrioritizationReport) {
    println!("Lead prioritization demo");
    println!(
        "Holdout population: {} leads, {} converted ({:.1}% base rate)",
        report.population.size,
        report.population.positives,
        report.population.base_rate * 100.0
    );
    println!(
        "Cost model: +{} per converted lead, {} per wasted approach",
        report.cost_model.benefit_true_positive, report.cost_model.cost_false_positive
    );

    println!("\nModel comparison");
    for summary in &report.models {
        println!(
            "- {}: best at {:.0}% of leads ({} contacted), profit {:.0}, {:+.0} vs random",
            summary.model,
            summary.optimum.fraction * 100.0,
            summary.optimum.targeted_count,
            summary.optimum.profit,
            summary.gain_over_random
        );
        println!(
            "  precision {:.2} | recall {:.2} | accuracy {:.2} at the optimum",
            summary.metrics_at_optimum.precision,
            summary.metrics_at_optimum.recall,
            summary.metrics_at_optimum.accuracy
        );
        if let Some(point) = &summary.budget_point {
            println!(
                "  within budget ({:.0}% of leads): profit {:.0}",
                point.fraction * 100.0,
                point.profit
            );
        }
        if let Some(lift) = summary.lift_over_historical {
            println!("  lift over historical mean: {:.1}%", lift * 100.0);
        }
    }

    println!("\nRecommended model: {}", report.best_model);
}

fn write_curves(path: &Path, report: &LeadPrioritizationReport) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    let curves: Vec<&ProfitCurve> = report
        .curves
        .iter()
        .chain(std::iter::once(&report.baseline))
        .collect();

    for curve in curves {
        for point in curve.points() {
            writer.serialize(point)?;
        }
    }

    writer.flush()?;
    Ok(())
}
