use super::common::*;
use crate::evaluation::{
    BudgetConstraint, EvaluationError, Label, LeadPrioritizationReport, ReportOptions,
    ScoredDataset, ScoredModel, ScoredRecord, TargetingBudget, RANDOM_SERIES,
};

fn models() -> Vec<ScoredModel> {
    vec![
        ScoredModel::new("Decision Tree", holdout()),
        ScoredModel::new("Random Forest", perfect_holdout()),
    ]
}

fn options() -> ReportOptions {
    ReportOptions {
        grid: percent_grid(),
        budget: Some(BudgetConstraint::Fraction(0.24)),
        mean_historical_profit: Some(2000.0),
    }
}

#[test]
fn report_compares_models_against_the_random_line() {
    let report =
        LeadPrioritizationReport::build(&engine(), &models(), &options()).expect("report builds");

    assert_eq!(report.population.size, 100);
    assert_eq!(report.population.positives, 34);
    assert_eq!(report.population.negatives, 66);
    assert_eq!(report.budget_fraction, Some(0.24));
    assert_eq!(report.curves.len(), 2);
    assert_eq!(report.baseline.model(), RANDOM_SERIES);
    assert_eq!(report.baseline.len(), 101);
    assert_eq!(report.best_model, "Random Forest");

    let tree = report.summary_for("Decision Tree").expect("tree summary");
    assert_eq!(tree.optimum.targeted_count, 21);
    assert_eq!(tree.optimum.profit, 6400.0);
    assert_eq!(tree.optimum.model, "Decision Tree");
    let budget_point = tree.budget_point.as_ref().expect("budget point");
    assert_eq!(budget_point.targeted_count, 24);
    assert_eq!(budget_point.profit, 4600.0);
    assert_eq!(tree.lift_over_historical, Some(1.3));
    assert!((tree.metrics_at_optimum.precision - 19.0 / 21.0).abs() < 1e-12);
    assert!((tree.metrics_at_optimum.recall - 19.0 / 34.0).abs() < 1e-12);
    assert!((tree.gain_over_random - (6400.0 + 0.21 * 26000.0)).abs() < 1e-6);

    let forest = report.summary_for("Random Forest").expect("forest summary");
    assert_eq!(forest.optimum.targeted_count, 34);
    assert_eq!(forest.optimum.profit, 13600.0);
    assert_eq!(forest.metrics_at_optimum.precision, 1.0);
    assert_eq!(forest.metrics_at_optimum.recall, 1.0);
    assert_eq!(
        forest.budget_point.as_ref().map(|point| point.profit),
        Some(9600.0)
    );

    let curve = report.curve_for("Random Forest").expect("forest curve");
    assert_eq!(curve.points()[34].profit, 13600.0);
}

#[test]
fn report_without_budget_reads_lift_at_the_optimum() {
    let options = ReportOptions {
        budget: None,
        ..options()
    };
    let report =
        LeadPrioritizationReport::build(&engine(), &models(), &options).expect("report builds");

    let tree = report.summary_for("Decision Tree").expect("tree summary");
    assert!(tree.budget_point.is_none());
    assert_eq!(tree.lift_over_historical, Some(2.2));
    assert!(report.budget_fraction.is_none());
}

#[test]
fn spend_budget_is_converted_against_the_population() {
    let options = ReportOptions {
        budget: Some(BudgetConstraint::Spend(TargetingBudget::new(15_000.0, 600.0))),
        ..options()
    };
    let report =
        LeadPrioritizationReport::build(&engine(), &models(), &options).expect("report builds");
    assert_eq!(report.budget_fraction, Some(0.25));

    let overspent = ReportOptions {
        budget: Some(BudgetConstraint::Spend(TargetingBudget::new(61_000.0, 600.0))),
        ..options
    };
    assert!(matches!(
        LeadPrioritizationReport::build(&engine(), &models(), &overspent),
        Err(EvaluationError::OutOfRange { .. })
    ));
}

#[test]
fn report_rejects_models_scored_on_different_populations() {
    let shorter = ScoredDataset::new(vec![
        ScoredRecord::new(0.7, Label::Positive),
        ScoredRecord::new(0.2, Label::Negative),
    ])
    .expect("dataset ranks");
    let models = vec![
        ScoredModel::new("Decision Tree", holdout()),
        ScoredModel::new("Stub", shorter),
    ];

    match LeadPrioritizationReport::build(&engine(), &models, &options()) {
        Err(EvaluationError::InvalidInput { reason }) => assert!(reason.contains("Stub")),
        other => panic!("expected invalid input, got {other:?}"),
    }

    assert!(matches!(
        LeadPrioritizationReport::build(&engine(), &[], &options()),
        Err(EvaluationError::InvalidInput { .. })
    ));
}

#[test]
fn report_serializes_for_presentation_layers() {
    let report =
        LeadPrioritizationReport::build(&engine(), &models(), &options()).expect("report builds");
    let value = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(value["best_model"], "Random Forest");
    assert_eq!(value["baseline"]["model"], "Random");
    assert_eq!(
        value["curves"][0]["points"]
            .as_array()
            .map(|points| points.len()),
        Some(101)
    );
    assert_eq!(value["models"][0]["optimum"]["targeted_count"], 21);
}
