use super::common::*;
use serde_json::json;

use crate::scoring::{
    compute_score, CreditDecision, Polarity, ScoreFactor, ScoringConfig, ScoringEngine, Veto,
    NO_INCOME_RATIO,
};

#[test]
fn baseline_application_scores_pinned_value() {
    let (score, details) = compute_score(&payload(baseline_request()), &config());

    assert_eq!(score, 77);
    assert_eq!(details.score, 77);
    assert_eq!(details.decision, CreditDecision::Approved);
    assert_eq!(details.ratio_points, 28);
    assert_eq!(details.personal_points, -1);

    let features = &details.features;
    assert!((features.monthly_interest_effective - 0.05317).abs() < 1e-9);
    assert!((features.monthly_installment - 6291.5719).abs() < 0.01);
    assert!((features.installment_ratio - 0.314578).abs() < 1e-5);
    assert_eq!(features.dti, Some(features.installment_ratio));
    assert_eq!(features.income_points, 2);
    assert_eq!(features.experience_points, 0);
}

#[test]
fn baseline_reasons_follow_rule_order() {
    let (_, details) = compute_score(&payload(baseline_request()), &config());

    assert_eq!(details.reasons_positive.len(), 5);
    assert!(details.reasons_positive[0].starts_with("installment/salary ratio 0.31"));
    assert_eq!(details.reasons_positive[1], "sector '': 0 points");
    assert_eq!(details.reasons_positive[2], "profession '': 0 points");
    assert_eq!(details.reasons_positive[3], "customer segment '': 0 points");
    assert!(details.reasons_positive[4].starts_with("acceptable DTI 0.31"));

    assert_eq!(
        details.reasons_negative,
        vec![
            "age 0 outside the preferred range".to_string(),
            "experience 0 years: +0 points".to_string(),
            "monthly income 20000: +2 points".to_string(),
        ]
    );
}

#[test]
fn default_history_lowers_an_otherwise_strong_score() {
    let engine = engine();
    let clean = engine.score(&payload(strong_request()));
    let defaulted = engine.score(&payload(with_field(
        strong_request(),
        "defaulted_loans",
        json!(true),
    )));

    assert!(defaulted.score < clean.score);
    assert_eq!(clean.score, 100);
    assert_eq!(defaulted.score, 90);
    assert!(defaulted
        .reasons_negative
        .contains(&"previous loan default: -25 points".to_string()));
    assert!(!clean
        .reasons_negative
        .iter()
        .any(|reason| reason.contains("default")));
}

#[test]
fn zero_salary_is_declined_without_income() {
    let request = json!({
        "salary": 0,
        "additional_income": 40000,
        "loan_amount": 10000,
        "loan_term_months": 12,
        "age": 35,
        "home_ownership": "owner",
    });
    let (score, details) = compute_score(&payload(request), &config());

    assert_eq!(score, 0);
    assert_eq!(details.decision, CreditDecision::Declined);
    assert!(details.vetoed);
    assert_eq!(details.veto, Some(Veto::NoIncome));
    assert_eq!(
        details.reasons_negative,
        vec!["no income, application declined".to_string()]
    );
    assert!(details.reasons_positive.is_empty());
    assert_eq!(details.features.installment_ratio, NO_INCOME_RATIO);
}

#[test]
fn installment_above_salary_vetoes_any_profile() {
    let request = with_field(full_profile_request(), "loan_amount", json!(5_000_000));
    let (score, details) = compute_score(&payload(request), &config());

    assert!(details.features.monthly_installment > details.features.salary);
    assert_eq!(score, 0);
    assert_eq!(details.decision, CreditDecision::Declined);
    assert!(matches!(
        details.veto,
        Some(Veto::InstallmentExceedsSalary { .. })
    ));
    assert!(details.components.is_empty());
    assert!(details.reasons_negative[0].contains("exceeds salary"));
}

#[test]
fn decades_long_term_still_triggers_installment_veto() {
    let request = with_field(
        with_field(full_profile_request(), "loan_amount", json!(10_000_000)),
        "loan_term_months",
        json!(20_000),
    );
    let (score, details) = compute_score(&payload(request), &config());

    let installment = details.features.monthly_installment;
    assert!(installment.is_finite(), "installment was {installment}");
    assert!(installment > details.features.salary);
    assert!(details.features.installment_ratio.is_finite());
    assert_eq!(score, 0);
    assert_eq!(details.decision, CreditDecision::Declined);
    assert!(matches!(
        details.veto,
        Some(Veto::InstallmentExceedsSalary { .. })
    ));
}

#[test]
fn full_profile_is_clamped_to_the_maximum() {
    let (score, details) = compute_score(&payload(full_profile_request()), &config());

    assert_eq!(score, 100);
    assert_eq!(details.decision, CreditDecision::Approved);
    assert_eq!(details.ratio_points, 36);
    assert_eq!(details.personal_points, 66);
    assert_eq!(
        details.reasons_negative,
        vec!["monthly income 90000: +9 points".to_string()]
    );
    assert!(details
        .components
        .iter()
        .any(|component| component.factor == ScoreFactor::Employment && component.points == 6));
}

#[test]
fn empty_application_is_declined_as_no_income() {
    let (score, details) = compute_score(&payload(json!({})), &config());
    assert_eq!(score, 0);
    assert_eq!(details.decision, CreditDecision::Declined);
    assert_eq!(details.features.monthly_installment, 0.0);
    assert_eq!(details.features.dti, None);
}

#[test]
fn score_stays_in_range_and_matches_threshold() {
    let engine = engine();
    let threshold = engine.config().approval_threshold;

    for salary in [500.0, 5_000.0, 20_000.0, 80_000.0, 400_000.0] {
        for loan_amount in [0.0, 10_000.0, 250_000.0, 2_000_000.0] {
            for (age, defaulted, legal) in [(19, true, true), (23, false, true), (45, false, false)]
            {
                let request = json!({
                    "salary": salary,
                    "loan_amount": loan_amount,
                    "loan_term_months": 24,
                    "age": age,
                    "defaulted_loans": defaulted,
                    "legal_issues": legal,
                });
                let result = engine.score(&payload(request));

                assert!(result.score <= 100);
                assert_eq!(
                    result.decision == CreditDecision::Approved,
                    result.score >= threshold,
                    "salary {salary}, loan {loan_amount}, age {age}"
                );
                if result.features.monthly_installment > salary {
                    assert_eq!(result.score, 0);
                    assert_eq!(result.decision, CreditDecision::Declined);
                }
            }
        }
    }
}

#[test]
fn raising_salary_never_lowers_ratio_points() {
    let engine = engine();
    let mut previous = i32::MIN;

    for step in 1..=60 {
        let salary = f64::from(step) * 1_000.0;
        let request = json!({
            "salary": salary,
            "loan_amount": 100000,
            "loan_term_months": 36,
        });
        let result = engine.score(&payload(request));
        assert!(
            result.ratio_points >= previous,
            "ratio points dropped at salary {salary}"
        );
        previous = result.ratio_points;
    }
    assert_eq!(previous, 36);
}

#[test]
fn reasons_mirror_component_polarity() {
    let (_, details) = compute_score(&payload(full_profile_request()), &config());

    let positive = details
        .components
        .iter()
        .filter(|component| component.polarity == Polarity::Positive)
        .count();
    assert_eq!(positive, details.reasons_positive.len());
    assert_eq!(
        details.components.len(),
        details.reasons_positive.len() + details.reasons_negative.len()
    );
}

#[test]
fn engine_uses_injected_configuration() {
    let mut config = ScoringConfig::default();
    config.approval_threshold = 80;
    let engine = ScoringEngine::new(config);

    let result = engine.score(&payload(baseline_request()));
    assert_eq!(result.score, 77);
    assert_eq!(result.approval_threshold, 80);
    assert_eq!(result.decision, CreditDecision::Declined);
}

#[test]
fn result_serializes_decision_and_null_dti() {
    let (_, details) = compute_score(&payload(json!({ "loan_amount": 1000 })), &config());
    let value = serde_json::to_value(&details).expect("serializes");

    assert_eq!(value["decision"], json!("DECLINED"));
    assert_eq!(value["features"]["dti"], serde_json::Value::Null);
    assert_eq!(value["veto"]["kind"], json!("no_income"));
}
