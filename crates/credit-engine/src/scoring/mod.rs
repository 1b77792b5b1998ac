//! Credit application scoring.
//!
//! A request flows through four stages: the loosely-typed body is coerced into
//! an [`ApplicationPayload`], the loan installment and affordability ratios are
//! derived, the affordability veto is checked, and finally the ordered rule
//! table is folded into a clamped `0..=100` score and a binary decision.

pub mod controls;
pub mod installment;
pub mod payload;
mod policy;
pub mod router;
mod rules;

#[cfg(test)]
mod tests;

pub use controls::{load_config, load_config_from_path, ScoringConfig};
pub use payload::ApplicationPayload;
pub use policy::{CreditDecision, Veto};
pub use router::decision_router;
pub use rules::{Polarity, ScoreComponent, ScoreFactor, NO_INCOME_RATIO};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use policy::{affordability_veto, clamp_score, decide_outcome};
use rules::{Measurements, RuleInput, PERSONAL_RULES};

/// Stateless evaluator sharing one read-only configuration across calls.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: Arc<ScoringConfig>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, payload: &ApplicationPayload) -> ScoringResult {
        evaluate(payload, &self.config)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Score an application, returning the clamped score alongside the full result.
pub fn compute_score(payload: &ApplicationPayload, config: &ScoringConfig) -> (u8, ScoringResult) {
    let result = evaluate(payload, config);
    (result.score, result)
}

/// Evaluation output: the score, the decision and the trail that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: u8,
    pub decision: CreditDecision,
    pub approval_threshold: u8,
    pub base_score: i32,
    pub ratio_points: i32,
    pub personal_points: i32,
    pub vetoed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veto: Option<Veto>,
    pub reasons_positive: Vec<String>,
    pub reasons_negative: Vec<String>,
    pub components: Vec<ScoreComponent>,
    pub features: ScoringFeatures,
}

/// Snapshot of the coerced inputs and every derived intermediate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringFeatures {
    pub age: i64,
    pub salary: f64,
    pub additional_income: f64,
    pub total_income: f64,
    pub employment_type: String,
    pub sector: String,
    pub profession: String,
    pub home_ownership: String,
    pub job_stability: String,
    pub customer_segment: String,
    pub has_insurance: bool,
    pub defaulted_loans: bool,
    pub legal_issues: bool,
    pub experience_years: f64,
    pub loan_amount: f64,
    pub loan_term_months: i64,
    pub monthly_interest_effective: f64,
    pub monthly_installment: f64,
    pub installment_ratio: f64,
    pub dti: Option<f64>,
    pub monthly_payment_ratio: f64,
    pub experience_norm: f64,
    pub experience_points: i32,
    pub income_norm: f64,
    pub income_points: i32,
}

impl ScoringFeatures {
    fn capture(payload: &ApplicationPayload, measurements: &Measurements) -> Self {
        Self {
            age: payload.age,
            salary: payload.salary,
            additional_income: payload.additional_income,
            total_income: measurements.total_income,
            employment_type: payload.employment_type.clone(),
            sector: payload.sector.clone(),
            profession: payload.profession.clone(),
            home_ownership: payload.home_ownership.clone(),
            job_stability: payload.job_stability.clone(),
            customer_segment: payload.customer_segment.clone(),
            has_insurance: payload.has_insurance,
            defaulted_loans: payload.defaulted_loans,
            legal_issues: payload.legal_issues,
            experience_years: payload.experience,
            loan_amount: payload.loan_amount,
            loan_term_months: payload.loan_term_months,
            monthly_interest_effective: measurements.effective_rate,
            monthly_installment: measurements.installment,
            installment_ratio: measurements.installment_ratio,
            dti: measurements.dti,
            monthly_payment_ratio: measurements.dti.unwrap_or(0.0),
            experience_norm: measurements.experience_norm,
            experience_points: measurements.experience_points,
            income_norm: measurements.income_norm,
            income_points: measurements.income_points,
        }
    }
}

fn evaluate(payload: &ApplicationPayload, config: &ScoringConfig) -> ScoringResult {
    let measurements = Measurements::derive(payload, config);
    let features = ScoringFeatures::capture(payload, &measurements);

    if let Some(veto) = affordability_veto(payload, &measurements, config) {
        debug!(reason = %veto.summary(), "credit application vetoed");
        return ScoringResult {
            score: 0,
            decision: CreditDecision::Declined,
            approval_threshold: config.approval_threshold,
            base_score: config.base_score,
            ratio_points: 0,
            personal_points: 0,
            vetoed: true,
            reasons_positive: Vec::new(),
            reasons_negative: vec![veto.summary()],
            veto: Some(veto),
            components: Vec::new(),
            features,
        };
    }

    let input = RuleInput {
        payload,
        config,
        measurements: &measurements,
    };

    let ratio = rules::installment_ratio(&input);
    let ratio_points = ratio.points;

    let mut components = vec![ratio];
    components.extend(PERSONAL_RULES.iter().filter_map(|rule| rule(&input)));

    let personal_points: i32 = components[1..].iter().map(|component| component.points).sum();
    let score = clamp_score(config.base_score + ratio_points + personal_points);
    let decision = decide_outcome(score, config);

    let (reasons_positive, reasons_negative) = split_reasons(&components);

    debug!(score, decision = decision.label(), "credit application scored");

    ScoringResult {
        score,
        decision,
        approval_threshold: config.approval_threshold,
        base_score: config.base_score,
        ratio_points,
        personal_points,
        vetoed: false,
        veto: None,
        reasons_positive,
        reasons_negative,
        components,
        features,
    }
}

fn split_reasons(components: &[ScoreComponent]) -> (Vec<String>, Vec<String>) {
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    for component in components {
        match component.polarity {
            Polarity::Positive => positive.push(component.note.clone()),
            Polarity::Negative => negative.push(component.note.clone()),
        }
    }
    (positive, negative)
}
