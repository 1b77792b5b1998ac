use serde::{Deserialize, Serialize};

use super::controls::ScoringConfig;
use super::payload::ApplicationPayload;
use super::rules::Measurements;

/// Binary credit decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditDecision {
    Approved,
    Declined,
}

impl CreditDecision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Declined => "DECLINED",
        }
    }
}

/// Affordability failures that decline an application outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Veto {
    NoIncome,
    InstallmentExceedsSalary { installment: f64, salary: f64 },
}

impl Veto {
    pub fn summary(&self) -> String {
        match self {
            Veto::NoIncome => "no income, application declined".to_string(),
            Veto::InstallmentExceedsSalary {
                installment,
                salary,
            } => format!(
                "monthly installment {installment:.2} exceeds salary {salary:.2}, application declined"
            ),
        }
    }
}

pub(crate) fn affordability_veto(
    payload: &ApplicationPayload,
    measurements: &Measurements,
    config: &ScoringConfig,
) -> Option<Veto> {
    if payload.salary <= 0.0 {
        return Some(Veto::NoIncome);
    }

    if measurements.installment > payload.salary * config.min_income_vs_installment {
        return Some(Veto::InstallmentExceedsSalary {
            installment: measurements.installment,
            salary: payload.salary,
        });
    }

    None
}

pub(crate) fn decide_outcome(score: u8, config: &ScoringConfig) -> CreditDecision {
    if score >= config.approval_threshold {
        CreditDecision::Approved
    } else {
        CreditDecision::Declined
    }
}

/// Clamp a raw point total into the published `0..=100` score range.
pub(crate) fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}
