use serde::{Deserialize, Serialize};

use super::controls::ScoringConfig;
use super::installment::{annuity_payment, effective_monthly_rate};
use super::payload::ApplicationPayload;

/// Installment ratio reported when there is no salary to divide by.
pub const NO_INCOME_RATIO: f64 = 999.0;

/// Factors that can contribute to a credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    InstallmentRatio,
    Sector,
    Profession,
    HomeOwnership,
    Insurance,
    JobStability,
    DefaultHistory,
    LegalIssues,
    CustomerSegment,
    Age,
    Employment,
    Experience,
    IncomeLevel,
    DebtToIncome,
}

/// Which reason list a component is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    fn of(points: i32) -> Self {
        if points >= 0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Discrete contribution to a score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i32,
    pub polarity: Polarity,
    pub note: String,
}

impl ScoreComponent {
    fn new(factor: ScoreFactor, points: i32, note: impl Into<String>) -> Self {
        Self {
            factor,
            points,
            polarity: Polarity::of(points),
            note: note.into(),
        }
    }

    fn warning(mut self) -> Self {
        self.polarity = Polarity::Negative;
        self
    }
}

/// Derived quantities shared by the rules and echoed back in the result.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Measurements {
    pub effective_rate: f64,
    pub installment: f64,
    pub total_income: f64,
    /// Installment over salary; [`NO_INCOME_RATIO`] without salary.
    pub installment_ratio: f64,
    /// Installment over total income; `None` without income.
    pub dti: Option<f64>,
    pub experience_norm: f64,
    pub experience_points: i32,
    pub income_norm: f64,
    pub income_points: i32,
}

impl Measurements {
    pub(crate) fn derive(payload: &ApplicationPayload, config: &ScoringConfig) -> Self {
        let effective_rate = effective_monthly_rate(config);
        let installment =
            annuity_payment(payload.loan_amount, effective_rate, payload.loan_term_months);
        let total_income = payload.total_income();

        let installment_ratio = if payload.salary > 0.0 {
            installment / payload.salary
        } else {
            NO_INCOME_RATIO
        };
        let dti = (total_income > 0.0).then(|| installment / total_income);

        let (experience_norm, experience_points) = config.experience.score(payload.experience);
        let (income_norm, income_points) = config.income_norm.score(total_income);

        Self {
            effective_rate,
            installment,
            total_income,
            installment_ratio,
            dti,
            experience_norm,
            experience_points,
            income_norm,
            income_points,
        }
    }
}

/// Everything a rule may look at.
pub(crate) struct RuleInput<'a> {
    pub payload: &'a ApplicationPayload,
    pub config: &'a ScoringConfig,
    pub measurements: &'a Measurements,
}

pub(crate) type Rule = fn(&RuleInput<'_>) -> Option<ScoreComponent>;

/// Applicant rules in reporting order; each is independent of the others.
pub(crate) const PERSONAL_RULES: [Rule; 13] = [
    sector,
    profession,
    home_ownership,
    insurance,
    job_stability,
    default_history,
    legal_issues,
    customer_segment,
    age,
    employment,
    experience,
    income_level,
    debt_to_income,
];

/// Points for the installment-to-salary ratio from the tightest covering bracket.
pub(crate) fn installment_ratio(input: &RuleInput<'_>) -> ScoreComponent {
    let ratio = input.measurements.installment_ratio;
    match input.config.income_section.bracket_for(ratio) {
        Some(bracket) => ScoreComponent::new(
            ScoreFactor::InstallmentRatio,
            bracket.points,
            format!(
                "installment/salary ratio {ratio:.2} within {:.2} bracket: {} points",
                bracket.max_ratio, bracket.points
            ),
        ),
        None => ScoreComponent::new(
            ScoreFactor::InstallmentRatio,
            0,
            format!("installment/salary ratio {ratio:.2} beyond every bracket: 0 points"),
        ),
    }
}

fn table_bonus(
    factor: ScoreFactor,
    label: &str,
    value: &str,
    table: &std::collections::BTreeMap<String, i32>,
) -> Option<ScoreComponent> {
    let points = table.get(value).copied().unwrap_or(0);
    Some(ScoreComponent::new(
        factor,
        points,
        format!("{label} '{value}': {points} points"),
    ))
}

fn sector(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    table_bonus(
        ScoreFactor::Sector,
        "sector",
        &input.payload.sector,
        &input.config.personal_section.sector,
    )
}

fn profession(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    table_bonus(
        ScoreFactor::Profession,
        "profession",
        &input.payload.profession,
        &input.config.personal_section.profession,
    )
}

fn home_ownership(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.config.scores.homeowner_bonus;
    input.payload.is_home_owner().then(|| {
        ScoreComponent::new(
            ScoreFactor::HomeOwnership,
            points,
            format!("home owner: {points:+} points"),
        )
    })
}

fn insurance(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.config.scores.insurance_bonus;
    input.payload.has_insurance.then(|| {
        ScoreComponent::new(
            ScoreFactor::Insurance,
            points,
            format!("insured: {points:+} points"),
        )
    })
}

fn job_stability(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.config.scores.job_stability_bonus;
    input.payload.has_stable_job().then(|| {
        ScoreComponent::new(
            ScoreFactor::JobStability,
            points,
            format!("stable employment: {points:+} points"),
        )
    })
}

fn default_history(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.config.scores.default_penalty;
    input.payload.defaulted_loans.then(|| {
        ScoreComponent::new(
            ScoreFactor::DefaultHistory,
            points,
            format!("previous loan default: {points:+} points"),
        )
    })
}

fn legal_issues(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.config.scores.legal_penalty;
    input.payload.legal_issues.then(|| {
        ScoreComponent::new(
            ScoreFactor::LegalIssues,
            points,
            format!("pending legal issues: {points:+} points"),
        )
    })
}

fn customer_segment(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    table_bonus(
        ScoreFactor::CustomerSegment,
        "customer segment",
        &input.payload.customer_segment,
        &input.config.personal_section.customer_segment,
    )
}

fn age(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let scores = &input.config.scores;
    let age = input.payload.age;
    let component = match age {
        25..=60 => ScoreComponent::new(
            ScoreFactor::Age,
            scores.age_good_bonus,
            format!("age {age} within 25-60"),
        ),
        21..=24 => ScoreComponent::new(
            ScoreFactor::Age,
            scores.age_young_bonus,
            format!("young applicant, age {age}"),
        ),
        _ => ScoreComponent::new(
            ScoreFactor::Age,
            scores.age_bad_penalty,
            format!("age {age} outside the preferred range"),
        ),
    };
    Some(component)
}

fn employment(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let scores = &input.config.scores;
    if input.payload.works_in_public_sector() {
        Some(ScoreComponent::new(
            ScoreFactor::Employment,
            scores.public_sector_bonus,
            "public sector employment",
        ))
    } else if input.payload.works_in_private_sector() {
        Some(ScoreComponent::new(
            ScoreFactor::Employment,
            scores.private_sector_bonus,
            "private sector employment",
        ))
    } else {
        None
    }
}

fn experience(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.measurements.experience_points;
    let component = ScoreComponent::new(
        ScoreFactor::Experience,
        points,
        format!(
            "experience {:.0} years: {points:+} points",
            input.payload.experience
        ),
    );
    if points < input.config.experience.max_points / 2 {
        Some(component.warning())
    } else {
        Some(component)
    }
}

fn income_level(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let points = input.measurements.income_points;
    let component = ScoreComponent::new(
        ScoreFactor::IncomeLevel,
        points,
        format!(
            "monthly income {:.0}: {points:+} points",
            input.measurements.total_income
        ),
    );
    if points < input.config.income_norm.max_points / 2 {
        Some(component.warning())
    } else {
        Some(component)
    }
}

fn debt_to_income(input: &RuleInput<'_>) -> Option<ScoreComponent> {
    let config = input.config;
    let component = match input.measurements.dti {
        Some(dti) if dti <= config.strong_dti => ScoreComponent::new(
            ScoreFactor::DebtToIncome,
            config.scores.income_strong_bonus,
            format!("healthy DTI {dti:.2} (<= {:.2})", config.strong_dti),
        ),
        Some(dti) if dti <= config.max_dti => ScoreComponent::new(
            ScoreFactor::DebtToIncome,
            config.scores.income_ok_bonus,
            format!("acceptable DTI {dti:.2} (<= {:.2})", config.max_dti),
        ),
        Some(dti) => ScoreComponent::new(
            ScoreFactor::DebtToIncome,
            config.scores.income_bad_penalty,
            format!("high DTI {dti:.2} (> {:.2})", config.max_dti),
        ),
        None => ScoreComponent::new(
            ScoreFactor::DebtToIncome,
            config.scores.income_bad_penalty,
            "DTI unbounded without income",
        ),
    };
    Some(component)
}
