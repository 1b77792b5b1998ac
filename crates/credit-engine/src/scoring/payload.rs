use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coerced credit application, built from a loosely-typed JSON object.
///
/// Construction never fails: missing or malformed numbers become `0`, malformed
/// booleans become `false` and missing strings become empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicationPayload {
    pub loan_amount: f64,
    pub loan_term_months: i64,
    pub salary: f64,
    pub additional_income: f64,
    pub age: i64,
    pub employment_type: String,
    pub sector: String,
    pub profession: String,
    pub home_ownership: String,
    pub job_stability: String,
    pub has_insurance: bool,
    pub defaulted_loans: bool,
    pub legal_issues: bool,
    pub customer_segment: String,
    pub experience: f64,
}

impl ApplicationPayload {
    /// Coerce a parsed request body. Non-object values yield an empty application.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Self::default(),
        }
    }

    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let field = |key: &str| fields.get(key);

        Self {
            loan_amount: number(field("loan_amount")),
            loan_term_months: number(field("loan_term_months")).trunc() as i64,
            salary: number(field("salary")),
            additional_income: number(
                field("additional_income").or_else(|| field("additionalIncome")),
            ),
            age: number(field("age")).trunc() as i64,
            employment_type: text(field("employment_type")),
            sector: text(field("sector")),
            profession: text(field("profession")),
            home_ownership: text(field("home_ownership")),
            job_stability: text(field("job_stability")),
            has_insurance: flag(field("has_insurance")),
            defaulted_loans: flag(field("defaulted_loans")),
            legal_issues: flag(field("legal_issues")),
            customer_segment: text(field("customer_segment")),
            experience: number(field("experience")),
        }
    }

    pub fn total_income(&self) -> f64 {
        self.salary + self.additional_income
    }

    pub fn is_home_owner(&self) -> bool {
        matches!(self.home_ownership.as_str(), "owner" | "ev sahibi")
    }

    pub fn has_stable_job(&self) -> bool {
        matches!(
            self.job_stability.as_str(),
            "stable" | "istikrarlı" | "istikrarli" | "istikrali"
        )
    }

    pub fn works_in_public_sector(&self) -> bool {
        matches!(self.sector.as_str(), "kamu" | "public")
    }

    pub fn works_in_private_sector(&self) -> bool {
        matches!(
            self.employment_type.as_str(),
            "özel sektör" | "ozel" | "özel" | "private"
        )
    }
}

fn number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|value| value != 0.0),
        Some(Value::String(raw)) => matches!(
            fold_case(raw).as_str(),
            "true" | "yes" | "1" | "evet"
        ),
        _ => false,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(raw)) => fold_case(raw),
        _ => String::new(),
    }
}

/// Trimmed lower-case form; drops the combining dot left behind by `İ`.
fn fold_case(raw: &str) -> String {
    raw.trim().to_lowercase().replace('\u{307}', "")
}
