//! Rule configuration ("controls") for the scoring engine.
//!
//! The effective configuration is produced by merging an optional JSON
//! override document onto the built-in default document and deserialising the
//! result. Defaults win whenever both sides hold a value for the same key, so
//! an override document can only contribute keys the defaults lack; nested
//! objects are merged recursively.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Effective, read-only rule configuration shared by every scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub approval_threshold: u8,
    pub base_score: i32,
    pub base_monthly_interest: f64,
    pub include_taxes: bool,
    pub kkdf_rate: f64,
    pub bsmv_rate: f64,
    pub min_income_vs_installment: f64,
    pub strong_dti: f64,
    pub max_dti: f64,
    pub scores: ScoreWeights,
    pub experience: ExperienceConfig,
    pub income_norm: IncomeNormConfig,
    pub income_section: IncomeSection,
    pub personal_section: PersonalSection,
}

/// Fixed point awards and penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub income_strong_bonus: i32,
    pub income_ok_bonus: i32,
    pub income_border_penalty: i32,
    pub income_bad_penalty: i32,
    pub public_sector_bonus: i32,
    pub private_sector_bonus: i32,
    pub homeowner_bonus: i32,
    pub insurance_bonus: i32,
    pub job_stability_bonus: i32,
    pub default_penalty: i32,
    pub legal_penalty: i32,
    pub age_good_bonus: i32,
    pub age_young_bonus: i32,
    pub age_bad_penalty: i32,
}

/// Experience normalisation: full points at `years_for_full_points` years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceConfig {
    pub years_for_full_points: f64,
    pub max_points: i32,
}

/// Income normalisation: full points at `cap` total monthly income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeNormConfig {
    pub cap: f64,
    pub max_points: i32,
}

/// Linear share of `cap` reached by `value`, clamped into `[0, 1]`, and the
/// rounded point award it earns out of `max_points`.
pub(crate) fn normalized_points(value: f64, cap: f64, max_points: i32) -> (f64, i32) {
    if cap <= 0.0 || !value.is_finite() {
        return (0.0, 0);
    }
    let share = (value / cap).clamp(0.0, 1.0);
    (share, (f64::from(max_points) * share).round() as i32)
}

impl ExperienceConfig {
    pub fn score(&self, years: f64) -> (f64, i32) {
        normalized_points(years, self.years_for_full_points, self.max_points)
    }
}

impl IncomeNormConfig {
    pub fn score(&self, income: f64) -> (f64, i32) {
        normalized_points(income, self.cap, self.max_points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSection {
    pub salary_ratio_brackets: Vec<RatioBracket>,
}

/// Installment-to-salary bracket; applies to ratios up to and including `max_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioBracket {
    pub max_ratio: f64,
    pub points: i32,
}

impl IncomeSection {
    /// First bracket whose ceiling covers `ratio`; `None` past the loosest bracket.
    pub fn bracket_for(&self, ratio: f64) -> Option<&RatioBracket> {
        self.salary_ratio_brackets
            .iter()
            .find(|bracket| ratio <= bracket.max_ratio)
    }
}

/// Lookup tables for categorical applicant attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalSection {
    #[serde(default)]
    pub sector: BTreeMap<String, i32>,
    #[serde(default)]
    pub profession: BTreeMap<String, i32>,
    #[serde(default)]
    pub customer_segment: BTreeMap<String, i32>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 60,
            base_score: 50,
            base_monthly_interest: 0.0409,
            include_taxes: true,
            kkdf_rate: 0.15,
            bsmv_rate: 0.15,
            min_income_vs_installment: 1.0,
            strong_dti: 0.30,
            max_dti: 0.40,
            scores: ScoreWeights {
                income_strong_bonus: 12,
                income_ok_bonus: 7,
                income_border_penalty: -8,
                income_bad_penalty: -18,
                public_sector_bonus: 6,
                private_sector_bonus: 2,
                homeowner_bonus: 4,
                insurance_bonus: 3,
                job_stability_bonus: 4,
                default_penalty: -25,
                legal_penalty: -30,
                age_good_bonus: 8,
                age_young_bonus: 2,
                age_bad_penalty: -10,
            },
            experience: ExperienceConfig {
                years_for_full_points: 20.0,
                max_points: 10,
            },
            income_norm: IncomeNormConfig {
                cap: 200_000.0,
                max_points: 20,
            },
            income_section: IncomeSection {
                salary_ratio_brackets: [
                    (0.1, 40),
                    (0.2, 36),
                    (0.3, 32),
                    (0.4, 28),
                    (0.5, 24),
                    (0.6, 20),
                    (0.7, 16),
                    (0.8, 12),
                    (0.9, 8),
                    (1.0, 4),
                ]
                .into_iter()
                .map(|(max_ratio, points)| RatioBracket { max_ratio, points })
                .collect(),
            },
            personal_section: PersonalSection {
                sector: table(&[("kamu", 3), ("özel", 1)]),
                profession: table(&[
                    ("doktor", 4),
                    ("mühendis", 3),
                    ("öğretmen", 3),
                    ("avukat", 3),
                ]),
                customer_segment: table(&[
                    ("mass", 0),
                    ("affluent", 3),
                    ("private", 5),
                    ("sme", 2),
                ]),
            },
        }
    }
}

fn table(entries: &[(&str, i32)]) -> BTreeMap<String, i32> {
    entries
        .iter()
        .map(|(key, points)| ((*key).to_string(), *points))
        .collect()
}

/// Built-in default controls document.
pub fn default_document() -> Value {
    serde_json::to_value(ScoringConfig::default()).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Merge `overrides` into `base` without replacing anything `base` already holds.
///
/// When both sides carry an object under the same key the merge recurses;
/// any other collision keeps the value from `base`.
pub fn merge_documents(base: &mut Value, overrides: Value) {
    let (Value::Object(base_map), Value::Object(override_map)) = (base, overrides) else {
        return;
    };

    for (key, value) in override_map {
        match base_map.get_mut(&key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                merge_documents(existing, value);
            }
            Some(_) => {}
            None => {
                base_map.insert(key, value);
            }
        }
    }
}

/// Build the effective configuration from an optional override document.
///
/// Never fails: an override that produces an unusable document is discarded
/// and the defaults are returned.
pub fn load_config(overrides: Option<Value>) -> ScoringConfig {
    let Some(overrides) = overrides else {
        return ScoringConfig::default();
    };

    let mut document = default_document();
    merge_documents(&mut document, overrides);

    match serde_json::from_value(document) {
        Ok(config) => config,
        Err(source) => {
            warn!(error = %ControlsError::Shape(source), "ignoring scoring controls override");
            ScoringConfig::default()
        }
    }
}

/// Load the effective configuration, reading the override document from `path`.
///
/// A missing or unreadable document falls back to the defaults.
pub fn load_config_from_path(path: Option<&Path>) -> ScoringConfig {
    let Some(path) = path else {
        return ScoringConfig::default();
    };

    match read_overrides(path) {
        Ok(document) => {
            debug!(path = %path.display(), "merging scoring controls override");
            load_config(Some(document))
        }
        Err(err) => {
            warn!(error = %err, "using default scoring controls");
            ScoringConfig::default()
        }
    }
}

fn read_overrides(path: &Path) -> Result<Value, ControlsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ControlsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| ControlsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !document.is_object() {
        return Err(ControlsError::NotAnObject {
            path: path.to_path_buf(),
        });
    }
    Ok(document)
}

/// Reasons an override document was discarded.
#[derive(Debug, thiserror::Error)]
pub enum ControlsError {
    #[error("unable to read controls document {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("controls document {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("controls document {path:?} must be a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("merged controls do not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}
