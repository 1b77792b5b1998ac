use super::controls::ScoringConfig;

/// Effective monthly rate: the base rate, grossed up by the KKDF and BSMV
/// surcharges when taxes are included.
pub fn effective_monthly_rate(config: &ScoringConfig) -> f64 {
    let base = config.base_monthly_interest;
    if config.include_taxes {
        base * (1.0 + config.kkdf_rate + config.bsmv_rate)
    } else {
        base
    }
}

/// Fixed monthly payment amortising `principal` over `months` at `monthly_rate`.
///
/// `M = P * r / (1 - (1 + r)^-n)`, falling back to `P / n` for a non-positive
/// rate. Non-positive principal or term yields `0`. Very long terms converge
/// on the interest-only payment `P * r` instead of overflowing.
pub fn annuity_payment(principal: f64, monthly_rate: f64, months: i64) -> f64 {
    if months <= 0 || principal <= 0.0 {
        return 0.0;
    }

    let periods = months as f64;
    if monthly_rate <= 0.0 {
        return principal / periods;
    }

    let discount = (1.0 + monthly_rate).powf(-periods);
    principal * monthly_rate / (1.0 - discount)
}
