//! Two-proportion z-test for conversion rates.
//!
//! H0: the control and treatment conversion rates are equal.
//! H1: they differ (two-tailed).
//!
//! The statistic uses the pooled conversion rate for the standard error,
//! and the same standard error is used for the confidence interval on the
//! rate difference.

use crate::data::{Group, GroupStats, Observation};
use crate::error::{AbTestError, Result};
use serde::Serialize;
use tracing::info;

/// Significance level for the two-tailed test.
pub const ALPHA: f64 = 0.05;

/// Critical z value for a 95% two-tailed interval.
pub const Z_CRITICAL: f64 = 1.96;

/// Full output of the experiment analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ZTestResult {
    pub control: GroupStats,
    pub treatment: GroupStats,
    pub pooled_rate: f64,
    pub standard_error: f64,
    /// z statistic for treatment rate minus control rate.
    pub z_statistic: f64,
    pub p_value: f64,
    pub rate_difference: f64,
    pub confidence_interval: (f64, f64),
    pub significant: bool,
}

/// Run the two-proportion z-test over raw observations.
pub fn two_proportion_z_test(observations: &[Observation]) -> Result<ZTestResult> {
    let control = GroupStats::describe(observations, Group::Control)?;
    let treatment = GroupStats::describe(observations, Group::Treatment)?;
    z_test_from_stats(control, treatment)
}

/// Run the test from already-tallied group counts.
pub fn z_test_from_stats(control: GroupStats, treatment: GroupStats) -> Result<ZTestResult> {
    let n1 = control.users as f64;
    let n2 = treatment.users as f64;
    let pooled_rate =
        (control.conversions + treatment.conversions) as f64 / (n1 + n2);
    let standard_error =
        (pooled_rate * (1.0 - pooled_rate) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if standard_error == 0.0 {
        return Err(AbTestError::ZeroVariance);
    }

    let rate_difference = treatment.conversion_rate - control.conversion_rate;
    let z_statistic = rate_difference / standard_error;
    let p_value = 2.0 * (1.0 - normal_cdf(z_statistic.abs()));
    let confidence_interval = (
        rate_difference - Z_CRITICAL * standard_error,
        rate_difference + Z_CRITICAL * standard_error,
    );
    let significant = p_value < ALPHA;
    info!(
        z = z_statistic,
        p = p_value,
        diff = rate_difference,
        significant,
        "two-proportion z-test complete"
    );

    Ok(ZTestResult {
        control,
        treatment,
        pooled_rate,
        standard_error,
        z_statistic,
        p_value,
        rate_difference,
        confidence_interval,
        significant,
    })
}

/// Standard normal CDF via the error function.
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Abramowitz and Stegun 7.1.26 rational approximation, max error 1.5e-7.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}
