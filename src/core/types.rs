use serde::Serialize;

/// Caller-supplied projection parameters.
///
/// The engine trusts these values. The CLI and API layers validate before
/// constructing an `Inputs`: money fields and the rate must be finite and
/// nonnegative, `years` at least 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inputs {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    /// Nominal annual interest rate as a percentage, e.g. 7.5 for 7.5%/year.
    pub annual_rate_percent: f64,
    pub years: u32,
}

/// Account state recorded after each simulated year.
///
/// Both money fields are rounded to the cent at emission time; the running
/// accumulators inside the engine are not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    pub year: u32,
    pub future_value: f64,
    pub total_contributions: f64,
}
