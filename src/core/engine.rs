use super::types::{Inputs, YearlySnapshot};

/// Projects an account balance under monthly compounding.
///
/// Each month the contribution is deposited first and the balance then grows
/// by the monthly rate (the nominal annual rate divided by twelve). One
/// snapshot is emitted per elapsed year. The running accumulators are never
/// rounded; only the reported snapshot values are, to the cent.
///
/// The function is total on its documented domain: it never fails, holds no
/// state across calls, and identical inputs produce identical output. A
/// `years` of zero yields an empty sequence.
pub fn project(inputs: &Inputs) -> Vec<YearlySnapshot> {
    let monthly_rate = inputs.annual_rate_percent / 100.0 / 12.0;

    let mut balance = inputs.initial_investment;
    let mut contributed = inputs.initial_investment;

    let mut snapshots = Vec::with_capacity(inputs.years as usize);
    for year in 1..=inputs.years {
        for _ in 0..12 {
            balance += inputs.monthly_contribution;
            balance *= 1.0 + monthly_rate;
            contributed += inputs.monthly_contribution;
        }
        snapshots.push(YearlySnapshot {
            year,
            future_value: round_cents(balance),
            total_contributions: round_cents(contributed),
        });
    }
    snapshots
}

// Half away from zero.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
