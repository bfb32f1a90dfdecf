use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used for all monetary values
pub const MONEY_SCALE: u32 = 2;

/// Rounds a monetary value to 2 decimal places, half away from zero.
///
/// Every monetary computation in the crate rounds through this helper so
/// that amounts agree digit-for-digit across the calculator, the schedule
/// generator, and the reconciliation engine.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a monetary value with exactly 2 decimal places for display
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round2(amount))
}
