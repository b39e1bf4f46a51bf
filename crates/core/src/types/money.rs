//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places reported for any monetary figure.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to whole cents.
///
/// Midpoints round away from zero (`15.005` becomes `15.01`), matching how
/// revenue is presented on receipts. `Decimal::round_dp` would use banker's
/// rounding and report `15.00` instead.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
