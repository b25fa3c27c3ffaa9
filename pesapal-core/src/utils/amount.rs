//! Conversions between the host's minor units and the vendor's major units.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

const MINOR_PER_MAJOR: i64 = 100;

/// Cents to whole currency units.
pub fn to_major(minor: Decimal) -> Decimal {
    minor / Decimal::from(MINOR_PER_MAJOR)
}

/// Whole currency units to cents; `None` when the result does not fit.
pub fn to_minor(major: Decimal) -> Option<Decimal> {
    major.checked_mul(Decimal::from(MINOR_PER_MAJOR))
}

/// A JSON number for `amount`: an integer when there is no fractional part.
pub fn to_json_number(amount: Decimal) -> Value {
    let normalized = amount.normalize();
    if normalized.fract().is_zero() {
        if let Some(whole) = normalized.to_i64() {
            return Value::from(whole);
        }
    }
    normalized
        .to_f64()
        .map(Value::from)
        .unwrap_or(Value::Null)
}
