//! Flat-rate deduction policy.
//!
//! Deductions are a single percentage of gross pay, rounded half-up to the
//! smallest currency unit. The same policy value always produces the same
//! amounts, so a preview can be recomputed at approval time and match.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// The default deduction rate (10%).
pub const DEFAULT_DEDUCTION_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// The default number of decimal places in the smallest currency unit (cents).
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Largest number of currency decimal places a policy accepts.
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// How deductions are computed from gross pay.
///
/// # Example
///
/// ```
/// use workflow_payroll::calculation::DeductionPolicy;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let policy = DeductionPolicy::default();
/// let deduction = policy.deduction_for(Decimal::from_str("1234.55").unwrap()).unwrap();
/// // 123.455 rounds half-up to 123.46
/// assert_eq!(deduction, Decimal::from_str("123.46").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionPolicy {
    rate: Decimal,
    decimal_places: u32,
}

impl Default for DeductionPolicy {
    fn default() -> Self {
        Self {
            rate: DEFAULT_DEDUCTION_RATE,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl DeductionPolicy {
    /// Creates a policy, rejecting rates outside `0..=1`.
    pub fn new(rate: Decimal, decimal_places: u32) -> PayrollResult<Self> {
        validate_rate(rate)?;
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(PayrollError::validation(
                "decimal_places",
                format!("must be at most {}, got {}", MAX_DECIMAL_PLACES, decimal_places),
            ));
        }
        Ok(Self {
            rate,
            decimal_places,
        })
    }

    /// Returns a copy of this policy using a different rate.
    pub fn with_rate(&self, rate: Decimal) -> PayrollResult<Self> {
        Self::new(rate, self.decimal_places)
    }

    /// The fraction of gross pay withheld.
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Decimal places of the smallest currency unit.
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Rounds an amount half-up to the currency unit and fixes its scale.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let mut rounded =
            amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.decimal_places);
        rounded
    }

    /// Widens an amount to the currency scale. Never rounds.
    pub fn widen(&self, amount: Decimal) -> Decimal {
        let mut widened = amount;
        if widened.scale() < self.decimal_places {
            widened.rescale(self.decimal_places);
        }
        widened
    }

    /// Computes the deduction for a gross amount.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on `salary` if `gross * rate` overflows.
    pub fn deduction_for(&self, gross: Decimal) -> PayrollResult<Decimal> {
        let withheld = gross.checked_mul(self.rate).ok_or_else(|| {
            PayrollError::validation(
                "salary",
                format!("deduction on {} exceeds the supported range", gross),
            )
        })?;
        Ok(self.round(withheld))
    }
}

/// Checks that a deduction rate lies within `0..=1`.
pub fn validate_rate(rate: Decimal) -> PayrollResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PayrollError::validation(
            "deduction_rate",
            format!("must be between 0 and 1, got {}", rate),
        ));
    }
    Ok(())
}
