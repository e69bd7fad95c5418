use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Number of minor currency units in one major unit (paise per rupee, cents per dollar).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// A price in major currency units.
///
/// Wraps `rust_decimal::Decimal` so catalog prices and order totals never pass
/// through floating point before they reach the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts to minor units, truncating any fraction of a minor unit.
    ///
    /// Negative prices and values that do not fit in an `i64` are rejected.
    pub fn to_minor_units(&self) -> Result<i64> {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            return Err(StorefrontError::InvalidAmount(format!(
                "{} is negative",
                self.0
            )));
        }
        (self.0 * Decimal::from(MINOR_UNITS_PER_MAJOR))
            .trunc()
            .to_i64()
            .ok_or_else(|| StorefrontError::InvalidAmount(format!("{} is too large", self.0)))
    }
}

impl Add for Price {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Price {
    type Output = Self;
    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Price::ZERO, |acc, p| acc + p)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_arithmetic() {
        let p = Price::new(dec!(100));
        assert_eq!(p * 2, Price::new(dec!(200)));
        assert_eq!(p + Price::new(dec!(0.5)), Price::new(dec!(100.5)));

        let total: Price = vec![Price::new(dec!(1.25)), Price::new(dec!(2.75))]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(dec!(4.00)));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Price::new(dec!(200)).to_minor_units().unwrap(), 20000);
        assert_eq!(Price::new(dec!(19.99)).to_minor_units().unwrap(), 1999);
        // fractions of a minor unit are dropped, never rounded up
        assert_eq!(Price::new(dec!(0.129)).to_minor_units().unwrap(), 12);
        assert_eq!(Price::ZERO.to_minor_units().unwrap(), 0);
    }

    #[test]
    fn test_minor_units_rejects_negative() {
        assert!(matches!(
            Price::new(dec!(-1)).to_minor_units(),
            Err(StorefrontError::InvalidAmount(_))
        ));
    }
}
