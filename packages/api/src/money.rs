//! Prices in Brazilian reais, held as integer centavos.

use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// An amount of money in centavos.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount as stored by the backend, rounding to the nearest
    /// centavo. Negative and non-finite amounts become zero.
    pub fn from_reais(reais: f64) -> Self {
        if !reais.is_finite() || reais <= 0.0 {
            return Self::ZERO;
        }
        Self((reais * 100.0).round() as u64)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn as_reais(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `percent`% of this amount, rounded half up to the centavo.
    pub const fn percent(self, percent: u64) -> Self {
        Self((self.0 * percent + 50) / 100)
    }

    /// Half of this amount, rounded half up to the centavo.
    pub const fn half(self) -> Self {
        Self(self.0.div_ceil(2))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Renders `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reais = (self.0 / 100).to_string();
        let centavos = self.0 % 100;

        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, digit) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        write!(f, "R$ {grouped},{centavos:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reais_rounds_to_centavo() {
        assert_eq!(Money::from_reais(49.9), Money::from_cents(4990));
        assert_eq!(Money::from_reais(0.125), Money::from_cents(13));
        assert_eq!(Money::from_reais(-3.0), Money::ZERO);
        assert_eq!(Money::from_reais(f64::NAN), Money::ZERO);
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(Money::ZERO.to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(99_90).to_string(), "R$ 99,90");
        assert_eq!(Money::from_cents(1_234_56).to_string(), "R$ 1.234,56");
        assert_eq!(Money::from_cents(1_000_000_00).to_string(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_percent_and_half_round_half_up() {
        assert_eq!(Money::from_cents(1005).percent(10), Money::from_cents(101));
        assert_eq!(Money::from_cents(1004).percent(10), Money::from_cents(100));
        assert_eq!(Money::from_cents(2999).half(), Money::from_cents(1500));
        assert_eq!(Money::from_cents(3000).half(), Money::from_cents(1500));
    }

    #[test]
    fn test_arithmetic() {
        let price = Money::from_cents(2500);
        assert_eq!(price * 3, Money::from_cents(7500));
        assert_eq!(price + price.half(), Money::from_cents(3750));
        assert_eq!(
            [price, price, Money::from_cents(1)].into_iter().sum::<Money>(),
            Money::from_cents(5001)
        );
    }
}
