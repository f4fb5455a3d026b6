use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Two-decimal rendering without the currency sign, for CSV cells.
    pub fn to_plain_string(self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{:.2}", self.0.round_dp(2))
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

/// Result of parsing free-text currency. `Defaulted` carries zero and marks
/// that the input was missing or unparseable, so callers can tell a real
/// zero apart from a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountParse {
    Parsed(Money),
    Defaulted,
}

impl AmountParse {
    pub fn value(self) -> Money {
        match self {
            AmountParse::Parsed(m) => m,
            AmountParse::Defaulted => Money::zero(),
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, AmountParse::Defaulted)
    }
}

/// Lenient currency parse: strips `£` and thousands separators, trims, and
/// falls back to zero on anything unparseable. Never errors.
pub fn parse_amount(raw: &str) -> AmountParse {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '£' && *c != ',')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return AmountParse::Defaulted;
    }

    match Decimal::from_str(cleaned) {
        Ok(d) => AmountParse::Parsed(Money(d)),
        Err(_) => AmountParse::Defaulted,
    }
}
