//! Adjustment amounts entered by the user.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A strictly positive whole number of units.
///
/// The direction of an adjustment is carried separately by
/// [`AdjustKind`](crate::AdjustKind); the amount itself is never negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::validation("amount must be greater than zero"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount is empty"));
        }
        let value = i64::from_str(trimmed).map_err(|_| {
            DomainError::validation(format!("amount is not a whole number: {trimmed}"))
        })?;
        Self::new(value)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_and_zero() {
        assert!("".parse::<Amount>().is_err());
        assert!("   ".parse::<Amount>().is_err());
        assert!("0".parse::<Amount>().is_err());
        assert!("-3".parse::<Amount>().is_err());
    }

    #[test]
    fn rejects_fractions() {
        let err = "2.5".parse::<Amount>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    proptest! {
        /// Property: every positive integer survives its own textual form,
        /// with surrounding whitespace ignored.
        #[test]
        fn parses_positive_integers(value in 1i64..i64::MAX, pad in " {0,3}") {
            let text = format!("{pad}{value}{pad}");
            let amount: Amount = text.parse().unwrap();
            prop_assert_eq!(amount.get(), value);
        }
    }
}
