use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Money;

/// 100% expressed in basis points.
pub const BASIS_POINTS_PER_UNIT: i64 = 10_000;
/// The standard service fee charged on top of the ticket subtotal (7%).
pub const DEFAULT_SERVICE_FEE_BPS: i64 = 700;

/// A percentage surcharge, held in basis points (1/100th of a percent) so that fee calculations stay in integer
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(i64);

#[derive(Debug, Clone, Error)]
pub enum FeeRateParseError {
    #[error("Fee rate must be a whole number of basis points. {0}")]
    NotAnInteger(String),
    #[error("Fee rate must lie between 0 and {BASIS_POINTS_PER_UNIT} basis points, got {0}")]
    OutOfRange(i64),
}

impl Default for FeeRate {
    fn default() -> Self {
        Self(DEFAULT_SERVICE_FEE_BPS)
    }
}

impl FeeRate {
    pub fn from_basis_points(bps: i64) -> Result<Self, FeeRateParseError> {
        if (0..=BASIS_POINTS_PER_UNIT).contains(&bps) {
            Ok(Self(bps))
        } else {
            Err(FeeRateParseError::OutOfRange(bps))
        }
    }

    pub fn basis_points(&self) -> i64 {
        self.0
    }

    /// Calculates the fee owed on `subtotal`, rounding half a minor unit upwards.
    ///
    /// Returns `None` if the intermediate product overflows.
    pub fn fee_on(&self, subtotal: Money) -> Option<Money> {
        let scaled = subtotal.value().checked_mul(self.0)?;
        let half = BASIS_POINTS_PER_UNIT / 2;
        let rounded = if scaled >= 0 { scaled.checked_add(half)? } else { scaled.checked_sub(half)? };
        Some(Money::from(rounded / BASIS_POINTS_PER_UNIT))
    }
}

impl FromStr for FeeRate {
    type Err = FeeRateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bps = s.trim().parse::<i64>().map_err(|e| FeeRateParseError::NotAnInteger(e.to_string()))?;
        Self::from_basis_points(bps)
    }
}

impl Display for FeeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
