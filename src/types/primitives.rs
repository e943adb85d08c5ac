use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Marketplace price in mils (1 USD = 1000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub u64);

impl Price {
    const MILS_PER_USD: u64 = 1000;

    pub fn from_mils(mils: u64) -> Self {
        Self(mils)
    }

    /// Convert a USD amount, rounding to the nearest mil
    pub fn from_usd(usd: Decimal) -> Result<Self> {
        if usd.is_sign_negative() {
            return Err(Error::InvalidParameter(format!(
                "price cannot be negative: {}",
                usd
            )));
        }
        let out_of_range = || Error::InvalidParameter(format!("price out of range: {}", usd));
        let mils = usd
            .checked_mul(Decimal::from(Self::MILS_PER_USD))
            .ok_or_else(out_of_range)?
            .round();
        mils.to_u64().map(Self).ok_or_else(out_of_range)
    }

    /// Parse a USD amount such as `"12.5"`
    pub fn parse_usd(usd: &str) -> Result<Self> {
        let usd = Decimal::from_str(usd.trim())?;
        Self::from_usd(usd)
    }

    pub fn mils(&self) -> u64 {
        self.0
    }

    pub fn to_usd(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(Self::MILS_PER_USD)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Either a numeric or a string identifier; the API uses both
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(u64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{}", n),
            Id::Str(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Num(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Str(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Str(s)
    }
}
