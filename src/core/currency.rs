//! Invoice currencies and the ledger currency.
//!
//! Only a closed set of ISO 4217 codes is accepted. Consolidated totals are
//! always expressed in the ledger currency (EUR).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Supported invoice currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Euro, the ledger currency.
    #[serde(rename = "EUR")]
    Eur,
    /// US Dollar.
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    /// The currency all ledger totals are expressed in.
    pub const LEDGER: Currency = Currency::Eur;

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }

    /// Parse from an ISO 4217 code. Case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EUR" => Some(Self::Eur),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }

    pub fn is_ledger_currency(&self) -> bool {
        *self == Self::LEDGER
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| InvoiceError::UnknownCurrency(s.to_string()))
    }
}
