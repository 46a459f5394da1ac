//! VAT codes and date-dependent VAT rates.
//!
//! | Code | Meaning  | Rate                                 |
//! |------|----------|--------------------------------------|
//! | `S`  | Standard | 21%                                  |
//! | `L`  | Low      | 6% before 2019-01-01, 9% from then on |

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::clock::Clock;
use super::error::{InvoiceError, InvoiceResult};

/// Standard VAT rate.
pub const STANDARD_RATE: Decimal = dec!(21);

/// Low VAT rate before [`low_rate_change_date`].
pub const LOW_RATE_BEFORE_2019: Decimal = dec!(6);

/// Low VAT rate from [`low_rate_change_date`] on.
pub const LOW_RATE: Decimal = dec!(9);

/// First day on which the low rate is 9%.
pub fn low_rate_change_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// VAT code selecting the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatCode {
    /// S: standard rate.
    #[serde(rename = "S")]
    Standard,
    /// L: low rate.
    #[serde(rename = "L")]
    Low,
}

impl VatCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "S",
            Self::Low => "L",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Standard),
            "L" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for VatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VatCode {
    type Err = InvoiceError;

    fn from_str(s: &str) -> InvoiceResult<Self> {
        Self::from_code(s).ok_or_else(|| InvoiceError::UnknownVatCode(s.to_string()))
    }
}

/// A VAT rate resolved for a code at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "VatRateRecord")]
pub struct VatRate {
    code: VatCode,
    percentage: Decimal,
}

#[derive(Deserialize)]
struct VatRateRecord {
    code: VatCode,
    percentage: Decimal,
}

impl TryFrom<VatRateRecord> for VatRate {
    type Error = InvoiceError;

    fn try_from(record: VatRateRecord) -> InvoiceResult<Self> {
        // only percentages the code has had on some date
        let change = low_rate_change_date();
        let before = change.pred_opt().unwrap_or(change);
        [before, change]
            .into_iter()
            .map(|date| Self::for_vat_code(record.code, date))
            .find(|rate| rate.percentage == record.percentage)
            .ok_or_else(|| {
                InvoiceError::InvalidRecord(format!(
                    "VAT code {} has no {}% rate",
                    record.code, record.percentage
                ))
            })
    }
}

impl VatRate {
    /// Resolve the rate for a textual VAT code effective on `date`.
    pub fn for_code_and_date(code: &str, date: NaiveDate) -> InvoiceResult<Self> {
        Ok(Self::for_vat_code(code.parse()?, date))
    }

    pub fn for_vat_code(code: VatCode, date: NaiveDate) -> Self {
        let percentage = match code {
            VatCode::Standard => STANDARD_RATE,
            VatCode::Low if date < low_rate_change_date() => LOW_RATE_BEFORE_2019,
            VatCode::Low => LOW_RATE,
        };
        Self { code, percentage }
    }

    /// Resolve the rate effective today according to `clock`.
    pub fn current(code: &str, clock: &impl Clock) -> InvoiceResult<Self> {
        Self::for_code_and_date(code, clock.today())
    }

    pub fn code(&self) -> VatCode {
        self.code
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// VAT due on `net_amount`.
    pub fn vat_for(&self, net_amount: &Amount) -> InvoiceResult<Amount> {
        net_amount.take_percentage(self.percentage)
    }
}
