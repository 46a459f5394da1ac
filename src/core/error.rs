use rust_decimal::Decimal;
use thiserror::Error;

use super::currency::Currency;
use super::invoice::InvoiceState;

/// Result alias used throughout the crate.
pub type InvoiceResult<T> = std::result::Result<T, InvoiceError>;

/// Errors raised while building or mutating a sales invoice.
///
/// Every error is terminal for the call that raised it: the invoice is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// Line quantity must be strictly positive.
    #[error("quantity should be more than 0, got {0}")]
    InvalidQuantity(Decimal),

    /// VAT code is not one of the known codes ("S", "L").
    #[error("unknown VAT code '{0}'")]
    UnknownVatCode(String),

    /// Currency code is not supported.
    #[error("unknown currency '{0}'")]
    UnknownCurrency(String),

    /// A non-ledger currency needs a positive exchange rate.
    #[error("an exchange rate greater than 0 is required if the currency is {0}")]
    MissingExchangeRate(Currency),

    /// The ledger currency does not take an exchange rate.
    #[error("you cannot use an exchange rate ({0}) if the currency is the ledger currency")]
    UnexpectedExchangeRate(Decimal),

    /// Discount percentage outside of 0..=100.
    #[error("discount percentage must be between 0 and 100, got {0}")]
    InvalidPercentage(Decimal),

    /// The operation is not allowed in the invoice's current state.
    #[error("cannot {action} this invoice because it is {state}")]
    InvalidStateTransition {
        state: InvoiceState,
        action: &'static str,
    },

    /// A line for this product already exists on the invoice.
    #[error("product {0} is already on this invoice")]
    DuplicateProduct(u64),

    /// Arithmetic between amounts of different currencies.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// An amount or total does not fit the decimal range.
    #[error("amount is too large to be represented")]
    AmountOverflow,

    /// A stored invoice, line or rate breaks an invariant.
    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    /// Identifier could not be parsed.
    #[error("invalid sales invoice id: {0}")]
    InvalidId(String),

    /// No invoice stored under the given identifier.
    #[error("could not find sales invoice with id {0}")]
    NotFound(String),

    /// Failure reported by a repository implementation.
    #[error("repository error: {0}")]
    Repository(String),
}

impl InvoiceError {
    /// True for errors caused by invalid caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_)
                | Self::UnknownVatCode(_)
                | Self::UnknownCurrency(_)
                | Self::MissingExchangeRate(_)
                | Self::UnexpectedExchangeRate(_)
                | Self::InvalidPercentage(_)
                | Self::AmountOverflow
                | Self::InvalidId(_)
        )
    }

    /// True for errors raised against a document invariant.
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            Self::InvalidStateTransition { .. } | Self::DuplicateProduct(_)
        )
    }
}
