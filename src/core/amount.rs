use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::error::{InvoiceError, InvoiceResult};

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// A currency-tagged monetary value, always held at two decimals.
///
/// ```
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::of(dec!(10.5678), Currency::Eur);
/// assert_eq!(amount.value(), dec!(10.57));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    value: Decimal,
    currency: Currency,
}

impl Amount {
    pub fn of(value: Decimal, currency: Currency) -> Self {
        Self {
            value: round_half_up(value, 2),
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::of(Decimal::ZERO, currency)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn add(&self, other: &Amount) -> InvoiceResult<Amount> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .ok_or(InvoiceError::AmountOverflow)?;
        Ok(Self::of(value, self.currency))
    }

    pub fn subtract(&self, other: &Amount) -> InvoiceResult<Amount> {
        self.ensure_same_currency(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .ok_or(InvoiceError::AmountOverflow)?;
        Ok(Self::of(value, self.currency))
    }

    /// `pct` percent of this amount, rounded to two decimals.
    ///
    /// The percentage is not validated here; [`Discount`](super::Discount)
    /// and [`VatRate`](super::VatRate) guard their own ranges.
    pub fn take_percentage(&self, pct: Decimal) -> InvoiceResult<Amount> {
        let value = self
            .value
            .checked_mul(pct)
            .and_then(|v| v.checked_div(dec!(100)))
            .ok_or(InvoiceError::AmountOverflow)?;
        Ok(Self::of(value, self.currency))
    }

    /// Convert to the ledger currency by dividing through `exchange_rate`.
    ///
    /// Amounts already in the ledger currency are returned unchanged.
    pub fn convert_to_ledger(&self, exchange_rate: Decimal) -> InvoiceResult<Amount> {
        if self.currency.is_ledger_currency() {
            return Ok(*self);
        }
        if exchange_rate <= Decimal::ZERO {
            return Err(InvoiceError::MissingExchangeRate(self.currency));
        }
        let value = self
            .value
            .checked_div(exchange_rate)
            .ok_or(InvoiceError::AmountOverflow)?;
        Ok(Self::of(value, Currency::LEDGER))
    }

    fn ensure_same_currency(&self, other: &Amount) -> InvoiceResult<()> {
        if self.currency != other.currency {
            return Err(InvoiceError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(
            Amount::of(dec!(10.1234), Currency::Eur),
            Amount::of(dec!(10.12), Currency::Eur)
        );
        assert_eq!(
            Amount::of(dec!(10.5678), Currency::Eur),
            Amount::of(dec!(10.57), Currency::Eur)
        );
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(Amount::of(dec!(0.125), Currency::Eur).value(), dec!(0.13));
        assert_eq!(Amount::of(dec!(-0.125), Currency::Eur).value(), dec!(-0.13));
        assert_eq!(Amount::of(dec!(2.345), Currency::Eur).value(), dec!(2.35));
    }

    #[test]
    fn add_and_subtract() {
        let ten = Amount::of(dec!(10), Currency::Eur);
        let five = Amount::of(dec!(5), Currency::Eur);
        assert_eq!(ten.add(&five).unwrap().value(), dec!(15));
        assert_eq!(ten.subtract(&five).unwrap().value(), dec!(5));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let eur = Amount::of(dec!(10), Currency::Eur);
        let usd = Amount::of(dec!(5), Currency::Usd);
        let expected = InvoiceError::CurrencyMismatch {
            expected: Currency::Eur,
            found: Currency::Usd,
        };
        assert_eq!(eur.add(&usd), Err(expected.clone()));
        assert_eq!(eur.subtract(&usd), Err(expected));
    }

    #[test]
    fn zero_shortcut() {
        assert_eq!(Amount::zero(Currency::Eur), Amount::of(dec!(0.0), Currency::Eur));
        assert!(Amount::zero(Currency::Usd).is_zero());
    }

    #[test]
    fn percentage() {
        let amount = Amount::of(dec!(10), Currency::Eur);
        assert_eq!(amount.take_percentage(dec!(10)).unwrap().value(), dec!(1));
        let amount = Amount::of(dec!(100), Currency::Eur);
        assert_eq!(amount.take_percentage(dec!(23)).unwrap().value(), dec!(23));
    }

    #[test]
    fn overflow_is_an_error() {
        let max = Amount::of(Decimal::MAX, Currency::Eur);
        let one = Amount::of(Decimal::ONE, Currency::Eur);
        assert_eq!(max.add(&one), Err(InvoiceError::AmountOverflow));
        assert_eq!(max.take_percentage(dec!(21)), Err(InvoiceError::AmountOverflow));

        let min = Amount::of(Decimal::MIN, Currency::Eur);
        assert_eq!(min.subtract(&one), Err(InvoiceError::AmountOverflow));
    }

    #[test]
    fn tiny_exchange_rate_overflows() {
        let usd = Amount::of(dec!(1000000), Currency::Usd);
        assert_eq!(
            usd.convert_to_ledger(Decimal::new(1, 28)),
            Err(InvoiceError::AmountOverflow)
        );
    }

    #[test]
    fn ledger_conversion() {
        let usd = Amount::of(dec!(66.04), Currency::Usd);
        let eur = usd.convert_to_ledger(dec!(1.3)).unwrap();
        assert_eq!(eur, Amount::of(dec!(50.80), Currency::Eur));

        let already = Amount::of(dec!(12.34), Currency::Eur);
        assert_eq!(already.convert_to_ledger(dec!(2)).unwrap(), already);

        assert!(usd.convert_to_ledger(Decimal::ZERO).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Amount::of(dec!(27), Currency::Usd).to_string(), "27.00 USD");
    }
}
