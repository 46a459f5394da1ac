use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::error::{InvoiceError, InvoiceResult};

/// Percentage-based line discount, 0 to 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "DiscountRecord")]
pub struct Discount {
    percentage: Decimal,
}

#[derive(Deserialize)]
struct DiscountRecord {
    percentage: Decimal,
}

impl TryFrom<DiscountRecord> for Discount {
    type Error = InvoiceError;

    fn try_from(record: DiscountRecord) -> InvoiceResult<Self> {
        Self::new(record.percentage)
    }
}

impl Discount {
    pub fn new(percentage: Decimal) -> InvoiceResult<Self> {
        if percentage < Decimal::ZERO || percentage > dec!(100) {
            return Err(InvoiceError::InvalidPercentage(percentage));
        }
        Ok(Self { percentage })
    }

    pub fn none() -> Self {
        Self {
            percentage: Decimal::ZERO,
        }
    }

    /// Build from an optional percentage; `None` means no discount.
    pub fn from_optional(percentage: Option<Decimal>) -> InvoiceResult<Self> {
        percentage.map_or(Ok(Self::none()), Self::new)
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    pub fn is_none(&self) -> bool {
        self.percentage.is_zero()
    }

    /// Discount amount for `base`.
    pub fn amount_for(&self, base: &Amount) -> InvoiceResult<Amount> {
        base.take_percentage(self.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;

    #[test]
    fn computes_discount_amount() {
        let base = Amount::of(dec!(30), Currency::Usd);
        let discount = Discount::new(dec!(10)).unwrap();
        assert_eq!(
            discount.amount_for(&base),
            Ok(Amount::of(dec!(3), Currency::Usd))
        );
    }

    #[test]
    fn no_discount_is_zero() {
        let base = Amount::of(dec!(39.04), Currency::Eur);
        assert!(Discount::none().amount_for(&base).unwrap().is_zero());
        assert_eq!(Discount::default(), Discount::none());
        assert_eq!(Discount::from_optional(None).unwrap(), Discount::none());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(Discount::new(dec!(0)).is_ok());
        assert!(Discount::new(dec!(100)).is_ok());
        assert_eq!(
            Discount::new(dec!(-0.01)),
            Err(InvoiceError::InvalidPercentage(dec!(-0.01)))
        );
        assert_eq!(
            Discount::new(dec!(100.01)),
            Err(InvoiceError::InvalidPercentage(dec!(100.01)))
        );
    }

    #[test]
    fn full_discount_leaves_nothing() {
        let base = Amount::of(dec!(12.34), Currency::Eur);
        let discount = Discount::new(dec!(100)).unwrap();
        assert_eq!(discount.amount_for(&base), Ok(base));
    }

    #[test]
    fn deserializing_checks_range() {
        let discount: Discount = serde_json::from_str(r#"{"percentage":"12.5"}"#).unwrap();
        assert_eq!(discount.percentage(), dec!(12.5));

        let err = serde_json::from_str::<Discount>(r#"{"percentage":"250"}"#).unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"));
        assert!(serde_json::from_str::<Discount>(r#"{"percentage":"-1"}"#).is_err());
    }
}
