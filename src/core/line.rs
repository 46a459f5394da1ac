use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amount::{Amount, round_half_up};
use super::currency::Currency;
use super::discount::Discount;
use super::error::{InvoiceError, InvoiceResult};
use super::vat::VatRate;

/// One line of a sales invoice.
///
/// Lines are created by [`SalesInvoice::add_line`](super::SalesInvoice::add_line)
/// and never change afterwards. All amounts are derived on every call from
/// the stored inputs; construction rejects inputs whose amounts would not
/// fit the decimal range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineRecord")]
pub struct Line {
    product_id: u64,
    description: String,
    quantity: Decimal,
    quantity_precision: u32,
    tariff: Decimal,
    discount: Discount,
    vat_rate: VatRate,
    currency: Currency,
    exchange_rate: Option<Decimal>,
}

#[derive(Deserialize)]
struct LineRecord {
    product_id: u64,
    description: String,
    quantity: Decimal,
    quantity_precision: u32,
    tariff: Decimal,
    discount: Discount,
    vat_rate: VatRate,
    currency: Currency,
    exchange_rate: Option<Decimal>,
}

impl TryFrom<LineRecord> for Line {
    type Error = InvoiceError;

    fn try_from(record: LineRecord) -> InvoiceResult<Self> {
        Self::new(
            record.product_id,
            record.description,
            record.quantity,
            record.quantity_precision,
            record.tariff,
            record.discount,
            record.vat_rate,
            record.currency,
            record.exchange_rate,
        )
    }
}

impl Line {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        product_id: u64,
        description: String,
        quantity: Decimal,
        quantity_precision: u32,
        tariff: Decimal,
        discount: Discount,
        vat_rate: VatRate,
        currency: Currency,
        exchange_rate: Option<Decimal>,
    ) -> InvoiceResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(InvoiceError::InvalidQuantity(quantity));
        }
        let line = Self {
            product_id,
            description,
            quantity,
            quantity_precision,
            tariff,
            discount,
            vat_rate,
            currency,
            exchange_rate,
        };
        line.check_amounts()?;
        Ok(line)
    }

    pub fn product_id(&self) -> u64 {
        self.product_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Quantity as entered, before rounding to the invoice precision.
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn quantity_precision(&self) -> u32 {
        self.quantity_precision
    }

    /// Quantity rounded to the invoice's quantity precision.
    pub fn rounded_quantity(&self) -> Decimal {
        round_half_up(self.quantity, self.quantity_precision)
    }

    pub fn tariff(&self) -> Decimal {
        self.tariff
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat_rate
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn exchange_rate(&self) -> Option<Decimal> {
        self.exchange_rate
    }

    /// Gross line amount: rounded quantity times tariff.
    pub fn amount(&self) -> Amount {
        Amount::of(self.rounded_quantity() * self.tariff, self.currency)
    }

    pub fn discount_amount(&self) -> Amount {
        percentage_of(self.amount(), self.discount.percentage())
    }

    pub fn net_amount(&self) -> Amount {
        let amount = self.amount();
        Amount::of(amount.value() - self.discount_amount().value(), self.currency)
    }

    pub fn vat_amount(&self) -> Amount {
        percentage_of(self.net_amount(), self.vat_rate.percentage())
    }

    /// Runs the amount derivations with checked arithmetic.
    ///
    /// The getters above repeat the same steps unchecked, so a line that
    /// passed this check never overflows in them.
    fn check_amounts(&self) -> InvoiceResult<()> {
        let amount = self
            .rounded_quantity()
            .checked_mul(self.tariff)
            .map(|value| Amount::of(value, self.currency))
            .ok_or(InvoiceError::AmountOverflow)?;
        let discount = self.discount.amount_for(&amount)?;
        let net = amount.subtract(&discount)?;
        self.vat_rate.vat_for(&net)?;
        Ok(())
    }
}

fn percentage_of(base: Amount, pct: Decimal) -> Amount {
    Amount::of(base.value() * pct / dec!(100), base.currency())
}
