use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::currency::Currency;
use super::error::InvoiceResult;
use super::id::SalesInvoiceId;
use super::invoice::SalesInvoice;

/// Quantity precision used when none is configured.
pub const DEFAULT_QUANTITY_PRECISION: u32 = 3;

/// Builder for draft sales invoices.
///
/// Defaults: ledger currency, no exchange rate,
/// [`DEFAULT_QUANTITY_PRECISION`].
///
/// ```
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = SalesInvoiceBuilder::new(1001, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
///     .currency(Currency::Usd)
///     .exchange_rate(dec!(1.3))
///     .quantity_precision(2)
///     .build(SalesInvoiceId::generate())
///     .unwrap();
/// assert!(invoice.is_draft());
/// ```
#[derive(Debug, Clone)]
pub struct SalesInvoiceBuilder {
    customer_id: u64,
    invoice_date: NaiveDate,
    currency: Currency,
    exchange_rate: Option<Decimal>,
    quantity_precision: u32,
}

impl SalesInvoiceBuilder {
    pub fn new(customer_id: u64, invoice_date: NaiveDate) -> Self {
        Self {
            customer_id,
            invoice_date,
            currency: Currency::LEDGER,
            exchange_rate: None,
            quantity_precision: DEFAULT_QUANTITY_PRECISION,
        }
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn exchange_rate(mut self, rate: Decimal) -> Self {
        self.exchange_rate = Some(rate);
        self
    }

    /// Set or clear the exchange rate.
    pub fn maybe_exchange_rate(mut self, rate: Option<Decimal>) -> Self {
        self.exchange_rate = rate;
        self
    }

    pub fn quantity_precision(mut self, precision: u32) -> Self {
        self.quantity_precision = precision;
        self
    }

    /// Build the draft, validating the currency / exchange-rate pairing.
    pub fn build(self, id: SalesInvoiceId) -> InvoiceResult<SalesInvoice> {
        SalesInvoice::create_draft(
            id,
            self.customer_id,
            self.invoice_date,
            self.currency,
            self.exchange_rate,
            self.quantity_precision,
        )
    }
}
