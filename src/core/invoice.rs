use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::currency::Currency;
use super::discount::Discount;
use super::error::{InvoiceError, InvoiceResult};
use super::events::SalesInvoiceEvent;
use super::id::SalesInvoiceId;
use super::line::Line;
use super::vat::VatRate;

/// Lifecycle state of a sales invoice.
///
/// `Draft` is the only state that accepts changes. `Finalized` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    Draft,
    Finalized,
    Cancelled,
}

impl InvoiceState {
    /// Transition table: only `Draft -> Finalized` and `Draft -> Cancelled`.
    pub fn can_transition_to(self, target: InvoiceState) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Finalized) | (Self::Draft, Self::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        self != Self::Draft
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated invoice totals in invoice and ledger currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub currency: Currency,
    pub exchange_rate: Option<Decimal>,
    pub net: Amount,
    pub vat: Amount,
    pub net_in_ledger_currency: Amount,
    pub vat_in_ledger_currency: Amount,
}

impl InvoiceTotals {
    fn empty(currency: Currency, exchange_rate: Option<Decimal>) -> InvoiceResult<Self> {
        let zero = Amount::zero(currency);
        Self::from_sums(currency, exchange_rate, zero, zero)
    }

    /// Totals after adding `line`, or an error when a sum leaves the decimal range.
    fn with_line(&self, line: &Line) -> InvoiceResult<Self> {
        let net = self.net.add(&line.net_amount())?;
        let vat = self.vat.add(&line.vat_amount())?;
        Self::from_sums(self.currency, self.exchange_rate, net, vat)
    }

    fn from_sums(
        currency: Currency,
        exchange_rate: Option<Decimal>,
        net: Amount,
        vat: Amount,
    ) -> InvoiceResult<Self> {
        Ok(Self {
            currency,
            exchange_rate,
            net,
            vat,
            net_in_ledger_currency: to_ledger(net, exchange_rate)?,
            vat_in_ledger_currency: to_ledger(vat, exchange_rate)?,
        })
    }
}

fn to_ledger(total: Amount, exchange_rate: Option<Decimal>) -> InvoiceResult<Amount> {
    match exchange_rate {
        Some(rate) => total.convert_to_ledger(rate),
        None if total.currency().is_ledger_currency() => Ok(total),
        None => Err(InvoiceError::MissingExchangeRate(total.currency())),
    }
}

impl fmt::Display for InvoiceTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net {}, VAT {}", self.net, self.vat)?;
        if !self.currency.is_ledger_currency() {
            write!(
                f,
                " (ledger: net {}, VAT {})",
                self.net_in_ledger_currency, self.vat_in_ledger_currency
            )?;
        }
        Ok(())
    }
}

/// Sales invoice aggregate root.
///
/// Owns its lines, the currency context and the lifecycle state. Lines can
/// only be added while the invoice is a draft. Totals are kept up to date
/// by [`add_line`](Self::add_line), which refuses a line whose totals would
/// not fit the decimal range. Deserializing re-checks every invariant.
///
/// ```
/// use chrono::NaiveDate;
/// use factuur::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut invoice = SalesInvoice::create_draft(
///     SalesInvoiceId::generate(),
///     1001,
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     Currency::Eur,
///     None,
///     3,
/// )
/// .unwrap();
/// invoice
///     .add_line(1, "Consulting", dec!(2), dec!(15), Discount::none(), "S")
///     .unwrap();
/// assert_eq!(invoice.total_vat_amount().value(), dec!(6.30));
/// invoice.finalize().unwrap();
/// assert!(invoice.is_finalized());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SalesInvoiceRecord")]
pub struct SalesInvoice {
    id: SalesInvoiceId,
    customer_id: u64,
    invoice_date: NaiveDate,
    currency: Currency,
    exchange_rate: Option<Decimal>,
    quantity_precision: u32,
    lines: Vec<Line>,
    state: InvoiceState,
    #[serde(skip)]
    totals: InvoiceTotals,
    #[serde(skip)]
    recorded_events: Vec<SalesInvoiceEvent>,
}

#[derive(Deserialize)]
struct SalesInvoiceRecord {
    id: SalesInvoiceId,
    customer_id: u64,
    invoice_date: NaiveDate,
    currency: Currency,
    exchange_rate: Option<Decimal>,
    quantity_precision: u32,
    lines: Vec<Line>,
    state: InvoiceState,
}

impl TryFrom<SalesInvoiceRecord> for SalesInvoice {
    type Error = InvoiceError;

    fn try_from(record: SalesInvoiceRecord) -> InvoiceResult<Self> {
        let mut invoice = Self::empty(
            record.id,
            record.customer_id,
            record.invoice_date,
            record.currency,
            record.exchange_rate,
            record.quantity_precision,
        )?;
        for line in record.lines {
            invoice.ensure_new_product(line.product_id())?;
            invoice.ensure_same_context(&line)?;
            invoice.push_line(line)?;
        }
        invoice.state = record.state;
        Ok(invoice)
    }
}

impl SalesInvoice {
    /// Create a draft invoice.
    ///
    /// A non-ledger currency requires an exchange rate greater than zero;
    /// the ledger currency must come without one.
    pub fn create_draft(
        id: SalesInvoiceId,
        customer_id: u64,
        invoice_date: NaiveDate,
        currency: Currency,
        exchange_rate: Option<Decimal>,
        quantity_precision: u32,
    ) -> InvoiceResult<Self> {
        let mut invoice = Self::empty(
            id,
            customer_id,
            invoice_date,
            currency,
            exchange_rate,
            quantity_precision,
        )?;
        invoice.record(SalesInvoiceEvent::Created {
            invoice_id: id,
            customer_id,
            invoice_date,
            currency,
            exchange_rate,
        });
        Ok(invoice)
    }

    pub fn id(&self) -> SalesInvoiceId {
        self.id
    }

    pub fn customer_id(&self) -> u64 {
        self.customer_id
    }

    pub fn invoice_date(&self) -> NaiveDate {
        self.invoice_date
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn exchange_rate(&self) -> Option<Decimal> {
        self.exchange_rate
    }

    pub fn quantity_precision(&self) -> u32 {
        self.quantity_precision
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn state(&self) -> InvoiceState {
        self.state
    }

    pub fn is_draft(&self) -> bool {
        self.state == InvoiceState::Draft
    }

    pub fn is_finalized(&self) -> bool {
        self.state == InvoiceState::Finalized
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == InvoiceState::Cancelled
    }

    /// Add a line for a product not yet on this invoice.
    ///
    /// The VAT rate is resolved for `vat_code` at the invoice date. Fails
    /// with [`InvoiceError::AmountOverflow`] when the line amounts or the
    /// invoice totals, ledger totals included, would not fit a `Decimal`.
    pub fn add_line(
        &mut self,
        product_id: u64,
        description: impl Into<String>,
        quantity: Decimal,
        tariff: Decimal,
        discount: Discount,
        vat_code: &str,
    ) -> InvoiceResult<()> {
        self.ensure_draft("add a line to")?;
        self.ensure_new_product(product_id)?;

        let vat_rate = VatRate::for_code_and_date(vat_code, self.invoice_date)?;
        let line = Line::new(
            product_id,
            description.into(),
            quantity,
            self.quantity_precision,
            tariff,
            discount,
            vat_rate,
            self.currency,
            self.exchange_rate,
        )?;

        let net = line.net_amount();
        let vat = line.vat_amount();
        self.push_line(line)?;
        tracing::debug!(invoice_id = %self.id, product_id, %net, %vat, "line added");
        self.record(SalesInvoiceEvent::LineAdded {
            invoice_id: self.id,
            product_id,
            quantity,
            tariff,
        });
        Ok(())
    }

    /// Sum of line net amounts.
    pub fn total_net_amount(&self) -> Amount {
        self.totals.net
    }

    pub fn total_net_amount_in_ledger_currency(&self) -> Amount {
        self.totals.net_in_ledger_currency
    }

    /// Sum of line VAT amounts.
    pub fn total_vat_amount(&self) -> Amount {
        self.totals.vat
    }

    pub fn total_vat_amount_in_ledger_currency(&self) -> Amount {
        self.totals.vat_in_ledger_currency
    }

    pub fn totals(&self) -> InvoiceTotals {
        self.totals
    }

    pub fn finalize(&mut self) -> InvoiceResult<()> {
        self.transition_to(InvoiceState::Finalized, "finalize")?;
        self.record(SalesInvoiceEvent::Finalized {
            invoice_id: self.id,
        });
        Ok(())
    }

    pub fn cancel(&mut self) -> InvoiceResult<()> {
        self.transition_to(InvoiceState::Cancelled, "cancel")?;
        self.record(SalesInvoiceEvent::Cancelled {
            invoice_id: self.id,
        });
        Ok(())
    }

    /// Drain the events recorded since the last call.
    pub fn take_recorded_events(&mut self) -> Vec<SalesInvoiceEvent> {
        std::mem::take(&mut self.recorded_events)
    }

    fn record(&mut self, event: SalesInvoiceEvent) {
        self.recorded_events.push(event);
    }

    fn ensure_draft(&self, action: &'static str) -> InvoiceResult<()> {
        if self.state != InvoiceState::Draft {
            return Err(InvoiceError::InvalidStateTransition {
                state: self.state,
                action,
            });
        }
        Ok(())
    }

    fn transition_to(&mut self, target: InvoiceState, action: &'static str) -> InvoiceResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(InvoiceError::InvalidStateTransition {
                state: self.state,
                action,
            });
        }
        tracing::info!(invoice_id = %self.id, from = %self.state, to = %target, "invoice state changed");
        self.state = target;
        Ok(())
    }

    fn empty(
        id: SalesInvoiceId,
        customer_id: u64,
        invoice_date: NaiveDate,
        currency: Currency,
        exchange_rate: Option<Decimal>,
        quantity_precision: u32,
    ) -> InvoiceResult<Self> {
        check_exchange_rate(currency, exchange_rate)?;
        Ok(Self {
            id,
            customer_id,
            invoice_date,
            currency,
            exchange_rate,
            quantity_precision,
            lines: Vec::new(),
            state: InvoiceState::Draft,
            totals: InvoiceTotals::empty(currency, exchange_rate)?,
            recorded_events: Vec::new(),
        })
    }

    fn ensure_new_product(&self, product_id: u64) -> InvoiceResult<()> {
        if self.lines.iter().any(|l| l.product_id() == product_id) {
            return Err(InvoiceError::DuplicateProduct(product_id));
        }
        Ok(())
    }

    /// A stored line must carry this invoice's currency context and the VAT
    /// rate in force on the invoice date.
    fn ensure_same_context(&self, line: &Line) -> InvoiceResult<()> {
        if line.currency() != self.currency {
            return Err(InvoiceError::CurrencyMismatch {
                expected: self.currency,
                found: line.currency(),
            });
        }
        let product_id = line.product_id();
        if line.exchange_rate() != self.exchange_rate {
            return Err(InvoiceError::InvalidRecord(format!(
                "line for product {product_id} has a different exchange rate than its invoice"
            )));
        }
        if line.quantity_precision() != self.quantity_precision {
            return Err(InvoiceError::InvalidRecord(format!(
                "line for product {product_id} has a different quantity precision than its invoice"
            )));
        }
        let rate = line.vat_rate();
        if rate != VatRate::for_vat_code(rate.code(), self.invoice_date) {
            return Err(InvoiceError::InvalidRecord(format!(
                "line for product {product_id} has a VAT rate of {}% which was not in force on {}",
                rate.percentage(),
                self.invoice_date
            )));
        }
        Ok(())
    }

    fn push_line(&mut self, line: Line) -> InvoiceResult<()> {
        self.totals = self.totals.with_line(&line)?;
        self.lines.push(line);
        Ok(())
    }
}

fn check_exchange_rate(currency: Currency, exchange_rate: Option<Decimal>) -> InvoiceResult<()> {
    match (currency.is_ledger_currency(), exchange_rate) {
        (true, None) => Ok(()),
        (true, Some(rate)) => Err(InvoiceError::UnexpectedExchangeRate(rate)),
        (false, Some(rate)) if rate > Decimal::ZERO => Ok(()),
        (false, _) => Err(InvoiceError::MissingExchangeRate(currency)),
    }
}
