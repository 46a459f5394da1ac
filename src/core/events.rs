use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::id::SalesInvoiceId;

/// Something that happened to a sales invoice.
///
/// Recorded by the aggregate on every successful mutation and drained with
/// [`SalesInvoice::take_recorded_events`](super::SalesInvoice::take_recorded_events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SalesInvoiceEvent {
    Created {
        invoice_id: SalesInvoiceId,
        customer_id: u64,
        invoice_date: NaiveDate,
        currency: Currency,
        exchange_rate: Option<Decimal>,
    },
    LineAdded {
        invoice_id: SalesInvoiceId,
        product_id: u64,
        quantity: Decimal,
        tariff: Decimal,
    },
    Finalized {
        invoice_id: SalesInvoiceId,
    },
    Cancelled {
        invoice_id: SalesInvoiceId,
    },
}

impl SalesInvoiceEvent {
    pub fn invoice_id(&self) -> SalesInvoiceId {
        match self {
            Self::Created { invoice_id, .. }
            | Self::LineAdded { invoice_id, .. }
            | Self::Finalized { invoice_id }
            | Self::Cancelled { invoice_id } => *invoice_id,
        }
    }

    /// Short event name, e.g. for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::LineAdded { .. } => "line_added",
            Self::Finalized { .. } => "finalized",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}
