use crate::core::{InvoiceResult, SalesInvoice, SalesInvoiceEvent, SalesInvoiceId};

/// Storage for sales invoices.
///
/// Implementations decide how identities are generated and how invoices are
/// persisted. One writer per invoice is assumed.
pub trait SalesInvoiceRepository {
    /// Generate a unique identifier for a new invoice.
    fn next_identity(&self) -> SalesInvoiceId;

    /// Insert or replace the invoice stored under its id.
    fn save(&mut self, invoice: SalesInvoice) -> InvoiceResult<()>;

    fn find_by_id(&self, id: &SalesInvoiceId) -> InvoiceResult<Option<SalesInvoice>>;
}

/// Sink for domain events recorded by invoices.
pub trait EventPublisher {
    fn publish(&mut self, event: &SalesInvoiceEvent);
}

/// Publisher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&mut self, _event: &SalesInvoiceEvent) {}
}

impl<R: SalesInvoiceRepository + ?Sized> SalesInvoiceRepository for &mut R {
    fn next_identity(&self) -> SalesInvoiceId {
        (**self).next_identity()
    }

    fn save(&mut self, invoice: SalesInvoice) -> InvoiceResult<()> {
        (**self).save(invoice)
    }

    fn find_by_id(&self, id: &SalesInvoiceId) -> InvoiceResult<Option<SalesInvoice>> {
        (**self).find_by_id(id)
    }
}

impl<P: EventPublisher + ?Sized> EventPublisher for &mut P {
    fn publish(&mut self, event: &SalesInvoiceEvent) {
        (**self).publish(event)
    }
}
