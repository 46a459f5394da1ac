use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::repository::{EventPublisher, NoopPublisher, SalesInvoiceRepository};
use crate::core::{
    Clock, Currency, DEFAULT_QUANTITY_PRECISION, Discount, InvoiceError, InvoiceResult,
    InvoiceTotals, SalesInvoice, SalesInvoiceBuilder, SalesInvoiceId, SystemClock,
};

/// Command: create a draft sales invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSalesInvoice {
    pub customer_id: u64,
    /// Defaults to the service clock's current date.
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    pub currency: Currency,
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    #[serde(default = "default_quantity_precision")]
    pub quantity_precision: u32,
}

fn default_quantity_precision() -> u32 {
    DEFAULT_QUANTITY_PRECISION
}

impl CreateSalesInvoice {
    /// Draft in the ledger currency, dated by the service clock.
    pub fn in_ledger_currency(customer_id: u64) -> Self {
        Self {
            customer_id,
            invoice_date: None,
            currency: Currency::LEDGER,
            exchange_rate: None,
            quantity_precision: DEFAULT_QUANTITY_PRECISION,
        }
    }
}

/// Command: add a line to a draft invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub product_id: u64,
    pub description: String,
    pub quantity: Decimal,
    pub tariff: Decimal,
    /// Discount percentage; `None` means no discount.
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub vat_code: String,
}

/// Runs invoice commands against a repository, publishing recorded events.
///
/// Each mutating command loads the invoice, applies the change, saves it and
/// then publishes the events it recorded, in order. A rejected command saves
/// and publishes nothing.
pub struct InvoiceService<R, P = NoopPublisher, C = SystemClock> {
    repository: R,
    publisher: P,
    clock: C,
}

impl<R, P, C> InvoiceService<R, P, C>
where
    R: SalesInvoiceRepository,
    P: EventPublisher,
    C: Clock,
{
    pub fn new(repository: R, publisher: P, clock: C) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_parts(self) -> (R, P) {
        (self.repository, self.publisher)
    }

    pub fn create_draft(&mut self, command: CreateSalesInvoice) -> InvoiceResult<SalesInvoiceId> {
        let id = self.repository.next_identity();
        let invoice_date = command
            .invoice_date
            .unwrap_or_else(|| self.clock.today());

        let invoice = SalesInvoiceBuilder::new(command.customer_id, invoice_date)
            .currency(command.currency)
            .maybe_exchange_rate(command.exchange_rate)
            .quantity_precision(command.quantity_precision)
            .build(id)
            .inspect_err(|err| {
                tracing::warn!(customer_id = command.customer_id, error = %err, "create_draft rejected");
            })?;

        self.commit(invoice)?;
        tracing::info!(invoice_id = %id, customer_id = command.customer_id, %invoice_date, "draft invoice created");
        Ok(id)
    }

    pub fn add_line(&mut self, id: &SalesInvoiceId, line: NewLine) -> InvoiceResult<()> {
        let NewLine {
            product_id,
            description,
            quantity,
            tariff,
            discount,
            vat_code,
        } = line;
        let discount = Discount::from_optional(discount)?;
        self.mutate(id, "add_line", |invoice| {
            invoice.add_line(product_id, description, quantity, tariff, discount, &vat_code)
        })
    }

    pub fn finalize(&mut self, id: &SalesInvoiceId) -> InvoiceResult<()> {
        self.mutate(id, "finalize", SalesInvoice::finalize)
    }

    pub fn cancel(&mut self, id: &SalesInvoiceId) -> InvoiceResult<()> {
        self.mutate(id, "cancel", SalesInvoice::cancel)
    }

    pub fn totals(&self, id: &SalesInvoiceId) -> InvoiceResult<InvoiceTotals> {
        Ok(self.load(id)?.totals())
    }

    pub fn find(&self, id: &SalesInvoiceId) -> InvoiceResult<SalesInvoice> {
        self.load(id)
    }

    fn load(&self, id: &SalesInvoiceId) -> InvoiceResult<SalesInvoice> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| InvoiceError::NotFound(id.to_string()))
    }

    fn mutate(
        &mut self,
        id: &SalesInvoiceId,
        command: &'static str,
        change: impl FnOnce(&mut SalesInvoice) -> InvoiceResult<()>,
    ) -> InvoiceResult<()> {
        let mut invoice = self.load(id)?;
        if let Err(err) = change(&mut invoice) {
            tracing::warn!(invoice_id = %id, command, error = %err, "command rejected");
            return Err(err);
        }
        self.commit(invoice)?;
        tracing::info!(invoice_id = %id, command, "command applied");
        Ok(())
    }

    fn commit(&mut self, mut invoice: SalesInvoice) -> InvoiceResult<()> {
        let events = invoice.take_recorded_events();
        self.repository.save(invoice)?;
        for event in &events {
            tracing::debug!(invoice_id = %event.invoice_id(), event = event.name(), "publishing event");
            self.publisher.publish(event);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::core::FixedClock;

    #[derive(Default)]
    struct MapRepository(HashMap<SalesInvoiceId, SalesInvoice>);

    impl SalesInvoiceRepository for MapRepository {
        fn next_identity(&self) -> SalesInvoiceId {
            SalesInvoiceId::generate()
        }

        fn save(&mut self, invoice: SalesInvoice) -> InvoiceResult<()> {
            self.0.insert(invoice.id(), invoice);
            Ok(())
        }

        fn find_by_id(&self, id: &SalesInvoiceId) -> InvoiceResult<Option<SalesInvoice>> {
            Ok(self.0.get(id).cloned())
        }
    }

    fn service() -> InvoiceService<MapRepository, NoopPublisher, FixedClock> {
        let today = NaiveDate::from_ymd_opt(2018, 12, 31).unwrap();
        InvoiceService::new(MapRepository::default(), NoopPublisher, FixedClock(today))
    }

    #[test]
    fn invoice_date_defaults_to_clock() {
        let mut service = service();
        let id = service
            .create_draft(CreateSalesInvoice::in_ledger_currency(1001))
            .unwrap();
        let invoice = service.find(&id).unwrap();
        assert_eq!(
            invoice.invoice_date(),
            NaiveDate::from_ymd_opt(2018, 12, 31).unwrap()
        );
    }

    #[test]
    fn command_deserializes_with_defaults() {
        let command: CreateSalesInvoice =
            serde_json::from_str(r#"{"customer_id": 7, "currency": "USD", "exchange_rate": "1.3"}"#)
                .unwrap();
        assert_eq!(command.quantity_precision, DEFAULT_QUANTITY_PRECISION);
        assert_eq!(command.invoice_date, None);
        assert_eq!(command.currency, Currency::Usd);
    }

    #[test]
    fn unknown_invoice_is_not_found() {
        let mut service = service();
        let id = SalesInvoiceId::generate();
        assert_eq!(
            service.finalize(&id),
            Err(InvoiceError::NotFound(id.to_string()))
        );
    }

    #[test]
    fn invalid_discount_is_rejected_before_loading() {
        let mut service = service();
        let line = NewLine {
            product_id: 1,
            description: "Widget".into(),
            quantity: Decimal::ONE,
            tariff: Decimal::TEN,
            discount: Some(Decimal::NEGATIVE_ONE),
            vat_code: "S".into(),
        };
        assert_eq!(
            service.add_line(&SalesInvoiceId::generate(), line),
            Err(InvoiceError::InvalidPercentage(Decimal::NEGATIVE_ONE))
        );
    }
}
