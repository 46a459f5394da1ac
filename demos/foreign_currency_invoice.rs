//! Runs a USD invoice through the service and prints its totals.
//!
//! Run with: `RUST_LOG=factuur=debug cargo run --example foreign_currency_invoice`

use std::collections::HashMap;

use factuur::core::*;
use factuur::service::*;
use rust_decimal_macros::dec;

#[derive(Default)]
struct InMemoryRepository(HashMap<SalesInvoiceId, SalesInvoice>);

impl SalesInvoiceRepository for InMemoryRepository {
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

struct StdoutPublisher;

impl EventPublisher for StdoutPublisher {
    fn publish(&mut self, event: &SalesInvoiceEvent) {
        println!("  event: {} ({})", event.name(), event.invoice_id());
    }
}

fn main() -> Result<(), InvoiceError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut service = InvoiceService::new(
        InMemoryRepository::default(),
        StdoutPublisher,
        SystemClock,
    );

    let id = service.create_draft(CreateSalesInvoice {
        customer_id: 1001,
        invoice_date: None,
        currency: Currency::Usd,
        exchange_rate: Some(dec!(1.3)),
        quantity_precision: 3,
    })?;

    service.add_line(
        &id,
        NewLine {
            product_id: 1,
            description: "Product with a 10% discount and standard VAT applied".into(),
            quantity: dec!(2.0),
            tariff: dec!(15.0),
            discount: Some(dec!(10)),
            vat_code: "S".into(),
        },
    )?;
    service.add_line(
        &id,
        NewLine {
            product_id: 2,
            description: "Product with no discount and low VAT applied".into(),
            quantity: dec!(3.123456),
            tariff: dec!(12.50),
            discount: None,
            vat_code: "L".into(),
        },
    )?;

    let duplicate = NewLine {
        product_id: 1,
        description: "Same product again".into(),
        quantity: dec!(1),
        tariff: dec!(1),
        discount: None,
        vat_code: "S".into(),
    };
    if let Err(e) = service.add_line(&id, duplicate) {
        println!("  rejected: {e}");
    }

    let invoice = service.find(&id)?;
    println!("Invoice:  {}", invoice.id());
    println!("Date:     {}", invoice.invoice_date());
    println!("Currency: {}", invoice.currency());
    println!("---");
    for line in invoice.lines() {
        println!(
            "  {} x {} @ {} = {} (discount {}, VAT {} at {}%)",
            line.rounded_quantity(),
            line.description(),
            line.tariff(),
            line.net_amount(),
            line.discount_amount(),
            line.vat_amount(),
            line.vat_rate().percentage()
        );
    }
    println!("---");
    println!("{}", service.totals(&id)?);

    service.finalize(&id)?;
    if let Err(e) = service.cancel(&id) {
        println!("  rejected: {e}");
    }
    Ok(())
}
