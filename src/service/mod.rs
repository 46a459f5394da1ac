//! Application layer around the [`SalesInvoice`](crate::core::SalesInvoice)
//! aggregate.
//!
//! The crate does not store invoices or deliver events itself. Callers plug
//! in a [`SalesInvoiceRepository`] and an [`EventPublisher`]; the
//! [`InvoiceService`] runs each command as load, mutate, save, publish.

mod invoice_service;
mod repository;

pub use invoice_service::*;
pub use repository::*;
