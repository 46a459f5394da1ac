//! Sales invoice domain model.
//!
//! Money arithmetic, discounts, date-dependent VAT rates, invoice lines and
//! the [`SalesInvoice`] aggregate with its draft / finalized / cancelled
//! lifecycle.

mod amount;
mod builder;
mod clock;
mod currency;
mod discount;
mod error;
mod events;
mod id;
mod invoice;
mod line;
pub mod vat;

pub use amount::*;
pub use builder::*;
pub use clock::*;
pub use currency::*;
pub use discount::*;
pub use error::*;
pub use events::*;
pub use id::*;
pub use invoice::*;
pub use line::*;
pub use vat::{VatCode, VatRate, low_rate_change_date};
