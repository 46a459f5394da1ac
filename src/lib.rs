//! # factuur
//!
//! Sales invoice totals with date-dependent VAT, percentage discounts and
//! conversion to a fixed ledger currency, plus the small draft / finalized /
//! cancelled lifecycle that gates changes to an invoice.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Rounding is commercial (half away from zero) and happens at fixed points:
//! per line amount, discount, net and VAT, and once more on invoice totals.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use factuur::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = SalesInvoiceBuilder::new(1001, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .currency(Currency::Usd)
//!     .exchange_rate(dec!(1.3))
//!     .quantity_precision(3)
//!     .build(SalesInvoiceId::generate())
//!     .unwrap();
//!
//! invoice
//!     .add_line(1, "Discounted product", dec!(2.0), dec!(15.0), Discount::new(dec!(10)).unwrap(), "S")
//!     .unwrap();
//! invoice
//!     .add_line(2, "Low VAT product", dec!(3.123456), dec!(12.50), Discount::none(), "L")
//!     .unwrap();
//!
//! assert_eq!(invoice.total_net_amount().value(), dec!(66.04));
//! assert_eq!(invoice.total_net_amount_in_ledger_currency().value(), dec!(50.80));
//! assert_eq!(invoice.total_vat_amount().value(), dec!(9.18));
//! assert_eq!(invoice.total_vat_amount_in_ledger_currency().value(), dec!(7.06));
//!
//! invoice.finalize().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Money, discounts, VAT rates, lines, the invoice aggregate |
//! | `service` (default) | Application service, repository and event publisher traits |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "service")]
pub mod service;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
