//! `freightbook-io` — manifest CSV import and Excel report export.
//!
//! Import is lenient where the data is dirty (amounts, dates, package
//! counts) and strict where identity is at stake (CN number, manifest
//! number, sales type). Export is a presentation snapshot, not a
//! round-trip format.

pub mod csv;
pub mod xlsx;

pub use crate::csv::{ExpenseImport, RowError, ShipmentImport};
