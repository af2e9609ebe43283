//! `freightbook-core` — Domain records for the freight ledger.
//!
//! Pure data crate: shipment, expense, and mapping records plus the
//! per-row reconciliation derivation. No storage or IO dependencies.

pub mod amount;
pub mod record;
pub mod reconcile;

pub use amount::{format_major, parse_amount, to_major_f64};
pub use record::{
    BranchExpenseRecord, BranchMapping, HoExpenseRecord, SalesType, ShipmentRecord,
};
pub use reconcile::{reconcile, Reconciliation};
