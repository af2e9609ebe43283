//! `freightbook-reports` — Reconciliation and P&L report pipeline.
//!
//! Pure pipeline crate: receives pre-filtered record sets, returns report
//! tables. No storage or IO dependencies. One enrichment pass derives
//! per-row reconciliation figures; four independent builders consume it.

pub mod branch_summary;
pub mod config;
pub mod dues;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod manifest;
pub mod model;
pub mod pnl;

pub use config::ReportConfig;
pub use engine::run;
pub use error::ReportError;
pub use model::{Period, ReportInput, ReportSet, GRAND_TOTAL};
