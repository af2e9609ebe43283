//! `freightbook-store` — SQLite gateway for the freight ledger.
//!
//! Every statement is parameterized; no SQL is assembled from user input.
//! Each call is atomic on its own, but calls do not compose into larger
//! transactions: bulk operations write row by row and report a partial
//! outcome instead of rolling back.

pub mod batch;
pub mod error;
pub mod expenses;
pub mod mappings;
pub mod schema;
pub mod shipments;

use std::path::Path;

use rusqlite::Connection;

pub use batch::{BatchFailure, BatchOutcome};
pub use error::StoreError;

/// Open (or create) a ledger database and ensure the schema exists.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    schema::init(&conn)?;
    Ok(conn)
}

/// In-memory database with schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    schema::init(&conn)?;
    Ok(conn)
}
