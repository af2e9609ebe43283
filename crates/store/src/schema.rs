// Ledger schema. Dates are ISO-8601 TEXT; amounts are INTEGER minor
// units. Expense categories live in child item tables plus a registry,
// so the category set grows without runtime DDL.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS shipments (
    cn_no TEXT PRIMARY KEY,
    manifest_no TEXT NOT NULL,
    manifest_date TEXT NOT NULL,
    cn_date TEXT,
    consignor TEXT NOT NULL DEFAULT '',
    consignee TEXT NOT NULL DEFAULT '',
    payment_liability TEXT NOT NULL DEFAULT '',
    pkgs INTEGER NOT NULL DEFAULT 0,
    pkg_type TEXT NOT NULL DEFAULT '',
    actual_wt TEXT NOT NULL DEFAULT '',
    invoice_no TEXT NOT NULL DEFAULT '',
    origin TEXT NOT NULL DEFAULT '',
    destination TEXT NOT NULL DEFAULT '',
    sales_type TEXT NOT NULL,
    sales_amount INTEGER NOT NULL DEFAULT 0,
    manual_figures INTEGER NOT NULL DEFAULT 0,
    remarks TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS idx_shipments_manifest_date ON shipments(manifest_date);

CREATE TABLE IF NOT EXISTS branch_expenses (
    manifest_no TEXT PRIMARY KEY,
    manifest_date TEXT NOT NULL,
    origin TEXT NOT NULL DEFAULT '',
    destination TEXT NOT NULL DEFAULT '',
    remarks TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS branch_expense_items (
    manifest_no TEXT NOT NULL,
    category TEXT NOT NULL,
    amount INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (manifest_no, category)
);

CREATE TABLE IF NOT EXISTS ho_expenses (
    entry_date TEXT PRIMARY KEY,
    remarks TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS ho_expense_items (
    entry_date TEXT NOT NULL,
    category TEXT NOT NULL,
    amount INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (entry_date, category)
);

CREATE TABLE IF NOT EXISTS branch_mappings (
    child_branch TEXT PRIMARY KEY,
    parent_branch TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expense_categories (
    scope TEXT NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (scope, name)
);
"#;

/// Idempotent schema creation.
pub fn init(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Which expense register a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    Branch,
    Ho,
}

impl CategoryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Ho => "ho",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "branch" => Some(Self::Branch),
            "ho" | "head_office" | "head-office" => Some(Self::Ho),
            _ => None,
        }
    }
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn date_from_sql(column: &str, value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| StoreError::DateParse {
        column: column.into(),
        value: value.into(),
    })
}
