use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use freightbook_core::{SalesType, ShipmentRecord};

use crate::batch::BatchOutcome;
use crate::error::StoreError;
use crate::schema::{date_from_sql, date_to_sql};

const SELECT_COLUMNS: &str = "cn_no, manifest_no, manifest_date, cn_date, consignor, consignee, \
     payment_liability, pkgs, pkg_type, actual_wt, invoice_no, origin, destination, \
     sales_type, sales_amount, manual_figures, remarks";

fn read_shipment(row: &Row<'_>) -> Result<ShipmentRecord, StoreError> {
    let manifest_date: String = row.get(2)?;
    let cn_date: Option<String> = row.get(3)?;
    let sales_type_raw: String = row.get(13)?;

    Ok(ShipmentRecord {
        cn_no: row.get(0)?,
        manifest_no: row.get(1)?,
        manifest_date: date_from_sql("manifest_date", &manifest_date)?,
        // A bad cn_date degrades to null rather than failing the fetch
        cn_date: cn_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        consignor: row.get(4)?,
        consignee: row.get(5)?,
        payment_liability: row.get(6)?,
        pkgs: row.get(7)?,
        pkg_type: row.get(8)?,
        actual_wt: row.get(9)?,
        invoice_no: row.get(10)?,
        origin: row.get(11)?,
        destination: row.get(12)?,
        // Stored labels are trusted, but fall back to TO PAY if an old
        // row carries an unrecognized spelling
        sales_type: SalesType::parse(&sales_type_raw).unwrap_or(SalesType::ToPay),
        sales_amount: row.get(14)?,
        manual_figures: row.get(15)?,
        remarks: row.get(16)?,
    })
}

/// Fetch shipments with `manifest_date` inside the inclusive range.
pub fn fetch_shipments(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ShipmentRecord>, StoreError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM shipments \
         WHERE manifest_date >= ?1 AND manifest_date <= ?2 \
         ORDER BY manifest_date, manifest_no, cn_no"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![date_to_sql(start), date_to_sql(end)])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(read_shipment(row)?);
    }
    log::debug!("fetched {} shipments for {start}..={end}", out.len());
    Ok(out)
}

/// Free-text search over key and name fields. The needle is bound as a
/// LIKE parameter, never spliced into the statement.
pub fn search_shipments(
    conn: &Connection,
    needle: &str,
) -> Result<Vec<ShipmentRecord>, StoreError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM shipments \
         WHERE cn_no LIKE ?1 OR manifest_no LIKE ?1 OR consignor LIKE ?1 \
            OR consignee LIKE ?1 OR payment_liability LIKE ?1 \
         ORDER BY manifest_date, manifest_no, cn_no"
    );
    let pattern = format!("%{}%", needle.trim());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![pattern])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(read_shipment(row)?);
    }
    Ok(out)
}

/// Insert or overwrite one shipment, keyed by CN number.
pub fn upsert_shipment(conn: &Connection, record: &ShipmentRecord) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO shipments (cn_no, manifest_no, manifest_date, cn_date, consignor, \
             consignee, payment_liability, pkgs, pkg_type, actual_wt, invoice_no, origin, \
             destination, sales_type, sales_amount, manual_figures, remarks) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17) \
         ON CONFLICT (cn_no) DO UPDATE SET \
             manifest_no = excluded.manifest_no, \
             manifest_date = excluded.manifest_date, \
             cn_date = excluded.cn_date, \
             consignor = excluded.consignor, \
             consignee = excluded.consignee, \
             payment_liability = excluded.payment_liability, \
             pkgs = excluded.pkgs, \
             pkg_type = excluded.pkg_type, \
             actual_wt = excluded.actual_wt, \
             invoice_no = excluded.invoice_no, \
             origin = excluded.origin, \
             destination = excluded.destination, \
             sales_type = excluded.sales_type, \
             sales_amount = excluded.sales_amount, \
             manual_figures = excluded.manual_figures, \
             remarks = excluded.remarks",
        params![
            record.cn_no,
            record.manifest_no,
            date_to_sql(record.manifest_date),
            record.cn_date.map(date_to_sql),
            record.consignor,
            record.consignee,
            record.payment_liability,
            record.pkgs,
            record.pkg_type,
            record.actual_wt,
            record.invoice_no,
            record.origin,
            record.destination,
            record.sales_type.label(),
            record.sales_amount.max(0),
            record.manual_figures.max(0),
            record.remarks,
        ],
    )?;
    Ok(())
}

/// Bulk manifest import: one write per row, no rollback. A failed row is
/// recorded and the batch continues; prior rows stay committed.
pub fn bulk_upsert_shipments(
    conn: &Connection,
    records: &[ShipmentRecord],
) -> Result<BatchOutcome, StoreError> {
    let mut outcome = BatchOutcome::default();
    for record in records {
        if record.cn_no.trim().is_empty() {
            outcome.record_failure("(blank)", "cn_no is required");
            continue;
        }
        if record.manifest_no.trim().is_empty() {
            outcome.record_failure(&record.cn_no, "manifest_no is required");
            continue;
        }
        match upsert_shipment(conn, record) {
            Ok(()) => outcome.record_ok(),
            Err(e) => outcome.record_failure(&record.cn_no, e.to_string()),
        }
    }
    log::info!("shipment import: {outcome}");
    Ok(outcome)
}

/// One reconciliation edit against an existing shipment row.
#[derive(Debug, Clone)]
pub struct ReconUpdate {
    pub cn_no: String,
    /// New received amount, minor units (clamped to >= 0).
    pub manual_figures: i64,
    /// Corrected billed amount, when the edit includes one.
    pub sales_amount: Option<i64>,
    pub remarks: Option<String>,
}

/// Apply one reconciliation edit. Returns false when the CN is unknown.
pub fn update_reconciliation(conn: &Connection, update: &ReconUpdate) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE shipments SET \
             manual_figures = ?2, \
             sales_amount = COALESCE(?3, sales_amount), \
             remarks = COALESCE(?4, remarks) \
         WHERE cn_no = ?1",
        params![
            update.cn_no,
            update.manual_figures.max(0),
            update.sales_amount.map(|a| a.max(0)),
            update.remarks,
        ],
    )?;
    Ok(changed > 0)
}

/// Row-by-row reconciliation save (the edit-table workflow). Unknown CNs
/// count as failures; everything already written stays written.
pub fn bulk_update_reconciliation(
    conn: &Connection,
    updates: &[ReconUpdate],
) -> Result<BatchOutcome, StoreError> {
    let mut outcome = BatchOutcome::default();
    for update in updates {
        match update_reconciliation(conn, update) {
            Ok(true) => outcome.record_ok(),
            Ok(false) => outcome.record_failure(&update.cn_no, "no such CN"),
            Err(e) => outcome.record_failure(&update.cn_no, e.to_string()),
        }
    }
    log::info!("reconciliation save: {outcome}");
    Ok(outcome)
}

/// Administrative delete. Returns false when the CN is unknown.
pub fn delete_shipment(conn: &Connection, cn_no: &str) -> Result<bool, StoreError> {
    let changed = conn.execute("DELETE FROM shipments WHERE cn_no = ?1", params![cn_no])?;
    Ok(changed > 0)
}
