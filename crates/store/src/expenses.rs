use std::collections::BTreeMap;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use freightbook_core::{BranchExpenseRecord, HoExpenseRecord};

use crate::batch::BatchOutcome;
use crate::error::StoreError;
use crate::schema::{date_from_sql, date_to_sql, CategoryScope};

/// Register an expense category. The raw name is normalized to the form
/// stored in item rows: trimmed, lower-cased, spaces collapsed to
/// underscores. Returns the normalized name.
pub fn add_expense_category(
    conn: &Connection,
    scope: CategoryScope,
    raw: &str,
) -> Result<String, StoreError> {
    let name = normalize_category(raw);
    if name.is_empty() {
        return Err(StoreError::InvalidCategory(format!(
            "'{raw}' normalizes to an empty name"
        )));
    }
    conn.execute(
        "INSERT OR IGNORE INTO expense_categories (scope, name) VALUES (?1, ?2)",
        params![scope.as_str(), name],
    )?;
    Ok(name)
}

pub fn list_expense_categories(
    conn: &Connection,
    scope: CategoryScope,
) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT name FROM expense_categories WHERE scope = ?1 ORDER BY name")?;
    let mut rows = stmt.query(params![scope.as_str()])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row.get(0)?);
    }
    Ok(out)
}

fn normalize_category(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// ---------------------------------------------------------------------------
// Branch expenses
// ---------------------------------------------------------------------------

/// Fetch branch expense sheets for manifests dated inside the inclusive
/// range. Registered categories with no item row read as 0, so every
/// sheet carries the full current category set.
pub fn fetch_branch_expenses(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<BranchExpenseRecord>, StoreError> {
    let registered = list_expense_categories(conn, CategoryScope::Branch)?;

    let mut stmt = conn.prepare(
        "SELECT manifest_no, manifest_date, origin, destination, remarks \
         FROM branch_expenses \
         WHERE manifest_date >= ?1 AND manifest_date <= ?2 \
         ORDER BY manifest_date, manifest_no",
    )?;
    let mut rows = stmt.query(params![date_to_sql(start), date_to_sql(end)])?;

    let mut out: Vec<BranchExpenseRecord> = Vec::new();
    while let Some(row) = rows.next()? {
        let manifest_date: String = row.get(1)?;
        let mut categories: BTreeMap<String, i64> = BTreeMap::new();
        for name in &registered {
            categories.insert(name.clone(), 0);
        }
        out.push(BranchExpenseRecord {
            manifest_no: row.get(0)?,
            manifest_date: date_from_sql("manifest_date", &manifest_date)?,
            origin: row.get(2)?,
            destination: row.get(3)?,
            categories,
            remarks: row.get(4)?,
        });
    }

    let mut item_stmt = conn.prepare(
        "SELECT category, amount FROM branch_expense_items WHERE manifest_no = ?1",
    )?;
    for record in &mut out {
        let mut items = item_stmt.query(params![record.manifest_no])?;
        while let Some(item) = items.next()? {
            let category: String = item.get(0)?;
            let amount: i64 = item.get(1)?;
            record.categories.insert(category, amount);
        }
    }

    log::debug!("fetched {} branch expense sheets", out.len());
    Ok(out)
}

/// Write one branch expense sheet: header plus items in one transaction.
/// New categories are registered as a side effect so later fetches and
/// templates include them.
pub fn upsert_branch_expense(
    conn: &mut Connection,
    record: &BranchExpenseRecord,
) -> Result<(), StoreError> {
    if record.manifest_no.trim().is_empty() {
        return Err(StoreError::EmptyKey("manifest_no"));
    }
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO branch_expenses (manifest_no, manifest_date, origin, destination, remarks) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT (manifest_no) DO UPDATE SET \
             manifest_date = excluded.manifest_date, \
             origin = excluded.origin, \
             destination = excluded.destination, \
             remarks = excluded.remarks",
        params![
            record.manifest_no,
            date_to_sql(record.manifest_date),
            record.origin,
            record.destination,
            record.remarks,
        ],
    )?;
    tx.execute(
        "DELETE FROM branch_expense_items WHERE manifest_no = ?1",
        params![record.manifest_no],
    )?;
    for (raw, amount) in &record.categories {
        let name = normalize_category(raw);
        if name.is_empty() {
            continue;
        }
        tx.execute(
            "INSERT OR IGNORE INTO expense_categories (scope, name) VALUES ('branch', ?1)",
            params![name],
        )?;
        tx.execute(
            "INSERT INTO branch_expense_items (manifest_no, category, amount) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (manifest_no, category) DO UPDATE SET amount = excluded.amount",
            params![record.manifest_no, name, (*amount).max(0)],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Bulk expense import: each sheet is its own transaction; a failed sheet
/// is recorded and the rest continue.
pub fn bulk_upsert_branch_expenses(
    conn: &mut Connection,
    records: &[BranchExpenseRecord],
) -> Result<BatchOutcome, StoreError> {
    let mut outcome = BatchOutcome::default();
    for record in records {
        match upsert_branch_expense(conn, record) {
            Ok(()) => outcome.record_ok(),
            Err(e) => outcome.record_failure(&record.manifest_no, e.to_string()),
        }
    }
    log::info!("branch expense import: {outcome}");
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Head-office expenses
// ---------------------------------------------------------------------------

/// Fetch HO expense entries dated inside the inclusive range.
pub fn fetch_ho_expenses(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<HoExpenseRecord>, StoreError> {
    let registered = list_expense_categories(conn, CategoryScope::Ho)?;

    let mut stmt = conn.prepare(
        "SELECT entry_date, remarks FROM ho_expenses \
         WHERE entry_date >= ?1 AND entry_date <= ?2 \
         ORDER BY entry_date",
    )?;
    let mut rows = stmt.query(params![date_to_sql(start), date_to_sql(end)])?;

    let mut out: Vec<HoExpenseRecord> = Vec::new();
    while let Some(row) = rows.next()? {
        let entry_date: String = row.get(0)?;
        let mut categories: BTreeMap<String, i64> = BTreeMap::new();
        for name in &registered {
            categories.insert(name.clone(), 0);
        }
        out.push(HoExpenseRecord {
            entry_date: date_from_sql("entry_date", &entry_date)?,
            categories,
            remarks: row.get(1)?,
        });
    }

    let mut item_stmt =
        conn.prepare("SELECT category, amount FROM ho_expense_items WHERE entry_date = ?1")?;
    for record in &mut out {
        let mut items = item_stmt.query(params![date_to_sql(record.entry_date)])?;
        while let Some(item) = items.next()? {
            let category: String = item.get(0)?;
            let amount: i64 = item.get(1)?;
            record.categories.insert(category, amount);
        }
    }

    Ok(out)
}

/// Make sure a day's entry exists so the register shows one editable row
/// per date. Existing entries are untouched.
pub fn ensure_ho_entry(conn: &Connection, date: NaiveDate) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO ho_expenses (entry_date, remarks) VALUES (?1, '')",
        params![date_to_sql(date)],
    )?;
    Ok(())
}

/// Write one day's HO expense entry, replacing its items.
pub fn update_ho_expense(
    conn: &mut Connection,
    record: &HoExpenseRecord,
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let key = date_to_sql(record.entry_date);
    tx.execute(
        "INSERT INTO ho_expenses (entry_date, remarks) VALUES (?1, ?2) \
         ON CONFLICT (entry_date) DO UPDATE SET remarks = excluded.remarks",
        params![key, record.remarks],
    )?;
    tx.execute(
        "DELETE FROM ho_expense_items WHERE entry_date = ?1",
        params![key],
    )?;
    for (raw, amount) in &record.categories {
        let name = normalize_category(raw);
        if name.is_empty() {
            continue;
        }
        tx.execute(
            "INSERT OR IGNORE INTO expense_categories (scope, name) VALUES ('ho', ?1)",
            params![name],
        )?;
        tx.execute(
            "INSERT INTO ho_expense_items (entry_date, category, amount) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT (entry_date, category) DO UPDATE SET amount = excluded.amount",
            params![key, name, (*amount).max(0)],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Set one category amount on a day's entry, leaving the other items
/// alone. The day row is created when missing and the category is
/// registered as a side effect. Returns the normalized category name.
pub fn set_ho_amount(
    conn: &Connection,
    date: NaiveDate,
    category: &str,
    amount: i64,
    remarks: Option<&str>,
) -> Result<String, StoreError> {
    let name = add_expense_category(conn, CategoryScope::Ho, category)?;
    ensure_ho_entry(conn, date)?;
    conn.execute(
        "INSERT INTO ho_expense_items (entry_date, category, amount) \
         VALUES (?1, ?2, ?3) \
         ON CONFLICT (entry_date, category) DO UPDATE SET amount = excluded.amount",
        params![date_to_sql(date), name, amount.max(0)],
    )?;
    if let Some(remarks) = remarks {
        conn.execute(
            "UPDATE ho_expenses SET remarks = ?2 WHERE entry_date = ?1",
            params![date_to_sql(date), remarks],
        )?;
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_in_memory;

    fn sheet(manifest_no: &str, day: u32) -> BranchExpenseRecord {
        let mut categories = BTreeMap::new();
        categories.insert("rent".into(), 10_000);
        categories.insert("vehicle".into(), 5_000);
        BranchExpenseRecord {
            manifest_no: manifest_no.into(),
            manifest_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            origin: "PATNA".into(),
            destination: "RAXAUL".into(),
            categories,
            remarks: String::new(),
        }
    }

    #[test]
    fn category_normalization() {
        let conn = open_in_memory().unwrap();
        let name = add_expense_category(&conn, CategoryScope::Branch, "  Toll  Tax ").unwrap();
        assert_eq!(name, "toll_tax");
        // Re-adding is a no-op
        add_expense_category(&conn, CategoryScope::Branch, "toll tax").unwrap();
        assert_eq!(
            list_expense_categories(&conn, CategoryScope::Branch).unwrap(),
            vec!["toll_tax".to_string()]
        );
        assert!(add_expense_category(&conn, CategoryScope::Branch, "   ").is_err());
    }

    #[test]
    fn branch_sheet_round_trip() {
        let mut conn = open_in_memory().unwrap();
        upsert_branch_expense(&mut conn, &sheet("M1", 5)).unwrap();

        let rows = fetch_branch_expenses(
            &conn,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category("rent"), 10_000);
        assert_eq!(rows[0].total(), 15_000);
    }

    #[test]
    fn registered_categories_default_to_zero() {
        let mut conn = open_in_memory().unwrap();
        upsert_branch_expense(&mut conn, &sheet("M1", 5)).unwrap();
        // Registered after the sheet was written
        add_expense_category(&conn, CategoryScope::Branch, "toll tax").unwrap();

        let rows = fetch_branch_expenses(
            &conn,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(rows[0].category("toll_tax"), 0);
        assert_eq!(rows[0].categories.len(), 3);
    }

    #[test]
    fn upsert_replaces_items() {
        let mut conn = open_in_memory().unwrap();
        upsert_branch_expense(&mut conn, &sheet("M1", 5)).unwrap();

        let mut edited = sheet("M1", 5);
        edited.categories.remove("vehicle");
        edited.categories.insert("thela".into(), 700);
        upsert_branch_expense(&mut conn, &edited).unwrap();

        let rows = fetch_branch_expenses(
            &conn,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap();
        // vehicle is still a registered category, now reading 0
        assert_eq!(rows[0].category("vehicle"), 0);
        assert_eq!(rows[0].category("thela"), 700);
    }

    #[test]
    fn bulk_expense_import_is_partial() {
        let mut conn = open_in_memory().unwrap();
        let mut bad = sheet("", 5);
        bad.manifest_no = String::new();
        let outcome =
            bulk_upsert_branch_expenses(&mut conn, &[sheet("M1", 5), bad, sheet("M2", 6)])
                .unwrap();
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn ho_register_round_trip() {
        let mut conn = open_in_memory().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        ensure_ho_entry(&conn, day).unwrap();

        let mut categories = BTreeMap::new();
        categories.insert("salary".into(), 300_000);
        categories.insert("electricity".into(), 12_000);
        update_ho_expense(
            &mut conn,
            &HoExpenseRecord {
                entry_date: day,
                categories,
                remarks: "january payroll".into(),
            },
        )
        .unwrap();

        let rows = fetch_ho_expenses(
            &conn,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total(), 312_000);
        assert_eq!(rows[0].remarks, "january payroll");
    }

    #[test]
    fn set_amount_leaves_other_categories_alone() {
        let conn = open_in_memory().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        set_ho_amount(&conn, day, "Rent", 400_000, None).unwrap();
        set_ho_amount(&conn, day, "electricity", 60_000, Some("jan bill")).unwrap();
        // Correcting one figure keeps the other
        set_ho_amount(&conn, day, "rent", 450_000, None).unwrap();

        let rows = fetch_ho_expenses(&conn, day, day).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].categories["rent"], 450_000);
        assert_eq!(rows[0].categories["electricity"], 60_000);
        assert_eq!(rows[0].total(), 510_000);
        assert_eq!(rows[0].remarks, "jan bill");

        assert!(set_ho_amount(&conn, day, "   ", 100, None).is_err());
    }

    #[test]
    fn ensure_entry_preserves_existing() {
        let mut conn = open_in_memory().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut categories = BTreeMap::new();
        categories.insert("salary".into(), 300_000);
        update_ho_expense(
            &mut conn,
            &HoExpenseRecord {
                entry_date: day,
                categories,
                remarks: "keep me".into(),
            },
        )
        .unwrap();
        ensure_ho_entry(&conn, day).unwrap();

        let rows = fetch_ho_expenses(&conn, day, day).unwrap();
        assert_eq!(rows[0].remarks, "keep me");
        assert_eq!(rows[0].total(), 300_000);
    }
}
