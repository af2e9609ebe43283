// CSV import commands: shipments, expenses, template

use std::path::Path;

use freightbook_io::csv as fbk_csv;
use freightbook_store::schema::CategoryScope;
use freightbook_store::{expenses, shipments, BatchOutcome};

use crate::exit_codes::EXIT_PARTIAL_IMPORT;
use crate::CliError;

fn report_row_errors(errors: &[fbk_csv::RowError]) {
    for e in errors {
        eprintln!("  line {}: {}", e.line, e.message);
    }
}

/// Exit-code shaping shared by the bulk importers. Everything rejected
/// is an error; a mixed result is a partial import.
fn finish_import(label: &str, rejected: usize, outcome: &BatchOutcome) -> Result<(), CliError> {
    let failed = rejected + outcome.failures.len();
    eprintln!(
        "{label}: {} written, {} rejected",
        outcome.succeeded, failed
    );
    if failed == 0 {
        return Ok(());
    }
    if outcome.succeeded == 0 {
        return Err(CliError::error(format!("no {label} rows imported")));
    }
    Err(CliError {
        code: EXIT_PARTIAL_IMPORT,
        message: format!("{failed} {label} rows rejected; the rest are committed"),
        hint: Some("fix the listed rows and re-import; existing rows are upserted by key".into()),
    })
}

pub fn cmd_import_shipments(db: &Path, file: &Path) -> Result<(), CliError> {
    let import = fbk_csv::import_shipments(file)
        .map_err(|e| CliError::error(format!("{}: {e}", file.display())))?;
    report_row_errors(&import.row_errors);

    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let outcome =
        shipments::bulk_upsert_shipments(&conn, &import.records).map_err(CliError::store)?;
    for f in &outcome.failures {
        eprintln!("  {}: {}", f.key, f.reason);
    }
    finish_import("shipment", import.row_errors.len(), &outcome)
}

pub fn cmd_import_expenses(db: &Path, file: &Path) -> Result<(), CliError> {
    let import = fbk_csv::import_branch_expenses(file)
        .map_err(|e| CliError::error(format!("{}: {e}", file.display())))?;
    report_row_errors(&import.row_errors);

    let mut conn = freightbook_store::open(db).map_err(CliError::store)?;
    let outcome = expenses::bulk_upsert_branch_expenses(&mut conn, &import.records)
        .map_err(CliError::store)?;
    for f in &outcome.failures {
        eprintln!("  {}: {}", f.key, f.reason);
    }
    finish_import("expense", import.row_errors.len(), &outcome)
}

pub fn cmd_expense_template(db: &Path) -> Result<(), CliError> {
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let categories =
        expenses::list_expense_categories(&conn, CategoryScope::Branch).map_err(CliError::store)?;
    print!("{}", fbk_csv::expense_template(&categories));
    Ok(())
}
