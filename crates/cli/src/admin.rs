// init, recon, search, mapping, and category commands

use std::path::Path;

use freightbook_core::{format_major, parse_amount};
use freightbook_store::schema::CategoryScope;
use freightbook_store::shipments::ReconUpdate;
use freightbook_store::{expenses, mappings, shipments};

use crate::CliError;

pub fn cmd_init(db: &Path) -> Result<(), CliError> {
    freightbook_store::open(db).map_err(CliError::store)?;
    eprintln!("initialized ledger at {}", db.display());
    Ok(())
}

/// Strict rupee parse for command arguments. The lenient zero-default
/// used for file imports would silently turn a typo into 0 here.
pub fn parse_rupees(raw: &str) -> Result<i64, CliError> {
    let minor = parse_amount(raw);
    // A written-out zero must contain at least one digit; "" and "₹"
    // are not amounts.
    let looks_zero = raw.chars().any(|c| c.is_ascii_digit())
        && raw
            .trim()
            .trim_start_matches(['₹', ' '])
            .chars()
            .all(|c| matches!(c, '0' | '.' | ','));
    if minor == 0 && !looks_zero {
        return Err(
            CliError::args(format!("cannot parse amount '{raw}'"))
                .with_hint("amounts are rupees, e.g. 950 or 1,234.50"),
        );
    }
    Ok(minor)
}

pub fn cmd_recon(
    db: &Path,
    cn_no: String,
    received: String,
    sales: Option<String>,
    remarks: Option<String>,
) -> Result<(), CliError> {
    let update = ReconUpdate {
        cn_no: cn_no.clone(),
        manual_figures: parse_rupees(&received)?,
        sales_amount: sales.as_deref().map(parse_rupees).transpose()?,
        remarks,
    };

    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let found = shipments::update_reconciliation(&conn, &update).map_err(CliError::store)?;
    if !found {
        return Err(CliError::error(format!("no shipment with CN '{cn_no}'"))
            .with_hint("fbk search <cn> to look up CN numbers"));
    }
    eprintln!(
        "CN {cn_no}: received {} recorded",
        format_major(update.manual_figures)
    );
    Ok(())
}

pub fn cmd_search(db: &Path, needle: &str, json: bool) -> Result<(), CliError> {
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let rows = shipments::search_shipments(&conn, needle).map_err(CliError::store)?;

    if json {
        let out = serde_json::to_string_pretty(&rows).map_err(|e| CliError::error(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }

    if rows.is_empty() {
        eprintln!("no shipments match '{needle}'");
        return Ok(());
    }
    for s in &rows {
        println!(
            "{}  {}  {}  {} -> {}  {}  {}  received {}",
            s.cn_no,
            s.manifest_no,
            s.manifest_date.format("%d-%b-%Y"),
            s.origin,
            s.destination,
            s.sales_type.label(),
            format_major(s.sales_amount),
            format_major(s.manual_figures),
        );
    }
    eprintln!("{} shipments", rows.len());
    Ok(())
}

pub fn cmd_mapping_add(db: &Path, child: &str, parent: &str) -> Result<(), CliError> {
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    match mappings::upsert_mapping(&conn, child, parent) {
        Ok(()) => {
            eprintln!("{} now reports to {}", child.trim().to_uppercase(), parent.trim().to_uppercase());
            Ok(())
        }
        Err(freightbook_store::StoreError::InvalidMapping(msg)) => Err(CliError::args(msg)),
        Err(e) => Err(CliError::store(e)),
    }
}

pub fn cmd_mapping_list(db: &Path) -> Result<(), CliError> {
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let all = mappings::fetch_mappings(&conn).map_err(CliError::store)?;
    for m in &all {
        println!("{} -> {}", m.child, m.parent);
    }
    if all.is_empty() {
        eprintln!("no mappings defined");
    }
    Ok(())
}

pub fn cmd_mapping_delete(db: &Path, child: &str) -> Result<(), CliError> {
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let found = mappings::delete_mapping(&conn, child).map_err(CliError::store)?;
    if !found {
        return Err(CliError::error(format!("no mapping for '{child}'")));
    }
    eprintln!("removed mapping for {}", child.trim().to_uppercase());
    Ok(())
}

pub fn cmd_ho_set(
    db: &Path,
    date: &str,
    category: &str,
    amount: &str,
    remarks: Option<String>,
) -> Result<(), CliError> {
    let date = crate::report::parse_date(date, "entry")?;
    let amount = parse_rupees(amount)?;
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    match expenses::set_ho_amount(&conn, date, category, amount, remarks.as_deref()) {
        Ok(name) => {
            eprintln!(
                "{}: {} set to {}",
                date.format("%d-%b-%Y"),
                name,
                format_major(amount)
            );
            Ok(())
        }
        Err(freightbook_store::StoreError::InvalidCategory(msg)) => Err(CliError::args(msg)),
        Err(e) => Err(CliError::store(e)),
    }
}

pub fn cmd_ho_list(
    db: &Path,
    start: Option<String>,
    end: Option<String>,
) -> Result<(), CliError> {
    let period = crate::report::resolve_period(start, end)?;
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let entries = expenses::fetch_ho_expenses(&conn, period.start, period.end)
        .map_err(CliError::store)?;
    if entries.is_empty() {
        eprintln!("no HO expenses in {}", period.label());
        return Ok(());
    }
    for e in &entries {
        let items: Vec<String> = e
            .categories
            .iter()
            .filter(|(_, amount)| **amount != 0)
            .map(|(name, amount)| format!("{name} {}", format_major(*amount)))
            .collect();
        print!(
            "{}  total {:>12}  {}",
            e.entry_date.format("%d-%b-%Y"),
            format_major(e.total()),
            items.join(", "),
        );
        if e.remarks.is_empty() {
            println!();
        } else {
            println!("  ({})", e.remarks);
        }
    }
    Ok(())
}

fn parse_scope(raw: &str) -> Result<CategoryScope, CliError> {
    CategoryScope::parse(raw).ok_or_else(|| {
        CliError::args(format!("unknown scope '{raw}'")).with_hint("scope is 'branch' or 'ho'")
    })
}

pub fn cmd_category_add(db: &Path, scope: &str, name: &str) -> Result<(), CliError> {
    let scope = parse_scope(scope)?;
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    match expenses::add_expense_category(&conn, scope, name) {
        Ok(stored) => {
            eprintln!("registered {} category '{}'", scope.as_str(), stored);
            Ok(())
        }
        Err(freightbook_store::StoreError::InvalidCategory(msg)) => Err(CliError::args(msg)),
        Err(e) => Err(CliError::store(e)),
    }
}

pub fn cmd_category_list(db: &Path, scope: &str) -> Result<(), CliError> {
    let scope = parse_scope(scope)?;
    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    for name in expenses::list_expense_categories(&conn, scope).map_err(CliError::store)? {
        println!("{name}");
    }
    Ok(())
}
