// report command: load the period's records, run the pipeline, render

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use freightbook_core::format_major;
use freightbook_reports::{Period, ReportConfig, ReportInput, ReportSet};
use freightbook_store::{expenses, mappings, shipments};

use crate::CliError;

pub(crate) fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::args(format!("cannot parse {flag} date '{raw}'"))
            .with_hint("dates are YYYY-MM-DD, e.g. --start 2026-01-01")
    })
}

pub(crate) fn resolve_period(
    start: Option<String>,
    end: Option<String>,
) -> Result<Period, CliError> {
    let today = Local::now().date_naive();
    let default = Period::month_to_date(today);
    let start = match start {
        Some(raw) => parse_date(&raw, "--start")?,
        None => default.start,
    };
    let end = match end {
        Some(raw) => parse_date(&raw, "--end")?,
        None => default.end,
    };
    if start > end {
        return Err(CliError::args(format!(
            "--start {start} is after --end {end}"
        )));
    }
    Ok(Period::new(start, end))
}

fn load_config(path: Option<&Path>) -> Result<ReportConfig, CliError> {
    match path {
        None => Ok(ReportConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::error(format!("{}: {e}", path.display())))?;
            ReportConfig::from_toml(&content)
                .map_err(|e| CliError::args(format!("{}: {e}", path.display())))
        }
    }
}

pub fn cmd_report(
    db: &Path,
    start: Option<String>,
    end: Option<String>,
    config: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let period = resolve_period(start, end)?;
    let config = load_config(config.as_deref())?;

    let conn = freightbook_store::open(db).map_err(CliError::store)?;
    let input = ReportInput {
        shipments: shipments::fetch_shipments(&conn, period.start, period.end)
            .map_err(CliError::store)?,
        branch_expenses: expenses::fetch_branch_expenses(&conn, period.start, period.end)
            .map_err(CliError::store)?,
        ho_expenses: expenses::fetch_ho_expenses(&conn, period.start, period.end)
            .map_err(CliError::store)?,
        mappings: mappings::fetch_mappings(&conn).map_err(CliError::store)?,
        period,
    };

    let report = freightbook_reports::run(&config, &input);

    if json {
        let out =
            serde_json::to_string_pretty(&report).map_err(|e| CliError::error(e.to_string()))?;
        println!("{out}");
    } else {
        print_summary(&report);
    }

    if let Some(path) = output {
        freightbook_io::xlsx::export_report(&report, &input.shipments, &path)
            .map_err(CliError::error)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &ReportSet) {
    eprintln!(
        "{} | {} | {} manifest rows",
        report.meta.config_name,
        report.meta.period.label(),
        report.manifest_comparison.len().saturating_sub(1),
    );
    if report.branch_summary.is_empty() {
        eprintln!("no data in this period");
        return;
    }

    println!(
        "{:<28} {:>14} {:>14} {:>12} {:>12} {:>14}",
        "Branch", "Total Sales", "Receipts", "Discount", "Due", "Net Cash"
    );
    for r in &report.branch_summary {
        println!(
            "{:<28} {:>14} {:>14} {:>12} {:>12} {:>14}",
            r.branch,
            format_major(r.total_sales),
            format_major(r.total_receipts),
            format_major(r.discount),
            format_major(r.due),
            format_major(r.net_cash),
        );
    }
    for r in &report.pnl {
        if r.category == "NET PROFIT" {
            println!("\n{}: {}", r.description, format_major(r.amount));
        }
    }
}
