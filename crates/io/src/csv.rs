// Manifest and expense CSV import

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use freightbook_core::{parse_amount, BranchExpenseRecord, SalesType, ShipmentRecord};

/// One row that could not be imported. Lines are 1-based and count the
/// header, matching what a spreadsheet shows.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Result of a manifest CSV import. Bad rows are collected, not fatal;
/// callers decide whether a partial import is acceptable.
#[derive(Debug, Default)]
pub struct ShipmentImport {
    pub records: Vec<ShipmentRecord>,
    pub row_errors: Vec<RowError>,
}

impl ShipmentImport {
    pub fn summary(&self) -> String {
        if self.row_errors.is_empty() {
            format!("{} rows parsed", self.records.len())
        } else {
            format!(
                "{} rows parsed, {} rejected",
                self.records.len(),
                self.row_errors.len()
            )
        }
    }
}

#[derive(Debug, Default)]
pub struct ExpenseImport {
    pub records: Vec<BranchExpenseRecord>,
    pub row_errors: Vec<RowError>,
}

/// Read file and convert to UTF-8 if needed. Excel-exported CSVs are
/// often Windows-1252.
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Normalize a header for matching: lowercase, punctuation stripped,
/// whitespace collapsed. `"Sales Amount (₹)"` and `"sales_amount"` both
/// normalize to `"sales amount"`.
fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if c == ' ' || c == '_' || c == '-' {
            out.push(' ');
        }
        // Currency marks and other punctuation drop out
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct HeaderMap {
    manifest_no: usize,
    manifest_date: usize,
    cn_no: usize,
    cn_date: Option<usize>,
    consignor: Option<usize>,
    consignee: Option<usize>,
    payment_liability: Option<usize>,
    pkgs: Option<usize>,
    pkg_type: Option<usize>,
    actual_wt: Option<usize>,
    invoice_no: Option<usize>,
    origin: Option<usize>,
    destination: usize,
    sales_type: usize,
    sales_amount: usize,
    remarks: Option<usize>,
}

impl HeaderMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, String> {
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(normalize_header(h)).or_insert(i);
        }
        let find = |names: &[&str]| names.iter().find_map(|n| index.get(*n).copied());
        let require = |names: &[&str], label: &str| {
            find(names).ok_or_else(|| format!("missing required column '{label}'"))
        };

        Ok(Self {
            manifest_no: require(&["manifest no"], "Manifest No")?,
            manifest_date: require(&["manifest date"], "Manifest Date")?,
            cn_no: require(&["cn no"], "CN No")?,
            cn_date: find(&["cn date"]),
            consignor: find(&["consignor"]),
            consignee: find(&["consignee"]),
            payment_liability: find(&["payment liability"]),
            pkgs: find(&["no of pkgs", "pkgs"]),
            pkg_type: find(&["type", "pkg type"]),
            actual_wt: find(&["actual wt"]),
            invoice_no: find(&["consignor invoice no", "invoice no"]),
            origin: find(&["from", "origin"]),
            destination: require(&["to", "destination"], "To")?,
            sales_type: require(&["sales type"], "Sales Type")?,
            sales_amount: require(&["sales amount"], "Sales Amount")?,
            remarks: find(&["remarks"]),
        })
    }
}

fn field(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

fn opt_field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.map(|i| field(record, i)).unwrap_or_default()
}

/// Day-first date parse, the convention of the manifest exports.
/// ISO is accepted as a fallback.
fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    None
}

/// Import a monthly manifest CSV. Identity columns (CN number, manifest
/// number and date, sales type) fail the row when bad; amounts, package
/// counts and dates elsewhere degrade leniently.
pub fn import_shipments(path: &Path) -> Result<ShipmentImport, String> {
    let content = read_file_as_utf8(path)?;
    import_shipments_from_str(&content)
}

pub fn import_shipments_from_str(content: &str) -> Result<ShipmentImport, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let map = HeaderMap::resolve(&headers)?;

    let mut import = ShipmentImport::default();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                import.row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let cn_no = field(&record, map.cn_no);
        if cn_no.is_empty() {
            import.row_errors.push(RowError {
                line,
                message: "CN No is empty".into(),
            });
            continue;
        }
        let manifest_no = field(&record, map.manifest_no);
        if manifest_no.is_empty() {
            import.row_errors.push(RowError {
                line,
                message: format!("CN {cn_no}: Manifest No is empty"),
            });
            continue;
        }
        let raw_date = field(&record, map.manifest_date);
        let manifest_date = match parse_day_first(&raw_date) {
            Some(d) => d,
            None => {
                import.row_errors.push(RowError {
                    line,
                    message: format!("CN {cn_no}: bad manifest date '{raw_date}'"),
                });
                continue;
            }
        };
        let raw_type = field(&record, map.sales_type);
        let sales_type = match SalesType::parse(&raw_type) {
            Some(t) => t,
            None => {
                import.row_errors.push(RowError {
                    line,
                    message: format!("CN {cn_no}: unrecognized sales type '{raw_type}'"),
                });
                continue;
            }
        };

        import.records.push(ShipmentRecord {
            cn_no,
            manifest_no,
            manifest_date,
            cn_date: map
                .cn_date
                .and_then(|i| parse_day_first(&field(&record, i))),
            consignor: opt_field(&record, map.consignor),
            consignee: opt_field(&record, map.consignee),
            payment_liability: opt_field(&record, map.payment_liability),
            pkgs: opt_field(&record, map.pkgs).parse().unwrap_or(0),
            pkg_type: opt_field(&record, map.pkg_type),
            actual_wt: opt_field(&record, map.actual_wt),
            invoice_no: opt_field(&record, map.invoice_no),
            origin: opt_field(&record, map.origin),
            destination: field(&record, map.destination),
            sales_type,
            sales_amount: parse_amount(&field(&record, map.sales_amount)),
            manual_figures: 0,
            remarks: opt_field(&record, map.remarks),
        });
    }

    log::info!("manifest csv: {}", import.summary());
    Ok(import)
}

// ---------------------------------------------------------------------------
// Branch expense sheets
// ---------------------------------------------------------------------------

const EXPENSE_FIXED_HEADERS: [&str; 4] = ["Manifest No", "Manifest Date", "From", "To"];

/// Import a branch expense CSV. The first four columns identify the
/// manifest; every remaining column except `Remarks` is an expense
/// category, amounts parsed leniently.
pub fn import_branch_expenses(path: &Path) -> Result<ExpenseImport, String> {
    let content = read_file_as_utf8(path)?;
    import_branch_expenses_from_str(&content)
}

pub fn import_branch_expenses_from_str(content: &str) -> Result<ExpenseImport, String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let mut manifest_no = None;
    let mut manifest_date = None;
    let mut origin = None;
    let mut destination = None;
    let mut remarks = None;
    let mut categories: Vec<(usize, String)> = Vec::new();

    for (i, h) in headers.iter().enumerate() {
        match normalize_header(h).as_str() {
            "manifest no" => manifest_no = Some(i),
            "manifest date" => manifest_date = Some(i),
            "from" | "origin" => origin = Some(i),
            "to" | "destination" => destination = Some(i),
            "remarks" => remarks = Some(i),
            "" => {}
            name => categories.push((i, name.replace(' ', "_"))),
        }
    }
    let manifest_no = manifest_no.ok_or("missing required column 'Manifest No'")?;
    let manifest_date = manifest_date.ok_or("missing required column 'Manifest Date'")?;
    if categories.is_empty() {
        return Err("no expense category columns found".into());
    }

    let mut import = ExpenseImport::default();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                import.row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let no = field(&record, manifest_no);
        if no.is_empty() {
            import.row_errors.push(RowError {
                line,
                message: "Manifest No is empty".into(),
            });
            continue;
        }
        let raw_date = field(&record, manifest_date);
        let date = match parse_day_first(&raw_date) {
            Some(d) => d,
            None => {
                import.row_errors.push(RowError {
                    line,
                    message: format!("manifest {no}: bad date '{raw_date}'"),
                });
                continue;
            }
        };

        let mut amounts = BTreeMap::new();
        for (idx, name) in &categories {
            amounts.insert(name.clone(), parse_amount(&field(&record, *idx)));
        }
        import.records.push(BranchExpenseRecord {
            manifest_no: no,
            manifest_date: date,
            origin: opt_field(&record, origin),
            destination: opt_field(&record, destination),
            categories: amounts,
            remarks: opt_field(&record, remarks),
        });
    }

    log::info!(
        "expense csv: {} rows parsed, {} rejected",
        import.records.len(),
        import.row_errors.len()
    );
    Ok(import)
}

/// Header-only CSV a branch can fill in, with one column per currently
/// registered category.
pub fn expense_template(categories: &[String]) -> String {
    let mut columns: Vec<String> = EXPENSE_FIXED_HEADERS.iter().map(|s| s.to_string()).collect();
    columns.extend(categories.iter().cloned());
    columns.push("Remarks".into());
    let mut line = columns.join(",");
    line.push('\n');
    line
}
