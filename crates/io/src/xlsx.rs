// Excel report export. Presentation snapshot for sharing, not a
// round-trip format: every amount lands as a plain number in major
// units, never a formula.

use std::path::Path;

use chrono::Local;
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use freightbook_core::{to_major_f64, ShipmentRecord};
use freightbook_reports::ReportSet;

const BANNER_COLOR: u32 = 0x1F4E78;
const HEADER_ROW: u32 = 3;

struct SheetFormats {
    title: Format,
    header: Format,
    text: Format,
    amount: Format,
    total_text: Format,
    total_amount: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let title = Format::new()
            .set_bold()
            .set_font_size(16)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(BANNER_COLOR));
        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(BANNER_COLOR));
        let amount = Format::new().set_num_format("#,##0.00");
        Self {
            title,
            header,
            text: Format::new(),
            amount,
            total_text: Format::new().set_bold(),
            total_amount: Format::new().set_bold().set_num_format("#,##0.00"),
        }
    }
}

/// Export the full report set plus the raw shipment rows to one
/// workbook. Empty tables are skipped entirely, so a period with no
/// data produces a workbook with no sheets and `save` still succeeds.
pub fn export_report(
    report: &ReportSet,
    shipments: &[ShipmentRecord],
    path: &Path,
) -> Result<(), String> {
    let formats = SheetFormats::new();
    let caption = format!(
        "Period: {} | Generated: {}",
        report.meta.period.label(),
        Local::now().format("%d-%b-%Y %I:%M %p")
    );

    let mut workbook = Workbook::new();

    if !report.branch_summary.is_empty() {
        let ws = add_sheet(
            &mut workbook,
            "Branch_Summary",
            "EXECUTIVE BRANCH SUMMARY",
            &caption,
            &formats,
        )?;
        write_branch_summary(ws, report, &formats)?;
    }
    if !report.manifest_comparison.is_empty() {
        let ws = add_sheet(
            &mut workbook,
            "Manifest_Comp",
            "MANIFEST COMPARISON REPORT",
            &caption,
            &formats,
        )?;
        write_manifest_comparison(ws, report, &formats)?;
    }
    if !report.dues.is_empty() {
        let ws = add_sheet(
            &mut workbook,
            "Due_Summary",
            "OUTSTANDING DUES SUMMARY",
            &caption,
            &formats,
        )?;
        write_dues(ws, report, &formats)?;
    }
    if !report.pnl.is_empty() {
        let ws = add_sheet(
            &mut workbook,
            "Profit_Loss",
            "PROFIT AND LOSS STATEMENT",
            &caption,
            &formats,
        )?;
        write_pnl(ws, report, &formats)?;
    }
    if !shipments.is_empty() {
        let ws = add_sheet(
            &mut workbook,
            "Master_Data",
            "FULL MASTER DATA",
            &caption,
            &formats,
        )?;
        write_master_data(ws, shipments, &formats)?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {e}"))?;
    log::info!("wrote report workbook to {}", path.display());
    Ok(())
}

fn add_sheet<'a>(
    workbook: &'a mut Workbook,
    name: &str,
    title: &str,
    caption: &str,
    formats: &SheetFormats,
) -> Result<&'a mut Worksheet, String> {
    let ws = workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| format!("Failed to create sheet '{name}': {e}"))?;
    ws.write_string_with_format(0, 0, title, &formats.title)
        .map_err(|e| e.to_string())?;
    ws.write_string(1, 0, caption).map_err(|e| e.to_string())?;
    Ok(ws)
}

fn write_headers(
    ws: &mut Worksheet,
    headers: &[&str],
    formats: &SheetFormats,
) -> Result<(), String> {
    for (col, h) in headers.iter().enumerate() {
        ws.write_string_with_format(HEADER_ROW, col as u16, *h, &formats.header)
            .map_err(|e| e.to_string())?;
        // Rough autofit on the header label
        ws.set_column_width(col as u16, (h.len() as f64 + 4.0).max(12.0))
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn is_total_label(label: &str) -> bool {
    label == freightbook_reports::GRAND_TOTAL
}

fn write_branch_summary(
    ws: &mut Worksheet,
    report: &ReportSet,
    formats: &SheetFormats,
) -> Result<(), String> {
    write_headers(
        ws,
        &[
            "Branch",
            "Paid Sales",
            "To Pay Sales",
            "To Be Billed",
            "Total Sales",
            "Total Receipts",
            "Discount",
            "Due",
            "Rent",
            "Vehicle",
            "Other Expenses",
            "Total Expenses",
            "Sent to HO",
            "Net Cash",
        ],
        formats,
    )?;

    for (i, r) in report.branch_summary.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let total = is_total_label(&r.branch);
        let (text, amount) = if total {
            (&formats.total_text, &formats.total_amount)
        } else {
            (&formats.text, &formats.amount)
        };
        ws.write_string_with_format(row, 0, &r.branch, text)
            .map_err(|e| e.to_string())?;
        for (col, v) in [
            r.paid_sales,
            r.to_pay_sales,
            r.to_be_billed_sales,
            r.total_sales,
            r.total_receipts,
            r.discount,
            r.due,
            r.rent,
            r.vehicle,
            r.other_expenses,
            r.total_expenses,
            r.sent_to_ho,
            r.net_cash,
        ]
        .into_iter()
        .enumerate()
        {
            ws.write_number_with_format(row, col as u16 + 1, to_major_f64(v), amount)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn write_manifest_comparison(
    ws: &mut Worksheet,
    report: &ReportSet,
    formats: &SheetFormats,
) -> Result<(), String> {
    write_headers(
        ws,
        &[
            "Manifest No",
            "Manifest Date",
            "From",
            "To",
            "To Pay",
            "Paid",
            "To Be Billed",
            "Sum",
            "Receipt",
            "Discount",
            "Due",
            "Excess",
        ],
        formats,
    )?;

    for (i, r) in report.manifest_comparison.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let total = is_total_label(&r.manifest_no);
        let (text, amount) = if total {
            (&formats.total_text, &formats.total_amount)
        } else {
            (&formats.text, &formats.amount)
        };
        ws.write_string_with_format(row, 0, &r.manifest_no, text)
            .map_err(|e| e.to_string())?;
        let date = r
            .manifest_date
            .map(|d| d.format("%d-%b-%Y").to_string())
            .unwrap_or_default();
        ws.write_string_with_format(row, 1, &date, text)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 2, &r.origin, text)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 3, &r.destination, text)
            .map_err(|e| e.to_string())?;
        for (col, v) in [
            r.to_pay,
            r.paid,
            r.to_be_billed,
            r.sum,
            r.receipt,
            r.discount,
            r.due,
            r.excess,
        ]
        .into_iter()
        .enumerate()
        {
            ws.write_number_with_format(row, col as u16 + 4, to_major_f64(v), amount)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

fn write_dues(
    ws: &mut Worksheet,
    report: &ReportSet,
    formats: &SheetFormats,
) -> Result<(), String> {
    write_headers(ws, &["Party", "Total Due", "Pending CNs"], formats)?;
    // The CN list column holds long comma-joined strings
    ws.set_column_width(2, 60.0).map_err(|e| e.to_string())?;

    for (i, r) in report.dues.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let total = is_total_label(&r.party);
        let (text, amount) = if total {
            (&formats.total_text, &formats.total_amount)
        } else {
            (&formats.text, &formats.amount)
        };
        ws.write_string_with_format(row, 0, &r.party, text)
            .map_err(|e| e.to_string())?;
        ws.write_number_with_format(row, 1, to_major_f64(r.total_due), amount)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 2, &r.pending_cns, text)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn write_pnl(
    ws: &mut Worksheet,
    report: &ReportSet,
    formats: &SheetFormats,
) -> Result<(), String> {
    write_headers(ws, &["Category", "Description", "Amount"], formats)?;

    for (i, r) in report.pnl.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let total = r.category == "NET PROFIT";
        let (text, amount) = if total {
            (&formats.total_text, &formats.total_amount)
        } else {
            (&formats.text, &formats.amount)
        };
        ws.write_string_with_format(row, 0, &r.category, text)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 1, &r.description, text)
            .map_err(|e| e.to_string())?;
        ws.write_number_with_format(row, 2, to_major_f64(r.amount), amount)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn write_master_data(
    ws: &mut Worksheet,
    shipments: &[ShipmentRecord],
    formats: &SheetFormats,
) -> Result<(), String> {
    write_headers(
        ws,
        &[
            "CN No",
            "CN Date",
            "Manifest No",
            "Manifest Date",
            "Consignor",
            "Consignee",
            "Payment Liability",
            "No. of PKGS",
            "Type",
            "Actual WT",
            "Invoice No",
            "From",
            "To",
            "Sales Type",
            "Sales Amount",
            "Received",
            "Remarks",
        ],
        formats,
    )?;

    for (i, s) in shipments.iter().enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let cn_date = s
            .cn_date
            .map(|d| d.format("%d-%b-%Y").to_string())
            .unwrap_or_default();
        let manifest_date = s.manifest_date.format("%d-%b-%Y").to_string();
        let text = &formats.text;
        let columns: [&str; 12] = [
            &s.cn_no,
            &cn_date,
            &s.manifest_no,
            &manifest_date,
            &s.consignor,
            &s.consignee,
            &s.payment_liability,
            &s.pkg_type,
            &s.actual_wt,
            &s.invoice_no,
            &s.origin,
            &s.destination,
        ];
        // Text columns around the numeric ones
        let positions: [u16; 12] = [0, 1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12];
        for (pos, value) in positions.iter().zip(columns.iter()) {
            ws.write_string_with_format(row, *pos, *value, text)
                .map_err(|e| e.to_string())?;
        }
        ws.write_number_with_format(row, 7, s.pkgs as f64, text)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 13, s.sales_type.label(), text)
            .map_err(|e| e.to_string())?;
        ws.write_number_with_format(row, 14, to_major_f64(s.sales_amount), &formats.amount)
            .map_err(|e| e.to_string())?;
        ws.write_number_with_format(row, 15, to_major_f64(s.manual_figures), &formats.amount)
            .map_err(|e| e.to_string())?;
        ws.write_string_with_format(row, 16, &s.remarks, text)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}
