use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use freightbook_core::{BranchExpenseRecord, BranchMapping, HoExpenseRecord, ShipmentRecord};

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Inclusive reporting date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Default reporting window: first of the current month through today.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self { start, end: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Human caption, e.g. `01-Jan-2026 to 23-Jan-2026`.
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%d-%b-%Y"),
            self.end.format("%d-%b-%Y")
        )
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded record sets, already filtered to `period` by the caller.
pub struct ReportInput {
    pub shipments: Vec<ShipmentRecord>,
    pub branch_expenses: Vec<BranchExpenseRecord>,
    pub ho_expenses: Vec<HoExpenseRecord>,
    pub mappings: Vec<BranchMapping>,
    pub period: Period,
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// Label used for appended total rows across all reports.
pub const GRAND_TOTAL: &str = "GRAND TOTAL";

/// One branch's line in the executive summary. Amounts in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct BranchSummaryRow {
    pub branch: String,
    pub paid_sales: i64,
    pub to_pay_sales: i64,
    pub to_be_billed_sales: i64,
    pub total_sales: i64,
    pub total_receipts: i64,
    pub discount: i64,
    pub due: i64,
    pub rent: i64,
    pub vehicle: i64,
    pub other_expenses: i64,
    pub total_expenses: i64,
    pub sent_to_ho: i64,
    pub net_cash: i64,
}

impl BranchSummaryRow {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            paid_sales: 0,
            to_pay_sales: 0,
            to_be_billed_sales: 0,
            total_sales: 0,
            total_receipts: 0,
            discount: 0,
            due: 0,
            rent: 0,
            vehicle: 0,
            other_expenses: 0,
            total_expenses: 0,
            sent_to_ho: 0,
            net_cash: 0,
        }
    }

    /// Column-wise accumulate, used for the grand-total row.
    pub fn accumulate(&mut self, other: &BranchSummaryRow) {
        self.paid_sales += other.paid_sales;
        self.to_pay_sales += other.to_pay_sales;
        self.to_be_billed_sales += other.to_be_billed_sales;
        self.total_sales += other.total_sales;
        self.total_receipts += other.total_receipts;
        self.discount += other.discount;
        self.due += other.due;
        self.rent += other.rent;
        self.vehicle += other.vehicle;
        self.other_expenses += other.other_expenses;
        self.total_expenses += other.total_expenses;
        self.sent_to_ho += other.sent_to_ho;
        self.net_cash += other.net_cash;
    }
}

/// One manifest's line in the comparison report: sales pivoted by type
/// against what was actually received at the destination.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestComparisonRow {
    pub manifest_no: String,
    /// None on the grand-total row.
    pub manifest_date: Option<NaiveDate>,
    pub origin: String,
    pub destination: String,
    pub to_pay: i64,
    pub paid: i64,
    pub to_be_billed: i64,
    /// Cross-check column: `to_pay + paid + to_be_billed`.
    pub sum: i64,
    pub receipt: i64,
    pub discount: i64,
    pub due: i64,
    pub excess: i64,
}

/// Outstanding dues grouped by the party responsible for payment.
#[derive(Debug, Clone, Serialize)]
pub struct DuesRow {
    pub party: String,
    pub total_due: i64,
    /// Unique pending CN numbers, order-preserving, comma-separated.
    /// Empty on the grand-total row.
    pub pending_cns: String,
}

/// One line of the fixed income statement. Expenses carry negative
/// amounts for spreadsheet-style signed display.
#[derive(Debug, Clone, Serialize)]
pub struct PnlRow {
    pub category: String,
    pub description: String,
    pub amount: i64,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub period: Period,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSet {
    pub meta: ReportMeta,
    pub branch_summary: Vec<BranchSummaryRow>,
    pub manifest_comparison: Vec<ManifestComparisonRow>,
    pub dues: Vec<DuesRow>,
    pub pnl: Vec<PnlRow>,
}
