use freightbook_core::{BranchExpenseRecord, HoExpenseRecord};

use crate::enrich::EnrichedShipment;
use crate::model::PnlRow;

/// Single-pass income statement for the period. Expenses and discounts
/// carry negative amounts; the net-profit row is revenue minus all three.
pub fn build_pnl(
    shipments: &[EnrichedShipment],
    branch_expenses: &[BranchExpenseRecord],
    ho_expenses: &[HoExpenseRecord],
) -> Vec<PnlRow> {
    if shipments.is_empty() {
        return Vec::new();
    }

    let revenue: i64 = shipments.iter().map(|s| s.sales_amount).sum();
    let discounts: i64 = shipments.iter().map(|s| s.recon.discount).sum();
    let branch_expense: i64 = branch_expenses.iter().map(|e| e.real_total()).sum();
    let ho_expense: i64 = ho_expenses.iter().map(|e| e.total()).sum();
    let net_profit = revenue - branch_expense - ho_expense - discounts;

    vec![
        PnlRow {
            category: "REVENUE".into(),
            description: "Total Sales".into(),
            amount: revenue,
        },
        PnlRow {
            category: "EXPENSE".into(),
            description: "Branch Expenses".into(),
            amount: -branch_expense,
        },
        PnlRow {
            category: "EXPENSE".into(),
            description: "HO Overheads".into(),
            amount: -ho_expense,
        },
        PnlRow {
            category: "EXPENSE".into(),
            description: "Discounts".into(),
            amount: -discounts,
        },
        PnlRow {
            category: "NET PROFIT".into(),
            description: "Net Business Profit".into(),
            amount: net_profit,
        },
    ]
}
