use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sales type
// ---------------------------------------------------------------------------

/// Billing category of a consignment note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesType {
    /// Prepaid at origin.
    Paid,
    /// Collect at destination.
    ToPay,
    /// Invoiced later.
    ToBeBilled,
}

impl SalesType {
    /// Lenient parse from free text. Trims, upper-cases, and accepts the
    /// spellings seen in manifest uploads (`TO PAY`, `TOPAY`, `BILLED`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        match normalized.as_str() {
            "PAID" => Some(Self::Paid),
            "TO PAY" | "TOPAY" => Some(Self::ToPay),
            "TO BE BILLED" | "TOBEBILLED" | "BILLED" => Some(Self::ToBeBilled),
            _ => None,
        }
    }

    pub const ALL: [SalesType; 3] = [Self::Paid, Self::ToPay, Self::ToBeBilled];

    /// Canonical upper-case label, as stored and displayed.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::ToPay => "TO PAY",
            Self::ToBeBilled => "TO BE BILLED",
        }
    }
}

impl std::fmt::Display for SalesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Shipment
// ---------------------------------------------------------------------------

/// One row per consignment note (CN).
///
/// Amounts are minor units and are clamped to >= 0 before any derived
/// computation (`reconcile`). `actual_wt` is preserved verbatim — manifest
/// files carry entries like `"10kg"` and `"0.00 FIXED"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub cn_no: String,
    pub manifest_no: String,
    pub manifest_date: NaiveDate,
    pub cn_date: Option<NaiveDate>,
    pub consignor: String,
    pub consignee: String,
    /// Party responsible for payment.
    pub payment_liability: String,
    pub pkgs: u32,
    pub pkg_type: String,
    pub actual_wt: String,
    pub invoice_no: String,
    pub origin: String,
    pub destination: String,
    pub sales_type: SalesType,
    /// Billed amount, minor units.
    pub sales_amount: i64,
    /// Amount actually received, minor units. Defaults to 0 (unreconciled).
    pub manual_figures: i64,
    pub remarks: String,
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

/// Branch expenses for one manifest. The category set is open: new
/// categories may appear at any time and absent categories read as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchExpenseRecord {
    pub manifest_no: String,
    pub manifest_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    /// Category name -> amount in minor units.
    pub categories: BTreeMap<String, i64>,
    pub remarks: String,
}

/// Category names that represent cash sent to head office rather than a
/// real expense.
fn is_transfer(category: &str) -> bool {
    category.to_lowercase().contains("transfer")
}

impl BranchExpenseRecord {
    pub fn category(&self, name: &str) -> i64 {
        self.categories
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Sum of every category, transfers included.
    pub fn total(&self) -> i64 {
        self.categories.values().sum()
    }

    /// Sum of real expenses: every category except transfers to HO.
    pub fn real_total(&self) -> i64 {
        self.categories
            .iter()
            .filter(|(k, _)| !is_transfer(k))
            .map(|(_, v)| *v)
            .sum()
    }

    /// Sum of transfer-to-HO categories.
    pub fn transfer_total(&self) -> i64 {
        self.categories
            .iter()
            .filter(|(k, _)| is_transfer(k))
            .map(|(_, v)| *v)
            .sum()
    }

    /// Sum of categories other than rent, vehicle, and transfers.
    pub fn other_total(&self) -> i64 {
        self.categories
            .iter()
            .filter(|(k, _)| {
                !is_transfer(k)
                    && !k.eq_ignore_ascii_case("rent")
                    && !k.eq_ignore_ascii_case("vehicle")
            })
            .map(|(_, v)| *v)
            .sum()
    }
}

/// Head-office expenses for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoExpenseRecord {
    pub entry_date: NaiveDate,
    pub categories: BTreeMap<String, i64>,
    pub remarks: String,
}

impl HoExpenseRecord {
    pub fn total(&self) -> i64 {
        self.categories.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Branch hierarchy
// ---------------------------------------------------------------------------

/// Directed hub-and-spoke edge. Each child has at most one parent; the
/// model does not prevent cycles, so the rollup must be cycle-safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchMapping {
    pub child: String,
    pub parent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_type_lenient_parse() {
        assert_eq!(SalesType::parse(" paid "), Some(SalesType::Paid));
        assert_eq!(SalesType::parse("TO PAY"), Some(SalesType::ToPay));
        assert_eq!(SalesType::parse("topay"), Some(SalesType::ToPay));
        assert_eq!(SalesType::parse("to_be_billed"), Some(SalesType::ToBeBilled));
        assert_eq!(SalesType::parse("BILLED"), Some(SalesType::ToBeBilled));
        assert_eq!(SalesType::parse("cod"), None);
        assert_eq!(SalesType::parse(""), None);
    }

    #[test]
    fn expense_splits() {
        let mut categories = BTreeMap::new();
        categories.insert("rent".into(), 10_000);
        categories.insert("Vehicle".into(), 5_000);
        categories.insert("thela".into(), 700);
        categories.insert("cash_transfer_ho".into(), 20_000);

        let rec = BranchExpenseRecord {
            manifest_no: "M1".into(),
            manifest_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            origin: "PATNA".into(),
            destination: "RAXAUL".into(),
            categories,
            remarks: String::new(),
        };

        assert_eq!(rec.category("RENT"), 10_000);
        assert_eq!(rec.category("vehicle"), 5_000);
        assert_eq!(rec.category("tea"), 0);
        assert_eq!(rec.total(), 35_700);
        assert_eq!(rec.real_total(), 15_700);
        assert_eq!(rec.transfer_total(), 20_000);
        assert_eq!(rec.other_total(), 700);
    }
}
