use std::collections::{BTreeMap, HashMap, HashSet};

use freightbook_core::{BranchExpenseRecord, BranchMapping, HoExpenseRecord, SalesType};

use crate::config::ReportConfig;
use crate::enrich::EnrichedShipment;
use crate::model::{BranchSummaryRow, GRAND_TOTAL};

/// Build the executive branch summary: per-branch sales, receipts,
/// expenses, and net cash to collect, with the hub-and-spoke rollup
/// applied and a grand-total row appended.
pub fn build_branch_summary(
    config: &ReportConfig,
    shipments: &[EnrichedShipment],
    branch_expenses: &[BranchExpenseRecord],
    ho_expenses: &[HoExpenseRecord],
    mappings: &[BranchMapping],
) -> Vec<BranchSummaryRow> {
    if shipments.is_empty() {
        return Vec::new();
    }

    let ho = config.ho_name.clone();
    let mut rows: BTreeMap<String, BranchSummaryRow> = BTreeMap::new();

    fn row<'a>(
        rows: &'a mut BTreeMap<String, BranchSummaryRow>,
        branch: &str,
    ) -> &'a mut BranchSummaryRow {
        rows.entry(branch.to_string())
            .or_insert_with(|| BranchSummaryRow::new(branch))
    }

    // Sales by destination and sales type
    for s in shipments {
        let entry = row(&mut rows, &s.destination);
        match s.sales_type {
            SalesType::Paid => entry.paid_sales += s.sales_amount,
            SalesType::ToPay => entry.to_pay_sales += s.sales_amount,
            SalesType::ToBeBilled => entry.to_be_billed_sales += s.sales_amount,
        }
    }

    // Receipts, discount, and due by receipt location
    for s in shipments {
        let entry = row(&mut rows, &s.receipt_location);
        entry.total_receipts += s.manual_figures;
        entry.discount += s.recon.discount;
        entry.due += s.recon.due;
    }

    // Branch expenses by (canonical) destination
    for e in branch_expenses {
        let branch = config.canonical(&e.destination);
        let entry = row(&mut rows, &branch);
        entry.rent += e.category("rent");
        entry.vehicle += e.category("vehicle");
        entry.other_expenses += e.other_total();
        entry.total_expenses += e.real_total();
        entry.sent_to_ho += e.transfer_total();
    }

    // HO's own expenses come from the head-office register
    let ho_total: i64 = ho_expenses.iter().map(|e| e.total()).sum();
    row(&mut rows, &ho).total_expenses += ho_total;

    // Derived columns
    for entry in rows.values_mut() {
        entry.total_sales = entry.paid_sales + entry.to_pay_sales + entry.to_be_billed_sales;
        entry.net_cash = entry.total_receipts - entry.total_expenses - entry.sent_to_ho;
    }

    // Hub-and-spoke rollup: move each child's net cash into its parent.
    // The mapping graph is flattened first so multi-level chains roll all
    // the way up in one invocation.
    for (child, parent) in flatten_mappings(config, mappings) {
        if child == parent || !rows.contains_key(&child) || !rows.contains_key(&parent) {
            continue;
        }
        let moved = match rows.get_mut(&child) {
            Some(c) => std::mem::take(&mut c.net_cash),
            None => continue,
        };
        if let Some(p) = rows.get_mut(&parent) {
            p.net_cash += moved;
        }
    }

    // Every branch's transfers land in HO's till
    let transfers: i64 = rows.values().map(|r| r.sent_to_ho).sum();
    if let Some(entry) = rows.get_mut(&ho) {
        entry.net_cash += transfers;
    }

    // HO pinned first, remaining branches alphabetical
    let mut out = Vec::with_capacity(rows.len() + 1);
    if let Some(ho_row) = rows.remove(&ho) {
        out.push(ho_row);
    }
    out.extend(rows.into_values());

    // Independent column-wise grand total (not derived from the net-cash
    // formula, so aggregation bugs show up as a mismatch)
    let mut total = BranchSummaryRow::new(GRAND_TOTAL);
    for r in &out {
        total.accumulate(r);
    }
    out.push(total);
    out
}

/// Resolve each child to its ultimate ancestor so the single-pass rollup
/// handles grandchild -> child -> parent chains. Traversal keeps a visited
/// set; when a cycle closes, the walk stops at the last acyclic node, so
/// malformed cyclic data degrades instead of looping.
pub fn flatten_mappings(
    config: &ReportConfig,
    mappings: &[BranchMapping],
) -> Vec<(String, String)> {
    let parent_of: HashMap<String, String> = mappings
        .iter()
        .map(|m| (config.canonical(&m.child), config.canonical(&m.parent)))
        .collect();

    let mut flat = Vec::with_capacity(parent_of.len());
    for child in parent_of.keys() {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(child);
        let mut current = child;
        while let Some(next) = parent_of.get(current) {
            if !visited.insert(next) {
                break;
            }
            current = next;
        }
        if current != child {
            flat.push((child.clone(), current.clone()));
        }
    }
    flat.sort();
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{enrich, testutil::shipment};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn expense(destination: &str, categories: &[(&str, i64)]) -> BranchExpenseRecord {
        BranchExpenseRecord {
            manifest_no: format!("M_{destination}"),
            manifest_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            origin: "PATNA".into(),
            destination: destination.into(),
            categories: categories
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            remarks: String::new(),
        }
    }

    fn mapping(child: &str, parent: &str) -> BranchMapping {
        BranchMapping {
            child: child.into(),
            parent: parent.into(),
        }
    }

    fn summary(
        shipment_rows: Vec<freightbook_core::ShipmentRecord>,
        branch_expenses: Vec<BranchExpenseRecord>,
        ho_expenses: Vec<HoExpenseRecord>,
        mappings: Vec<BranchMapping>,
    ) -> Vec<BranchSummaryRow> {
        let config = ReportConfig::default();
        let enriched = enrich(&config, &shipment_rows);
        build_branch_summary(&config, &enriched, &branch_expenses, &ho_expenses, &mappings)
    }

    fn find<'a>(rows: &'a [BranchSummaryRow], branch: &str) -> &'a BranchSummaryRow {
        rows.iter().find(|r| r.branch == branch).unwrap()
    }

    #[test]
    fn sales_split_and_receipt_routing() {
        let config = ReportConfig::default();
        let rows = summary(
            vec![
                shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 100_000, 80_000),
                shipment("CN2", "M1", "RAXAUL", SalesType::Paid, 50_000, 50_000),
                shipment("CN3", "M2", "MOTIHARI", SalesType::ToPay, 30_000, 0),
            ],
            vec![],
            vec![],
            vec![],
        );

        let raxaul = find(&rows, "RAXAUL");
        assert_eq!(raxaul.to_pay_sales, 100_000);
        assert_eq!(raxaul.paid_sales, 50_000);
        assert_eq!(raxaul.total_sales, 150_000);
        // PAID receipt lands at HO, TO PAY at the branch
        assert_eq!(raxaul.total_receipts, 80_000);
        assert_eq!(raxaul.discount, 20_000);

        let ho = find(&rows, &config.ho_name);
        assert_eq!(ho.total_receipts, 50_000);

        let motihari = find(&rows, "MOTIHARI");
        assert_eq!(motihari.due, 30_000);
    }

    #[test]
    fn expense_columns_and_net_cash() {
        let rows = summary(
            vec![shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 100_000, 100_000)],
            vec![expense(
                "RAXAUL",
                &[
                    ("rent", 10_000),
                    ("vehicle", 5_000),
                    ("thela", 2_000),
                    ("ho_transfer", 40_000),
                ],
            )],
            vec![],
            vec![],
        );

        let raxaul = find(&rows, "RAXAUL");
        assert_eq!(raxaul.rent, 10_000);
        assert_eq!(raxaul.vehicle, 5_000);
        assert_eq!(raxaul.other_expenses, 2_000);
        assert_eq!(raxaul.total_expenses, 17_000);
        assert_eq!(raxaul.sent_to_ho, 40_000);
        assert_eq!(raxaul.net_cash, 100_000 - 17_000 - 40_000);
    }

    #[test]
    fn transfers_land_in_ho_net_cash() {
        let config = ReportConfig::default();
        let rows = summary(
            vec![shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 100_000, 100_000)],
            vec![expense("RAXAUL", &[("cash_transfer", 60_000)])],
            vec![],
            vec![],
        );
        let ho = find(&rows, &config.ho_name);
        assert_eq!(ho.net_cash, 60_000);
    }

    #[test]
    fn ho_expenses_merged_into_ho_row() {
        let config = ReportConfig::default();
        let mut categories = BTreeMap::new();
        categories.insert("rent".to_string(), 30_000);
        categories.insert("electricity".to_string(), 5_000);
        let rows = summary(
            vec![shipment("CN1", "M1", "RAXAUL", SalesType::Paid, 100_000, 100_000)],
            vec![],
            vec![HoExpenseRecord {
                entry_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
                categories,
                remarks: String::new(),
            }],
            vec![],
        );
        let ho = find(&rows, &config.ho_name);
        assert_eq!(ho.total_expenses, 35_000);
        assert_eq!(ho.net_cash, 100_000 - 35_000);
    }

    #[test]
    fn rollup_transfers_not_duplicates() {
        // A (net 500) -> B (net 300): after rollup A=0, B=800
        let rows = summary(
            vec![
                shipment("CN1", "M1", "A", SalesType::ToPay, 50_000, 50_000),
                shipment("CN2", "M2", "B", SalesType::ToPay, 30_000, 30_000),
            ],
            vec![],
            vec![],
            vec![mapping("A", "B")],
        );
        assert_eq!(find(&rows, "A").net_cash, 0);
        assert_eq!(find(&rows, "B").net_cash, 80_000);
    }

    #[test]
    fn rollup_conserves_total_net_cash() {
        let build = |mappings: Vec<BranchMapping>| {
            summary(
                vec![
                    shipment("CN1", "M1", "A", SalesType::ToPay, 50_000, 50_000),
                    shipment("CN2", "M2", "B", SalesType::ToPay, 30_000, 30_000),
                    shipment("CN3", "M3", "C", SalesType::ToPay, 20_000, 20_000),
                ],
                vec![expense("A", &[("rent", 7_000)])],
                vec![],
                mappings,
            )
        };
        let total_net = |rows: &[BranchSummaryRow]| -> i64 {
            rows.iter()
                .filter(|r| r.branch != GRAND_TOTAL)
                .map(|r| r.net_cash)
                .sum()
        };

        let before = build(vec![]);
        let after = build(vec![mapping("A", "B")]);
        assert_eq!(total_net(&before), total_net(&after));
    }

    #[test]
    fn chain_rolls_all_the_way_up() {
        // grandchild -> child -> parent resolves in one invocation
        let rows = summary(
            vec![
                shipment("CN1", "M1", "A", SalesType::ToPay, 10_000, 10_000),
                shipment("CN2", "M2", "B", SalesType::ToPay, 20_000, 20_000),
                shipment("CN3", "M3", "C", SalesType::ToPay, 40_000, 40_000),
            ],
            vec![],
            vec![],
            vec![mapping("A", "B"), mapping("B", "C")],
        );
        assert_eq!(find(&rows, "A").net_cash, 0);
        assert_eq!(find(&rows, "B").net_cash, 0);
        assert_eq!(find(&rows, "C").net_cash, 70_000);
    }

    #[test]
    fn cycle_degrades_without_looping() {
        let config = ReportConfig::default();
        let flat = flatten_mappings(&config, &[mapping("A", "B"), mapping("B", "A")]);
        // Each child stops at the node that closes the cycle
        assert_eq!(flat, vec![("A".into(), "B".into()), ("B".into(), "A".into())]);

        // And the rollup still conserves value
        let rows = summary(
            vec![
                shipment("CN1", "M1", "A", SalesType::ToPay, 10_000, 10_000),
                shipment("CN2", "M2", "B", SalesType::ToPay, 20_000, 20_000),
            ],
            vec![],
            vec![],
            vec![mapping("A", "B"), mapping("B", "A")],
        );
        let total: i64 = rows
            .iter()
            .filter(|r| r.branch != GRAND_TOTAL)
            .map(|r| r.net_cash)
            .sum();
        assert_eq!(total, 30_000);
    }

    #[test]
    fn ho_first_then_alphabetical_then_total() {
        let config = ReportConfig::default();
        let rows = summary(
            vec![
                shipment("CN1", "M1", "RAXAUL", SalesType::Paid, 10_000, 0),
                shipment("CN2", "M2", "DARBHANGA", SalesType::ToPay, 10_000, 0),
                shipment("CN3", "M3", "MADHUBANI", SalesType::ToPay, 10_000, 0),
            ],
            vec![],
            vec![],
            vec![],
        );
        let names: Vec<&str> = rows.iter().map(|r| r.branch.as_str()).collect();
        assert_eq!(
            names,
            vec![
                config.ho_name.as_str(),
                "DARBHANGA",
                "MADHUBANI",
                "RAXAUL",
                GRAND_TOTAL
            ]
        );
    }

    #[test]
    fn grand_total_is_columnwise_sum() {
        let rows = summary(
            vec![
                shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 100_000, 80_000),
                shipment("CN2", "M2", "MOTIHARI", SalesType::Paid, 50_000, 0),
            ],
            vec![expense("RAXAUL", &[("rent", 10_000), ("transfer", 5_000)])],
            vec![],
            vec![],
        );
        let total = rows.last().unwrap();
        assert_eq!(total.branch, GRAND_TOTAL);

        let body = &rows[..rows.len() - 1];
        macro_rules! check {
            ($field:ident) => {
                assert_eq!(
                    total.$field,
                    body.iter().map(|r| r.$field).sum::<i64>(),
                    stringify!($field)
                );
            };
        }
        check!(paid_sales);
        check!(to_pay_sales);
        check!(to_be_billed_sales);
        check!(total_sales);
        check!(total_receipts);
        check!(discount);
        check!(due);
        check!(rent);
        check!(vehicle);
        check!(other_expenses);
        check!(total_expenses);
        check!(sent_to_ho);
        check!(net_cash);
    }

    #[test]
    fn empty_shipments_empty_report() {
        assert!(summary(vec![], vec![expense("RAXAUL", &[("rent", 1)])], vec![], vec![]).is_empty());
    }
}
