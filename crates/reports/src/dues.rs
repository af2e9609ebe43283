use std::collections::{BTreeMap, HashSet};

use crate::enrich::EnrichedShipment;
use crate::model::{DuesRow, GRAND_TOTAL};

/// Group unpaid shipments by the party responsible for payment.
///
/// A row is outstanding when nothing was received and something was
/// billed; zero-billed rows are not dues. CN numbers are deduplicated
/// order-preserving. Output is sorted by total due descending, then by
/// party name, with a grand-total row (empty CN list) appended.
pub fn build_dues_summary(shipments: &[EnrichedShipment]) -> Vec<DuesRow> {
    let mut groups: BTreeMap<String, (i64, Vec<String>, HashSet<String>)> = BTreeMap::new();

    for s in shipments {
        if s.manual_figures != 0 || s.sales_amount == 0 {
            continue;
        }
        let party = if s.payment_liability.is_empty() {
            "Unknown".to_string()
        } else {
            s.payment_liability.clone()
        };
        let entry = groups.entry(party).or_default();
        entry.0 += s.sales_amount;
        if entry.2.insert(s.cn_no.clone()) {
            entry.1.push(s.cn_no.clone());
        }
    }

    if groups.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<DuesRow> = groups
        .into_iter()
        .map(|(party, (total_due, cns, _))| DuesRow {
            party,
            total_due,
            pending_cns: cns.join(", "),
        })
        .collect();
    rows.sort_by(|a, b| b.total_due.cmp(&a.total_due).then(a.party.cmp(&b.party)));

    let total_due = rows.iter().map(|r| r.total_due).sum();
    rows.push(DuesRow {
        party: GRAND_TOTAL.into(),
        total_due,
        pending_cns: String::new(),
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::enrich::{enrich, testutil::shipment};
    use freightbook_core::SalesType;

    fn dues(rows: Vec<freightbook_core::ShipmentRecord>) -> Vec<DuesRow> {
        let config = ReportConfig::default();
        build_dues_summary(&enrich(&config, &rows))
    }

    fn with_party(
        cn: &str,
        party: &str,
        sales: i64,
        received: i64,
    ) -> freightbook_core::ShipmentRecord {
        let mut s = shipment(cn, "M1", "RAXAUL", SalesType::ToPay, sales, received);
        s.payment_liability = party.into();
        s
    }

    #[test]
    fn groups_and_sorts_descending() {
        let rows = dues(vec![
            with_party("CN1", "ACME", 10_000, 0),
            with_party("CN2", "ACME", 5_000, 0),
            with_party("CN3", "GUPTA", 40_000, 0),
        ]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].party, "GUPTA");
        assert_eq!(rows[0].total_due, 40_000);
        assert_eq!(rows[1].party, "ACME");
        assert_eq!(rows[1].total_due, 15_000);
        assert_eq!(rows[1].pending_cns, "CN1, CN2");
        assert_eq!(rows[2].party, GRAND_TOTAL);
        assert_eq!(rows[2].total_due, 55_000);
        assert_eq!(rows[2].pending_cns, "");
    }

    #[test]
    fn received_rows_never_included() {
        let rows = dues(vec![
            with_party("CN1", "ACME", 10_000, 10_000),
            with_party("CN2", "ACME", 10_000, 1),
        ]);
        assert!(rows.is_empty());
    }

    #[test]
    fn zero_billed_rows_are_not_dues() {
        let rows = dues(vec![with_party("CN1", "ACME", 0, 0)]);
        assert!(rows.is_empty());
    }

    #[test]
    fn duplicate_cns_listed_once() {
        let rows = dues(vec![
            with_party("CN1", "ACME", 10_000, 0),
            with_party("CN1", "ACME", 2_000, 0),
        ]);
        assert_eq!(rows[0].pending_cns, "CN1");
        assert_eq!(rows[0].total_due, 12_000);
    }

    #[test]
    fn blank_party_becomes_unknown() {
        let rows = dues(vec![with_party("CN1", "  ", 10_000, 0)]);
        assert_eq!(rows[0].party, "Unknown");
    }
}
