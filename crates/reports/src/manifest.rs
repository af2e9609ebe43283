use std::collections::BTreeMap;

use chrono::NaiveDate;
use freightbook_core::SalesType;

use crate::enrich::EnrichedShipment;
use crate::model::{GRAND_TOTAL, ManifestComparisonRow};

/// Pivot shipments by manifest against sales type and join in the
/// receipts/discount/due/excess sums for the same manifest+destination,
/// with a cross-check `sum` column and a grand-total row.
pub fn build_manifest_comparison(shipments: &[EnrichedShipment]) -> Vec<ManifestComparisonRow> {
    if shipments.is_empty() {
        return Vec::new();
    }

    // Keyed by the full identity tuple. Rows claiming a different date or
    // origin for the same manifest are surfaced as separate lines rather
    // than silently collapsed.
    type GroupKey = (String, NaiveDate, String, String);
    let mut groups: BTreeMap<GroupKey, ManifestComparisonRow> = BTreeMap::new();

    for s in shipments {
        let key = (
            s.manifest_no.clone(),
            s.manifest_date,
            s.origin.clone(),
            s.destination.clone(),
        );
        let entry = groups.entry(key).or_insert_with(|| ManifestComparisonRow {
            manifest_no: s.manifest_no.clone(),
            manifest_date: Some(s.manifest_date),
            origin: s.origin.clone(),
            destination: s.destination.clone(),
            to_pay: 0,
            paid: 0,
            to_be_billed: 0,
            sum: 0,
            receipt: 0,
            discount: 0,
            due: 0,
            excess: 0,
        });

        match s.sales_type {
            SalesType::ToPay => entry.to_pay += s.sales_amount,
            SalesType::Paid => entry.paid += s.sales_amount,
            SalesType::ToBeBilled => entry.to_be_billed += s.sales_amount,
        }
        entry.receipt += s.manual_figures;
        entry.discount += s.recon.discount;
        entry.due += s.recon.due;
        entry.excess += s.recon.excess;
    }

    let mut rows: Vec<ManifestComparisonRow> = groups.into_values().collect();
    for r in &mut rows {
        r.sum = r.to_pay + r.paid + r.to_be_billed;
    }
    rows.sort_by(|a, b| {
        (a.manifest_date, &a.manifest_no, &a.destination, &a.origin)
            .cmp(&(b.manifest_date, &b.manifest_no, &b.destination, &b.origin))
    });

    let mut total = ManifestComparisonRow {
        manifest_no: GRAND_TOTAL.into(),
        manifest_date: None,
        origin: String::new(),
        destination: String::new(),
        to_pay: 0,
        paid: 0,
        to_be_billed: 0,
        sum: 0,
        receipt: 0,
        discount: 0,
        due: 0,
        excess: 0,
    };
    for r in &rows {
        total.to_pay += r.to_pay;
        total.paid += r.paid;
        total.to_be_billed += r.to_be_billed;
        total.sum += r.sum;
        total.receipt += r.receipt;
        total.discount += r.discount;
        total.due += r.due;
        total.excess += r.excess;
    }
    rows.push(total);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::enrich::{enrich, testutil::shipment};

    fn comparison(
        rows: Vec<freightbook_core::ShipmentRecord>,
    ) -> Vec<ManifestComparisonRow> {
        let config = ReportConfig::default();
        build_manifest_comparison(&enrich(&config, &rows))
    }

    #[test]
    fn pivots_by_sales_type() {
        let rows = comparison(vec![
            shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 100_000, 80_000),
            shipment("CN2", "M1", "RAXAUL", SalesType::Paid, 50_000, 50_000),
            shipment("CN3", "M1", "RAXAUL", SalesType::ToPay, 20_000, 0),
        ]);
        assert_eq!(rows.len(), 2); // one manifest group + grand total

        let m1 = &rows[0];
        assert_eq!(m1.manifest_no, "M1");
        assert_eq!(m1.to_pay, 120_000);
        assert_eq!(m1.paid, 50_000);
        assert_eq!(m1.to_be_billed, 0);
        assert_eq!(m1.sum, 170_000);
        assert_eq!(m1.receipt, 130_000);
        assert_eq!(m1.discount, 20_000);
        assert_eq!(m1.due, 20_000);
        assert_eq!(m1.excess, 0);
    }

    #[test]
    fn separate_destinations_separate_rows() {
        let rows = comparison(vec![
            shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 10_000, 0),
            shipment("CN2", "M1", "MOTIHARI", SalesType::ToPay, 20_000, 0),
        ]);
        assert_eq!(rows.len(), 3);
        let dests: Vec<&str> = rows[..2].iter().map(|r| r.destination.as_str()).collect();
        assert!(dests.contains(&"RAXAUL") && dests.contains(&"MOTIHARI"));
    }

    #[test]
    fn conflicting_origin_rows_stay_separate() {
        let a = shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 10_000, 0);
        let mut b = shipment("CN2", "M1", "RAXAUL", SalesType::ToPay, 20_000, 0);
        b.origin = "GAYA".into();
        let rows = comparison(vec![a, b]);

        // Two distinct lines + grand total, not one collapsed line
        assert_eq!(rows.len(), 3);
        let gaya = rows[..2].iter().find(|r| r.origin == "GAYA").unwrap();
        assert_eq!(gaya.to_pay, 20_000);
        let patna = rows[..2].iter().find(|r| r.origin == "PATNA").unwrap();
        assert_eq!(patna.to_pay, 10_000);
        assert_eq!(rows[2].sum, 30_000);
    }

    #[test]
    fn sum_column_checks_out_everywhere() {
        let rows = comparison(vec![
            shipment("CN1", "M1", "RAXAUL", SalesType::ToPay, 10_000, 0),
            shipment("CN2", "M2", "RAXAUL", SalesType::Paid, 20_000, 20_000),
            shipment("CN3", "M2", "RAXAUL", SalesType::ToBeBilled, 5_000, 0),
        ]);
        for r in &rows {
            assert_eq!(r.sum, r.to_pay + r.paid + r.to_be_billed, "{}", r.manifest_no);
        }
    }

    #[test]
    fn grand_total_labelled_and_dateless() {
        let rows = comparison(vec![shipment(
            "CN1", "M1", "RAXAUL", SalesType::ToPay, 10_000, 0,
        )]);
        let total = rows.last().unwrap();
        assert_eq!(total.manifest_no, GRAND_TOTAL);
        assert!(total.manifest_date.is_none());
        assert_eq!(total.to_pay, 10_000);
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(comparison(vec![]).is_empty());
    }
}
