use chrono::NaiveDate;

use freightbook_core::{reconcile, Reconciliation, SalesType, ShipmentRecord};

use crate::config::ReportConfig;

/// A shipment row after the enrichment pass: amounts clamped, destination
/// canonicalized, receipt location resolved, reconciliation derived.
#[derive(Debug, Clone)]
pub struct EnrichedShipment {
    pub cn_no: String,
    pub manifest_no: String,
    pub manifest_date: NaiveDate,
    pub origin: String,
    /// Canonical destination branch.
    pub destination: String,
    pub payment_liability: String,
    pub sales_type: SalesType,
    pub sales_amount: i64,
    pub manual_figures: i64,
    /// Where the money for this row is received: HO for HO-billed sales
    /// types, otherwise the destination branch.
    pub receipt_location: String,
    pub recon: Reconciliation,
}

/// Run the enrichment pass over raw shipment rows. Row order is preserved;
/// the derivation has no cross-row dependencies.
pub fn enrich(config: &ReportConfig, shipments: &[ShipmentRecord]) -> Vec<EnrichedShipment> {
    shipments
        .iter()
        .map(|s| {
            let sales_amount = s.sales_amount.max(0);
            let manual_figures = s.manual_figures.max(0);
            let destination = config.canonical(&s.destination);
            let receipt_location = if config.receipts_at_ho(s.sales_type) {
                config.ho_name.clone()
            } else {
                destination.clone()
            };
            EnrichedShipment {
                cn_no: s.cn_no.clone(),
                manifest_no: s.manifest_no.clone(),
                manifest_date: s.manifest_date,
                origin: s.origin.trim().to_string(),
                destination,
                payment_liability: s.payment_liability.trim().to_string(),
                sales_type: s.sales_type,
                sales_amount,
                manual_figures,
                receipt_location,
                recon: reconcile(sales_amount, manual_figures),
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Shipment row factory shared by the report builder tests.
    pub fn shipment(
        cn_no: &str,
        manifest_no: &str,
        destination: &str,
        sales_type: SalesType,
        sales_amount: i64,
        manual_figures: i64,
    ) -> ShipmentRecord {
        ShipmentRecord {
            cn_no: cn_no.into(),
            manifest_no: manifest_no.into(),
            manifest_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            cn_date: None,
            consignor: "ACME TRADERS".into(),
            consignee: "GUPTA & SONS".into(),
            payment_liability: "Consignor".into(),
            pkgs: 1,
            pkg_type: "Box".into(),
            actual_wt: "10kg".into(),
            invoice_no: String::new(),
            origin: "PATNA".into(),
            destination: destination.into(),
            sales_type,
            sales_amount,
            manual_figures,
            remarks: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::shipment;
    use super::*;

    #[test]
    fn receipt_location_routing() {
        let config = ReportConfig::default();
        let rows = vec![
            shipment("CN1", "M1", "Raxaul", SalesType::Paid, 100_000, 0),
            shipment("CN2", "M1", "Raxaul", SalesType::ToPay, 50_000, 0),
            shipment("CN3", "M1", "Raxaul", SalesType::ToBeBilled, 20_000, 0),
        ];
        let enriched = enrich(&config, &rows);
        assert_eq!(enriched[0].receipt_location, config.ho_name);
        assert_eq!(enriched[1].receipt_location, "RAXAUL");
        assert_eq!(enriched[2].receipt_location, config.ho_name);
    }

    #[test]
    fn clamps_before_derivation() {
        let config = ReportConfig::default();
        let mut row = shipment("CN1", "M1", "Raxaul", SalesType::ToPay, 100_000, 0);
        row.manual_figures = -40;
        let enriched = enrich(&config, &[row]);
        assert_eq!(enriched[0].manual_figures, 0);
        assert_eq!(enriched[0].recon.due, 100_000);
    }

    #[test]
    fn destination_canonicalized() {
        let config = ReportConfig::default();
        let rows = vec![shipment(
            "CN1",
            "M1",
            " Patna (Jamal Road) ",
            SalesType::ToPay,
            100,
            0,
        )];
        let enriched = enrich(&config, &rows);
        assert_eq!(enriched[0].destination, config.ho_name);
    }
}
