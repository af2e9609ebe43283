use crate::branch_summary::build_branch_summary;
use crate::config::ReportConfig;
use crate::dues::build_dues_summary;
use crate::enrich::enrich;
use crate::manifest::build_manifest_comparison;
use crate::model::{ReportInput, ReportMeta, ReportSet};
use crate::pnl::build_pnl;

/// Run the full report pipeline for one period: enrich once, then build
/// the four report tables from the same enriched rows.
pub fn run(config: &ReportConfig, input: &ReportInput) -> ReportSet {
    let enriched = enrich(config, &input.shipments);

    ReportSet {
        meta: ReportMeta {
            config_name: config.name.clone(),
            period: input.period,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        branch_summary: build_branch_summary(
            config,
            &enriched,
            &input.branch_expenses,
            &input.ho_expenses,
            &input.mappings,
        ),
        manifest_comparison: build_manifest_comparison(&enriched),
        dues: build_dues_summary(&enriched),
        pnl: build_pnl(&enriched, &input.branch_expenses, &input.ho_expenses),
    }
}
