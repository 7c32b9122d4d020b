use abgleich_core::Dataset;

use crate::config::ReconConfig;
use crate::detect::{detect_columns, ColumnMapping};
use crate::evidence::{compute_summary, IndexStats};
use crate::matcher::{match_indexes, OrderedIndex};
use crate::model::{ReconMeta, ReconResult, ReconSummary};

/// Reconcile side A against side B.
///
/// Returns `None` while either side is still missing. When no order-number
/// column can be found on one of the sides, the result is empty with a
/// zero-filled summary and a warning; this never fails.
pub fn reconcile(
    a: Option<&Dataset>,
    b: Option<&Dataset>,
    config: &ReconConfig,
) -> Option<ReconResult> {
    let (a, b) = (a?, b?);
    Some(run(a, b, config))
}

/// Reconcile two loaded datasets.
pub fn run(a: &Dataset, b: &Dataset, config: &ReconConfig) -> ReconResult {
    let labels = &config.labels;
    let mapping_a = detect_columns(a.header(), &config.keywords);
    let mapping_b = detect_columns(b.header(), &config.keywords);

    let mut warnings = Vec::new();
    let meta = ReconMeta {
        labels: labels.clone(),
        tolerance: config.tolerance.amount,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
    };

    let (order_a, order_b) = match (mapping_a.order_number, mapping_b.order_number) {
        (Some(oa), Some(ob)) => (oa, ob),
        (oa, ob) => {
            for (present, label) in [(oa, &labels.a), (ob, &labels.b)] {
                if present.is_none() {
                    warn(&mut warnings, format!("{label}: no order number column found"));
                }
            }
            return ReconResult {
                meta,
                mapping_a,
                mapping_b,
                matches: Vec::new(),
                discrepancies: Vec::new(),
                summary: ReconSummary::default(),
                warnings,
            };
        }
    };

    check_amount_column(&mapping_a, &labels.a, &mut warnings);
    check_amount_column(&mapping_b, &labels.b, &mut warnings);

    let index_a = OrderedIndex::build(a, order_a, &mapping_a);
    let index_b = OrderedIndex::build(b, order_b, &mapping_b);

    for (index, label) in [(&index_a, &labels.a), (&index_b, &labels.b)] {
        if index.duplicates() > 0 {
            warn(
                &mut warnings,
                format!(
                    "{label}: {} row(s) repeat an order number; the last occurrence is compared",
                    index.duplicates()
                ),
            );
        }
    }

    let stats_a = IndexStats::from(&index_a);
    let stats_b = IndexStats::from(&index_b);
    let join = match_indexes(index_a, index_b, config.tolerance.amount);
    let summary = compute_summary(&join, a.row_count(), b.row_count(), &stats_a, &stats_b);

    log::debug!(
        "reconciled {} vs {} rows: {} matches, {} discrepancies",
        summary.rows_a,
        summary.rows_b,
        summary.matches,
        summary.discrepancies
    );

    ReconResult {
        meta,
        mapping_a,
        mapping_b,
        matches: join.matches,
        discrepancies: join.discrepancies,
        summary,
        warnings,
    }
}

// A side without an amount column compares every amount as 0.
fn check_amount_column(mapping: &ColumnMapping, label: &str, warnings: &mut Vec<String>) {
    if mapping.amount.is_none() {
        warn(
            warnings,
            format!("{label}: no amount column found; amounts are treated as 0"),
        );
    }
}

fn warn(warnings: &mut Vec<String>, msg: String) {
    log::warn!("{msg}");
    warnings.push(msg);
}
