use crate::matcher::{JoinOutput, OrderedIndex};
use crate::model::{EntryKind, ReconSummary};

/// Compute summary statistics from a join and the two indexes it consumed.
pub fn compute_summary(
    join: &JoinOutput,
    rows_a: usize,
    rows_b: usize,
    index_a: &IndexStats,
    index_b: &IndexStats,
) -> ReconSummary {
    let mut summary = ReconSummary {
        rows_a,
        rows_b,
        total_amount_a: index_a.total_amount,
        total_amount_b: index_b.total_amount,
        duplicate_keys_a: index_a.duplicates,
        duplicate_keys_b: index_b.duplicates,
        ..ReconSummary::default()
    };

    // Both lists, bucketed by kind
    for entry in join.matches.iter().chain(&join.discrepancies) {
        match entry.kind() {
            EntryKind::Match => summary.matches += 1,
            EntryKind::AmountMismatch => summary.amount_mismatches += 1,
            EntryKind::MissingInA => summary.missing_in_a += 1,
            EntryKind::MissingInB => summary.missing_in_b += 1,
        }
        if entry.is_discrepancy() {
            summary.discrepancies += 1;
        }
    }
    summary
}

/// Totals captured from an index before the join consumes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    pub total_amount: f64,
    pub duplicates: usize,
}

impl From<&OrderedIndex> for IndexStats {
    fn from(index: &OrderedIndex) -> Self {
        Self {
            total_amount: index.total_amount(),
            duplicates: index.duplicates(),
        }
    }
}
