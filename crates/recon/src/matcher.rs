use std::collections::HashMap;

use abgleich_core::Dataset;

use crate::detect::ColumnMapping;
use crate::model::{ReconEntry, RowPayload};
use crate::normalize::{normalize_date, normalize_order_number, parse_amount};

// ---------------------------------------------------------------------------
// Ordered index
// ---------------------------------------------------------------------------

/// Normalized order number → row payload, iterated in first-insertion order.
///
/// A repeated key keeps its original position and takes the later row's
/// payload. Removed keys drop out of iteration.
#[derive(Debug, Default)]
pub struct OrderedIndex {
    order: Vec<String>,
    rows: HashMap<String, RowPayload>,
    duplicates: usize,
    total_amount: f64,
}

impl OrderedIndex {
    /// Index every data row of `dataset` by its normalized order number.
    /// Rows with an empty key are skipped and do not count toward totals.
    pub fn build(dataset: &Dataset, order_col: usize, mapping: &ColumnMapping) -> Self {
        let mut index = Self::default();

        for (row_index, row) in dataset.rows().iter().enumerate() {
            let key = normalize_order_number(dataset.cell(row_index, order_col));
            if key.is_empty() {
                continue;
            }

            let amount = mapping
                .amount
                .map(|c| parse_amount(dataset.cell(row_index, c)))
                .unwrap_or(0.0);
            let date = mapping
                .date
                .map(|c| normalize_date(dataset.cell(row_index, c)))
                .unwrap_or_default();

            index.insert(
                key,
                RowPayload {
                    row_index,
                    amount,
                    date,
                    cells: row.clone(),
                },
            );
        }

        index
    }

    pub fn insert(&mut self, key: String, payload: RowPayload) {
        self.total_amount += payload.amount;
        if self.rows.contains_key(&key) {
            self.duplicates += 1;
        } else {
            self.order.push(key.clone());
        }
        self.rows.insert(key, payload);
    }

    pub fn remove(&mut self, key: &str) -> Option<RowPayload> {
        self.rows.remove(key)
    }

    /// Consume into live entries in insertion order.
    pub fn into_entries(mut self) -> Vec<(String, RowPayload)> {
        self.order
            .into_iter()
            .filter_map(|k| self.rows.remove(&k).map(|p| (k, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose key was already present.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Sum of amounts over all keyed rows.
    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct JoinOutput {
    pub matches: Vec<ReconEntry>,
    pub discrepancies: Vec<ReconEntry>,
}

/// Two amounts agree when identical or strictly closer than `tolerance`.
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    diff == 0.0 || diff < tolerance
}

/// Join A against B by key.
///
/// Walks A in insertion order, consuming matching keys from B; whatever is
/// left in B afterwards is reported as missing in A, in B's order.
pub fn match_indexes(a: OrderedIndex, mut b: OrderedIndex, tolerance: f64) -> JoinOutput {
    let mut out = JoinOutput::default();

    for (key, a_row) in a.into_entries() {
        match b.remove(&key) {
            None => out.discrepancies.push(ReconEntry::MissingInB {
                order_number: key,
                a: a_row,
            }),
            Some(b_row) if within_tolerance(a_row.amount, b_row.amount, tolerance) => {
                out.matches.push(ReconEntry::Match {
                    order_number: key,
                    amount: a_row.amount,
                    a: a_row,
                    b: b_row,
                });
            }
            Some(b_row) => out.discrepancies.push(ReconEntry::AmountMismatch {
                order_number: key,
                amount_a: a_row.amount,
                amount_b: b_row.amount,
                difference: (a_row.amount - b_row.amount).abs(),
                a: a_row,
                b: b_row,
            }),
        }
    }

    for (key, b_row) in b.into_entries() {
        out.discrepancies.push(ReconEntry::MissingInA {
            order_number: key,
            b: b_row,
        });
    }

    out
}
