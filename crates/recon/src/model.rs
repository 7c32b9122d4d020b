use abgleich_core::CellValue;
use serde::Serialize;

use crate::config::SideLabels;
use crate::detect::ColumnMapping;

// ---------------------------------------------------------------------------
// Row payload
// ---------------------------------------------------------------------------

/// One side's view of a keyed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPayload {
    /// Data-row index, 0-based, header excluded.
    pub row_index: usize,
    pub amount: f64,
    pub date: String,
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Match,
    AmountMismatch,
    MissingInA,
    MissingInB,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "Match"),
            Self::AmountMismatch => write!(f, "AmountMismatch"),
            Self::MissingInA => write!(f, "MissingInA"),
            Self::MissingInB => write!(f, "MissingInB"),
        }
    }
}

/// Outcome for one distinct order number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ReconEntry {
    Match {
        order_number: String,
        amount: f64,
        a: RowPayload,
        b: RowPayload,
    },
    AmountMismatch {
        order_number: String,
        amount_a: f64,
        amount_b: f64,
        difference: f64,
        a: RowPayload,
        b: RowPayload,
    },
    /// Present on side B only.
    MissingInA { order_number: String, b: RowPayload },
    /// Present on side A only.
    MissingInB { order_number: String, a: RowPayload },
}

impl ReconEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Match { .. } => EntryKind::Match,
            Self::AmountMismatch { .. } => EntryKind::AmountMismatch,
            Self::MissingInA { .. } => EntryKind::MissingInA,
            Self::MissingInB { .. } => EntryKind::MissingInB,
        }
    }

    pub fn order_number(&self) -> &str {
        match self {
            Self::Match { order_number, .. }
            | Self::AmountMismatch { order_number, .. }
            | Self::MissingInA { order_number, .. }
            | Self::MissingInB { order_number, .. } => order_number,
        }
    }

    pub fn amount_a(&self) -> Option<f64> {
        match self {
            Self::Match { amount, .. } => Some(*amount),
            Self::AmountMismatch { amount_a, .. } => Some(*amount_a),
            Self::MissingInB { a, .. } => Some(a.amount),
            Self::MissingInA { .. } => None,
        }
    }

    pub fn amount_b(&self) -> Option<f64> {
        match self {
            Self::Match { b, .. } => Some(b.amount),
            Self::AmountMismatch { amount_b, .. } => Some(*amount_b),
            Self::MissingInA { b, .. } => Some(b.amount),
            Self::MissingInB { .. } => None,
        }
    }

    pub fn difference(&self) -> Option<f64> {
        match self {
            Self::AmountMismatch { difference, .. } => Some(*difference),
            _ => None,
        }
    }

    pub fn is_discrepancy(&self) -> bool {
        !matches!(self, Self::Match { .. })
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub rows_a: usize,
    pub rows_b: usize,
    pub matches: usize,
    pub amount_mismatches: usize,
    pub missing_in_a: usize,
    pub missing_in_b: usize,
    pub discrepancies: usize,
    pub total_amount_a: f64,
    pub total_amount_b: f64,
    pub duplicate_keys_a: usize,
    pub duplicate_keys_b: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub mapping_a: ColumnMapping,
    pub mapping_b: ColumnMapping,
    pub matches: Vec<ReconEntry>,
    pub discrepancies: Vec<ReconEntry>,
    pub summary: ReconSummary,
    pub warnings: Vec<String>,
}

impl ReconResult {
    pub fn has_discrepancies(&self) -> bool {
        self.summary.discrepancies > 0
    }

    /// Matches first, then discrepancies, in emission order.
    pub fn entries(&self) -> impl Iterator<Item = &ReconEntry> {
        self.matches.iter().chain(self.discrepancies.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub labels: SideLabels,
    pub tolerance: f64,
    pub engine_version: String,
    pub run_at: String,
}
