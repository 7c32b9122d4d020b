//! `abgleich-recon`: two-sided order reconciliation engine.
//!
//! Pure engine crate: receives loaded datasets, returns classified results.
//! No CLI or spreadsheet IO dependencies.

pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod export;
pub mod matcher;
pub mod model;
pub mod normalize;

pub use config::{KeywordTable, ReconConfig, Role, SideLabels};
pub use detect::{detect_columns, ColumnMapping};
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{EntryKind, ReconEntry, ReconResult, ReconSummary, RowPayload};
