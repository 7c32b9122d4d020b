//! `abgleich-core`: cells, tabular datasets, and the row selection/reorder engine.
//!
//! Pure in-memory types. No IO.

pub mod cell;
pub mod dataset;
pub mod history;
pub mod selection;
pub mod table;

pub use cell::CellValue;
pub use dataset::{Dataset, Matrix};
pub use selection::RowSelection;
pub use table::{ClickTarget, DragOperation, Modifiers, RowTable};
