//! Flat CSV export of a reconciliation result.

use std::io::Write;
use std::path::Path;

use crate::config::SideLabels;
use crate::error::ReconError;
use crate::model::{ReconEntry, ReconResult};

pub const CSV_HEADER: [&str; 6] = [
    "Type",
    "Order Number",
    "Side-A Amount",
    "Side-B Amount",
    "Difference",
    "Message",
];

/// Write matches, then discrepancies, one row per entry.
pub fn write_csv<W: Write>(result: &ReconResult, writer: W) -> Result<(), ReconError> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    for entry in result.entries() {
        writer.write_record([
            entry.kind().to_string(),
            entry.order_number().to_string(),
            format_amount(entry.amount_a()),
            format_amount(entry.amount_b()),
            format_amount(entry.difference()),
            message(entry, &result.meta.labels),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_file(result: &ReconResult, path: &Path) -> Result<(), ReconError> {
    let file = std::fs::File::create(path)
        .map_err(|e| ReconError::Io(format!("cannot create {}: {e}", path.display())))?;
    write_csv(result, std::io::BufWriter::new(file))
}

pub fn to_csv_string(result: &ReconResult) -> Result<String, ReconError> {
    let mut buf = Vec::new();
    write_csv(result, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReconError::Csv(e.to_string()))
}

fn format_amount(amount: Option<f64>) -> String {
    amount.map(|a| format!("{a:.2}")).unwrap_or_default()
}

fn message(entry: &ReconEntry, labels: &SideLabels) -> String {
    match entry {
        ReconEntry::Match { .. } => "amounts match".to_string(),
        ReconEntry::AmountMismatch {
            amount_a, amount_b, ..
        } => format!(
            "amount differs: {} {amount_a:.2} vs {} {amount_b:.2}",
            labels.a, labels.b
        ),
        ReconEntry::MissingInA { .. } => format!("missing in {}", labels.a),
        ReconEntry::MissingInB { .. } => format!("missing in {}", labels.b),
    }
}
