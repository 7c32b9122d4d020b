// Excel/ODS import (xlsx, xlsm, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use abgleich_core::{CellValue, Matrix};

use crate::ReadError;

/// Read one worksheet into a matrix.
///
/// The matrix starts at the sheet's first used cell, so a header in row 3
/// still becomes row 0. `sheet` selects by exact name, the first sheet
/// otherwise.
pub fn read(path: &Path, sheet: Option<&str>) -> Result<Matrix, ReadError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReadError::Open(format!("{}: {e}", path.display())))?;

    let sheet_names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| {
                ReadError::Sheet(format!(
                    "no sheet named '{wanted}' (available: {})",
                    sheet_names.join(", ")
                ))
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReadError::Sheet("workbook contains no sheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ReadError::Sheet(format!("failed to read sheet '{name}': {e}")))?;

    let (height, width) = range.get_size();
    log::debug!("{}: sheet '{name}' is {height}x{width}", path.display());

    Ok(range
        .rows()
        .map(|row| row.iter().map(convert).collect())
        .collect())
}

fn convert(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        // Serial date, 1900 system
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}
