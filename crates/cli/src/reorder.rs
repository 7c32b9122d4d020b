//! `abgleich reorder`: select data rows, move them, write CSV.

use std::path::PathBuf;

use abgleich_core::{CellValue, RowTable};

use crate::{load_dataset, CliError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// In front of the given data row.
    To(usize),
    Up,
    Down,
}

pub fn cmd_reorder(
    file: PathBuf,
    select: &str,
    movement: Movement,
    sheet: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let dataset = load_dataset(&file, sheet.as_deref())?;
    let indices = parse_selection(select)?;

    let mut matrix = dataset.into_matrix();
    let data_rows = matrix.split_off(1);
    let row_count = data_rows.len();
    let mut table = RowTable::new(data_rows);

    for &i in &indices {
        if !table.select(i) {
            return Err(CliError::usage(format!(
                "row {i} is out of range ({} data rows)",
                row_count
            ))
            .with_hint("indices count data rows from 0, the header is not counted"));
        }
    }

    let moved = match movement {
        Movement::To(target) if target >= row_count => {
            return Err(CliError::usage(format!(
                "--to {target} is out of range ({row_count} data rows)"
            )));
        }
        Movement::To(target) => table.move_selection_to(target),
        Movement::Up => table.move_selection_up(),
        Movement::Down => table.move_selection_down(),
    };

    if moved {
        log::info!(
            "moved {} row(s); now at {:?}",
            table.selection().len(),
            table.selection().indices()
        );
    } else {
        eprintln!("nothing moved; writing rows unchanged");
    }

    matrix.extend(table.into_rows());
    write_output(&matrix, output)
}

fn write_output(matrix: &[Vec<CellValue>], output: Option<PathBuf>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            abgleich_io::csv::write_matrix_file(matrix, &path)?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let stdout = std::io::stdout();
            abgleich_io::csv::write_matrix(matrix, stdout.lock())?;
            Ok(())
        }
    }
}

/// Parse `1,3,5-7` into indices. Ranges are inclusive and may run backwards.
pub fn parse_selection(list: &str) -> Result<Vec<usize>, CliError> {
    let bad = |part: &str| {
        CliError::usage(format!("invalid --select entry '{part}'"))
            .with_hint("use comma-separated indices and ranges, e.g. 1,3,5-7")
    };

    let mut indices = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: usize = lo.trim().parse().map_err(|_| bad(part))?;
                let hi: usize = hi.trim().parse().map_err(|_| bad(part))?;
                indices.extend(lo.min(hi)..=lo.max(hi));
            }
            None => indices.push(part.parse().map_err(|_| bad(part))?),
        }
    }

    if indices.is_empty() {
        return Err(CliError::usage("--select names no rows"));
    }
    Ok(indices)
}
