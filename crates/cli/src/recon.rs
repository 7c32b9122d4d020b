//! `abgleich recon` and `abgleich detect`.

use std::path::PathBuf;

use abgleich_recon::export::write_csv_file;
use abgleich_recon::{detect_columns, run, ReconEntry, ReconResult, Role};

use crate::exit_codes::EXIT_RECON_DISCREPANCIES;
use crate::{load_config, load_dataset, CliError};

pub struct ReconArgs {
    pub a: PathBuf,
    pub b: PathBuf,
    pub sheet_a: Option<String>,
    pub sheet_b: Option<String>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

pub fn cmd_recon(args: ReconArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let a = load_dataset(&args.a, args.sheet_a.as_deref())?;
    let b = load_dataset(&args.b, args.sheet_b.as_deref())?;

    let result = run(&a, &b, &config);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = args.csv {
        write_csv_file(&result, path)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    } else {
        print_report(&result);
    }

    if result.has_discrepancies() {
        return Err(CliError {
            code: EXIT_RECON_DISCREPANCIES,
            message: format!("{} discrepancies found", result.summary.discrepancies),
            hint: None,
        });
    }
    Ok(())
}

fn print_report(result: &ReconResult) {
    let labels = &result.meta.labels;
    let s = &result.summary;

    println!(
        "{}: {} rows, total {:.2}  |  {}: {} rows, total {:.2}  (tolerance {})",
        labels.a,
        s.rows_a,
        s.total_amount_a,
        labels.b,
        s.rows_b,
        s.total_amount_b,
        result.meta.tolerance
    );
    println!(
        "{} matched, {} amount mismatches, {} missing in {}, {} missing in {}",
        s.matches, s.amount_mismatches, s.missing_in_a, labels.a, s.missing_in_b, labels.b
    );

    if result.discrepancies.is_empty() {
        return;
    }
    println!();
    let width = result
        .discrepancies
        .iter()
        .map(|e| e.order_number().chars().count())
        .max()
        .unwrap_or(0);
    for entry in &result.discrepancies {
        let detail = match entry {
            ReconEntry::AmountMismatch {
                amount_a,
                amount_b,
                difference,
                ..
            } => format!(
                "{} {amount_a:.2}  {} {amount_b:.2}  diff {difference:.2}",
                labels.a, labels.b
            ),
            ReconEntry::MissingInA { b, .. } => {
                format!("only in {} (row {}, {:.2})", labels.b, b.row_index + 2, b.amount)
            }
            ReconEntry::MissingInB { a, .. } => {
                format!("only in {} (row {}, {:.2})", labels.a, a.row_index + 2, a.amount)
            }
            ReconEntry::Match { .. } => continue,
        };
        println!(
            "{:<15} {:<width$}  {detail}",
            entry.kind().to_string(),
            entry.order_number()
        );
    }
}

pub fn cmd_detect(
    file: PathBuf,
    sheet: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let dataset = load_dataset(&file, sheet.as_deref())?;
    let mapping = detect_columns(dataset.header(), &config.keywords);

    for role in Role::ALL {
        match mapping.get(role) {
            Some(col) => println!(
                "{:<13} {:>3}  {}  \"{}\"",
                role.to_string(),
                col_letter(col),
                col,
                dataset.header()[col]
            ),
            None => println!("{:<13} (not found)", role.to_string()),
        }
    }

    if mapping.order_number.is_none() {
        eprintln!("warning: no order number column; recon on this file yields no entries");
    }
    Ok(())
}

/// Spreadsheet column name for a 0-based index (0 = A, 26 = AA).
fn col_letter(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
