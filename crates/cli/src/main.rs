// Abgleich CLI - reconcile two order exports, reorder spreadsheet rows

mod exit_codes;
mod recon;
mod reorder;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use abgleich_core::Dataset;
use abgleich_io::ReadError;
use abgleich_recon::{ReconConfig, ReconError};

use exit_codes::{EXIT_CONFIG, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "abgleich")]
#[command(about = "Reconcile a Protokoll export against an Abrechnung export")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match two files by order number and report discrepancies
    #[command(after_help = "\
Examples:
  abgleich recon protokoll.xlsx abrechnung.csv
  abgleich recon a.xlsx b.xlsx --sheet-a Juli --sheet-b Export
  abgleich recon a.csv b.csv --config shop.recon.toml --json
  abgleich recon a.csv b.csv --output result.json --csv result.csv

Exit codes:
  0  no discrepancies
  1  discrepancies found
  2  usage error
  3  input unreadable / output not writable
  4  invalid config")]
    Recon {
        /// Side A file (xlsx, xls, xlsb, ods, csv, tsv)
        a: PathBuf,

        /// Side B file
        b: PathBuf,

        /// Worksheet to read from side A (default: first sheet)
        #[arg(long)]
        sheet_a: Option<String>,

        /// Worksheet to read from side B (default: first sheet)
        #[arg(long)]
        sheet_b: Option<String>,

        /// TOML config with labels, keywords and tolerance
        #[arg(long, env = "ABGLEICH_CONFIG")]
        config: Option<PathBuf>,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the flat CSV report to a file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show which columns hold order number, amount and date
    #[command(after_help = "\
Examples:
  abgleich detect protokoll.xlsx
  abgleich detect export.csv --config shop.recon.toml")]
    Detect {
        file: PathBuf,

        #[arg(long)]
        sheet: Option<String>,

        #[arg(long, env = "ABGLEICH_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Move selected data rows and write the result as CSV
    #[command(after_help = "\
Indices count data rows from 0; the header row is not counted and stays first.

Examples:
  abgleich reorder list.csv --select 1,3 --to 0
  abgleich reorder list.xlsx --select 2-4 --down --output moved.csv")]
    Reorder {
        file: PathBuf,

        /// Rows to move: comma-separated indices and ranges, e.g. 1,3,5-7
        #[arg(long, required = true)]
        select: String,

        /// Move the selection in front of this row
        #[arg(long, conflicts_with_all = ["up", "down"])]
        to: Option<usize>,

        /// Move the selection one row up
        #[arg(long, conflicts_with = "down")]
        up: bool,

        /// Move the selection one row down
        #[arg(long)]
        down: bool,

        #[arg(long)]
        sheet: Option<String>,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
        "\ntarget:  ",
        env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recon {
            a,
            b,
            sheet_a,
            sheet_b,
            config,
            json,
            output,
            csv,
        } => recon::cmd_recon(recon::ReconArgs {
            a,
            b,
            sheet_a,
            sheet_b,
            config,
            json,
            output,
            csv,
        }),
        Commands::Detect {
            file,
            sheet,
            config,
        } => recon::cmd_detect(file, sheet, config),
        Commands::Reorder {
            file,
            select,
            to,
            up,
            down,
            sheet,
            output,
        } => {
            let movement = match (to, up, down) {
                (Some(t), _, _) => Ok(reorder::Movement::To(t)),
                (None, true, _) => Ok(reorder::Movement::Up),
                (None, false, true) => Ok(reorder::Movement::Down),
                (None, false, false) => Err(CliError {
                    code: EXIT_USAGE,
                    message: "no movement given".to_string(),
                    hint: Some("pass one of --to INDEX, --up or --down".to_string()),
                }),
            };
            movement.and_then(|m| reorder::cmd_reorder(file, &select, m, sheet, output))
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReadError> for CliError {
    fn from(e: ReadError) -> Self {
        let hint = match &e {
            ReadError::UnsupportedFormat(_) => {
                Some("supported: .xlsx .xlsm .xls .xlsb .ods .csv .tsv .txt".to_string())
            }
            ReadError::Sheet(_) => Some("sheet names are case-sensitive".to_string()),
            _ => None,
        };
        Self {
            code: EXIT_IO,
            message: e.to_string(),
            hint,
        }
    }
}

impl From<ReconError> for CliError {
    fn from(e: ReconError) -> Self {
        let code = match e {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
            ReconError::Csv(_) | ReconError::Io(_) => EXIT_IO,
        };
        Self {
            code,
            message: e.to_string(),
            hint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared loaders
// ---------------------------------------------------------------------------

/// Read a file into a dataset whose first row is the header.
pub fn load_dataset(path: &Path, sheet: Option<&str>) -> Result<Dataset, CliError> {
    let matrix = abgleich_io::read_matrix(path, sheet)?;
    Dataset::from_matrix(matrix)
        .ok_or_else(|| CliError::io(format!("{}: file is empty", path.display())))
}

pub fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    match path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            Ok(ReconConfig::from_file(p)?)
        }
        None => Ok(ReconConfig::default()),
    }
}
