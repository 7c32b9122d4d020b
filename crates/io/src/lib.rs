// Spreadsheet reading: workbooks via calamine, delimited text via csv

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::Path;

use abgleich_core::Matrix;

#[derive(Debug)]
pub enum ReadError {
    /// Extension is not a known workbook or delimited-text format.
    UnsupportedFormat(String),
    /// Workbook could not be opened.
    Open(String),
    /// Requested sheet is missing or unreadable.
    Sheet(String),
    /// Malformed delimited text.
    Csv(String),
    Io(String),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            Self::Open(msg) => write!(f, "cannot open workbook: {msg}"),
            Self::Sheet(msg) => write!(f, "sheet error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<::csv::Error> for ReadError {
    fn from(e: ::csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<std::io::Error> for ReadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Workbook,
    Delimited,
    Tsv,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, ReadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "txt" => Ok(Self::Delimited),
            "tsv" => Ok(Self::Tsv),
            "" => Err(ReadError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(ReadError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Read a file into a row-major cell matrix, row 0 being the header.
///
/// `sheet` picks a worksheet by name in workbooks (first sheet when `None`)
/// and is ignored for delimited text.
pub fn read_matrix(path: &Path, sheet: Option<&str>) -> Result<Matrix, ReadError> {
    let format = Format::from_path(path)?;
    if sheet.is_some() && format != Format::Workbook {
        log::debug!("{}: sheet name ignored for delimited text", path.display());
    }
    let matrix = match format {
        Format::Workbook => xlsx::read(path, sheet)?,
        Format::Delimited => csv::read(path)?,
        Format::Tsv => csv::read_with_delimiter(path, b'\t')?,
    };
    log::debug!("{}: read {} row(s)", path.display(), matrix.len());
    Ok(matrix)
}
