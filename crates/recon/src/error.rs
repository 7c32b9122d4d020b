use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty keyword list, bad tolerance, etc.).
    ConfigValidation(String),
    /// CSV export error.
    Csv(String),
    /// IO error (file read/write).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<csv::Error> for ReconError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
