//! CLI Exit Code Registry
//!
//! Single source of truth for the exit codes of `abgleich`. Scripts rely on
//! them, so codes are never renumbered.
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success; for `recon`, no discrepancies              |
//! | 1    | `recon` found discrepancies                         |
//! | 2    | Usage error (bad arguments, bad selection)          |
//! | 3    | Input could not be read or output not written       |
//! | 4    | Config file invalid                                 |

/// Success - command completed; `recon` found no discrepancies.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation found at least one discrepancy.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_RECON_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, out-of-range indices.
pub const EXIT_USAGE: u8 = 2;

/// IO error - unreadable input, unsupported format, failed write.
pub const EXIT_IO: u8 = 3;

/// Config error - TOML parse or validation failure.
pub const EXIT_CONFIG: u8 = 4;
