//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part
//! of the shell contract — scripts rely on them.
//!
//! | Code | Description                                          |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (bad data, export failure)             |
//! | 2    | Usage error (bad args, unparseable dates)            |
//! | 4    | Partial import (some rows written, some rejected)    |
//! | 5    | Store unavailable (cannot open or query the ledger)  |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Bulk import wrote some rows and rejected others. The written rows
/// stay committed; stderr lists the rejects.
pub const EXIT_PARTIAL_IMPORT: u8 = 4;

/// Ledger database cannot be opened or queried.
pub const EXIT_STORE: u8 = 5;
