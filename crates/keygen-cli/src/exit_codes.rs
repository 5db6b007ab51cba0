//! Process exit codes.
//!
//! Library errors choose their own code via `VerifyError::exit_code`; these
//! cover outcomes decided by the CLI itself.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INTERNAL_ERROR: i32 = 2; // Usage error or failure outside the library taxonomy
