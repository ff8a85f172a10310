//! Stable exit codes for `profile-split` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// I/O failure or any other error.
pub const FAILED: i32 = 1;
/// Source document or one of its entries is malformed.
pub const MALFORMED_INPUT: i32 = 2;
