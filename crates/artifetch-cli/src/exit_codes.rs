//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure, including failed downloads
pub const ERROR: i32 = 1;

/// Not found - unknown account, artifact name or version
pub const NOT_FOUND: i32 = 2;

/// IO error - output file could not be written
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or configuration (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
