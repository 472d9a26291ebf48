//! Standard exit codes (BSD sysexits.h compatible)

/// Requested key has no value
pub const NOTFOUND: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error
pub const DATAERR: i32 = 65;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Permission denied (no usable credential)
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Terminated by user interrupt (128 + SIGINT)
pub const INTERRUPTED: i32 = 130;
