//! # zipfix
//!
//! Clear pseudo-encryption flags from ZIP archives.
//!
//! Some archives set the "encrypted" bit in their headers even though the
//! entry data is stored in the clear, so extractors prompt for a password
//! that does not exist. This crate locates every local file header and
//! central directory header by signature and clears the flag byte when it
//! is odd, keeping a backup of the original bytes next to the archive.
//!
//! ## Features
//!
//! - Signature scan over the raw bytes, no structural parsing required
//! - Backup of the original archive at `<path>.bak`
//! - Atomic replacement of the archive through a temporary file and rename
//! - Read-only inspection of header flags
//! - Async entry point running on tokio's blocking pool
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipfix::repair;
//!
//! match repair(Path::new("archive.zip")) {
//!     Ok(report) => println!("{}", report.status_message()),
//!     Err(e) if e.is_informational() => println!("{e}"),
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! ```

pub mod cli;
pub mod io;
pub mod repair;
pub mod zip;

pub use cli::Cli;
pub use repair::{
    BACKUP_SUFFIX, RepairError, RepairEvent, RepairReport, inspect, repair, repair_async,
    repair_with,
};
pub use zip::{HeaderKind, HeaderRecord, ScanReport};
