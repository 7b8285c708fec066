//! ZIP header location and flag patching.
//!
//! This module never parses an archive structurally. It only knows the two
//! per-entry header signatures and where the general purpose bit flag sits
//! inside each of them.
//!
//! ## Header Layout
//!
//! ```text
//! Local File Header          Central Directory File Header
//! 0  signature  PK\x03\x04   0  signature       PK\x01\x02
//! 4  version needed          4  version made by
//! 6  flags  <--              6  version needed
//! 8  compression             8  flags  <--
//! ```
//!
//! Bit 0 of the flags marks the entry as encrypted. A "pseudo-encrypted"
//! archive sets it on entries whose data is not encrypted at all, which
//! makes most extractors ask for a password that does not exist.
//!
//! ## Limitations
//!
//! - No End of Central Directory or ZIP64 parsing
//! - Signatures inside compressed data are indistinguishable from real headers

mod scanner;
mod structures;

pub use scanner::{SignatureOffsets, patch, scan};
pub use structures::*;
