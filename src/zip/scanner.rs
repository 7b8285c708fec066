//! Signature scanning over raw archive bytes.
//!
//! Headers are located by plain substring search, not by walking the
//! End of Central Directory. Nothing here reads length fields, so a
//! signature that happens to occur inside compressed data is treated
//! like any other header.
//!
//! For each match at `pos` the flag byte sits at `pos + kind.flag_offset()`.
//! If that byte is odd, it is set to `0x00`. The next search resumes at
//! `pos + 4`, so adjacent signatures are all visited and no match is
//! processed twice. Local file headers are handled in a first pass over the
//! buffer, central directory headers in a second one.

use byteorder::{ByteOrder, LittleEndian};
use memchr::memmem;

use super::structures::{ENCRYPTION_BIT, HeaderKind, HeaderRecord, ScanReport};

/// Iterator over the offsets of every occurrence of a header signature.
pub struct SignatureOffsets<'a> {
    finder: memmem::Finder<'static>,
    data: &'a [u8],
    next: usize,
}

impl<'a> SignatureOffsets<'a> {
    pub fn new(data: &'a [u8], kind: HeaderKind) -> Self {
        Self {
            finder: memmem::Finder::new(kind.signature()),
            data,
            next: 0,
        }
    }
}

impl Iterator for SignatureOffsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let tail = self.data.get(self.next..)?;
        let pos = self.next + self.finder.find(tail)?;
        self.next = pos + 4;
        Some(pos)
    }
}

/// Build the record for a signature at `offset` without touching the buffer.
fn inspect_at(data: &[u8], kind: HeaderKind, offset: usize) -> HeaderRecord {
    let flag_at = offset + kind.flag_offset();
    let flags = data
        .get(flag_at..flag_at + 2)
        .map(LittleEndian::read_u16);
    let pseudo_encrypted = data
        .get(flag_at)
        .is_some_and(|b| b & ENCRYPTION_BIT != 0);

    HeaderRecord {
        kind,
        offset,
        flags,
        pseudo_encrypted,
    }
}

/// One pass over `data` for a single header kind.
///
/// Every signature of `kind` is located and checked before any flag byte of
/// the pass is cleared, so a flag byte overlapping a later signature of the
/// same kind does not hide it.
fn patch_pass(data: &mut [u8], kind: HeaderKind, records: &mut Vec<HeaderRecord>) {
    let view: &[u8] = data;
    let found: Vec<HeaderRecord> = SignatureOffsets::new(view, kind)
        .map(|pos| inspect_at(view, kind, pos))
        .collect();

    for record in found {
        if record.pseudo_encrypted {
            data[record.flag_offset()] = 0x00;
        }
        records.push(record);
    }
}

/// Clear the flag byte of every pseudo-encrypted header in place.
///
/// The local file header pass runs first; the central directory pass then
/// searches the buffer as the first pass left it. The whole flag byte is
/// zeroed rather than only bit 0.
pub fn patch(data: &mut [u8]) -> ScanReport {
    let mut records = Vec::new();
    for kind in HeaderKind::ALL {
        patch_pass(data, kind, &mut records);
    }

    ScanReport { records }
}

/// Report what [`patch`] would do, without modifying `data`.
pub fn scan(data: &[u8]) -> ScanReport {
    patch(&mut data.to_vec())
}
