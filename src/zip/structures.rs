use std::fmt;

/// Central Directory File Header (CDFH) signature
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
/// Offset of the general purpose bit flag inside a CDFH
pub const CDFH_FLAG_OFFSET: usize = 8;

/// Local File Header (LFH) signature
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
/// Offset of the general purpose bit flag inside an LFH
pub const LFH_FLAG_OFFSET: usize = 6;

/// Bit 0 of the general purpose bit flag: entry is encrypted
pub const ENCRYPTION_BIT: u8 = 0x01;

/// Kind of header record located by signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    LocalFile,
    CentralDirectory,
}

impl HeaderKind {
    /// Scan order: local headers first, then the central directory.
    pub const ALL: [HeaderKind; 2] = [HeaderKind::LocalFile, HeaderKind::CentralDirectory];

    pub fn signature(&self) -> &'static [u8] {
        match self {
            HeaderKind::LocalFile => LFH_SIGNATURE,
            HeaderKind::CentralDirectory => CDFH_SIGNATURE,
        }
    }

    /// Offset of the flag byte relative to the start of the signature.
    ///
    /// The flag field follows the signature and version field(s): an LFH has
    /// only "version needed", a CDFH has "version made by" as well.
    pub fn flag_offset(&self) -> usize {
        match self {
            HeaderKind::LocalFile => LFH_FLAG_OFFSET,
            HeaderKind::CentralDirectory => CDFH_FLAG_OFFSET,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            HeaderKind::LocalFile => "LFH",
            HeaderKind::CentralDirectory => "CDFH",
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderKind::LocalFile => f.write_str("local file header"),
            HeaderKind::CentralDirectory => f.write_str("central directory header"),
        }
    }
}

/// A header signature located in the archive buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    pub kind: HeaderKind,
    /// Absolute offset of the signature
    pub offset: usize,
    /// General purpose bit flag as found before patching, if both bytes are in bounds
    pub flags: Option<u16>,
    /// Flag byte was odd (and has been, or would be, cleared)
    pub pseudo_encrypted: bool,
}

impl HeaderRecord {
    /// Absolute offset of the flag byte this record inspects
    pub fn flag_offset(&self) -> usize {
        self.offset + self.kind.flag_offset()
    }
}

/// Result of a scan or patch pass over an archive buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Every located header, local pass first, each pass left to right
    pub records: Vec<HeaderRecord>,
}

impl ScanReport {
    pub fn flagged(&self) -> impl Iterator<Item = &HeaderRecord> {
        self.records.iter().filter(|r| r.pseudo_encrypted)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    /// True when at least one flag byte was (or would be) cleared
    pub fn is_modified(&self) -> bool {
        self.records.iter().any(|r| r.pseudo_encrypted)
    }

    pub fn count(&self, kind: HeaderKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}
