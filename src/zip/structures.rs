use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{ApkError, Result};

/// ZIP compression methods (APPNOTE.TXT section 4.4.5).
///
/// Only stored (0) and deflated (8) are semantically distinguished for
/// size accounting; every other code is carried through as `Unknown` and
/// only becomes an error if its display label is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }

    /// Display label for per-entry listing output.
    ///
    /// The mapping is a fixed finite table with no fallback: an
    /// unrecognized code fails with [`ApkError::UnknownMethod`].
    pub fn label(&self) -> Result<&'static str> {
        match self {
            CompressionMethod::Stored => Ok("stored"),
            CompressionMethod::Deflate => Ok("deflated"),
            CompressionMethod::Unknown(v) => Err(ApkError::UnknownMethod(*v)),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
///
/// Only the fields the lister consumes are retained; disk numbers and
/// the comment length are parsed past and dropped.
pub struct EndOfCentralDirectory {
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ApkError::corrupt("invalid end of central directory"));
        }

        let mut cursor = Cursor::new(&data[4..]);

        let _disk_number = cursor.read_u16::<LittleEndian>()?;
        let _disk_with_cd = cursor.read_u16::<LittleEndian>()?;

        Ok(Self {
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ApkError::corrupt("invalid ZIP64 EOCD locator"));
        }

        let mut cursor = Cursor::new(&data[4..]);

        let _disk_with_eocd64 = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            eocd64_offset: cursor.read_u64::<LittleEndian>()?,
        })
    }
}

/// ZIP64 End of Central Directory - 56 bytes minimum
///
/// Version, size and disk fields are parsed past; listing only needs
/// the central directory's location and entry count.
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ApkError::corrupt("invalid ZIP64 EOCD"));
        }

        let mut cursor = Cursor::new(&data[4..]);

        let _eocd64_size = cursor.read_u64::<LittleEndian>()?;
        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _disk_number = cursor.read_u32::<LittleEndian>()?;
        let _disk_with_cd = cursor.read_u32::<LittleEndian>()?;
        let _disk_entries = cursor.read_u64::<LittleEndian>()?;

        Ok(Self {
            total_entries: cursor.read_u64::<LittleEndian>()?,
            cd_size: cursor.read_u64::<LittleEndian>()?,
            cd_offset: cursor.read_u64::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Archive entry metadata as recorded in the central directory.
///
/// No file contents are read; sizes are the archive's own declaration
/// and are trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipFileEntry {
    /// Entry path with forward-slash separators, as stored.
    pub file_name: String,
    pub compression_method: CompressionMethod,
    /// Byte count on disk.
    pub compressed_size: u64,
    /// Byte count when decompressed.
    pub uncompressed_size: u64,
}
