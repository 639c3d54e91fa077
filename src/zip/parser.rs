//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//!
//! Only the central directory is ever read; file contents are never
//! touched, so listing is cheap regardless of archive size.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{ApkError, Result};
use crate::io::{LocalFileReader, ReadAt};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP file parser.
///
/// Generic over the reader type; production code uses [`LocalFileReader`],
/// tests read from in-memory buffers. One parser session corresponds to
/// one open archive handle, released when the parser is dropped.
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: R,
    /// Total size of the archive in bytes
    size: u64,
}

impl ZipParser<LocalFileReader> {
    /// Open a local archive for listing.
    ///
    /// Fails with [`ApkError::Open`] if the path is missing or unreadable.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = LocalFileReader::open(path).map_err(ApkError::Open)?;
        Ok(Self::new(reader))
    }
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: R) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD is located at the end of the ZIP file. This method
    /// handles both the simple case (no comment) and archives with
    /// comments by searching backwards for the signature.
    ///
    /// Returns the EOCD record and its offset in the file, or
    /// [`ApkError::Corrupt`] if no valid EOCD can be found.
    fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        // Fast path: no trailing comment, EOCD is the last 22 bytes.
        if self.size >= EndOfCentralDirectory::SIZE as u64 {
            let offset = self.size - EndOfCentralDirectory::SIZE as u64;
            let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
            self.reader.read_exact_at(offset, &mut buf)?;

            // Check for signature and zero-length comment
            if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
                let eocd = EndOfCentralDirectory::from_bytes(&buf)?;
                return Ok((eocd, offset));
            }
        }

        // EOCD not at the expected location, so the archive carries a
        // comment. Search backwards through the maximum comment window.
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf)?;

        // Search backwards for EOCD signature (PK\x05\x06)
        for i in (0..buf.len().saturating_sub(EndOfCentralDirectory::SIZE)).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // Candidate EOCD: the comment length field must account
                // for exactly the bytes that follow the record.
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        Err(ApkError::corrupt("no end of central directory record"))
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD indicates ZIP64 extensions are needed
    /// (fields saturated to 0xFFFF or 0xFFFFFFFF).
    fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        // The ZIP64 EOCD Locator sits immediately before the regular EOCD
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .ok_or_else(|| ApkError::corrupt("missing ZIP64 EOCD locator"))?;
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader.read_exact_at(locator_offset, &mut locator_buf)?;

        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)?;

        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// List all entries in the archive, in central-directory order.
    ///
    /// One pass over the directory index; file contents are not read.
    /// Re-listing requires reopening the archive.
    pub fn list_entries(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        // Get Central Directory info, using ZIP64 if needed
        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset)?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        // Read the entire Central Directory in one request
        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data)?;

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut cursor = Cursor::new(&cd_data);

        for _ in 0..total_entries {
            let entry = self.parse_cdfh(&mut cursor)?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(&self, cursor: &mut Cursor<&Vec<u8>>) -> Result<ZipFileEntry> {
        // Read and verify the signature (PK\x01\x02)
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(ApkError::corrupt("invalid central directory file header"));
        }

        // Read fixed-size header fields
        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let _crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let _lfh_offset = cursor.read_u32::<LittleEndian>()?;

        // Read the variable-length file name
        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        // Parse extra field for ZIP64 extended information
        // ZIP64 uses extra field ID 0x0001
        let extra_field_end = cursor.position() + extra_field_length as u64;

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()?;

            if header_id == 0x0001 {
                // ZIP64 extended information extra field
                // Fields are present only if corresponding header field is 0xFFFFFFFF
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                // Skip any remaining ZIP64 fields (LFH offset, disk number)
                let remaining = extra_field_end.saturating_sub(cursor.position());
                cursor.set_position(cursor.position() + remaining);
            } else {
                // Skip unknown extra fields
                cursor.set_position(cursor.position() + field_size as u64);
            }
        }

        // Ensure cursor is positioned after extra field
        cursor.set_position(extra_field_end);

        // Skip over the file comment (we don't use it)
        cursor.set_position(cursor.position() + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    /// Build a minimal archive: local headers with payloads, then the
    /// central directory, then the EOCD (plus optional trailing comment).
    fn build_zip(entries: &[(&str, u16, &[u8], u64)], comment: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::new();

        for (name, method, data, _uc_size) in entries {
            offsets.push(out.len() as u32);
            out.extend_from_slice(b"PK\x03\x04");
            out.write_u16::<LittleEndian>(20).unwrap(); // version needed
            out.write_u16::<LittleEndian>(0).unwrap(); // flags
            out.write_u16::<LittleEndian>(*method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // mod time
            out.write_u16::<LittleEndian>(0).unwrap(); // mod date
            out.write_u32::<LittleEndian>(0).unwrap(); // crc32
            out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
            out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // extra len
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(data);
        }

        let cd_offset = out.len() as u32;
        for ((name, method, data, uc_size), lfh_offset) in entries.iter().zip(&offsets) {
            out.extend_from_slice(b"PK\x01\x02");
            out.write_u16::<LittleEndian>(20).unwrap(); // version made by
            out.write_u16::<LittleEndian>(20).unwrap(); // version needed
            out.write_u16::<LittleEndian>(0).unwrap(); // flags
            out.write_u16::<LittleEndian>(*method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // mod time
            out.write_u16::<LittleEndian>(0).unwrap(); // mod date
            out.write_u32::<LittleEndian>(0).unwrap(); // crc32
            out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(*uc_size as u32).unwrap();
            out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap(); // extra len
            out.write_u16::<LittleEndian>(0).unwrap(); // comment len
            out.write_u16::<LittleEndian>(0).unwrap(); // disk number
            out.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
            out.write_u32::<LittleEndian>(0).unwrap(); // external attrs
            out.write_u32::<LittleEndian>(*lfh_offset).unwrap();
            out.extend_from_slice(name.as_bytes());
        }
        let cd_size = out.len() as u32 - cd_offset;

        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number
        out.write_u16::<LittleEndian>(0).unwrap(); // disk with cd
        out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(cd_size).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(comment.len() as u16).unwrap();
        out.extend_from_slice(comment);

        out
    }

    #[test]
    fn lists_entries_in_central_directory_order() {
        let zip = build_zip(
            &[
                ("res/icon.png", 0, b"pngpngpng", 9),
                ("classes.dex", 8, b"dx", 40),
            ],
            b"",
        );

        let parser = ZipParser::new(zip);
        let entries = parser.list_entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "res/icon.png");
        assert_eq!(entries[0].compression_method, CompressionMethod::Stored);
        assert_eq!(entries[0].compressed_size, 9);
        assert_eq!(entries[0].uncompressed_size, 9);
        assert_eq!(entries[1].file_name, "classes.dex");
        assert_eq!(entries[1].compression_method, CompressionMethod::Deflate);
        assert_eq!(entries[1].compressed_size, 2);
        assert_eq!(entries[1].uncompressed_size, 40);
    }

    #[test]
    fn finds_eocd_behind_trailing_comment() {
        let zip = build_zip(&[("a.txt", 0, b"hello", 5)], b"built by apkinfo tests");

        let parser = ZipParser::new(zip);
        let entries = parser.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "a.txt");
    }

    #[test]
    fn empty_archive_lists_no_entries() {
        let zip = build_zip(&[], b"");

        let parser = ZipParser::new(zip);
        assert!(parser.list_entries().unwrap().is_empty());
    }

    #[test]
    fn unknown_compression_method_is_preserved() {
        // BZIP2 (12) must survive parsing; only label lookup rejects it
        let zip = build_zip(&[("blob.bin", 12, b"xx", 2)], b"");

        let parser = ZipParser::new(zip);
        let entries = parser.list_entries().unwrap();
        assert_eq!(
            entries[0].compression_method,
            CompressionMethod::Unknown(12)
        );
    }

    #[test]
    fn garbage_is_corrupt() {
        let parser = ZipParser::new(b"this is not a zip archive at all".to_vec());
        let err = parser.list_entries().unwrap_err();
        assert!(matches!(err, ApkError::Corrupt { .. }));
    }

    #[test]
    fn truncated_central_directory_is_corrupt() {
        let mut zip = build_zip(&[("a.txt", 0, b"hello", 5)], b"");
        // Point the EOCD's cd_offset past the end of the file
        let eocd_start = zip.len() - 22;
        zip[eocd_start + 16] = 0xFF;
        zip[eocd_start + 17] = 0xFF;

        let parser = ZipParser::new(zip);
        assert!(matches!(
            parser.list_entries().unwrap_err(),
            ApkError::Corrupt { .. }
        ));
    }

    #[test]
    fn zip64_eocd_chain_is_followed() {
        // Regular entries, but the EOCD saturates its counts and defers
        // to a ZIP64 EOCD via the locator.
        let plain = build_zip(&[("a.txt", 0, b"hi", 2)], b"");
        let cd_offset = u32::from_le_bytes(plain[plain.len() - 6..plain.len() - 2].try_into().unwrap());
        let cd_size = u32::from_le_bytes(plain[plain.len() - 10..plain.len() - 6].try_into().unwrap());
        let mut zip = plain[..plain.len() - 22].to_vec();

        let eocd64_offset = zip.len() as u64;
        zip.extend_from_slice(b"PK\x06\x06");
        zip.write_u64::<LittleEndian>(44).unwrap(); // size of remainder
        zip.write_u16::<LittleEndian>(45).unwrap(); // version made by
        zip.write_u16::<LittleEndian>(45).unwrap(); // version needed
        zip.write_u32::<LittleEndian>(0).unwrap(); // disk number
        zip.write_u32::<LittleEndian>(0).unwrap(); // disk with cd
        zip.write_u64::<LittleEndian>(1).unwrap(); // disk entries
        zip.write_u64::<LittleEndian>(1).unwrap(); // total entries
        zip.write_u64::<LittleEndian>(cd_size as u64).unwrap();
        zip.write_u64::<LittleEndian>(cd_offset as u64).unwrap();

        zip.extend_from_slice(b"PK\x06\x07");
        zip.write_u32::<LittleEndian>(0).unwrap();
        zip.write_u64::<LittleEndian>(eocd64_offset).unwrap();
        zip.write_u32::<LittleEndian>(1).unwrap();

        zip.extend_from_slice(b"PK\x05\x06");
        zip.write_u16::<LittleEndian>(0).unwrap();
        zip.write_u16::<LittleEndian>(0).unwrap();
        zip.write_u16::<LittleEndian>(0xFFFF).unwrap();
        zip.write_u16::<LittleEndian>(0xFFFF).unwrap();
        zip.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
        zip.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
        zip.write_u16::<LittleEndian>(0).unwrap();

        let parser = ZipParser::new(zip);
        let entries = parser.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "a.txt");
    }

    #[test]
    fn zip64_extra_field_promotes_saturated_sizes() {
        // CDFH with both 32-bit size fields saturated; the real sizes
        // live in a 0x0001 extended-information extra field.
        let name = "huge.bin";
        let uncompressed: u64 = 5_000_000_000;
        let compressed: u64 = 4_100_000_000;

        let mut zip = Vec::new();
        zip.extend_from_slice(b"PK\x01\x02");
        zip.write_u16::<LittleEndian>(45).unwrap(); // version made by
        zip.write_u16::<LittleEndian>(45).unwrap(); // version needed
        zip.write_u16::<LittleEndian>(0).unwrap(); // flags
        zip.write_u16::<LittleEndian>(8).unwrap(); // deflated
        zip.write_u16::<LittleEndian>(0).unwrap(); // mod time
        zip.write_u16::<LittleEndian>(0).unwrap(); // mod date
        zip.write_u32::<LittleEndian>(0).unwrap(); // crc32
        zip.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap(); // compressed, saturated
        zip.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap(); // uncompressed, saturated
        zip.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        zip.write_u16::<LittleEndian>(20).unwrap(); // extra len
        zip.write_u16::<LittleEndian>(0).unwrap(); // comment len
        zip.write_u16::<LittleEndian>(0).unwrap(); // disk number
        zip.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        zip.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        zip.write_u32::<LittleEndian>(0).unwrap(); // lfh offset
        zip.extend_from_slice(name.as_bytes());
        // ZIP64 extended information: uncompressed first, then compressed
        zip.write_u16::<LittleEndian>(0x0001).unwrap();
        zip.write_u16::<LittleEndian>(16).unwrap();
        zip.write_u64::<LittleEndian>(uncompressed).unwrap();
        zip.write_u64::<LittleEndian>(compressed).unwrap();
        let cd_size = zip.len() as u32;

        zip.extend_from_slice(b"PK\x05\x06");
        zip.write_u16::<LittleEndian>(0).unwrap();
        zip.write_u16::<LittleEndian>(0).unwrap();
        zip.write_u16::<LittleEndian>(1).unwrap();
        zip.write_u16::<LittleEndian>(1).unwrap();
        zip.write_u32::<LittleEndian>(cd_size).unwrap();
        zip.write_u32::<LittleEndian>(0).unwrap(); // cd starts at offset 0
        zip.write_u16::<LittleEndian>(0).unwrap();

        let entries = ZipParser::new(zip).list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "huge.bin");
        assert_eq!(entries[0].compression_method, CompressionMethod::Deflate);
        assert_eq!(entries[0].uncompressed_size, uncompressed);
        assert_eq!(entries[0].compressed_size, compressed);
    }

    #[test]
    fn relisting_is_deterministic() {
        let zip = build_zip(
            &[("META-INF/MANIFEST.MF", 8, b"mf", 50), ("res/a.xml", 0, b"<a/>", 4)],
            b"",
        );

        let first = ZipParser::new(zip.clone()).list_entries().unwrap();
        let second = ZipParser::new(zip).list_entries().unwrap();
        assert_eq!(first, second);
    }
}
