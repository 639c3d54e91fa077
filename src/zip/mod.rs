//! ZIP archive directory parsing.
//!
//! This module reads entry metadata out of a ZIP archive's central
//! directory, supporting both standard ZIP format and ZIP64 extensions
//! for large archives. APKs are ordinary ZIP containers, so no
//! APK-specific handling lives here.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements
//!   (EOCD, central directory entries, compression methods)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! This implementation reads the EOCD first (from the end of the file),
//! then the Central Directory, which allows listing files without
//! reading the entire archive. Entry contents are never decompressed
//! or validated; the directory's declared sizes are taken at face value.
//!
//! ## Limitations
//!
//! - No extraction, no content reads
//! - No encryption support
//! - No multi-disk archive support

mod parser;
mod structures;

pub use parser::ZipParser;
pub use structures::{CompressionMethod, ZipFileEntry};
