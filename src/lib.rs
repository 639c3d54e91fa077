//! # apkinfo
//!
//! Report size statistics for Android application packages (APKs).
//!
//! An APK is an ordinary ZIP container. This library reads an archive's
//! central directory (without extracting anything), classifies each entry
//! by name into content categories (assets, signing metadata, XML
//! resources, miscellaneous), and aggregates per-category size counters
//! into an [`ApkReport`].
//!
//! ## Features
//!
//! - Central-directory listing for local ZIP/APK files, ZIP64 included
//! - Per-category size accounting with a stored-vs-deflated split
//! - Recursive `*.apk` discovery for batch reporting
//! - Any syntactically valid ZIP is accepted; APK-ness is not verified
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use apkinfo::{ApkReport, ZipParser};
//!
//! fn main() -> apkinfo::Result<()> {
//!     let parser = ZipParser::open(Path::new("app.apk"))?;
//!     let entries = parser.list_entries()?;
//!     let report = ApkReport::from_entries(&entries);
//!     println!("asset bytes: {}", report.asset_size);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod report;
pub mod scan;
pub mod zip;

pub use cli::Cli;
pub use error::{ApkError, Result};
pub use io::{LocalFileReader, ReadAt};
pub use report::ApkReport;
pub use scan::find_apk_files;
pub use zip::{CompressionMethod, ZipFileEntry, ZipParser};
