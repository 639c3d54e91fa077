//! Size classification and aggregation over archive entries.
//!
//! This is where the categorization policy lives. Each entry is run
//! through a flat sequence of independent predicate checks (meta-inf,
//! asset, xml) rather than a priority hierarchy, so a single entry may
//! land in more than one category counter. Only the residual bucket is
//! exclusive: it collects entries no predicate claimed.

use crate::zip::{CompressionMethod, ZipFileEntry};

/// Filename suffixes that classify an entry as an asset.
///
/// Comparison is case-sensitive and purely by name; no content sniffing.
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".gif"];

/// Prefix identifying signing/manifest metadata entries.
const META_INF_PREFIX: &str = "META-INF/";

/// Size totals for one archive, built by a single pass over its entries.
///
/// All counters are byte counts. `asset_size`, `meta_inf_size` and
/// `xml_size` can overlap (a `META-INF/foo.xml` entry counts in two);
/// `misc_size` holds everything the three category tests left unclaimed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApkReport {
    /// On-disk bytes as if nothing were recompressed: compressed size
    /// for deflated entries, full uncompressed size for everything else.
    pub stored_size: u64,
    /// Sum of uncompressed sizes over all entries.
    pub uncompressed_total_size: u64,
    /// Asset bytes, stored-vs-deflated split as in `stored_size`.
    pub asset_size: u64,
    /// Uncompressed bytes under `META-INF/`.
    pub meta_inf_size: u64,
    /// Uncompressed bytes of `.xml` entries.
    pub xml_size: u64,
    /// Uncompressed bytes of entries matching no category test.
    pub misc_size: u64,
    /// Deflated-asset portion of `asset_size`.
    pub compressed_asset_size: u64,
    /// Non-deflated-asset portion of `asset_size`.
    pub uncompressed_asset_size: u64,
}

impl ApkReport {
    /// Build a report by folding over entries, left to right.
    ///
    /// Counter values are order-independent; the archive's entry order
    /// only matters for per-entry listing output, which is a caller
    /// concern.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ZipFileEntry>,
    {
        let mut report = ApkReport::default();
        for entry in entries {
            report.add_entry(entry);
        }
        report
    }

    /// Sum of the four category counters.
    ///
    /// Exceeds `uncompressed_total_size` when entries overlap categories,
    /// since overlapping entries are counted once per matching category.
    pub fn matched_total(&self) -> u64 {
        self.asset_size + self.meta_inf_size + self.xml_size + self.misc_size
    }

    fn add_entry(&mut self, entry: &ZipFileEntry) {
        let deflated = entry.compression_method == CompressionMethod::Deflate;

        // Any non-deflate method contributes its full uncompressed
        // weight, true "stored" or not.
        if deflated {
            self.stored_size += entry.compressed_size;
        } else {
            self.stored_size += entry.uncompressed_size;
        }

        self.uncompressed_total_size += entry.uncompressed_size;

        let mut matched = false;

        if entry.file_name.starts_with(META_INF_PREFIX) {
            matched = true;
            self.meta_inf_size += entry.uncompressed_size;
        }

        if is_asset(&entry.file_name) {
            matched = true;
            if deflated {
                self.asset_size += entry.compressed_size;
                self.compressed_asset_size += entry.compressed_size;
            } else {
                self.asset_size += entry.uncompressed_size;
                self.uncompressed_asset_size += entry.uncompressed_size;
            }
        }

        if entry.file_name.ends_with(".xml") {
            matched = true;
            self.xml_size += entry.uncompressed_size;
        }

        if !matched {
            self.misc_size += entry.uncompressed_size;
        }
    }
}

/// Whether an entry name carries a recognized image suffix.
pub fn is_asset(name: &str) -> bool {
    ASSET_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
