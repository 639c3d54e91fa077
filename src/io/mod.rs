mod local;

pub use local::LocalFileReader;

use std::io;

/// Trait for random access reading from a data source.
///
/// The zip parser only ever needs positioned reads of known length, so the
/// seam is a pread-style interface rather than `Read + Seek`. Anything
/// byte-addressable can back it; tests use an in-memory buffer.
pub trait ReadAt {
    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Fails (with `UnexpectedEof`) if the source ends before the buffer
    /// is full.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Get the total size of the data source.
    fn size(&self) -> u64;
}

// In-memory backing for parser unit tests; not part of the library API.
#[cfg(test)]
impl ReadAt for Vec<u8> {
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        let end = start
            .checked_add(buf.len())
            .filter(|end| *end <= self.len())
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        buf.copy_from_slice(&self[start..end]);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}
