/*
MIT License

Copyright (c) 2021 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/
//! Byte sources an archive is read from.
//!
//! The walker only needs to reposition a cursor, read from it, and know the
//! total length. [`SliceSource`] covers archives that are already in memory,
//! `IoSource` (feature `std`) anything that implements `Read` and `Seek`.

use core::fmt::{Display, Formatter};

/// Errors of a [`ByteSource`]. The walker treats all of them as the end of
/// the archive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The requested offset lies behind the end of the source.
    OutOfBounds { offset: u64, size: u64 },
    /// The underlying reader reported an error.
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { offset, size } => {
                write!(f, "offset {offset} is out of bounds for a source of {size} bytes")
            }
            #[cfg(feature = "std")]
            Self::Io(kind) => write!(f, "i/o error: {kind}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SourceError {}

#[cfg(all(feature = "unstable", not(feature = "std")))]
impl core::error::Error for SourceError {}

/// Seekable, readable storage holding a whole archive.
///
/// Implementations are used by one walk at a time; the walker borrows them
/// mutably for the duration of an operation.
pub trait ByteSource {
    /// Moves the read cursor to `offset`. Offsets up to and including
    /// [`Self::size`] are valid.
    fn seek(&mut self, offset: u64) -> Result<(), SourceError>;

    /// Reads up to `buf.len()` bytes from the cursor and advances it. Returns
    /// the number of bytes read, which is only less than `buf.len()` at the
    /// end of the source.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;

    /// Total length of the source in bytes.
    fn size(&self) -> u64;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn seek(&mut self, offset: u64) -> Result<(), SourceError> {
        (**self).seek(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        (**self).read(buf)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// An archive that is already in memory.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn seek(&mut self, offset: u64) -> Result<(), SourceError> {
        match usize::try_from(offset) {
            Ok(pos) if pos <= self.data.len() => {
                self.pos = pos;
                Ok(())
            }
            _ => Err(SourceError::OutOfBounds {
                offset,
                size: self.size(),
            }),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let remaining = &self.data[self.pos..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.pos += count;
        Ok(count)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Adapter for any [`std::io::Read`] + [`std::io::Seek`], e.g. a
/// [`std::fs::File`] or a [`std::io::Cursor`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    size: u64,
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> IoSource<R> {
    /// Wraps `inner`. The size is determined once by seeking to the end.
    ///
    /// # Errors
    /// Returns the error of the initial seek.
    pub fn new(mut inner: R) -> std::io::Result<Self> {
        let size = inner.seek(std::io::SeekFrom::End(0))?;
        inner.seek(std::io::SeekFrom::Start(0))?;
        Ok(Self { inner, size })
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteSource for IoSource<R> {
    fn seek(&mut self, offset: u64) -> Result<(), SourceError> {
        if offset > self.size {
            return Err(SourceError::OutOfBounds {
                offset,
                size: self.size,
            });
        }
        self.inner
            .seek(std::io::SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| SourceError::Io(e.kind()))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(SourceError::Io(e.kind())),
            }
        }
        Ok(filled)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_read() {
        let mut source = SliceSource::new(b"hello world");
        assert_eq!(source.size(), 11);
        let mut buf = [0; 5];
        assert_eq!(source.read(&mut buf), Ok(5));
        assert_eq!(&buf, b"hello");
        source.seek(6).unwrap();
        assert_eq!(source.read(&mut buf), Ok(5));
        assert_eq!(&buf, b"world");
        assert_eq!(source.read(&mut buf), Ok(0));
    }

    #[test]
    fn test_slice_source_short_read() {
        let mut source = SliceSource::new(b"abc");
        source.seek(1).unwrap();
        let mut buf = [0; 8];
        assert_eq!(source.read(&mut buf), Ok(2));
        assert_eq!(&buf[..2], b"bc");
    }

    #[test]
    fn test_slice_source_seek_bounds() {
        let mut source = SliceSource::new(b"abc");
        assert_eq!(source.seek(3), Ok(()));
        assert_eq!(
            source.seek(4),
            Err(SourceError::OutOfBounds { offset: 4, size: 3 })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_io_source() {
        let mut source = IoSource::new(std::io::Cursor::new(b"hello world".to_vec())).unwrap();
        assert_eq!(source.size(), 11);
        source.seek(6).unwrap();
        let mut buf = [0; 16];
        assert_eq!(source.read(&mut buf), Ok(5));
        assert_eq!(&buf[..5], b"world");
        assert!(matches!(
            source.seek(12),
            Err(SourceError::OutOfBounds { offset: 12, size: 11 })
        ));
    }
}
