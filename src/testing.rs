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
//! Helpers to build synthetic archives in tests.

use crate::header::{field, Field};
use crate::source::{ByteSource, SourceError};
use crate::{PosixHeader, BLOCKSIZE, NAME_LEN};
use std::vec::Vec;

/// A ustar header for a regular file, filled in field by field.
pub struct HeaderBuilder {
    pub bytes: [u8; BLOCKSIZE],
}

impl HeaderBuilder {
    /// Header without a checksum; see [`Self::with_checksum`].
    pub fn new(name: impl AsRef<[u8]>, size: u64) -> Self {
        let mut builder = Self {
            bytes: [0; BLOCKSIZE],
        };
        let name = name.as_ref();
        let name = &name[..name.len().min(NAME_LEN)];
        builder.bytes[..name.len()].copy_from_slice(name);
        builder.set_octal(field::MODE, 0o644);
        builder.set_octal(field::UID, 1000);
        builder.set_octal(field::GID, 1000);
        builder.set_octal(field::SIZE, size);
        builder.set_octal(field::MTIME, 1_609_459_200);
        builder.bytes[field::TYPEFLAG.offset] = b'0';
        builder.set(field::MAGIC, b"ustar\0");
        builder.set(field::VERSION, b"00");
        builder.set(field::UNAME, b"user");
        builder.set(field::GNAME, b"users");
        builder
    }

    pub fn set(&mut self, field: Field, value: &[u8]) {
        self.bytes[field.offset..field.offset + value.len()].copy_from_slice(value);
    }

    /// Writes `value` zero padded to `len - 1` digits plus a NUL.
    pub fn set_octal(&mut self, field: Field, value: u64) {
        let digits = std::format!("{:0width$o}\0", value, width = field.len - 1);
        self.set(field, digits.as_bytes());
    }

    pub fn with_checksum(mut self) -> Self {
        let (unsigned_sum, _) = PosixHeader::new(self.bytes).checksum_sums();
        self.set_octal(field::CHKSUM, unsigned_sum);
        self
    }
}

/// Concatenates entries into an in-memory archive.
#[derive(Default)]
pub struct ArchiveBuilder {
    data: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a regular file with a valid header and its padded content.
    pub fn file(self, name: impl AsRef<[u8]>, content: &[u8]) -> Self {
        let header = HeaderBuilder::new(name, content.len() as u64).with_checksum();
        self.block(&header.bytes).data(content)
    }

    /// Appends raw bytes and pads them to the next block boundary.
    pub fn data(mut self, content: &[u8]) -> Self {
        self.data.extend_from_slice(content);
        let padded_len = self.data.len().div_ceil(BLOCKSIZE) * BLOCKSIZE;
        self.data.resize(padded_len, 0);
        self
    }

    pub fn block(mut self, block: &[u8; BLOCKSIZE]) -> Self {
        self.data.extend_from_slice(block);
        self
    }

    /// Appends the two zero blocks that end an archive.
    pub fn finish(self) -> Vec<u8> {
        self.block(&[0; BLOCKSIZE]).block(&[0; BLOCKSIZE]).data
    }
}

/// Counts how often the walker touches the wrapped source.
pub struct CountingSource<S> {
    pub inner: S,
    pub seeks: usize,
    pub reads: usize,
}

impl<S> CountingSource<S> {
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            seeks: 0,
            reads: 0,
        }
    }
}

impl<S: ByteSource> ByteSource for CountingSource<S> {
    fn seek(&mut self, offset: u64) -> Result<(), SourceError> {
        self.seeks += 1;
        self.inner.seek(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        self.reads += 1;
        self.inner.read(buf)
    }

    fn size(&self) -> u64 {
        self.inner.size()
    }
}
