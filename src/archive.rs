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
//! Module for [`TarArchive`] and the walk over its entries.
//!
//! A walk starts at offset 0 and reads one header block after another. After
//! each header the cursor skips the block itself and the entry's data, rounded
//! up to whole blocks. The walk ends when the cursor leaves `(0, size)` or
//! when a header can't be read completely. Zero blocks don't end the walk;
//! they are skipped like any other entry.

use crate::header::PosixHeader;
use crate::source::{ByteSource, SliceSource};
use crate::{TarFormatString, BLOCKSIZE, NAME_LEN};
use core::fmt::{Debug, Formatter};
#[cfg(feature = "alloc")]
use crate::ArchiveError;
#[cfg(feature = "alloc")]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "alloc")]
use num_traits::ToPrimitive;

/// One header block of an archive and where it was found.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    header: PosixHeader,
    offset: u64,
}

impl ArchiveEntry {
    pub const fn header(&self) -> &PosixHeader {
        &self.header
    }

    /// Byte offset of the header block.
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Byte offset of the first data byte.
    pub const fn data_offset(&self) -> u64 {
        self.offset.saturating_add(BLOCKSIZE as u64)
    }

    /// Filename of the entry. Max 100 characters.
    pub fn filename(&self) -> TarFormatString<NAME_LEN> {
        self.header.name()
    }

    /// Filesize in bytes.
    pub fn size(&self) -> u64 {
        self.header.file_size()
    }

    /// False for blocks with an empty name, e.g. the zero blocks at the end
    /// of an archive.
    pub const fn is_named(&self) -> bool {
        self.header.as_bytes()[0] != 0
    }
}

impl Debug for ArchiveEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("filename", &self.filename().as_str())
            .field("offset", &self.offset())
            .field("size", &self.size())
            .field("typeflag", &self.header.typeflag())
            .finish()
    }
}

/// Position of the next header and the total size of the archive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ArchiveCursor {
    position: u64,
    limit: u64,
}

impl ArchiveCursor {
    const fn new(limit: u64) -> Self {
        Self { position: 0, limit }
    }

    const fn in_range(&self) -> bool {
        self.position > 0 && self.position < self.limit
    }

    /// Skips the current header and `payload_size` bytes of data, rounded up
    /// to whole blocks. Returns false if the new position overflows.
    fn advance(&mut self, payload_size: u64) -> bool {
        let block = BLOCKSIZE as u64;
        let next = payload_size
            .div_ceil(block)
            .checked_mul(block)
            .and_then(|padded| padded.checked_add(block))
            .and_then(|skip| self.position.checked_add(skip));
        match next {
            Some(next) => {
                self.position = next;
                true
            }
            None => false,
        }
    }
}

/// Reads the header block at `offset`. Returns `None` if the block is not
/// completely available.
fn read_header<S: ByteSource + ?Sized>(source: &mut S, offset: u64) -> Option<PosixHeader> {
    if let Err(e) = source.seek(offset) {
        log::warn!("Can't seek to Tar header at offset {}: {}", offset, e);
        return None;
    }
    let mut block = [0; BLOCKSIZE];
    match source.read(&mut block) {
        Ok(BLOCKSIZE) => Some(PosixHeader::new(block)),
        Ok(0) => {
            log::debug!("No further Tar header at offset {}", offset);
            None
        }
        Ok(n) => {
            log::warn!(
                "Truncated Tar header at offset {}: only {} of {} bytes available",
                offset,
                n,
                BLOCKSIZE
            );
            None
        }
        Err(e) => {
            log::warn!("Can't read Tar header at offset {}: {}", offset, e);
            None
        }
    }
}

/// Iterator over the header blocks. Each iteration step starts
/// at the next Tar header entry.
///
/// Blocks with an empty name (see [`ArchiveEntry::is_named`]) are yielded
/// too, so callers decide whether to skip them.
pub struct ArchiveIterator<'a, S: ?Sized> {
    source: &'a mut S,
    cursor: ArchiveCursor,
    done: bool,
}

impl<'a, S: ByteSource + ?Sized> ArchiveIterator<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        let limit = source.size();
        Self {
            source,
            cursor: ArchiveCursor::new(limit),
            done: false,
        }
    }

    /// Reads up to `max_len` bytes of the data of `entry`, which must have
    /// been yielded by this iterator. The result may be shorter than both
    /// `max_len` and the entry size if the archive ends early.
    ///
    /// Returns `None` if the data region can't be reached.
    #[cfg(feature = "alloc")]
    pub fn read_data(&mut self, entry: &ArchiveEntry, max_len: usize) -> Option<Vec<u8>> {
        let data_offset = entry.data_offset();
        if let Err(e) = self.source.seek(data_offset) {
            log::warn!("Can't seek to data of {:?}: {}", entry, e);
            return None;
        }
        // the source can't deliver more than it holds
        let available = self.cursor.limit.saturating_sub(data_offset);
        let wanted = entry
            .size()
            .min(available)
            .to_usize()
            .map_or(max_len, |size| size.min(max_len));

        let mut data = vec![0; wanted];
        let count = match self.source.read(&mut data) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Can't read data of {:?}: {}", entry, e);
                0
            }
        };
        if count < wanted {
            log::debug!("Short read of {:?}: {} of {} bytes", entry, count, wanted);
        }
        data.truncate(count);
        Some(data)
    }
}

impl<S: ?Sized> Debug for ArchiveIterator<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArchiveIterator")
            .field("cursor", &self.cursor)
            .field("done", &self.done)
            .finish()
    }
}

impl<S: ByteSource + ?Sized> Iterator for ArchiveIterator<'_, S> {
    type Item = ArchiveEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let offset = self.cursor.position;
        let Some(header) = read_header(&mut *self.source, offset) else {
            self.done = true;
            return None;
        };

        if header.is_zero_block() {
            log::debug!("Zero block at offset {}", offset);
        } else {
            log::trace!("Tar header at offset {}: {:?}", offset, header);
        }

        // in next iteration: start at next Archive entry header
        if !self.cursor.advance(header.file_size()) {
            log::warn!(
                "Size {} of entry at offset {} exceeds the addressable range",
                header.file_size(),
                offset
            );
            self.done = true;
        } else if !self.cursor.in_range() {
            log::debug!("Reached end of Tar archive at offset {}", self.cursor.position);
            self.done = true;
        }

        Some(ArchiveEntry { header, offset })
    }
}

/// Reads the first header and checks its USTAR magic and checksum.
///
/// Returns false if the source doesn't even hold one complete header.
pub fn validate_archive<S: ByteSource + ?Sized>(source: &mut S) -> bool {
    match read_header(source, 0) {
        Some(header) => {
            let valid = header.is_valid_format() && header.validate_checksum();
            if !valid {
                log::debug!("First header is not a valid ustar header: {:?}", header);
            }
            valid
        }
        None => false,
    }
}

/// Names of all entries in archive order. Duplicates are kept, blocks with
/// an empty name are skipped. Names that are not UTF-8 are converted lossily;
/// use [`list_entry_names`] to get names that can always be passed back to
/// [`extract_entry_bytes`].
#[cfg(feature = "alloc")]
pub fn list_entries<S: ByteSource + ?Sized>(source: &mut S) -> Vec<String> {
    list_entry_names(source)
        .into_iter()
        .map(|name| String::from_utf8_lossy(&name).into_owned())
        .collect()
}

/// Like [`list_entries`], but returns the raw bytes of every name up to the
/// first NULL byte.
#[cfg(feature = "alloc")]
pub fn list_entry_names<S: ByteSource + ?Sized>(source: &mut S) -> Vec<Vec<u8>> {
    ArchiveIterator::new(source)
        .filter(ArchiveEntry::is_named)
        .map(|entry| entry.filename().as_bytes().to_vec())
        .collect()
}

/// Returns up to `max_len` bytes of the first entry called `name`.
///
/// The name is compared against the whole 100 byte name field, so `"a.txt"`
/// does not match `"a.txt.bak"` or `"ab.txt"`.
///
/// # Errors
/// [`ArchiveError::InvalidName`] if `name` is longer than the name field,
/// checked before the source is touched. [`ArchiveError::EntryNotFound`] if no
/// entry matches.
#[cfg(feature = "alloc")]
pub fn extract_entry<S: ByteSource + ?Sized>(
    source: &mut S,
    name: &str,
    max_len: usize,
) -> Result<Vec<u8>, ArchiveError> {
    extract_entry_bytes(source, name.as_bytes(), max_len)
}

/// [`extract_entry`] for names that are not UTF-8, e.g. the ones returned by
/// [`list_entry_names`].
///
/// # Errors
/// See [`extract_entry`].
#[cfg(feature = "alloc")]
pub fn extract_entry_bytes<S: ByteSource + ?Sized>(
    source: &mut S,
    name: &[u8],
    max_len: usize,
) -> Result<Vec<u8>, ArchiveError> {
    if name.len() > NAME_LEN {
        return Err(ArchiveError::InvalidName { len: name.len() });
    }

    let mut entries = ArchiveIterator::new(source);
    while let Some(entry) = entries.next() {
        if entry.is_named() && entry.header().name_matches(name) {
            log::debug!("Found {:?}", entry);
            return entries
                .read_data(&entry, max_len)
                .ok_or(ArchiveError::EntryNotFound);
        }
    }
    Err(ArchiveError::EntryNotFound)
}

/// Wrapper type around the byte source, which represents an archive.
#[derive(Debug)]
pub struct TarArchive<S> {
    source: S,
}

impl<'a> TarArchive<SliceSource<'a>> {
    /// Interprets the provided byte array as Tar archive.
    pub const fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(SliceSource::new(data))
    }
}

impl<S: ByteSource> TarArchive<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the byte source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// See [`validate_archive`].
    pub fn validate(&mut self) -> bool {
        validate_archive(&mut self.source)
    }

    /// Iterates over all header blocks of the Tar archive.
    /// Returns items of type [`ArchiveEntry`].
    pub fn entries(&mut self) -> ArchiveIterator<'_, S> {
        ArchiveIterator::new(&mut self.source)
    }

    /// See [`list_entries`].
    #[cfg(feature = "alloc")]
    pub fn list_entries(&mut self) -> Vec<String> {
        list_entries(&mut self.source)
    }

    /// See [`list_entry_names`].
    #[cfg(feature = "alloc")]
    pub fn list_entry_names(&mut self) -> Vec<Vec<u8>> {
        list_entry_names(&mut self.source)
    }

    /// See [`extract_entry`].
    ///
    /// # Errors
    /// See [`extract_entry`].
    #[cfg(feature = "alloc")]
    pub fn extract_entry(&mut self, name: &str, max_len: usize) -> Result<Vec<u8>, ArchiveError> {
        extract_entry(&mut self.source, name, max_len)
    }

    /// See [`extract_entry_bytes`].
    ///
    /// # Errors
    /// See [`extract_entry`].
    #[cfg(feature = "alloc")]
    pub fn extract_entry_bytes(
        &mut self,
        name: &[u8],
        max_len: usize,
    ) -> Result<Vec<u8>, ArchiveError> {
        extract_entry_bytes(&mut self.source, name, max_len)
    }
}
