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
//! Errors reported to callers of the archive operations.

use crate::NAME_LEN;
use core::fmt::{Display, Formatter};

/// Failure of `extract_entry`.
///
/// Read and seek failures while walking the archive are not errors; they end
/// the walk like the end of the archive does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// The requested name does not fit into the 100 byte name field.
    InvalidName { len: usize },
    /// The walk ended without finding an entry with the requested name.
    EntryNotFound,
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidName { len } => write!(
                f,
                "entry name of {len} bytes exceeds the {NAME_LEN} byte name field"
            ),
            Self::EntryNotFound => f.write_str("no entry with that name in the archive"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArchiveError {}

#[cfg(all(feature = "unstable", not(feature = "std")))]
impl core::error::Error for ArchiveError {}
