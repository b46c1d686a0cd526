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
//! Library to validate, list and extract entries of USTAR Tar archives in `no_std` contexts.
//! If you have a standard environment and need full feature support, I recommend the use of
//! <https://crates.io/crates/tar> instead.
//!
//! The archive is read through the [`ByteSource`] trait: seek to an offset, read bytes, report
//! the total size. [`SliceSource`] wraps an archive that is already in memory, `IoSource`
//! (feature `std`) wraps any reader that can seek, such as a file.
//!
//! Three operations are offered, as free functions and as methods of [`TarArchive`]:
//! - [`validate_archive`] checks the USTAR magic and the checksum of the first header,
//! - [`list_entries`] returns the names of all entries in archive order,
//! - [`extract_entry`] returns the data of the first entry with a given name.
//!
//! [`list_entry_names`] and [`extract_entry_bytes`] do the same with raw name bytes, for
//! archives whose names are not UTF-8.
//!
//! The crate only interprets the "basic" header fields. GNU and pax extensions, such as long
//! names, are not supported; a name is at most the 100 bytes of the name field. Numeric fields
//! are decoded leniently (see [`decode_octal`]), so headers of sloppy producers still work.
//! Read errors in the middle of an archive end the walk instead of failing it; callers get the
//! entries found up to that point.
//!
//! ```
//! use tar_walker::TarArchive;
//!
//! let mut archive = TarArchive::from_bytes(&[]);
//! assert!(!archive.validate());
//! assert!(archive.list_entries().is_empty());
//! ```
//!
//! # Features
//! - `alloc` (default): [`list_entries`] and [`extract_entry`], which return owned buffers.
//! - `std`: `IoSource` and `std::error::Error` implementations.
//! - `unstable`: `core::error::Error` implementations without `std`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(rustdoc::all)]
#![allow(rustdoc::missing_doc_code_examples)]
#![deny(clippy::all)]
#![deny(clippy::missing_const_for_fn)]
#![deny(missing_debug_implementations)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Each Archive Entry (either Header or Data Block) is a block of 512 bytes.
pub const BLOCKSIZE: usize = 512;
/// Width of the name and link name fields.
pub const NAME_LEN: usize = 100;
/// Width of the name prefix field.
pub const PREFIX_LEN: usize = 155;

mod archive;
mod error;
mod header;
mod octal;
mod source;
mod tar_format_types;
#[cfg(test)]
mod testing;

pub use archive::*;
pub use error::*;
pub use header::*;
pub use octal::*;
pub use source::*;
pub use tar_format_types::*;
