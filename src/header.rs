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
//! TAR header definition taken from <https://www.gnu.org/software/tar/manual/html_node/Standard.html>.
//! A Tar-archive is a collection of 512-byte sized blocks. Unfortunately there are several
//! TAR-like archive specifications. An Overview can be found here:
//! <https://www.gnu.org/software/tar/manual/html_node/Formats.html#Formats>
//!
//! This library focuses on the USTAR format. The header is kept as the raw
//! block and every field is read by its offset and length, so the layout does
//! not depend on struct packing.

#![allow(non_upper_case_globals)]

use crate::octal::{decode_octal, SIZE_FIELD_LEN};
use crate::{TarFormatOctal, TarFormatString, BLOCKSIZE, NAME_LEN, PREFIX_LEN};
use core::fmt::{Debug, Display, Formatter};
use core::num::ParseIntError;

/// Byte range of one header field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub len: usize,
}

impl Field {
    const fn after(prev: Self, len: usize) -> Self {
        Self {
            offset: prev.offset + prev.len,
            len,
        }
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.len
    }
}

/// Layout of a POSIX (ustar) header block.
pub mod field {
    use super::Field;
    use crate::{NAME_LEN, PREFIX_LEN, SIZE_FIELD_LEN};

    pub const NAME: Field = Field {
        offset: 0,
        len: NAME_LEN,
    };
    pub const MODE: Field = Field::after(NAME, 8);
    pub const UID: Field = Field::after(MODE, 8);
    pub const GID: Field = Field::after(UID, 8);
    pub const SIZE: Field = Field::after(GID, SIZE_FIELD_LEN);
    pub const MTIME: Field = Field::after(SIZE, SIZE_FIELD_LEN);
    pub const CHKSUM: Field = Field::after(MTIME, 8);
    pub const TYPEFLAG: Field = Field::after(CHKSUM, 1);
    pub const LINKNAME: Field = Field::after(TYPEFLAG, NAME_LEN);
    pub const MAGIC: Field = Field::after(LINKNAME, 6);
    pub const VERSION: Field = Field::after(MAGIC, 2);
    pub const UNAME: Field = Field::after(VERSION, 32);
    pub const GNAME: Field = Field::after(UNAME, 32);
    pub const DEVMAJOR: Field = Field::after(GNAME, 8);
    pub const DEVMINOR: Field = Field::after(DEVMAJOR, 8);
    pub const PREFIX: Field = Field::after(DEVMINOR, PREFIX_LEN);
    // padding => to BLOCKSIZE bytes
    pub const PAD: Field = Field::after(PREFIX, 12);
}

const _: () = assert!(field::PAD.end() == BLOCKSIZE);
const _: () = assert!(field::MAGIC.offset == 257 && field::CHKSUM.offset == 148);

/// Magic value of the USTAR format. Only these five bytes are compared, so
/// the GNU variant `"ustar  \0"` is accepted as well.
pub const USTAR_MAGIC: &[u8; 5] = b"ustar";

/// Errors that may happen when parsing the [`ModeFlags`].
#[derive(Debug, PartialEq, Eq)]
pub enum ModeError {
    ParseInt(ParseIntError),
    IllegalMode,
}

impl Display for ModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ParseInt(e) => write!(f, "mode is not an octal number: {e}"),
            Self::IllegalMode => f.write_str("mode contains unknown permission bits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ModeError {}

#[cfg(all(feature = "unstable", not(feature = "std")))]
impl core::error::Error for ModeError {}

/// Wrapper around the UNIX file permissions given in octal ASCII.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Mode(TarFormatOctal<8>);

impl Mode {
    /// Parses the [`ModeFlags`] from the mode string.
    pub fn to_flags(self) -> Result<ModeFlags, ModeError> {
        let bits = self.0.as_number::<u64>().map_err(ModeError::ParseInt)?;
        ModeFlags::from_bits(bits).ok_or(ModeError::IllegalMode)
    }
}

impl Debug for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.to_flags(), f)
    }
}

/// Header of the TAR format as specified by POSIX (POSIX 1003.1-1988, "ustar").
///
/// Each entry is started by such a header, that describes the size and
/// the file name. After that, the file content stands in chunks of 512 bytes.
/// The number of bytes can be derived from the file size.
///
/// The header is a value read from the archive and then dropped again;
/// nothing in this type mutates the block.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PosixHeader {
    bytes: [u8; BLOCKSIZE],
}

impl PosixHeader {
    /// Wraps a raw header block.
    #[must_use]
    pub const fn new(bytes: [u8; BLOCKSIZE]) -> Self {
        Self { bytes }
    }

    /// The raw header block.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BLOCKSIZE] {
        &self.bytes
    }

    fn raw(&self, field: Field) -> &[u8] {
        &self.bytes[field.offset..field.end()]
    }

    fn array<const N: usize>(&self, field: Field) -> [u8; N] {
        debug_assert_eq!(field.len, N);
        core::array::from_fn(|i| self.bytes[field.offset + i])
    }

    /// Name of the entry. There is always a null byte unless the name uses
    /// all 100 bytes.
    #[must_use]
    pub fn name(&self) -> TarFormatString<NAME_LEN> {
        TarFormatString::new(self.array(field::NAME))
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        Mode(TarFormatOctal::new(self.array(field::MODE)))
    }

    #[must_use]
    pub fn uid(&self) -> TarFormatOctal<8> {
        TarFormatOctal::new(self.array(field::UID))
    }

    #[must_use]
    pub fn gid(&self) -> TarFormatOctal<8> {
        TarFormatOctal::new(self.array(field::GID))
    }

    // confusing; size is stored as ASCII string
    #[must_use]
    pub fn size(&self) -> TarFormatOctal<SIZE_FIELD_LEN> {
        TarFormatOctal::new(self.array(field::SIZE))
    }

    /// Modification time in seconds since the UNIX epoch.
    #[must_use]
    pub fn mtime(&self) -> TarFormatOctal<SIZE_FIELD_LEN> {
        TarFormatOctal::new(self.array(field::MTIME))
    }

    #[must_use]
    pub fn checksum(&self) -> TarFormatOctal<8> {
        TarFormatOctal::new(self.array(field::CHKSUM))
    }

    #[must_use]
    pub const fn typeflag(&self) -> TypeFlagRaw {
        TypeFlagRaw(self.bytes[field::TYPEFLAG.offset])
    }

    /// Target of a hard or symbolic link.
    #[must_use]
    pub fn linkname(&self) -> TarFormatString<NAME_LEN> {
        TarFormatString::new(self.array(field::LINKNAME))
    }

    #[must_use]
    pub fn magic(&self) -> TarFormatString<6> {
        TarFormatString::new(self.array(field::MAGIC))
    }

    #[must_use]
    pub fn version(&self) -> TarFormatString<2> {
        TarFormatString::new(self.array(field::VERSION))
    }

    /// Username. There is always a null byte, therefore
    /// the max len is N-1.
    #[must_use]
    pub fn uname(&self) -> TarFormatString<32> {
        TarFormatString::new(self.array(field::UNAME))
    }

    /// Groupname. There is always a null byte, therefore
    /// the max len is N-1.
    #[must_use]
    pub fn gname(&self) -> TarFormatString<32> {
        TarFormatString::new(self.array(field::GNAME))
    }

    #[must_use]
    pub fn dev_major(&self) -> TarFormatOctal<8> {
        TarFormatOctal::new(self.array(field::DEVMAJOR))
    }

    #[must_use]
    pub fn dev_minor(&self) -> TarFormatOctal<8> {
        TarFormatOctal::new(self.array(field::DEVMINOR))
    }

    #[must_use]
    pub fn prefix(&self) -> TarFormatString<PREFIX_LEN> {
        TarFormatString::new(self.array(field::PREFIX))
    }

    /// Whether the header carries the USTAR magic.
    #[must_use]
    pub fn is_valid_format(&self) -> bool {
        &self.bytes[field::MAGIC.offset..field::MAGIC.offset + USTAR_MAGIC.len()] == USTAR_MAGIC
    }

    /// Size of the entry's payload in bytes, decoded leniently.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        decode_octal(self.raw(field::SIZE))
    }

    /// Returns the number of blocks that are required to read the whole file
    /// content.
    #[must_use]
    pub fn payload_block_count(&self) -> u64 {
        self.file_size().div_ceil(BLOCKSIZE as u64)
    }

    /// Sums all bytes of the block while counting the checksum field as
    /// eight ASCII spaces. Returns the unsigned and the signed byte sum.
    #[must_use]
    pub fn checksum_sums(&self) -> (u64, i64) {
        let mut unsigned_sum = 0_u64;
        let mut signed_sum = 0_i64;
        for (i, &byte) in self.bytes.iter().enumerate() {
            let byte = if (field::CHKSUM.offset..field::CHKSUM.end()).contains(&i) {
                b' '
            } else {
                byte
            };
            unsigned_sum += u64::from(byte);
            signed_sum += i64::from(byte as i8);
        }
        (unsigned_sum, signed_sum)
    }

    /// Whether the stored checksum matches the block. Producers differ in
    /// whether they sum the bytes signed or unsigned, so both are accepted.
    #[must_use]
    pub fn validate_checksum(&self) -> bool {
        let (unsigned_sum, signed_sum) = self.checksum_sums();
        let reference = decode_octal(self.raw(field::CHKSUM));
        reference == unsigned_sum || reference == signed_sum as u64
    }

    /// Compares the name field against `target` the way `strncmp` over the
    /// 100 byte field does: `target` is padded with NULs to the field width
    /// and both sides end at their first NUL.
    ///
    /// `target` must not be longer than [`NAME_LEN`]; longer targets never
    /// match.
    #[must_use]
    pub fn name_matches(&self, target: &[u8]) -> bool {
        if target.len() > NAME_LEN {
            return false;
        }
        let mut padded = [0_u8; NAME_LEN];
        padded[..target.len()].copy_from_slice(target);
        self.name().as_bytes() == TarFormatString::new(padded).as_bytes()
    }

    /// A Tar archive is terminated, if an end-of-archive entry, which consists
    /// of two 512 blocks of zero bytes, is found.
    #[must_use]
    pub fn is_zero_block(&self) -> bool {
        self.bytes.iter().all(|&x| x == 0)
    }
}

impl Debug for PosixHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PosixHeader")
            .field("name", &self.name())
            .field("mode", &self.mode())
            .field("uid", &self.uid())
            .field("gid", &self.gid())
            .field("size", &self.size())
            .field("mtime", &self.mtime())
            .field("cksum", &self.checksum())
            .field("typeflag", &self.typeflag())
            .field("linkname", &self.linkname())
            .field("magic", &self.magic())
            .field("version", &self.version())
            .field("uname", &self.uname())
            .field("gname", &self.gname())
            .field("dev_major", &self.dev_major())
            .field("dev_minor", &self.dev_minor())
            .field("prefix", &self.prefix())
            .finish()
    }
}

#[derive(Copy, Clone, Debug, PartialOrd, PartialEq, Eq)]
pub struct InvalidTypeFlagError(u8);

impl Display for InvalidTypeFlagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:x} is not a valid TypeFlag", self.0))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidTypeFlagError {}

#[cfg(all(feature = "unstable", not(feature = "std")))]
impl core::error::Error for InvalidTypeFlagError {}

#[derive(Copy, Clone, PartialOrd, PartialEq, Eq)]
pub struct TypeFlagRaw(u8);

impl TypeFlagRaw {
    /// Tries to parse the underlying value as [`TypeFlag`]. This fails if the
    /// Tar file is corrupt and the type is invalid.
    pub fn try_to_type_flag(self) -> Result<TypeFlag, InvalidTypeFlagError> {
        TypeFlag::try_from(self)
    }
}

impl Debug for TypeFlagRaw {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.try_to_type_flag(), f)
    }
}

/// Describes the kind of payload, that follows after a
/// [`PosixHeader`]. The properties of this payload are
/// described inside the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
#[allow(unused)]
pub enum TypeFlag {
    /// Represents a regular file. In order to be compatible with older versions of tar, a typeflag
    /// value of AREGTYPE should be silently recognized as a regular file. New archives should be
    /// created using REGTYPE. Also, for backward compatibility, tar treats a regular file whose
    /// name ends with a slash as a directory.
    REGTYPE = b'0',
    /// Legacy spelling of [`TypeFlag::REGTYPE`].
    AREGTYPE = b'\0',
    /// This flag represents a file linked to another file, of any type, previously archived. Such
    /// files are identified in Unix by each file having the same device and inode number. The
    /// linked-to name is specified in the linkname field with a trailing null.
    LINK = b'1',
    /// This represents a symbolic link to another file. The linked-to name is specified in the
    /// linkname field with a trailing null.
    SYMTYPE = b'2',
    /// Represents character special files and block special files respectively. In this case the
    /// devmajor and devminor fields will contain the major and minor device numbers respectively.
    CHRTYPE = b'3',
    /// See [`TypeFlag::CHRTYPE`].
    BLKTYPE = b'4',
    /// This flag specifies a directory or sub-directory. The directory name in the name field
    /// should end with a slash.
    DIRTYPE = b'5',
    /// This specifies a FIFO special file. Note that the archiving of a FIFO file archives the
    /// existence of this file and not its contents.
    FIFOTYPE = b'6',
    /// This specifies a contiguous file, which is the same as a normal file except that, in
    /// operating systems which support it, all its space is allocated contiguously on the disk.
    CONTTYPE = b'7',
    /// Extended header referring to the next file in the archive
    XHDTYPE = b'x',
    /// Global extended header
    XGLTYPE = b'g',
}

impl TypeFlag {
    /// Whether we have a regular file.
    #[must_use]
    pub fn is_regular_file(self) -> bool {
        // CONTTYPE may be treated as a regular file per POSIX.
        self == Self::AREGTYPE || self == Self::REGTYPE || self == Self::CONTTYPE
    }
}

impl TryFrom<TypeFlagRaw> for TypeFlag {
    type Error = InvalidTypeFlagError;

    fn try_from(value: TypeFlagRaw) -> Result<Self, Self::Error> {
        match value.0 {
            b'0' => Ok(Self::REGTYPE),
            b'\0' => Ok(Self::AREGTYPE),
            b'1' => Ok(Self::LINK),
            b'2' => Ok(Self::SYMTYPE),
            b'3' => Ok(Self::CHRTYPE),
            b'4' => Ok(Self::BLKTYPE),
            b'5' => Ok(Self::DIRTYPE),
            b'6' => Ok(Self::FIFOTYPE),
            b'7' => Ok(Self::CONTTYPE),
            b'x' => Ok(Self::XHDTYPE),
            b'g' => Ok(Self::XGLTYPE),
            e => Err(InvalidTypeFlagError(e)),
        }
    }
}

bitflags::bitflags! {
    /// UNIX file permissions in octal format.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeFlags: u64 {
        /// Set UID on execution.
        const SetUID = 0o4000;
        /// Set GID on execution.
        const SetGID = 0o2000;
        /// Reserved.
        const TSVTX = 0o1000;
        /// Owner read.
        const OwnerRead = 0o400;
        /// Owner write.
        const OwnerWrite = 0o200;
        /// Owner execute.
        const OwnerExec = 0o100;
        /// Group read.
        const GroupRead = 0o040;
        /// Group write.
        const GroupWrite = 0o020;
        /// Group execute.
        const GroupExec = 0o010;
        /// Others read.
        const OthersRead = 0o004;
        /// Others write.
        const OthersWrite = 0o002;
        /// Others execute.
        const OthersExec = 0o001;
    }
}
