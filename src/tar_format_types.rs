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
//! Typed views over the fixed-width fields of a Tar header: NUL-terminated
//! strings and ASCII-octal numbers.

use crate::octal::decode_octal;
use core::fmt::{Debug, Formatter};
use core::str::{from_utf8, Utf8Error};

/// A Tar format string is a fixed length byte array containing UTF-8 bytes.
/// This string will be null terminated if it doesn't fill the entire array.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct TarFormatString<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> TarFormatString<N> {
    /// Constructor.
    ///
    /// # Panics
    /// Panics of `N` is zero, i.e., the underlying array has no length.
    #[must_use]
    pub const fn new(bytes: [u8; N]) -> Self {
        assert!(N > 0, "array should have at least one element");
        Self { bytes }
    }

    /// True if the is string empty (ignoring NULL bytes).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes[0] == 0
    }

    /// Returns the length of the payload in bytes. This is either the full
    /// capacity `N` or the data until the first NULL byte.
    #[must_use]
    pub fn size(&self) -> usize {
        memchr::memchr(0, &self.bytes).unwrap_or(N)
    }

    /// The raw field, including any NULL padding.
    #[must_use]
    pub const fn as_raw(&self) -> &[u8; N] {
        &self.bytes
    }

    /// The payload without the terminating NULL byte and without anything
    /// that follows it.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[0..self.size()]
    }

    /// Returns a str ref without terminating or intermediate NULL bytes. The
    /// string is truncated at the first NULL byte, in case not the full length
    /// was used.
    ///
    /// # Errors
    /// Returns a [`Utf8Error`] error for invalid strings.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        from_utf8(self.as_bytes())
    }

    /// Wrapper around [`Self::as_str`] that skips leading spaces and stops
    /// as soon as the next space is found. This is necessary to properly parse
    /// certain Tar-style encoded numbers. Some ustar implementations pad
    /// spaces which prevents the proper parsing as number.
    ///
    /// # Errors
    /// Returns a [`Utf8Error`] error for invalid strings.
    pub fn as_str_until_first_space(&self) -> Result<&str, Utf8Error> {
        self.as_str().map(|str| {
            let str = str.trim_start_matches(' ');
            let end_index_exclusive = str.find(' ').unwrap_or(str.len());
            &str[0..end_index_exclusive]
        })
    }
}

impl<const N: usize> Debug for TarFormatString<N> {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(
            f,
            "str='{:?}',byte_usage={}/{}",
            from_utf8(self.as_bytes()),
            self.size(),
            N
        )
    }
}

/// An octal number as found in Tar headers.
///
/// Two readings are offered: [`Self::decode`] is the lenient decoder that
/// never fails and is what the archive walker relies on, [`Self::as_number`]
/// is a strict parse that reports malformed digits.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct TarFormatOctal<const N: usize>(TarFormatString<N>);

impl<const N: usize> TarFormatOctal<N> {
    #[must_use]
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(TarFormatString::new(bytes))
    }

    /// Decodes the field with [`decode_octal`].
    #[must_use]
    pub fn decode(&self) -> u64 {
        decode_octal(self.0.as_raw())
    }

    /// Interprets the underlying value as an octal number of the specified
    /// type. Leading and trailing spaces are ignored, an empty field is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying value cannot be parsed as an octal
    /// number of the specified type.
    pub fn as_number<T>(&self) -> core::result::Result<T, T::FromStrRadixErr>
    where
        T: num_traits::Num,
    {
        match self.0.as_str_until_first_space().unwrap_or("0") {
            "" => Ok(T::zero()),
            digits => T::from_str_radix(digits, 8),
        }
    }
}

impl<const N: usize> Debug for TarFormatOctal<N> {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        let raw = from_utf8(self.0.as_bytes()).unwrap_or("<invalid utf-8>");
        match self.as_number::<u64>() {
            Err(msg) => write!(f, "{} [{}]", msg, raw),
            Ok(val) => write!(f, "{} [{}]", val, raw),
        }
    }
}

#[cfg(test)]
mod tar_format_string_tests {
    use super::TarFormatString;

    use core::mem::size_of_val;

    #[test]
    fn test_empty_string() {
        let empty = TarFormatString::new([0]);
        assert_eq!(size_of_val(&empty), 1);
        assert!(empty.is_empty());
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.as_str(), Ok(""));
    }

    #[test]
    fn test_one_byte_string() {
        let s = TarFormatString::new([b'A']);
        assert!(!s.is_empty());
        assert_eq!(s.size(), 1);
        assert_eq!(s.as_str(), Ok("A"));
    }

    #[test]
    fn test_nul_terminated_keeps_raw_padding() {
        let s = TarFormatString::new([b'A', 0, b'B']);
        assert!(!s.is_empty());
        assert_eq!(s.size(), 1);
        assert_eq!(s.as_bytes(), b"A");
        assert_eq!(s.as_raw(), b"A\0B");
        assert_eq!(s.as_str(), Ok("A"));
    }

    #[test]
    fn test_str_until_first_space() {
        let s = TarFormatString::new([b'A', b'B', b' ', b'X', 0]);
        assert_eq!(s.size(), 4);
        assert_eq!(s.as_str(), Ok("AB X"));
        assert_eq!(s.as_str_until_first_space(), Ok("AB"));
    }

    #[test]
    fn test_str_until_first_space_skips_leading_spaces() {
        let s = TarFormatString::new(*b"  17 \0\0\0");
        assert_eq!(s.as_str(), Ok("  17 "));
        assert_eq!(s.as_str_until_first_space(), Ok("17"));
        let blank = TarFormatString::new(*b"    \0");
        assert_eq!(blank.as_str_until_first_space(), Ok(""));
    }

    #[test]
    fn test_invalid_utf8() {
        let s = TarFormatString::new([0xff, 0xfe, 0]);
        assert!(s.as_str().is_err());
        assert_eq!(s.as_bytes(), &[0xff, 0xfe]);
    }
}
