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
//! Decoder for the ASCII-octal number fields of a Tar header.
//!
//! Tar producers disagree on how these fields are terminated: some write a
//! trailing NUL, some a trailing space, some both, and a few leave NULs or
//! spaces in the middle of the field. The decoder here accepts all of them
//! and never fails.

/// Default width of the `size` (and `mtime`) header field.
pub const SIZE_FIELD_LEN: usize = 12;

/// Decodes a fixed-width ASCII-octal field into a number.
///
/// The field is scanned backwards twice. The first pass looks at every byte
/// and moves the end of the digits to just before each NUL or space it sees,
/// so the earliest terminator in the field wins, even if terminators are not
/// contiguous. The second pass walks from that boundary back to the start and
/// sums up `(byte - b'0') * 8^k`.
///
/// Digits are not validated. A byte outside `'0'..='7'` contributes through the
/// same wrapping arithmetic, so malformed fields produce a meaningless but
/// deterministic value instead of an error.
///
/// ```
/// use tar_walker::decode_octal;
///
/// assert_eq!(decode_octal(b"0000012\0"), 10);
/// assert_eq!(decode_octal(b"17 \0\0\0\0\0\0\0\0\0"), 15);
/// ```
#[must_use]
pub fn decode_octal(field: &[u8]) -> u64 {
    let mut digits_end = field.len();
    for (i, &byte) in field.iter().enumerate().rev() {
        if byte == 0 || byte == b' ' {
            digits_end = i;
        }
    }

    let mut sum = 0_u64;
    let mut multiplier = 1_u64;
    for &byte in field[..digits_end].iter().rev() {
        let digit = (i64::from(byte) - i64::from(b'0')) as u64;
        sum = sum.wrapping_add(digit.wrapping_mul(multiplier));
        multiplier = multiplier.wrapping_mul(8);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero() {
        assert_eq!(decode_octal(b"0000000\0"), 0);
        assert_eq!(decode_octal(&[0; SIZE_FIELD_LEN]), 0);
        assert_eq!(decode_octal(&[b' '; SIZE_FIELD_LEN]), 0);
        assert_eq!(decode_octal(b""), 0);
    }

    #[test]
    fn test_decode_nul_terminated() {
        assert_eq!(decode_octal(b"0000012\0"), 10);
        assert_eq!(decode_octal(b"00000001001\0"), 513);
        assert_eq!(decode_octal(b"13773463000\0"), 1_609_459_200);
    }

    #[test]
    fn test_decode_space_padding() {
        assert_eq!(decode_octal(b"17 \0\0\0\0\0\0\0\0\0"), 15);
        // checksum field as written by GNU tar
        assert_eq!(decode_octal(b"012520\0 "), 0o12520);
        assert_eq!(decode_octal(b"   644 \0"), 0);
    }

    #[test]
    fn test_decode_without_terminator() {
        assert_eq!(decode_octal(b"777777777777"), 0o777_777_777_777);
        assert_eq!(decode_octal(b"10"), 8);
    }

    #[test]
    fn test_earliest_terminator_wins() {
        // the digits after the first NUL are ignored
        assert_eq!(decode_octal(b"12\x0034 \0"), 0o12);
        assert_eq!(decode_octal(b"7 7\x007"), 7);
    }

    #[test]
    fn test_non_octal_bytes_are_not_rejected() {
        // '8' still counts as eight and '9' as nine
        assert_eq!(decode_octal(b"8\0"), 8);
        assert_eq!(decode_octal(b"19\0"), 8 + 9);
        // below '0' wraps around, but always to the same value
        assert_eq!(decode_octal(b"/\0"), u64::MAX);
        assert_eq!(decode_octal(b"a1"), decode_octal(b"a1"));
    }
}
