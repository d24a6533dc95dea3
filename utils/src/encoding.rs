//! Length-prefixed binary records for entities whose fields are
//! variable-size big integers. Every record is self-delimiting so that a
//! reader can resynchronize after elements whose encoded size depends on the
//! group parameters.

use rug::{integer::Order, Integer};

/// Failure while decoding a length-prefixed record. Any error aborts the
/// decode of the whole enclosing structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remained than the prefix announced.
    UnexpectedEnd { needed: usize, remaining: usize },
    /// A sign byte other than 0 or 1.
    InvalidSign(u8),
    /// A tag byte with no corresponding variant.
    InvalidTag(u8),
    /// Bytes left over after the structure was fully decoded.
    TrailingBytes(usize),
    /// A text field that is not an even-length hex string.
    InvalidHex,
}

/// Lowercase hex of `bytes`.
pub fn hex_encode(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut out = String::with_capacity(2 * bytes.len());
    for byte in bytes {
        write!(out, "{byte:02x}").expect("writing to a String cannot fail");
    }
    out
}

pub fn hex_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    if !text.is_ascii() || text.len() % 2 != 0 {
        return Err(DecodeError::InvalidHex);
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).map_err(|_| DecodeError::InvalidHex))
        .collect()
}

/// Cursor over an immutable byte buffer.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Errors if decoded input remains; call once a structure is complete.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.remaining()))
        }
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEnd {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let mut b = [0u8; 4];
        b.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(b))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let mut b = [0u8; 8];
        b.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(b))
    }

    /// Reads a `[len: u32][bytes]` field.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Reads a `[sign: u8][len: u32][magnitude]` integer field.
    pub fn read_integer(&mut self) -> Result<Integer, DecodeError> {
        let sign = self.read_u8()?;
        if sign > 1 {
            return Err(DecodeError::InvalidSign(sign));
        }
        let magnitude = bytes_to_integer(self.read_bytes()?);
        Ok(if sign == 1 { -magnitude } else { magnitude })
    }
}

pub fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

pub fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Writes a `[len: u32][bytes]` field.
pub fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    write_u32(out, bytes.len() as u32);
    out.extend_from_slice(bytes);
}

/// Writes a `[sign: u8][len: u32][magnitude]` integer field.
pub fn write_integer(out: &mut Vec<u8>, value: &Integer) {
    write_u8(out, u8::from(value.is_negative()));
    write_bytes(out, &integer_to_bytes(value));
}

/// Big-endian magnitude of `value`; the empty slice for zero.
pub fn integer_to_bytes(value: &Integer) -> Vec<u8> {
    let mut bytes = vec![0u8; value.significant_digits::<u8>()];
    value.write_digits(&mut bytes, Order::MsfBe);
    bytes
}

/// Inverse of [`integer_to_bytes`] for non-negative values.
pub fn bytes_to_integer(bytes: &[u8]) -> Integer {
    let mut value = Integer::new();
    value.assign_digits(bytes, Order::MsfBe);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trip() {
        for v in [
            Integer::ZERO,
            Integer::from(1),
            Integer::from(-1),
            Integer::from(u64::MAX),
            -(Integer::from(1) << 300u32),
            (Integer::from(7) << 1024u32) + 13,
        ] {
            let mut out = vec![];
            write_integer(&mut out, &v);
            let mut reader = Reader::new(&out);
            assert_eq!(reader.read_integer().unwrap(), v);
            reader.finish().unwrap();
        }
    }

    #[test]
    fn mixed_record_round_trip() {
        let mut out = vec![];
        write_u64(&mut out, 3);
        write_bytes(&mut out, b"escrow");
        write_integer(&mut out, &Integer::from(-99));

        let mut reader = Reader::new(&out);
        assert_eq!(reader.read_u64().unwrap(), 3);
        assert_eq!(reader.read_bytes().unwrap(), b"escrow");
        assert_eq!(reader.read_integer().unwrap(), Integer::from(-99));
        reader.finish().unwrap();
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut out = vec![];
        write_integer(&mut out, &Integer::from(1u64 << 40));
        out.truncate(out.len() - 1);
        let mut reader = Reader::new(&out);
        assert!(matches!(
            reader.read_integer(),
            Err(DecodeError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex_encode(&[0x00, 0xde, 0xad, 0x0f]), "00dead0f");
        assert_eq!(hex_decode("00dead0f").unwrap(), vec![0x00, 0xde, 0xad, 0x0f]);
        assert_eq!(hex_decode("abc"), Err(DecodeError::InvalidHex));
        assert_eq!(hex_decode("zz"), Err(DecodeError::InvalidHex));
    }

    #[test]
    fn trailing_bytes_are_an_error() {
        let mut out = vec![];
        write_u8(&mut out, 0);
        write_u8(&mut out, 0);
        let mut reader = Reader::new(&out);
        reader.read_u8().unwrap();
        assert_eq!(reader.finish(), Err(DecodeError::TrailingBytes(1)));
    }
}
