//! Little-endian primitives used by the `.nyl`, `.nyl.meta`, `.nys` and kanji
//! dictionary formats.
//!
//! Strings are UTF-8 prefixed with their byte length as a 7-bit variable
//! length integer (low group first, high bit set while more groups follow).

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::DecodeError;

/// Longest length prefix accepted; five groups cover a full `u32`.
const MAX_PREFIX_BYTES: usize = 5;

/// Upper bound on a single string or blob, guards allocations on corrupt input.
pub const MAX_FIELD_LEN: usize = 64 * 1024 * 1024;

pub trait ReadBinaryExt: Read {
    fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_i32::<LittleEndian>()?)
    }

    fn read_f32_le(&mut self) -> Result<f32, DecodeError> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(self.read_u16::<LittleEndian>()?)
    }

    fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        Ok(self.read_u32::<LittleEndian>()?)
    }

    fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        Ok(self.read_u64::<LittleEndian>()?)
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_u8()?)
    }

    /// Read a non-negative `int32` count.
    fn read_count(&mut self, what: &str) -> Result<usize, DecodeError> {
        let value = self.read_i32_le()?;
        usize::try_from(value)
            .map_err(|_| DecodeError::Invalid(format!("negative {what}: {value}")))
    }

    fn read_prefix_len(&mut self) -> Result<usize, DecodeError> {
        let mut value: u64 = 0;
        for group in 0..MAX_PREFIX_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * group);
            if byte & 0x80 == 0 {
                let len = usize::try_from(value)
                    .map_err(|_| DecodeError::Invalid("string length overflow".into()))?;
                if len > MAX_FIELD_LEN {
                    return Err(DecodeError::Invalid(format!("string length {len} too large")));
                }
                return Ok(len);
            }
        }
        Err(DecodeError::Invalid("string length prefix too long".into()))
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_prefix_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| DecodeError::Invalid(format!("invalid UTF-8: {e}")))
    }

    /// Like [`ReadBinaryExt::read_string`] but rejects a length prefix above
    /// `max` before reading the payload.
    fn read_string_max(&mut self, max: usize) -> Result<String, DecodeError> {
        let len = self.read_prefix_len()?;
        if len > max {
            return Err(DecodeError::Invalid(format!("string length {len} exceeds {max}")));
        }
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| DecodeError::Invalid(format!("invalid UTF-8: {e}")))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        if len > MAX_FIELD_LEN {
            return Err(DecodeError::Invalid(format!("field length {len} too large")));
        }
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a raw fixed tag and compare it against `expected`.
    fn expect_tag(&mut self, expected: &[u8]) -> Result<(), DecodeError> {
        let mut found = vec![0u8; expected.len()];
        self.read_exact(&mut found)?;
        if found != expected {
            return Err(DecodeError::BadMagic {
                expected: String::from_utf8_lossy(expected).into_owned(),
                found: String::from_utf8_lossy(&found).into_owned(),
            });
        }
        Ok(())
    }
}

impl<R: Read + ?Sized> ReadBinaryExt for R {}

pub trait WriteBinaryExt: Write {
    fn write_i32_le(&mut self, value: i32) -> io::Result<()> {
        self.write_i32::<LittleEndian>(value)
    }

    fn write_f32_le(&mut self, value: f32) -> io::Result<()> {
        self.write_f32::<LittleEndian>(value)
    }

    fn write_u16_le(&mut self, value: u16) -> io::Result<()> {
        self.write_u16::<LittleEndian>(value)
    }

    fn write_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_u32::<LittleEndian>(value)
    }

    fn write_u64_le(&mut self, value: u64) -> io::Result<()> {
        self.write_u64::<LittleEndian>(value)
    }

    fn write_byte(&mut self, value: u8) -> io::Result<()> {
        self.write_u8(value)
    }

    /// Write a collection length as `int32`.
    fn write_count(&mut self, count: usize) -> io::Result<()> {
        let value = i32::try_from(count)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "count exceeds int32"))?;
        self.write_i32_le(value)
    }

    fn write_string(&mut self, value: &str) -> io::Result<()> {
        let mut len = value.len();
        loop {
            let mut byte = (len & 0x7f) as u8;
            len >>= 7;
            if len != 0 {
                byte |= 0x80;
            }
            self.write_u8(byte)?;
            if len == 0 {
                break;
            }
        }
        self.write_all(value.as_bytes())
    }
}

impl<W: Write + ?Sized> WriteBinaryExt for W {}
