use std::io;

use declio::{Decode, Encode, EncodedSize};

use crate::constants;

/// Length-prefixed string in Java's modified UTF-8: U+0000 is the two-byte
/// sequence 0xC0 0x80 and supplementary code points are stored as two 3-byte
/// surrogate sequences, so the payload is decoded as UTF-16 code units.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JavaStr(Box<str>);

impl JavaStr {
    pub fn new<S: Into<Box<str>>>(str: S) -> Self {
        Self(str.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JavaStr {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<Ctx> Decode<Ctx> for JavaStr {
    fn decode<R>(_ctx: Ctx, reader: &mut R) -> Result<Self, declio::Error>
    where
        R: io::Read,
    {
        let len = u16::decode(constants::ENDIANESS, reader)?;
        let mut buf = vec![0; len as usize];
        reader.read_exact(&mut buf)?;
        let units = decode_units(&buf)?;
        let str = String::from_utf16(&units).map_err(declio::Error::wrap)?;
        Ok(JavaStr(str.into_boxed_str()))
    }
}

impl<Ctx> Encode<Ctx> for JavaStr {
    fn encode<W>(&self, _ctx: Ctx, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        let len = encoded_utf_len(&self.0);
        if len > u16::MAX as usize {
            return Err(declio::Error::new("string exceeds the 16-bit length prefix"));
        }
        (len as u16).encode(constants::ENDIANESS, writer)?;
        for unit in self.0.encode_utf16() {
            match unit {
                0x0001..=0x007F => writer.write_all(&[unit as u8])?,
                0x0000 | 0x0080..=0x07FF => {
                    writer.write_all(&[0xC0 | (unit >> 6) as u8, 0x80 | (unit & 0x3F) as u8])?
                }
                _ => writer.write_all(&[
                    0xE0 | (unit >> 12) as u8,
                    0x80 | ((unit >> 6) & 0x3F) as u8,
                    0x80 | (unit & 0x3F) as u8,
                ])?,
            }
        }
        Ok(())
    }
}

impl<Ctx> EncodedSize<Ctx> for JavaStr {
    fn encoded_size(&self, _ctx: Ctx) -> usize {
        std::mem::size_of::<u16>() + encoded_utf_len(&self.0)
    }
}

fn decode_units(buf: &[u8]) -> Result<Vec<u16>, declio::Error> {
    let mut units = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        let b0 = buf[i];
        let unit = match b0 {
            0x00..=0x7F => {
                i += 1;
                b0 as u16
            }
            0xC0..=0xDF => {
                let b1 = continuation(buf, i + 1)?;
                i += 2;
                ((b0 as u16 & 0x1F) << 6) | (b1 as u16 & 0x3F)
            }
            0xE0..=0xEF => {
                let b1 = continuation(buf, i + 1)?;
                let b2 = continuation(buf, i + 2)?;
                i += 3;
                ((b0 as u16 & 0x0F) << 12) | ((b1 as u16 & 0x3F) << 6) | (b2 as u16 & 0x3F)
            }
            _ => {
                return Err(declio::Error::new(format!(
                    "invalid modified UTF-8 lead byte {:#04x}",
                    b0
                )))
            }
        };
        units.push(unit);
    }
    Ok(units)
}

fn continuation(buf: &[u8], at: usize) -> Result<u8, declio::Error> {
    match buf.get(at) {
        Some(&b) if b & 0xC0 == 0x80 => Ok(b),
        _ => Err(declio::Error::new("truncated modified UTF-8 sequence")),
    }
}

fn encoded_utf_len(str: &str) -> usize {
    str.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}
