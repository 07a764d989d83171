/// Variable-width signed integers: a single leading byte is either a literal
/// in `MIN_1BYTE_COMPACT_VALUE..=127` or a token selecting how many
/// big-endian payload bytes follow (2 for `COMPACT_VALUE_2_TOKEN`, 3..=8 for
/// the tokens above it). Sign comes from the high bit of the first payload
/// byte.
pub mod compact {
    use std::io;

    use declio::{Decode, Encode};

    use crate::constants::{
        COMPACT_VALUE_2_TOKEN, ENDIANESS, MAX_1BYTE_COMPACT_VALUE, MIN_1BYTE_COMPACT_VALUE,
    };

    pub fn decode<R>(reader: &mut R) -> Result<i64, declio::Error>
    where
        R: io::Read,
    {
        let first = u8::decode((), reader)? as i8;
        if first >= MIN_1BYTE_COMPACT_VALUE {
            return Ok(first as i64);
        }
        if first == COMPACT_VALUE_2_TOKEN {
            return Ok(i16::decode(ENDIANESS, reader)? as i64);
        }
        let count = (first - COMPACT_VALUE_2_TOKEN) as usize + 2;
        let mut val = (u8::decode((), reader)? as i8) as i64;
        for _ in 1..count {
            val = (val << 8) | u8::decode((), reader)? as i64;
        }
        Ok(val)
    }

    pub fn encode<W>(val: i64, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        if (MIN_1BYTE_COMPACT_VALUE as i64..=MAX_1BYTE_COMPACT_VALUE as i64).contains(&val) {
            return (val as u8).encode((), writer);
        }
        if (i16::MIN as i64..=i16::MAX as i64).contains(&val) {
            (COMPACT_VALUE_2_TOKEN as u8).encode((), writer)?;
            return (val as i16).encode(ENDIANESS, writer);
        }
        let count = byte_width(val);
        let token = COMPACT_VALUE_2_TOKEN + (count as i8 - 2);
        (token as u8).encode((), writer)?;
        for shift in (0..count).rev() {
            (((val >> (shift * 8)) & 0xFF) as u8).encode((), writer)?;
        }
        Ok(())
    }

    // Smallest two's-complement width in 3..=8 bytes.
    fn byte_width(val: i64) -> usize {
        for width in 3..8 {
            let bits = width as u32 * 8;
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if (min..=max).contains(&val) {
                return width;
            }
        }
        8
    }

    #[cfg(test)]
    mod tests {
        use super::byte_width;

        #[test]
        fn widths() {
            assert_eq!(byte_width(1 << 22), 3);
            assert_eq!(byte_width(-(1 << 23)), 3);
            assert_eq!(byte_width(1 << 23), 4);
            assert_eq!(byte_width(i64::from(i32::MIN)), 4);
            assert_eq!(byte_width(i64::from(i32::MAX) + 1), 5);
            assert_eq!(byte_width(i64::MIN), 8);
            assert_eq!(byte_width(i64::MAX), 8);
        }
    }
}

/// Resource instance ids in sample rows and delete records: one byte up to
/// 252, 253/254 escape to 16/32-bit values, 255 is the end-of-row sentinel
/// (`None`). Timestamp tokens reuse the same numerals in a different
/// syntactic position; see [`time_delta`].
pub mod resource_id {
    use std::io;

    use declio::{Decode, Encode};

    use crate::constants::{
        ENDIANESS, ILLEGAL_RESOURCE_INST_ID_TOKEN, INT_RESOURCE_INST_ID_TOKEN,
        MAX_BYTE_RESOURCE_INST_ID, SHORT_RESOURCE_INST_ID_TOKEN,
    };

    pub fn decode<R>(reader: &mut R) -> Result<Option<i32>, declio::Error>
    where
        R: io::Read,
    {
        let token = u8::decode((), reader)?;
        match token {
            ILLEGAL_RESOURCE_INST_ID_TOKEN => Ok(None),
            INT_RESOURCE_INST_ID_TOKEN => Ok(Some(u32::decode(ENDIANESS, reader)? as i32)),
            SHORT_RESOURCE_INST_ID_TOKEN => Ok(Some(u16::decode(ENDIANESS, reader)? as i32)),
            id => Ok(Some(id as i32)),
        }
    }

    pub fn encode<W>(id: i32, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        if (0..=MAX_BYTE_RESOURCE_INST_ID as i32).contains(&id) {
            (id as u8).encode((), writer)
        } else if (0..=u16::MAX as i32).contains(&id) {
            SHORT_RESOURCE_INST_ID_TOKEN.encode((), writer)?;
            (id as u16).encode(ENDIANESS, writer)
        } else {
            INT_RESOURCE_INST_ID_TOKEN.encode((), writer)?;
            (id as u32).encode(ENDIANESS, writer)
        }
    }

    pub fn encode_end<W>(writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        ILLEGAL_RESOURCE_INST_ID_TOKEN.encode((), writer)
    }
}

/// Per-row clock advance: an unsigned 16-bit delta, with `INT_TIMESTAMP_TOKEN`
/// escaping to a signed 32-bit delta.
pub mod time_delta {
    use std::io;

    use declio::{Decode, Encode};

    use crate::constants::{ENDIANESS, INT_TIMESTAMP_TOKEN, MAX_SHORT_TIMESTAMP};

    pub fn decode<R>(reader: &mut R) -> Result<i64, declio::Error>
    where
        R: io::Read,
    {
        let short = u16::decode(ENDIANESS, reader)?;
        if short == INT_TIMESTAMP_TOKEN {
            Ok(i32::decode(ENDIANESS, reader)? as i64)
        } else {
            Ok(short as i64)
        }
    }

    pub fn encode<W>(delta: i64, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        if (0..=MAX_SHORT_TIMESTAMP as i64).contains(&delta) {
            (delta as u16).encode(ENDIANESS, writer)
        } else if (i32::MIN as i64..=i32::MAX as i64).contains(&delta) {
            INT_TIMESTAMP_TOKEN.encode(ENDIANESS, writer)?;
            (delta as i32).encode(ENDIANESS, writer)
        } else {
            Err(declio::Error::new("timestamp delta exceeds 32 bits"))
        }
    }
}
