use declio::ctx::Endian;

// The archive writer follows the Java DataOutput convention.
pub const ENDIANESS: Endian = Endian::Big;

pub const HEADER_TOKEN: u8 = 77;

pub const SAMPLE_TOKEN: u8 = 0;
pub const RESOURCE_TYPE_TOKEN: u8 = 1;
pub const RESOURCE_INSTANCE_CREATE_TOKEN: u8 = 2;
pub const RESOURCE_INSTANCE_DELETE_TOKEN: u8 = 3;
pub const RESOURCE_INSTANCE_INITIALIZE_TOKEN: u8 = 4;

// Compact value scheme: -128 starts a 2-byte value, -127..=-122 start
// 3..=8-byte values, everything at or above the 1-byte minimum is a literal.
pub const COMPACT_VALUE_2_TOKEN: i8 = i8::MIN;
pub const MIN_1BYTE_COMPACT_VALUE: i8 = COMPACT_VALUE_2_TOKEN + 7;
pub const MAX_1BYTE_COMPACT_VALUE: i8 = i8::MAX;

pub const SHORT_RESOURCE_INST_ID_TOKEN: u8 = 253;
pub const INT_RESOURCE_INST_ID_TOKEN: u8 = 254;
pub const ILLEGAL_RESOURCE_INST_ID_TOKEN: u8 = 255;
pub const MAX_BYTE_RESOURCE_INST_ID: u8 = 252;

pub const INT_TIMESTAMP_TOKEN: u16 = u16::MAX;
pub const MAX_SHORT_TIMESTAMP: u16 = u16::MAX - 1;

pub const ILLEGAL_STAT_OFFSET: u8 = 255;
pub const MAX_DESCRIPTORS_PER_TYPE: i16 = 10000;

pub const BOOLEAN_CODE: u8 = 1;
pub const CHAR_CODE: u8 = 2;
pub const BYTE_CODE: u8 = 3;
pub const SHORT_CODE: u8 = 4;
pub const INT_CODE: u8 = 5;
pub const LONG_CODE: u8 = 6;
pub const FLOAT_CODE: u8 = 7;
pub const DOUBLE_CODE: u8 = 8;
pub const WCHAR_CODE: u8 = 12;
