use std::io;

use declio::Encode;
use derive_getters::Getters;

use crate::constants;
use crate::result::{decode_field, Error, Result};
use crate::utils::JavaStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveVersion {
    V2 = 2,
    V3 = 3,
    V4 = 4,
}

impl ArchiveVersion {
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(ArchiveVersion::V2),
            3 => Some(ArchiveVersion::V3),
            4 => Some(ArchiveVersion::V4),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Getters)]
pub struct ArchiveHeader {
    version: ArchiveVersion,
    start_time_ms: i64,
    system_id: i64,
    system_start_time_ms: i64,
    timezone_offset: i32,
    timezone_name: JavaStr,
    system_directory: JavaStr,
    product_description: JavaStr,
    os_info: JavaStr,
    machine_info: JavaStr,
}

impl ArchiveHeader {
    pub(crate) fn read<R>(reader: &mut R) -> Result<Self>
    where
        R: io::Read,
    {
        let magic: u8 = decode_field((), reader)?;
        if magic != constants::HEADER_TOKEN {
            return Err(Error::BadMagic(magic));
        }
        let code: u8 = decode_field((), reader)?;
        let version = ArchiveVersion::from_code(code).ok_or(Error::UnsupportedVersion(code))?;

        let start_time_ms = decode_field(constants::ENDIANESS, reader)?;
        let system_id = decode_field(constants::ENDIANESS, reader)?;
        let system_start_time_ms = decode_field(constants::ENDIANESS, reader)?;
        let timezone_offset = decode_field(constants::ENDIANESS, reader)?;
        let timezone_name = decode_field((), reader)?;
        let system_directory = decode_field((), reader)?;
        let product_description = decode_field((), reader)?;
        let os_info = decode_field((), reader)?;
        let machine_info = decode_field((), reader)?;

        Ok(Self {
            version,
            start_time_ms,
            system_id,
            system_start_time_ms,
            timezone_offset,
            timezone_name,
            system_directory,
            product_description,
            os_info,
            machine_info,
        })
    }

    pub(crate) fn write<W>(&self, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        constants::HEADER_TOKEN.encode((), writer)?;
        self.version.code().encode((), writer)?;
        self.start_time_ms.encode(constants::ENDIANESS, writer)?;
        self.system_id.encode(constants::ENDIANESS, writer)?;
        self.system_start_time_ms.encode(constants::ENDIANESS, writer)?;
        self.timezone_offset.encode(constants::ENDIANESS, writer)?;
        self.timezone_name.encode((), writer)?;
        self.system_directory.encode((), writer)?;
        self.product_description.encode((), writer)?;
        self.os_info.encode((), writer)?;
        self.machine_info.encode((), writer)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HeaderBuilder {
    pub version: ArchiveVersion,
    pub start_time_ms: i64,
    pub system_id: i64,
    pub system_start_time_ms: i64,
    pub timezone_offset: i32,
    pub timezone_name: JavaStr,
    pub system_directory: JavaStr,
    pub product_description: JavaStr,
    pub os_info: JavaStr,
    pub machine_info: JavaStr,
}

impl HeaderBuilder {
    pub fn build(self) -> ArchiveHeader {
        ArchiveHeader {
            version: self.version,
            start_time_ms: self.start_time_ms,
            system_id: self.system_id,
            system_start_time_ms: self.system_start_time_ms,
            timezone_offset: self.timezone_offset,
            timezone_name: self.timezone_name,
            system_directory: self.system_directory,
            product_description: self.product_description,
            os_info: self.os_info,
            machine_info: self.machine_info,
        }
    }
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self {
            version: ArchiveVersion::V4,
            start_time_ms: 0,
            system_id: 0,
            system_start_time_ms: 0,
            timezone_offset: 0,
            timezone_name: JavaStr::default(),
            system_directory: JavaStr::default(),
            product_description: JavaStr::default(),
            os_info: JavaStr::default(),
            machine_info: JavaStr::default(),
        }
    }
}
