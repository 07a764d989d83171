use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;

use declio::Encode;
use derive_getters::Getters;

use crate::constants;
use crate::result::{decode_field, Error, Result};
use crate::utils::JavaStr;

/// Numeric kind of one measured statistic. Everything except `Long`, `Float`
/// and `Double` widens or narrows to a signed 32-bit value on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    WChar,
}

impl StatKind {
    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            constants::BOOLEAN_CODE => Some(StatKind::Boolean),
            constants::CHAR_CODE => Some(StatKind::Char),
            constants::BYTE_CODE => Some(StatKind::Byte),
            constants::SHORT_CODE => Some(StatKind::Short),
            constants::INT_CODE => Some(StatKind::Int),
            constants::LONG_CODE => Some(StatKind::Long),
            constants::FLOAT_CODE => Some(StatKind::Float),
            constants::DOUBLE_CODE => Some(StatKind::Double),
            constants::WCHAR_CODE => Some(StatKind::WChar),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            StatKind::Boolean => constants::BOOLEAN_CODE,
            StatKind::Char => constants::CHAR_CODE,
            StatKind::Byte => constants::BYTE_CODE,
            StatKind::Short => constants::SHORT_CODE,
            StatKind::Int => constants::INT_CODE,
            StatKind::Long => constants::LONG_CODE,
            StatKind::Float => constants::FLOAT_CODE,
            StatKind::Double => constants::DOUBLE_CODE,
            StatKind::WChar => constants::WCHAR_CODE,
        }
    }

    #[inline]
    pub fn is_floating(self) -> bool {
        matches!(self, StatKind::Float | StatKind::Double)
    }
}

#[derive(Debug, Clone, Getters)]
pub struct StatDescriptor {
    name: JavaStr,
    kind: StatKind,
    is_counter: bool,
    larger_better: bool,
    unit: JavaStr,
    description: JavaStr,
}

impl StatDescriptor {
    pub fn new<S: AsRef<str>>(name: S, kind: StatKind) -> Self {
        Self {
            name: JavaStr::new(name.as_ref()),
            kind,
            is_counter: false,
            larger_better: true,
            unit: JavaStr::default(),
            description: JavaStr::default(),
        }
    }

    pub fn counter(mut self) -> Self {
        self.is_counter = true;
        self
    }

    pub fn smaller_is_better(mut self) -> Self {
        self.larger_better = false;
        self
    }

    pub fn with_unit<S: AsRef<str>>(mut self, unit: S) -> Self {
        self.unit = JavaStr::new(unit.as_ref());
        self
    }

    pub fn with_description<S: AsRef<str>>(mut self, description: S) -> Self {
        self.description = JavaStr::new(description.as_ref());
        self
    }

    fn read<R>(reader: &mut R, type_id: i32) -> Result<Self>
    where
        R: io::Read,
    {
        let name = decode_field((), reader)?;
        let code: u8 = decode_field((), reader)?;
        let kind = StatKind::from_code(code).ok_or(Error::BadSchema {
            type_id,
            reason: "invalid value kind code",
        })?;
        let is_counter = decode_field::<u8, _, _>((), reader)? != 0;
        let larger_better = decode_field::<u8, _, _>((), reader)? != 0;
        let unit = decode_field((), reader)?;
        let description = decode_field((), reader)?;
        Ok(Self {
            name,
            kind,
            is_counter,
            larger_better,
            unit,
            description,
        })
    }

    fn write<W>(&self, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        self.name.encode((), writer)?;
        self.kind.code().encode((), writer)?;
        (self.is_counter as u8).encode((), writer)?;
        (self.larger_better as u8).encode((), writer)?;
        self.unit.encode((), writer)?;
        self.description.encode((), writer)
    }
}

#[derive(Debug, Clone, Getters)]
pub struct ResourceType {
    id: i32,
    name: JavaStr,
    description: JavaStr,
    stats: Vec<StatDescriptor>,
}

impl ResourceType {
    pub fn new<S: AsRef<str>>(id: i32, name: S) -> Self {
        Self {
            id,
            name: JavaStr::new(name.as_ref()),
            description: JavaStr::default(),
            stats: vec![],
        }
    }

    pub fn with_description<S: AsRef<str>>(mut self, description: S) -> Self {
        self.description = JavaStr::new(description.as_ref());
        self
    }

    /// Appends a descriptor; its offset is its position in the list.
    pub fn with_stat(mut self, stat: StatDescriptor) -> Self {
        self.stats.push(stat);
        self
    }

    #[inline]
    pub fn stat(&self, offset: u8) -> Option<&StatDescriptor> {
        self.stats.get(offset as usize)
    }

    pub(crate) fn read<R>(reader: &mut R) -> Result<Self>
    where
        R: io::Read,
    {
        let id = decode_field(constants::ENDIANESS, reader)?;
        let name = decode_field((), reader)?;
        let description = decode_field((), reader)?;
        let stat_count: i16 = decode_field(constants::ENDIANESS, reader)?;
        if !(0..=constants::MAX_DESCRIPTORS_PER_TYPE).contains(&stat_count) {
            return Err(Error::BadSchema {
                type_id: id,
                reason: "stat count out of range",
            });
        }
        let mut stats = Vec::with_capacity(stat_count as usize);
        for _ in 0..stat_count {
            stats.push(StatDescriptor::read(reader, id)?);
        }
        Ok(Self {
            id,
            name,
            description,
            stats,
        })
    }

    pub(crate) fn write<W>(&self, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        self.id.encode(constants::ENDIANESS, writer)?;
        self.name.encode((), writer)?;
        self.description.encode((), writer)?;
        (self.stats.len() as i16).encode(constants::ENDIANESS, writer)?;
        for stat in &self.stats {
            stat.write(writer)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct SchemaTable {
    types: HashMap<i32, ResourceType>,
}

impl SchemaTable {
    pub fn insert(&mut self, ty: ResourceType) -> Result<()> {
        match self.types.entry(*ty.id()) {
            Entry::Occupied(_) => Err(Error::BadSchema {
                type_id: *ty.id(),
                reason: "duplicate type id",
            }),
            Entry::Vacant(slot) => {
                slot.insert(ty);
                Ok(())
            }
        }
    }

    #[inline]
    pub fn get(&self, id: i32) -> Option<&ResourceType> {
        self.types.get(&id)
    }
}
