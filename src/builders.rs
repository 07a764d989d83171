use std::collections::HashMap;
use std::io::{self, Write};

use declio::Encode;

use crate::codecs;
use crate::header::{ArchiveVersion, HeaderBuilder};
use crate::result::{Error, Result};
use crate::resources::InstanceRecord;
use crate::schema::{ResourceType, StatKind};
use crate::utils::JavaStr;
use crate::{constants, StatValue};

/// Writes statistics archives: the counterpart of
/// [`ArchiveDecoder`](crate::decoder::ArchiveDecoder), used by the round-trip
/// tests. Records are buffered and prefixed with the header on `commit`.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    header: HeaderBuilder,
    records: Vec<u8>,
    // Mirrors of the decoder's tables, so values are encoded with the width
    // their descriptor declared.
    types: HashMap<i32, Vec<StatKind>>,
    instances: HashMap<i32, i32>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&mut self, version: ArchiveVersion) -> &mut Self {
        self.header.version = version;
        self
    }

    pub fn start_time_ms(&mut self, ms: i64) -> &mut Self {
        self.header.start_time_ms = ms;
        self
    }

    pub fn system_id(&mut self, id: i64) -> &mut Self {
        self.header.system_id = id;
        self
    }

    pub fn system_start_time_ms(&mut self, ms: i64) -> &mut Self {
        self.header.system_start_time_ms = ms;
        self
    }

    pub fn timezone_offset(&mut self, offset: i32) -> &mut Self {
        self.header.timezone_offset = offset;
        self
    }

    pub fn timezone_name(&mut self, name: &str) -> &mut Self {
        self.header.timezone_name = JavaStr::new(name);
        self
    }

    pub fn system_directory(&mut self, dir: &str) -> &mut Self {
        self.header.system_directory = JavaStr::new(dir);
        self
    }

    pub fn product_description(&mut self, description: &str) -> &mut Self {
        self.header.product_description = JavaStr::new(description);
        self
    }

    pub fn os_info(&mut self, info: &str) -> &mut Self {
        self.header.os_info = JavaStr::new(info);
        self
    }

    pub fn machine_info(&mut self, info: &str) -> &mut Self {
        self.header.machine_info = JavaStr::new(info);
        self
    }

    pub fn define_type(&mut self, ty: &ResourceType) -> Result<()> {
        if self.types.contains_key(ty.id()) {
            return Err(Error::BadSchema {
                type_id: *ty.id(),
                reason: "duplicate type id",
            });
        }
        constants::RESOURCE_TYPE_TOKEN
            .encode((), &mut self.records)
            .map_err(Error::from_codec)?;
        ty.write(&mut self.records).map_err(Error::from_codec)?;
        self.types
            .insert(*ty.id(), ty.stats().iter().map(|stat| *stat.kind()).collect());
        Ok(())
    }

    pub fn create_instance(
        &mut self,
        id: i32,
        text_id: &str,
        numeric_id: i64,
        type_id: i32,
    ) -> Result<()> {
        if !self.types.contains_key(&type_id) {
            return Err(Error::UnknownType(type_id));
        }
        if self.instances.contains_key(&id) {
            return Err(Error::BadInstance(id));
        }
        constants::RESOURCE_INSTANCE_CREATE_TOKEN
            .encode((), &mut self.records)
            .map_err(Error::from_codec)?;
        InstanceRecord {
            id,
            text_id: JavaStr::new(text_id),
            numeric_id,
            type_id,
        }
        .encode((), &mut self.records)
        .map_err(Error::from_codec)?;
        self.instances.insert(id, type_id);
        Ok(())
    }

    pub fn delete_instance(&mut self, id: i32) -> Result<()> {
        self.instances
            .remove(&id)
            .ok_or(Error::UnknownInstance(id))?;
        constants::RESOURCE_INSTANCE_DELETE_TOKEN
            .encode((), &mut self.records)
            .map_err(Error::from_codec)?;
        codecs::resource_id::encode(id, &mut self.records).map_err(Error::from_codec)
    }

    /// One sampling tick: advances the clock by `delta_ms` and records the
    /// changed stats, grouped per instance as `(instance id, [(offset,
    /// value)])`.
    pub fn sample_row(
        &mut self,
        delta_ms: i64,
        changes: &[(i32, Vec<(u8, StatValue)>)],
    ) -> Result<()> {
        let mut row = vec![];
        codecs::time_delta::encode(delta_ms, &mut row).map_err(Error::from_codec)?;
        for (instance_id, stats) in changes {
            let type_id = *self
                .instances
                .get(instance_id)
                .ok_or(Error::UnknownInstance(*instance_id))?;
            let kinds = &self.types[&type_id];
            codecs::resource_id::encode(*instance_id, &mut row).map_err(Error::from_codec)?;
            for (offset, value) in stats {
                let kind = if *offset == constants::ILLEGAL_STAT_OFFSET {
                    None
                } else {
                    kinds.get(*offset as usize).copied()
                };
                let kind = kind.ok_or(Error::BadOffset {
                    type_id,
                    offset: *offset,
                    stat_count: kinds.len(),
                })?;
                offset.encode((), &mut row).map_err(Error::from_codec)?;
                value.encode(kind, &mut row).map_err(Error::from_codec)?;
            }
            constants::ILLEGAL_STAT_OFFSET
                .encode((), &mut row)
                .map_err(Error::from_codec)?;
        }
        codecs::resource_id::encode_end(&mut row).map_err(Error::from_codec)?;

        constants::SAMPLE_TOKEN
            .encode((), &mut self.records)
            .map_err(Error::from_codec)?;
        self.records.write_all(&row)?;
        Ok(())
    }

    pub fn commit<S>(self, mut sink: S) -> Result<()>
    where
        S: io::Write,
    {
        self.header
            .build()
            .write(&mut sink)
            .map_err(Error::from_codec)?;
        sink.write_all(&self.records)?;
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut buf = vec![];
        self.commit(&mut buf)?;
        Ok(buf)
    }
}
