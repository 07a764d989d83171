use std::io::BufRead;

use declio::Decode;
use derive_getters::Getters;
use tracing::{debug, warn};

use crate::codecs;
use crate::header::ArchiveHeader;
use crate::resources::{InstanceRecord, InstanceTable, ResourceInstance};
use crate::result::{decode_field, Error, Result};
use crate::schema::{ResourceType, SchemaTable, StatDescriptor};
use crate::{constants, CancelToken, DecodeOptions, StatValue};

/// Receives each decoded sample as it is parsed. The decoder retains no
/// sample history.
pub trait SampleSink {
    fn sample(&mut self, sample: SampleView<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct SampleView<'a> {
    pub timestamp_ms: i64,
    pub resource_type: &'a ResourceType,
    pub instance: &'a ResourceInstance,
    pub stat: &'a StatDescriptor,
    pub stat_offset: u8,
    pub value: StatValue,
}

#[derive(Debug, Clone, Default, Getters)]
pub struct DecodeStats {
    records: u64,
    resource_types: u64,
    instances_created: u64,
    instances_deleted: u64,
    samples: u64,
    skipped_rows: u64,
}

/// Streaming decoder for one statistics archive. Strict by default: any
/// protocol violation aborts the decode. The sink may have received an
/// arbitrary prefix of the samples when an error is returned.
pub struct ArchiveDecoder<R> {
    reader: R,
    header: ArchiveHeader,
    clock: i64,
    schema: SchemaTable,
    instances: InstanceTable,
    stats: DecodeStats,
    lenient: bool,
    cancel: Option<CancelToken>,
}

impl<R> ArchiveDecoder<R>
where
    R: BufRead,
{
    pub fn open(mut reader: R, options: &DecodeOptions) -> Result<Self> {
        if reader.fill_buf()?.is_empty() {
            return Err(Error::UnexpectedEof);
        }
        let header = ArchiveHeader::read(&mut reader)?;
        let clock = *header.start_time_ms();
        debug!(
            version = header.version().code(),
            start_time_ms = clock,
            "read archive header"
        );
        Ok(Self {
            reader,
            header,
            clock,
            schema: SchemaTable::default(),
            instances: InstanceTable::default(),
            stats: DecodeStats::default(),
            lenient: options.lenient,
            cancel: options.cancel.clone(),
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn run<S>(mut self, sink: &mut S) -> Result<DecodeStats>
    where
        S: SampleSink,
    {
        loop {
            if self.cancel.as_ref().map_or(false, CancelToken::is_cancelled) {
                return Err(Error::Cancelled);
            }
            // End-of-file is legal only while waiting for a record token.
            let kind = match self.next_token()? {
                Some(kind) => kind,
                None => break,
            };
            match kind {
                constants::SAMPLE_TOKEN => {
                    if let Err(err) = self.read_sample_row(sink) {
                        if self.lenient && err.is_row_recoverable() {
                            warn!(error = %err, "skipping sample row");
                            self.stats.skipped_rows += 1;
                            self.resync()?;
                        } else {
                            return Err(err);
                        }
                    }
                }
                constants::RESOURCE_TYPE_TOKEN => self.read_resource_type()?,
                constants::RESOURCE_INSTANCE_CREATE_TOKEN => self.read_instance_create()?,
                constants::RESOURCE_INSTANCE_DELETE_TOKEN => self.read_instance_delete()?,
                // No writer is known to produce the initialize token and its
                // payload is undocumented, so it is rejected like any other
                // stray byte rather than skipped.
                constants::RESOURCE_INSTANCE_INITIALIZE_TOKEN => {
                    return Err(Error::BadRecord(kind))
                }
                other => return Err(Error::BadRecord(other)),
            }
            self.stats.records += 1;
        }
        Ok(self.stats)
    }

    fn next_token(&mut self) -> Result<Option<u8>> {
        let first = self.reader.fill_buf()?.first().copied();
        if first.is_some() {
            self.reader.consume(1);
        }
        Ok(first)
    }

    // Lenient-mode only: drop bytes until something that could start a
    // record. This is a heuristic; the caller counts and logs the skip.
    fn resync(&mut self) -> Result<()> {
        loop {
            let first = self.reader.fill_buf()?.first().copied();
            match first {
                None => return Ok(()),
                Some(token) if token <= constants::RESOURCE_INSTANCE_DELETE_TOKEN => {
                    return Ok(())
                }
                Some(_) => self.reader.consume(1),
            }
        }
    }

    fn read_resource_type(&mut self) -> Result<()> {
        let ty = ResourceType::read(&mut self.reader)?;
        debug!(
            type_id = *ty.id(),
            name = ty.name().as_str(),
            stats = ty.stats().len(),
            "resource type defined"
        );
        self.schema.insert(ty)?;
        self.stats.resource_types += 1;
        Ok(())
    }

    fn read_instance_create(&mut self) -> Result<()> {
        let record: InstanceRecord = decode_field((), &mut self.reader)?;
        if self.schema.get(record.type_id).is_none() {
            return Err(Error::UnknownType(record.type_id));
        }
        debug!(
            instance_id = record.id,
            text_id = record.text_id.as_str(),
            type_id = record.type_id,
            "resource instance created"
        );
        self.instances
            .insert(ResourceInstance::from_record(record, self.clock))?;
        self.stats.instances_created += 1;
        Ok(())
    }

    fn read_instance_delete(&mut self) -> Result<()> {
        let id = codecs::resource_id::decode(&mut self.reader)
            .map_err(Error::from_codec)?
            .ok_or(Error::BadCompactToken(
                constants::ILLEGAL_RESOURCE_INST_ID_TOKEN,
            ))?;
        self.instances.remove(id)?;
        self.stats.instances_deleted += 1;
        Ok(())
    }

    fn read_sample_row<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: SampleSink,
    {
        let delta = codecs::time_delta::decode(&mut self.reader).map_err(Error::from_codec)?;
        let clock = match self.clock.checked_add(delta) {
            Some(clock) if clock >= 0 => clock,
            _ => {
                return Err(Error::BadClock {
                    clock: self.clock,
                    delta,
                })
            }
        };
        self.clock = clock;

        loop {
            let id = match codecs::resource_id::decode(&mut self.reader)
                .map_err(Error::from_codec)?
            {
                Some(id) => id,
                None => return Ok(()),
            };
            let instance = self.instances.get(id).ok_or(Error::UnknownInstance(id))?;
            let ty = self
                .schema
                .get(*instance.type_id())
                .ok_or(Error::UnknownType(*instance.type_id()))?;

            loop {
                let offset: u8 = decode_field((), &mut self.reader)?;
                if offset == constants::ILLEGAL_STAT_OFFSET {
                    break;
                }
                let stat = ty.stat(offset).ok_or(Error::BadOffset {
                    type_id: *ty.id(),
                    offset,
                    stat_count: ty.stats().len(),
                })?;
                let value = StatValue::decode(*stat.kind(), &mut self.reader)
                    .map_err(Error::from_codec)?;
                sink.sample(SampleView {
                    timestamp_ms: clock,
                    resource_type: ty,
                    instance,
                    stat,
                    stat_offset: offset,
                    value,
                })?;
                self.stats.samples += 1;
            }
        }
    }
}
