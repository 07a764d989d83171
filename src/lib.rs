use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use declio::{Decode, Encode};

use crate::decoder::{ArchiveDecoder, DecodeStats};
use crate::result::Result;
use crate::schema::StatKind;
use crate::sink::{Labels, MetricSink, SinkAdapter};

pub mod builders;
pub mod codecs;
mod constants;
pub mod decoder;
pub mod header;
pub mod pool;
pub mod resources;
pub mod result;
pub mod schema;
pub mod sink;
pub mod utils;

/// Decoded stat value, tagged with the width the descriptor declared.
/// Flattening to `f64` happens at the sink boundary and nowhere earlier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    I32(i32),
    I64(i64),
    F64(f64),
}

impl StatValue {
    // i64 magnitudes above 2^53 lose precision here.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::I32(v) => v.into(),
            StatValue::I64(v) => v as f64,
            StatValue::F64(v) => v,
        }
    }

    fn as_int(self) -> Result<i64, declio::Error> {
        match self {
            StatValue::I32(v) => Ok(v as i64),
            StatValue::I64(v) => Ok(v),
            StatValue::F64(_) => Err(declio::Error::new("float value for an integer stat")),
        }
    }
}

impl Decode<StatKind> for StatValue {
    fn decode<R>(kind: StatKind, reader: &mut R) -> Result<Self, declio::Error>
    where
        R: io::Read,
    {
        match kind {
            StatKind::Long => Ok(StatValue::I64(codecs::compact::decode(reader)?)),
            StatKind::Float => {
                let bits = u32::decode(constants::ENDIANESS, reader)?;
                Ok(StatValue::F64(f32::from_bits(bits) as f64))
            }
            StatKind::Double => {
                let bits = u64::decode(constants::ENDIANESS, reader)?;
                Ok(StatValue::F64(f64::from_bits(bits)))
            }
            _ => Ok(StatValue::I32(codecs::compact::decode(reader)? as i32)),
        }
    }
}

impl Encode<StatKind> for StatValue {
    fn encode<W>(&self, kind: StatKind, writer: &mut W) -> Result<(), declio::Error>
    where
        W: io::Write,
    {
        match (kind, self) {
            (StatKind::Float, StatValue::F64(v)) => {
                (*v as f32).to_bits().encode(constants::ENDIANESS, writer)
            }
            (StatKind::Double, StatValue::F64(v)) => {
                v.to_bits().encode(constants::ENDIANESS, writer)
            }
            (kind, val) if !kind.is_floating() => codecs::compact::encode(val.as_int()?, writer),
            _ => Err(declio::Error::new("integer value for a floating-point stat")),
        }
    }
}

/// Cooperative cancellation flag, checked between records.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub(crate) metric_prefix: Option<String>,
    pub(crate) extra_labels: Labels,
    pub(crate) lenient: bool,
    pub(crate) cancel: Option<CancelToken>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.metric_prefix = Some(prefix.into());
        self
    }

    /// Adds a fixed label (cluster name, node name, ...) to every sample.
    pub fn with_label<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_labels.insert(key.into(), value.into());
        self
    }

    /// Opts into skipping sample rows that reference unknown instances or
    /// out-of-range offsets instead of aborting. Skips are counted and
    /// logged; the default is strict.
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

pub fn decode_archive<R, S>(reader: R, sink: &S, options: &DecodeOptions) -> Result<DecodeStats>
where
    R: io::Read,
    S: MetricSink,
{
    let decoder = ArchiveDecoder::open(io::BufReader::new(reader), options)?;
    let mut adapter = SinkAdapter::new(sink, options);
    let stats = decoder.run(&mut adapter)?;
    sink.flush()?;
    Ok(stats)
}

pub fn decode_path<P, S>(path: P, sink: &S, options: &DecodeOptions) -> Result<DecodeStats>
where
    P: AsRef<Path>,
    S: MetricSink,
{
    decode_archive(File::open(path)?, sink, options)
}

/// Decodes archives with raw decoded-event callbacks instead of the metric
/// sink adapter; useful for inspection tooling and tests.
pub fn decode_events<R, S>(reader: R, sink: &mut S, options: &DecodeOptions) -> Result<DecodeStats>
where
    R: io::Read,
    S: decoder::SampleSink,
{
    ArchiveDecoder::open(io::BufReader::new(reader), options)?.run(sink)
}
