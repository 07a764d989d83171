use std::io;

use thiserror::Error;

pub type Result<A, E = Error> = std::result::Result<A, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoFailed(io::Error),
    #[error("encoding error: {0}")]
    EncodingFailed(declio::Error),
    #[error("not a statistics archive (leading byte {0:#04x})")]
    BadMagic(u8),
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u8),
    #[error("unexpected end of archive")]
    UnexpectedEof,
    #[error("bad schema for resource type {type_id}: {reason}")]
    BadSchema { type_id: i32, reason: &'static str },
    #[error("illegal record token {0:#04x}")]
    BadRecord(u8),
    #[error("stat offset {offset} out of range for resource type {type_id} ({stat_count} stats)")]
    BadOffset {
        type_id: i32,
        offset: u8,
        stat_count: usize,
    },
    #[error("compact token {0:#04x} is not valid in this position")]
    BadCompactToken(u8),
    #[error("running clock went negative ({clock} ms after a delta of {delta} ms)")]
    BadClock { clock: i64, delta: i64 },
    #[error("resource instance {0} already exists")]
    BadInstance(i32),
    #[error("reference to unknown resource type {0}")]
    UnknownType(i32),
    #[error("reference to unknown resource instance {0}")]
    UnknownInstance(i32),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("decode cancelled")]
    Cancelled,
}

impl Error {
    // A truncated stream surfaces as an I/O EOF somewhere in the codec's
    // source chain; everything else is a malformed payload.
    pub(crate) fn from_codec(err: declio::Error) -> Self {
        if is_unexpected_eof(&err) {
            Error::UnexpectedEof
        } else {
            Error::EncodingFailed(err)
        }
    }

    pub(crate) fn is_row_recoverable(&self) -> bool {
        matches!(self, Error::BadOffset { .. } | Error::UnknownInstance(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::IoFailed(err)
        }
    }
}

pub(crate) fn decode_field<A, Ctx, R>(ctx: Ctx, reader: &mut R) -> Result<A>
where
    A: declio::Decode<Ctx>,
    R: io::Read,
{
    A::decode(ctx, reader).map_err(Error::from_codec)
}

fn is_unexpected_eof(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return io_err.kind() == io::ErrorKind::UnexpectedEof;
        }
        source = cause.source();
    }
    false
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SinkError(String);

impl SinkError {
    pub fn new<S: AsRef<str>>(message: S) -> Self {
        SinkError(message.as_ref().to_string())
    }
}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        SinkError(err.to_string())
    }
}
