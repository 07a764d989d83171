use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert_matches::assert_matches;
use gfs_sdk::builders::ArchiveBuilder;
use gfs_sdk::codecs;
use gfs_sdk::decoder::{SampleSink, SampleView};
use gfs_sdk::header::ArchiveVersion;
use gfs_sdk::result::{Error, Result, SinkError};
use gfs_sdk::schema::{ResourceType, StatDescriptor, StatKind};
use gfs_sdk::sink::{Labels, MetricSink};
use gfs_sdk::{decode_archive, decode_events, CancelToken, DecodeOptions, StatValue};

#[derive(Debug, Clone, PartialEq)]
struct Append {
    name: String,
    labels: BTreeMap<String, String>,
    timestamp_ms: i64,
    value: f64,
}

#[derive(Debug, Default)]
struct RecordingSink {
    appends: Mutex<Vec<Append>>,
    flushes: AtomicUsize,
}

impl RecordingSink {
    fn appends(&self) -> Vec<Append> {
        self.appends.lock().unwrap().clone()
    }
}

impl MetricSink for RecordingSink {
    fn append(
        &self,
        metric_name: &str,
        labels: &Labels,
        timestamp_ms: i64,
        value: f64,
    ) -> Result<(), SinkError> {
        self.appends.lock().unwrap().push(Append {
            name: metric_name.to_string(),
            labels: labels.clone(),
            timestamp_ms,
            value,
        });
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug)]
struct FailingSink;

impl MetricSink for FailingSink {
    fn append(&self, _: &str, _: &Labels, _: i64, _: f64) -> Result<(), SinkError> {
        Err(SinkError::new("append rejected"))
    }

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct EventSink {
    events: Vec<(i64, i32, u8, StatValue)>,
}

impl SampleSink for EventSink {
    fn sample(&mut self, sample: SampleView<'_>) -> Result<()> {
        self.events.push((
            sample.timestamp_ms,
            *sample.instance.id(),
            sample.stat_offset,
            sample.value,
        ));
        Ok(())
    }
}

fn minimal_archive() -> Vec<u8> {
    let mut builder = ArchiveBuilder::new();
    builder
        .start_time_ms(1000)
        .system_id(1)
        .system_start_time_ms(10000)
        .timezone_name("UTC");
    builder
        .define_type(&ResourceType::new(10, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "Y", 3, 10).unwrap();
    builder
        .sample_row(5, &[(2, vec![(0, StatValue::I32(42))])])
        .unwrap();
    builder.into_bytes().unwrap()
}

fn header_only() -> Vec<u8> {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(1000);
    builder.into_bytes().unwrap()
}

#[rustfmt::skip]
const MINIMAL_ARCHIVE: &[u8] = &[
    0x4D, 0x04,                                     // magic, version
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xE8, // archive start: 1000
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // system id: 1
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x27, 0x10, // system start: 10000
    0x00, 0x00, 0x00, 0x00,                         // timezone offset
    0x00, 0x03, b'U', b'T', b'C',                   // timezone name
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // four empty strings
    0x01,                                           // resource type record
    0x00, 0x00, 0x00, 0x0A,                         // type id: 10
    0x00, 0x01, b'T',                               // type name
    0x00, 0x00,                                     // type description
    0x00, 0x01,                                     // one stat
    0x00, 0x01, b'X',                               // stat name
    0x05, 0x00, 0x01,                               // int, not a counter, larger is better
    0x00, 0x00, 0x00, 0x00,                         // unit, description
    0x02,                                           // instance create record
    0x00, 0x00, 0x00, 0x02,                         // instance id: 2
    0x00, 0x01, b'Y',                               // text id
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, // numeric id: 3
    0x00, 0x00, 0x00, 0x0A,                         // type id: 10
    0x00,                                           // sample row
    0x00, 0x05,                                     // delta: 5 ms
    0x02,                                           // instance id: 2
    0x00,                                           // stat offset 0
    0x2A,                                           // value: 42
    0xFF,                                           // end of stats
    0xFF,                                           // end of row
];

#[test]
fn builder_matches_literal_layout() {
    assert_eq!(minimal_archive(), MINIMAL_ARCHIVE);
}

#[test]
fn minimal_archive_one_sample() {
    let sink = RecordingSink::default();
    let stats = decode_archive(MINIMAL_ARCHIVE, &sink, &DecodeOptions::new()).unwrap();

    let appends = sink.appends();
    assert_eq!(appends.len(), 1);
    assert_eq!(appends[0].name, "gemfire_t_x");
    assert_eq!(appends[0].labels["instance"], "Y");
    assert_eq!(appends[0].labels["resource_type"], "T");
    assert_eq!(appends[0].timestamp_ms, 1005);
    assert_eq!(appends[0].value, 42.0);

    assert_eq!(*stats.records(), 3);
    assert_eq!(*stats.resource_types(), 1);
    assert_eq!(*stats.instances_created(), 1);
    assert_eq!(*stats.samples(), 1);
    assert_eq!(sink.flushes.load(Ordering::SeqCst), 1);
}

#[test]
fn compact_codec_vectors() {
    fn decode(bytes: &[u8]) -> i64 {
        let mut reader = bytes;
        let val = codecs::compact::decode(&mut reader).unwrap();
        assert!(reader.is_empty(), "trailing bytes after {:02x?}", bytes);
        val
    }

    assert_eq!(decode(&[0x00]), 0);
    assert_eq!(decode(&[0x7F]), 127);
    assert_eq!(decode(&[0x87]), -121);
    assert_eq!(decode(&[0x80, 0x01, 0x00]), 256);
    assert_eq!(decode(&[0x80, 0xFF, 0x00]), -256);
    assert_eq!(decode(&[0x81, 0xFF, 0xFF, 0x00]), -256);
    assert_eq!(decode(&[0x81, 0x7F, 0xFF, 0xFF]), (1 << 23) - 1);
    assert_eq!(decode(&[0x82, 0x80, 0x00, 0x00, 0x00]), -(1i64 << 31));
    assert_eq!(decode(&[0x86, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]), i64::MAX);
}

#[test]
fn compact_codec_bijection() {
    let mut cases = vec![0i64, 1, -1, 42, 127, -120, -121, -122, -128, 255, 256, -256, i64::MIN, i64::MAX];
    for shift in 7..63 {
        let bound = 1i64 << shift;
        cases.extend([bound - 1, bound, bound + 1, -bound - 1, -bound, -bound + 1]);
    }
    for val in cases {
        let mut buf = vec![];
        codecs::compact::encode(val, &mut buf).unwrap();
        let mut reader = &buf[..];
        let back = codecs::compact::decode(&mut reader).unwrap();
        assert_eq!(back, val, "encoded as {:02x?}", buf);
        assert!(reader.is_empty());
    }
}

#[test]
fn int_timestamp_token_extends_delta() {
    let mut reader: &[u8] = &[0xFF, 0xFF, 0x00, 0x01, 0x86, 0xA0];
    assert_eq!(codecs::time_delta::decode(&mut reader).unwrap(), 100_000);

    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(1000);
    builder
        .define_type(&ResourceType::new(10, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "Y", 0, 10).unwrap();
    builder
        .sample_row(100_000, &[(2, vec![(0, StatValue::I32(1))])])
        .unwrap();

    let sink = RecordingSink::default();
    decode_archive(&builder.into_bytes().unwrap()[..], &sink, &DecodeOptions::new()).unwrap();
    assert_eq!(sink.appends()[0].timestamp_ms, 101_000);
}

#[test]
fn short_deltas_are_unsigned() {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(1000);
    builder
        .define_type(&ResourceType::new(10, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "Y", 0, 10).unwrap();
    builder
        .sample_row(40_000, &[(2, vec![(0, StatValue::I32(1))])])
        .unwrap();

    let sink = RecordingSink::default();
    decode_archive(&builder.into_bytes().unwrap()[..], &sink, &DecodeOptions::new()).unwrap();
    assert_eq!(sink.appends()[0].timestamp_ms, 41_000);
}

#[test]
fn negative_clock_is_rejected() {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(1000);
    builder.sample_row(-5000, &[]).unwrap();

    let sink = RecordingSink::default();
    let err = decode_archive(&builder.into_bytes().unwrap()[..], &sink, &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadClock { delta: -5000, .. });
}

#[test]
fn unknown_record_kind_aborts() {
    let mut bytes = header_only();
    bytes.push(0x05);

    let sink = RecordingSink::default();
    let err = decode_archive(&bytes[..], &sink, &DecodeOptions::new()).unwrap_err();
    assert_matches!(err, Error::BadRecord(0x05));
    assert!(sink.appends().is_empty());
}

#[test]
fn initialize_token_aborts() {
    let mut bytes = header_only();
    bytes.push(0x04);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadRecord(0x04));
}

#[rustfmt::skip]
const EMPTY_TYPE_10: &[u8] = &[
    0x01,
    0x00, 0x00, 0x00, 0x0A,
    0x00, 0x01, b'T',
    0x00, 0x00,
    0x00, 0x00,
];

#[test]
fn duplicate_type_id_is_bad_schema() {
    let mut bytes = header_only();
    bytes.extend_from_slice(EMPTY_TYPE_10);
    bytes.extend_from_slice(EMPTY_TYPE_10);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadSchema { type_id: 10, .. });
}

#[test]
fn offset_200_is_valid() {
    let mut ty = ResourceType::new(7, "wide");
    for i in 0..=200 {
        ty = ty.with_stat(StatDescriptor::new(format!("x{}", i), StatKind::Int));
    }
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(0);
    builder.define_type(&ty).unwrap();
    builder.create_instance(1, "wide-1", 0, 7).unwrap();
    builder
        .sample_row(1, &[(1, vec![(200, StatValue::I32(9))])])
        .unwrap();

    let sink = RecordingSink::default();
    let stats =
        decode_archive(&builder.into_bytes().unwrap()[..], &sink, &DecodeOptions::new()).unwrap();
    assert_eq!(*stats.samples(), 1);
    assert_eq!(sink.appends()[0].name, "gemfire_wide_x200");
    assert_eq!(sink.appends()[0].value, 9.0);
}

#[test]
fn out_of_range_offset_is_rejected() {
    let mut bytes = minimal_archive();
    // a second row addressing offset 5 of a one-stat type
    bytes.extend_from_slice(&[0x00, 0x00, 0x05, 0x02, 0x05]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(
        err,
        Error::BadOffset {
            type_id: 10,
            offset: 5,
            stat_count: 1,
        }
    );
}

#[test]
fn lenient_mode_counts_skipped_rows() {
    let mut bytes = minimal_archive();
    bytes.extend_from_slice(&[0x00, 0x00, 0x05, 0x02, 0x05]); // bad offset
    bytes.extend_from_slice(&[0x00, 0x00, 0x05, 0x02, 0x00, 0x2A, 0xFF, 0xFF]); // good row

    let sink = RecordingSink::default();
    let stats =
        decode_archive(&bytes[..], &sink, &DecodeOptions::new().lenient()).unwrap();
    assert_eq!(*stats.skipped_rows(), 1);
    assert_eq!(*stats.samples(), 2);
    let appends = sink.appends();
    // the corrupted row still advanced the clock before failing
    assert_eq!(appends.last().unwrap().timestamp_ms, 1015);
}

#[test]
fn unknown_instance_is_rejected() {
    let mut bytes = header_only();
    bytes.extend_from_slice(EMPTY_TYPE_10);
    bytes.extend_from_slice(&[0x00, 0x00, 0x05, 0x02]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::UnknownInstance(2));
}

#[test]
fn deleted_instance_is_unknown() {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(1000);
    builder
        .define_type(&ResourceType::new(10, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "Y", 3, 10).unwrap();
    builder.delete_instance(2).unwrap();
    let mut bytes = builder.into_bytes().unwrap();
    bytes.extend_from_slice(&[0x00, 0x00, 0x05, 0x02, 0x00, 0x2A, 0xFF, 0xFF]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::UnknownInstance(2));
}

#[test]
fn create_with_unknown_type_is_rejected() {
    let mut bytes = header_only();
    bytes.extend_from_slice(&[
        0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, b'Y', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x63,
    ]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::UnknownType(99));
}

#[test]
fn duplicate_instance_id_is_rejected() {
    let mut bytes = minimal_archive();
    bytes.extend_from_slice(&[
        0x02, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, b'Z', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x0A,
    ]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadInstance(2));
}

#[test]
fn delete_with_sentinel_id_is_rejected() {
    let mut bytes = minimal_archive();
    bytes.extend_from_slice(&[0x03, 0xFF]);

    let err = decode_archive(&bytes[..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadCompactToken(0xFF));
}

#[test]
fn embedded_nul_in_text_id() {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(0);
    builder
        .define_type(&ResourceType::new(1, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "a\0b", 0, 1).unwrap();
    builder
        .sample_row(1, &[(2, vec![(0, StatValue::I32(1))])])
        .unwrap();
    let bytes = builder.into_bytes().unwrap();

    // the NUL must be on the wire as the two-byte form
    assert!(bytes
        .windows(4)
        .any(|window| window == [b'a', 0xC0, 0x80, b'b']));

    let sink = RecordingSink::default();
    decode_archive(&bytes[..], &sink, &DecodeOptions::new()).unwrap();
    let instance = sink.appends()[0].labels["instance"].clone();
    assert_eq!(instance.len(), 3);
    assert_eq!(instance.as_bytes()[1], 0);
    assert_eq!(instance, "a\0b");
}

#[test]
fn supplementary_code_points_round_trip() {
    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(0);
    builder
        .define_type(&ResourceType::new(1, "T").with_stat(StatDescriptor::new("X", StatKind::Int)))
        .unwrap();
    builder.create_instance(2, "clef-\u{1D11E}", 0, 1).unwrap();
    builder
        .sample_row(1, &[(2, vec![(0, StatValue::I32(1))])])
        .unwrap();

    let sink = RecordingSink::default();
    decode_archive(&builder.into_bytes().unwrap()[..], &sink, &DecodeOptions::new()).unwrap();
    assert_eq!(sink.appends()[0].labels["instance"], "clef-\u{1D11E}");
}

fn rich_archive() -> (Vec<u8>, Vec<(i64, i32, u8, StatValue)>) {
    let ty = ResourceType::new(1, "proc")
        .with_stat(StatDescriptor::new("cpu", StatKind::Int).with_unit("ms").counter())
        .with_stat(StatDescriptor::new("bytes", StatKind::Long).counter())
        .with_stat(StatDescriptor::new("load", StatKind::Double))
        .with_stat(StatDescriptor::new("ratio", StatKind::Float))
        .with_stat(StatDescriptor::new("up", StatKind::Boolean))
        .with_stat(StatDescriptor::new("b", StatKind::Byte))
        .with_stat(StatDescriptor::new("s", StatKind::Short))
        .with_stat(StatDescriptor::new("c", StatKind::Char))
        .with_stat(StatDescriptor::new("w", StatKind::WChar));

    let mut builder = ArchiveBuilder::new();
    builder.start_time_ms(500).timezone_name("UTC").os_info("Linux");
    builder.define_type(&ty).unwrap();
    builder.create_instance(1, "node-a", 11, 1).unwrap();
    builder.create_instance(300, "node-b", 12, 1).unwrap();
    builder.create_instance(70_000, "node-c", 13, 1).unwrap();
    builder
        .sample_row(
            1,
            &[(
                1,
                vec![
                    (0, StatValue::I32(5)),
                    (1, StatValue::I64(1 << 40)),
                    (2, StatValue::F64(3.5)),
                    (3, StatValue::F64(1.25)),
                    (4, StatValue::I32(1)),
                    (5, StatValue::I32(-3)),
                    (6, StatValue::I32(-300)),
                    (7, StatValue::I32(65)),
                    (8, StatValue::I32(128_000)),
                ],
            )],
        )
        .unwrap();
    builder
        .sample_row(
            70_000,
            &[(
                300,
                vec![(0, StatValue::I32(-120)), (1, StatValue::I64(-(1 << 40)))],
            )],
        )
        .unwrap();
    builder.delete_instance(300).unwrap();
    builder
        .sample_row(0, &[(70_000, vec![(2, StatValue::F64(-0.5))])])
        .unwrap();

    let expected = vec![
        (501, 1, 0, StatValue::I32(5)),
        (501, 1, 1, StatValue::I64(1 << 40)),
        (501, 1, 2, StatValue::F64(3.5)),
        (501, 1, 3, StatValue::F64(1.25)),
        (501, 1, 4, StatValue::I32(1)),
        (501, 1, 5, StatValue::I32(-3)),
        (501, 1, 6, StatValue::I32(-300)),
        (501, 1, 7, StatValue::I32(65)),
        (501, 1, 8, StatValue::I32(128_000)),
        (70_501, 300, 0, StatValue::I32(-120)),
        (70_501, 300, 1, StatValue::I64(-(1 << 40))),
        (70_501, 70_000, 2, StatValue::F64(-0.5)),
    ];
    (builder.into_bytes().unwrap(), expected)
}

#[test]
fn event_round_trip() {
    let (bytes, expected) = rich_archive();
    let mut sink = EventSink::default();
    let stats = decode_events(&bytes[..], &mut sink, &DecodeOptions::new()).unwrap();

    assert_eq!(sink.events, expected);
    assert_eq!(*stats.records(), 8);
    assert_eq!(*stats.resource_types(), 1);
    assert_eq!(*stats.instances_created(), 3);
    assert_eq!(*stats.instances_deleted(), 1);
    assert_eq!(*stats.samples(), 12);

    // timestamps never go backwards within one archive
    for pair in sink.events.windows(2) {
        assert!(pair[0].0 <= pair[1].0);
    }
}

#[test]
fn truncated_archives_fail_closed() {
    let (bytes, _) = rich_archive();
    for len in 0..bytes.len() {
        let sink = RecordingSink::default();
        // must yield Ok (record boundary) or a typed error, never a panic
        let _ = decode_archive(&bytes[..len], &sink, &DecodeOptions::new());
    }
    let sink = RecordingSink::default();
    assert!(decode_archive(&bytes[..], &sink, &DecodeOptions::new()).is_ok());
}

#[test]
fn single_byte_corruption_is_detected_or_isolated() {
    for i in 0..MINIMAL_ARCHIVE.len() {
        let mut bytes = MINIMAL_ARCHIVE.to_vec();
        bytes[i] ^= 0xFF;
        let sink = RecordingSink::default();
        if let Ok(stats) = decode_archive(&bytes[..], &sink, &DecodeOptions::new()) {
            assert!(*stats.samples() <= 1, "corrupt byte {} produced extra samples", i);
        }
    }
}

#[test]
fn empty_input_is_unexpected_eof() {
    let err = decode_archive(&[][..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::UnexpectedEof);
}

#[test]
fn bad_magic_and_versions() {
    let err = decode_archive(&[0x4E, 0x04][..], &RecordingSink::default(), &DecodeOptions::new())
        .unwrap_err();
    assert_matches!(err, Error::BadMagic(0x4E));

    for version in [0x00, 0x01, 0x05] {
        let err = decode_archive(
            &[0x4D, version][..],
            &RecordingSink::default(),
            &DecodeOptions::new(),
        )
        .unwrap_err();
        assert_matches!(err, Error::UnsupportedVersion(v) if v == version);
    }

    let mut builder = ArchiveBuilder::new();
    builder.version(ArchiveVersion::V2).start_time_ms(1000);
    assert!(decode_archive(
        &builder.into_bytes().unwrap()[..],
        &RecordingSink::default(),
        &DecodeOptions::new(),
    )
    .is_ok());
}

#[test]
fn sink_errors_abort() {
    let err = decode_archive(MINIMAL_ARCHIVE, &FailingSink, &DecodeOptions::new()).unwrap_err();
    assert_matches!(err, Error::Sink(_));
}

#[test]
fn cancellation_is_prompt() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = decode_archive(
        MINIMAL_ARCHIVE,
        &RecordingSink::default(),
        &DecodeOptions::new().with_cancel(cancel),
    )
    .unwrap_err();
    assert_matches!(err, Error::Cancelled);
}

#[test]
fn prefix_and_extra_labels() {
    let sink = RecordingSink::default();
    let options = DecodeOptions::new()
        .with_metric_prefix("geode")
        .with_label("cluster", "c1")
        .with_label("instance", "overridden");
    decode_archive(MINIMAL_ARCHIVE, &sink, &options).unwrap();

    let append = &sink.appends()[0];
    assert_eq!(append.name, "geode_t_x");
    assert_eq!(append.labels["cluster"], "c1");
    // the decoder's own labels always win
    assert_eq!(append.labels["instance"], "Y");
}

#[test]
fn worker_pool_shares_one_sink() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("gfs-sdk-pool-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let mut paths = vec![];
    for i in 0..3 {
        let path = dir.join(format!("node-{}.gfs", i));
        fs::write(&path, minimal_archive())?;
        paths.push(path);
    }

    let sink = RecordingSink::default();
    let outcomes = gfs_sdk::pool::decode_archives(&paths, &sink, &DecodeOptions::new(), 2);

    assert_eq!(outcomes.len(), 3);
    let mut samples = 0;
    for outcome in &outcomes {
        samples += *outcome.result.as_ref().unwrap().samples();
    }
    assert_eq!(samples, 3);
    assert_eq!(sink.appends().len(), 3);
    assert_eq!(sink.flushes.load(Ordering::SeqCst), 3);

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}
