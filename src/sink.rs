use std::collections::{BTreeMap, HashMap};

use crate::decoder::{SampleSink, SampleView};
use crate::result::{Result, SinkError};
use crate::DecodeOptions;

pub const DEFAULT_METRIC_PREFIX: &str = "gemfire";

pub type Labels = BTreeMap<String, String>;

/// External consumer of `(metric_name, labels, timestamp, value)` tuples,
/// e.g. a TSDB appender. Takes `&self` so one sink can serve concurrent
/// per-archive decoders; interior synchronization is the sink's business.
pub trait MetricSink {
    fn append(
        &self,
        metric_name: &str,
        labels: &Labels,
        timestamp_ms: i64,
        value: f64,
    ) -> Result<(), SinkError>;

    /// Called once at the end of a successful decode.
    fn flush(&self) -> Result<(), SinkError>;
}

/// Flattens decoded samples into metric appends: canonical name formatting,
/// decoder labels (`resource_type`, `instance`) plus caller-supplied extras,
/// and the f64 conversion. Metric names are cached per (type id, offset);
/// labels are rebuilt per sample because an instance id can be deleted and
/// recreated with a different text id within one archive.
pub struct SinkAdapter<'a, S> {
    sink: &'a S,
    prefix: &'a str,
    extra_labels: &'a Labels,
    names: HashMap<(i32, u8), String>,
}

impl<'a, S> SinkAdapter<'a, S>
where
    S: MetricSink,
{
    pub fn new(sink: &'a S, options: &'a DecodeOptions) -> Self {
        Self {
            sink,
            prefix: options
                .metric_prefix
                .as_deref()
                .unwrap_or(DEFAULT_METRIC_PREFIX),
            extra_labels: &options.extra_labels,
            names: HashMap::new(),
        }
    }
}

impl<S> SampleSink for SinkAdapter<'_, S>
where
    S: MetricSink,
{
    fn sample(&mut self, sample: SampleView<'_>) -> Result<()> {
        let prefix = self.prefix;
        let name = self
            .names
            .entry((*sample.resource_type.id(), sample.stat_offset))
            .or_insert_with(|| {
                format!(
                    "{}_{}_{}",
                    prefix,
                    normalize(sample.resource_type.name().as_str()),
                    normalize(sample.stat.name().as_str())
                )
            });

        let mut labels = self.extra_labels.clone();
        labels.insert(
            "resource_type".to_string(),
            sample.resource_type.name().as_str().to_string(),
        );
        labels.insert(
            "instance".to_string(),
            sample.instance.text_id().as_str().to_string(),
        );

        self.sink
            .append(name, &labels, sample.timestamp_ms, sample.value.as_f64())?;
        Ok(())
    }
}

// Lowercases ASCII letters and collapses each run of whitespace or '-' into
// a single '_'.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut gap = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || ch == '-' {
            gap = true;
            continue;
        }
        if gap {
            out.push('_');
            gap = false;
        }
        out.push(ch.to_ascii_lowercase());
    }
    if gap {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn normalized_names() {
        assert_eq!(normalize("CachePerfStats"), "cacheperfstats");
        assert_eq!(normalize("VM GC-stats"), "vm_gc_stats");
        assert_eq!(normalize("a  \t b"), "a_b");
        assert_eq!(normalize("-leading and trailing-"), "_leading_and_trailing_");
        assert_eq!(normalize(""), "");
    }
}
