use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::unbounded;
use tracing::{debug, error};

use crate::decoder::DecodeStats;
use crate::result::Result;
use crate::sink::MetricSink;
use crate::{decode_path, DecodeOptions};

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<DecodeStats>,
}

/// Decodes many archives over a bounded worker pool. Each archive gets its
/// own decoder; the sink is the only shared object and must accept
/// concurrent appends. Outcomes are returned per file, in completion order:
/// there is no cross-file ordering of samples.
pub fn decode_archives<P, S>(
    paths: &[P],
    sink: &S,
    options: &DecodeOptions,
    workers: usize,
) -> Vec<FileOutcome>
where
    P: AsRef<Path>,
    S: MetricSink + Sync,
{
    let (work_tx, work_rx) = unbounded();
    for path in paths {
        work_tx
            .send(path.as_ref().to_path_buf())
            .expect("work queue closed");
    }
    drop(work_tx);

    let workers = workers.clamp(1, paths.len().max(1));
    let (done_tx, done_rx) = unbounded();
    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                for path in work_rx.iter() {
                    debug!(path = %path.display(), "decoding archive");
                    let result = decode_path(&path, sink, options);
                    if let Err(err) = &result {
                        error!(path = %path.display(), error = %err, "archive decode failed");
                    }
                    done_tx
                        .send(FileOutcome { path, result })
                        .expect("result channel closed");
                }
            });
        }
    });
    drop(done_tx);
    done_rx.into_iter().collect()
}
