use crate::config::TraceInput;
use crate::error::SetupError;
use crate::session::{EndReason, EventSink, StopHandle};
use crate::source::{AttachedSource, EventSource};
use crate::tracker::ReadaheadEvent;
use crate::types::PageId;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

/// Page events buffered before a segment is flushed to the producers.
const SEGMENT_LIMIT: usize = 4096;

enum ReplayInput {
    Trace(TraceInput),
    Reader(Box<dyn BufRead + Send>),
}

/// Replays a recorded event trace, one JSON event per line.
///
/// Page events between two window transitions are fanned out across
/// `producers` threads; a given page always goes to the same thread, so its
/// allocate/access order survives while unrelated pages race.
pub struct TraceReplaySource {
    input: ReplayInput,
    producers: usize,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct ReplayStats {
    pub lines: u64,
    pub events: u64,
    pub skipped: u64,
}

impl TraceReplaySource {
    pub fn new(input: TraceInput, producers: usize) -> Self {
        Self {
            input: ReplayInput::Trace(input),
            producers: producers.max(1),
        }
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static, producers: usize) -> Self {
        Self {
            input: ReplayInput::Reader(Box::new(reader)),
            producers: producers.max(1),
        }
    }

    fn open(input: ReplayInput) -> Result<Box<dyn BufRead + Send>, SetupError> {
        match input {
            ReplayInput::Reader(reader) => Ok(reader),
            ReplayInput::Trace(TraceInput::Stdin) => Ok(Box::new(BufReader::new(io::stdin()))),
            ReplayInput::Trace(TraceInput::File(path)) => {
                let file = File::open(&path).map_err(|e| SetupError::open_trace(&path, e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl EventSource for TraceReplaySource {
    fn name(&self) -> &str {
        "trace-replay"
    }

    fn attach(
        self: Box<Self>,
        sink: EventSink,
        stop: StopHandle,
    ) -> Result<AttachedSource, SetupError> {
        let name = self.name().to_string();
        let producers = self.producers;
        let reader = Self::open(self.input)?;

        let mut attached = AttachedSource::new(name);
        attached.spawn(move || {
            let stats = replay(reader, producers, &sink);
            info!(
                lines = stats.lines,
                events = stats.events,
                skipped = stats.skipped,
                "trace replay finished"
            );
            if !sink.is_closed() {
                stop.stop(EndReason::SourceExhausted);
            }
        })?;

        info!(
            source = %attached.name(),
            workers = attached.workers(),
            producers,
            "event source attached"
        );
        Ok(attached)
    }
}

/// Drive `reader` into `sink` until EOF, a read error, or the session
/// cutoff.
pub(crate) fn replay(reader: impl BufRead, producers: usize, sink: &EventSink) -> ReplayStats {
    if producers <= 1 {
        return drive(reader, sink, |segment| {
            segment.drain(..).all(|event| sink.deliver(event))
        });
    }

    thread::scope(|s| {
        let mut lanes = Lanes::spawn(s, producers, sink);
        drive(reader, sink, |segment| lanes.flush(segment))
        // Dropping `lanes` closes every inbox; the scope joins the workers.
    })
}

fn drive(
    reader: impl BufRead,
    sink: &EventSink,
    mut flush: impl FnMut(&mut Vec<ReadaheadEvent>) -> bool,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    let mut segment: Vec<ReadaheadEvent> = Vec::with_capacity(SEGMENT_LIMIT);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "trace read failed, ending replay");
                break;
            }
        };
        stats.lines += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Ok(event) = serde_json::from_str::<ReadaheadEvent>(line) else {
            debug!(line = stats.lines, "skipping unparseable trace line");
            stats.skipped += 1;
            continue;
        };
        stats.events += 1;

        if event.is_window_transition() {
            if !flush(&mut segment) || !sink.deliver(event) {
                return stats;
            }
        } else {
            segment.push(event);
            if segment.len() >= SEGMENT_LIMIT && !flush(&mut segment) {
                return stats;
            }
        }
    }

    if !segment.is_empty() {
        flush(&mut segment);
    }
    stats
}

/// Long-lived producer lanes. Each lane owns an inbox of page-event batches
/// and reports back once a batch is delivered.
struct Lanes {
    inboxes: Vec<mpsc::Sender<Vec<ReadaheadEvent>>>,
    done: mpsc::Receiver<bool>,
}

impl Lanes {
    fn spawn<'scope, 'env>(
        scope: &'scope thread::Scope<'scope, 'env>,
        producers: usize,
        sink: &'env EventSink,
    ) -> Self {
        let (done_tx, done) = mpsc::channel();
        let inboxes = (0..producers)
            .map(|_| {
                let (tx, rx) = mpsc::channel::<Vec<ReadaheadEvent>>();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    for batch in rx {
                        let delivered = batch.into_iter().all(|event| sink.deliver(event));
                        if done_tx.send(delivered).is_err() {
                            break;
                        }
                    }
                });
                tx
            })
            .collect();

        Self { inboxes, done }
    }

    /// Split a segment across lanes by page and wait until every lane has
    /// delivered its share. Returns `false` if the session was cut off
    /// meanwhile.
    fn flush(&mut self, segment: &mut Vec<ReadaheadEvent>) -> bool {
        let producers = self.inboxes.len();
        let mut batches: Vec<Vec<ReadaheadEvent>> = (0..producers).map(|_| Vec::new()).collect();
        for event in segment.drain(..) {
            let lane = event.page().map(|p| lane_for(p, producers)).unwrap_or(0);
            batches[lane].push(event);
        }

        let mut pending = 0;
        for (inbox, batch) in self.inboxes.iter().zip(batches) {
            if batch.is_empty() {
                continue;
            }
            if inbox.send(batch).is_err() {
                return false;
            }
            pending += 1;
        }

        // Barrier: the next window transition waits for every lane.
        let mut delivered = true;
        for _ in 0..pending {
            match self.done.recv() {
                Ok(ok) => delivered &= ok,
                Err(_) => return false,
            }
        }
        delivered
    }
}

/// Page identities are descriptor addresses, so the low bits are mostly
/// alignment. Fibonacci hashing spreads them across lanes.
fn lane_for(page: PageId, producers: usize) -> usize {
    let mixed = page.0.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32;
    (mixed % producers as u64) as usize
}
