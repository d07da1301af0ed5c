use readahead_core::{PageId, ReadaheadEvent, Timestamp};
use std::io::{self, BufRead, Read, Write};
use tempfile::NamedTempFile;

/// Builds recorded event traces in the replay format.
#[derive(Debug, Default, Clone)]
pub struct TraceBuilder {
    events: Vec<ReadaheadEvent>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_start(mut self) -> Self {
        self.events.push(ReadaheadEvent::WindowStart);
        self
    }

    pub fn window_end(mut self) -> Self {
        self.events.push(ReadaheadEvent::WindowEnd);
        self
    }

    pub fn allocate(mut self, page: u64, ms: u64) -> Self {
        self.events.push(ReadaheadEvent::PageAllocated {
            page: PageId(page),
            ts: Timestamp::from_millis(ms),
        });
        self
    }

    pub fn access(mut self, page: u64, ms: u64) -> Self {
        self.events.push(ReadaheadEvent::PageAccessed {
            page: PageId(page),
            ts: Timestamp::from_millis(ms),
        });
        self
    }

    pub fn evict(mut self, page: u64) -> Self {
        self.events.push(ReadaheadEvent::PageEvicted { page: PageId(page) });
        self
    }

    pub fn events(&self) -> &[ReadaheadEvent] {
        &self.events
    }

    pub fn to_jsonl(&self) -> String {
        self.events
            .iter()
            .map(|e| serde_json::to_string(e).expect("events always serialize"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create trace file");
        writeln!(file, "{}", self.to_jsonl()).expect("failed to write trace file");
        file
    }
}

/// An input that never runs dry: the same unmatched access event forever,
/// standing in for a live instrumentation feed.
#[derive(Debug)]
pub struct EndlessTrace {
    line: &'static [u8],
    pos: usize,
}

impl EndlessTrace {
    pub fn new() -> Self {
        Self {
            line: b"{\"event\":\"page_accessed\",\"page\":1,\"ts\":0}\n",
            pos: 0,
        }
    }
}

impl Default for EndlessTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for EndlessTrace {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for EndlessTrace {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt) % self.line.len();
    }
}
