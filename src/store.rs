use crate::classify::classify;
use crate::correlate;
use crate::extract::extract;
use crate::filter::{self, FilterSpec};
use crate::record::{LoadResult, LogRecord, StoreError};
use crate::stats::{self, Stats, TimelineBucket};
use chrono::Utc;

/// Ordered, append-only (bulk clear/reload aside) record collection, owned
/// by one logical session. All transformations operate on read-only views;
/// records are never mutated after insertion.
#[derive(Debug, Default)]
pub struct LogStore {
    records: Vec<LogRecord>,
    next_id: u64,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace current contents with the parsed lines of `text`. Blank
    /// lines are discarded; everything else becomes a record, however
    /// malformed. Line numbers restart at 1.
    pub fn load(&mut self, text: &str) -> LoadResult {
        self.records.clear();
        self.ingest(text, 1)
    }

    /// Append after existing content, continuing the line-number sequence.
    /// This is the live-tail path.
    pub fn append(&mut self, text: &str) -> LoadResult {
        let next_line = self.records.last().map(|r| r.line_number + 1).unwrap_or(1);
        self.ingest(text, next_line)
    }

    /// Byte-input variant; non-UTF-8 input is the one structural failure
    /// the store reports.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<LoadResult, StoreError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.load(text))
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<LoadResult, StoreError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.append(text))
    }

    fn ingest(&mut self, text: &str, first_line: usize) -> LoadResult {
        // One clock read per batch: every defaulted timestamp in the batch
        // shares the same ingestion instant.
        let ingested_at = Utc::now();
        let mut count = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let dialect = classify(line);
            let draft = extract(line, dialect, ingested_at);
            let id = self.next_id;
            self.next_id += 1;
            self.records.push(draft.into_record(id, first_line + count));
            count += 1;
        }
        LoadResult { count }
    }

    /// Empties the store. The id counter is not reset, so a caller-held
    /// selection id can never alias a record loaded later.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Full content in ingestion order.
    pub fn all(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-lookup of a caller-held selection; `None` after the record is
    /// gone (cleared or replaced).
    pub fn get(&self, id: u64) -> Option<&LogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn apply_filter(&self, spec: &FilterSpec) -> Vec<&LogRecord> {
        filter::apply(&self.records, spec)
    }

    pub fn summarize(&self) -> Stats {
        stats::summarize(&self.records)
    }

    pub fn timeline(&self, target_buckets: usize) -> Vec<TimelineBucket> {
        stats::timeline(&self.records, target_buckets)
    }

    pub fn related(&self, request_id: &str) -> Vec<&LogRecord> {
        correlate::related(&self.records, request_id)
    }
}
