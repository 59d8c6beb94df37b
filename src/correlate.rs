use crate::record::LogRecord;

/// All records sharing `request_id`, in original order. An O(n) scan is the
/// right tool at this scale; no index is kept. Unknown ids yield an empty
/// vec, not an error.
pub fn related<'a>(records: &'a [LogRecord], request_id: &str) -> Vec<&'a LogRecord> {
    records
        .iter()
        .filter(|r| r.request_id.as_deref() == Some(request_id))
        .collect()
}
