use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Plain,
    Ip,
    Url,
    Uuid,
    Status,
}

/// One typed segment of a message. Spans are contiguous and lossless:
/// concatenating `text` over the output reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub text: String,
    pub kind: SpanKind,
}

static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b[a-zA-Z][a-zA-Z0-9+.-]*://[^\s"']+"#).unwrap()
});

static RE_UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .unwrap()
});

static RE_IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b")
        .unwrap()
});

static RE_STATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[1-5]\d{2}\b").unwrap());

// Order matters: broader structures first, so a UUID inside a URL stays
// part of the URL span.
static TOKEN_PATTERNS: Lazy<[(&'static Lazy<Regex>, SpanKind); 4]> = Lazy::new(|| {
    [
        (&RE_URL, SpanKind::Url),
        (&RE_UUID, SpanKind::Uuid),
        (&RE_IPV4, SpanKind::Ip),
        (&RE_STATUS, SpanKind::Status),
    ]
});

/// Segment `message` into typed spans for display. Pure classification, no
/// mutation of the text.
pub fn highlight(message: &str) -> Vec<HighlightSpan> {
    let mut claimed: Vec<(usize, usize, SpanKind)> = Vec::new();
    for (re, kind) in TOKEN_PATTERNS.iter() {
        for m in re.find_iter(message) {
            let overlaps = claimed
                .iter()
                .any(|(s, e, _)| m.start() < *e && *s < m.end());
            if !overlaps {
                claimed.push((m.start(), m.end(), *kind));
            }
        }
    }
    claimed.sort_by_key(|(s, _, _)| *s);

    let mut spans = Vec::new();
    let mut pos = 0;
    for (start, end, kind) in claimed {
        if start > pos {
            spans.push(HighlightSpan {
                text: message[pos..start].to_string(),
                kind: SpanKind::Plain,
            });
        }
        spans.push(HighlightSpan {
            text: message[start..end].to_string(),
            kind,
        });
        pos = end;
    }
    if pos < message.len() {
        spans.push(HighlightSpan {
            text: message[pos..].to_string(),
            kind: SpanKind::Plain,
        });
    }
    spans
}
