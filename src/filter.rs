use crate::record::{LogLevel, LogRecord};
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Compiled-pattern size bounds. The regex crate matches in linear time, so
// bounding compilation is the only budget a hostile pattern needs.
const REGEX_SIZE_LIMIT: usize = 1 << 20;
const REGEX_DFA_SIZE_LIMIT: usize = 1 << 20;

/// Named heuristic predicates ("smart filters"), each independently
/// toggleable and ANDed with everything else when enabled.
///
/// `user_actions` is a deliberate pass-through: the observed behavior has no
/// real rule behind it, and inventing one would silently change result sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heuristics {
    pub critical_only: bool,
    pub performance_issues: bool,
    pub security_events: bool,
    pub user_actions: bool,
}

impl Heuristics {
    fn matches(&self, record: &LogRecord) -> bool {
        if self.critical_only && record.level != LogLevel::Error {
            return false;
        }
        if self.performance_issues || self.security_events {
            let lower = record.raw_line.to_lowercase();
            if self.performance_issues && !(lower.contains("slow") || lower.contains("timeout")) {
                return false;
            }
            if self.security_events && !(lower.contains("auth") || lower.contains("security")) {
                return false;
            }
        }
        true
    }
}

/// Declarative filter specification, re-created per query. The default value
/// is the identity filter (all levels, no text, no heuristics, no range).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search: String,
    pub use_regex: bool,
    pub case_sensitive: bool,
    /// Empty set matches none.
    pub levels: BTreeSet<LogLevel>,
    pub heuristics: Heuristics,
    /// Inclusive bounds on `timestamp`.
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            search: String::new(),
            use_regex: false,
            case_sensitive: false,
            levels: LogLevel::ALL.iter().copied().collect(),
            heuristics: Heuristics::default(),
            time_range: None,
        }
    }
}

enum TextPredicate {
    Any,
    Substring { needle: String, case_sensitive: bool },
    Pattern(regex::Regex),
    Nothing,
}

impl TextPredicate {
    fn compile(spec: &FilterSpec) -> TextPredicate {
        if spec.search.is_empty() {
            return TextPredicate::Any;
        }
        if !spec.use_regex {
            let needle = if spec.case_sensitive {
                spec.search.clone()
            } else {
                spec.search.to_lowercase()
            };
            return TextPredicate::Substring {
                needle,
                case_sensitive: spec.case_sensitive,
            };
        }
        match RegexBuilder::new(&spec.search)
            .case_insensitive(!spec.case_sensitive)
            .size_limit(REGEX_SIZE_LIMIT)
            .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
            .build()
        {
            Ok(re) => TextPredicate::Pattern(re),
            // Invalid or oversized pattern matches nothing; the caller owns
            // any syntax reporting.
            Err(_) => TextPredicate::Nothing,
        }
    }

    fn matches(&self, raw: &str) -> bool {
        match self {
            TextPredicate::Any => true,
            TextPredicate::Substring {
                needle,
                case_sensitive,
            } => {
                if *case_sensitive {
                    raw.contains(needle.as_str())
                } else {
                    raw.to_lowercase().contains(needle.as_str())
                }
            }
            TextPredicate::Pattern(re) => re.is_match(raw),
            TextPredicate::Nothing => false,
        }
    }
}

/// Evaluate `spec` against `records`, preserving original order. Every
/// enabled criterion must hold; identical inputs yield identical output and
/// the engine never reads the clock.
pub fn apply<'a>(records: &'a [LogRecord], spec: &FilterSpec) -> Vec<&'a LogRecord> {
    let text = TextPredicate::compile(spec);
    records
        .iter()
        .filter(|r| {
            if !spec.levels.contains(&r.level) {
                return false;
            }
            if let Some((lower, upper)) = spec.time_range {
                if r.timestamp < lower || r.timestamp > upper {
                    return false;
                }
            }
            if !spec.heuristics.matches(r) {
                return false;
            }
            text.matches(&r.raw_line)
        })
        .collect()
}
