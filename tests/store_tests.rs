use logsift::store::LogStore;

#[test]
fn load_counts_non_blank_lines() {
    let mut store = LogStore::new();
    let text = "one\n\ntwo\n   \nthree\n";
    let result = store.load(text);
    assert_eq!(result.count, 3);
    assert_eq!(store.all().len(), 3);
}

#[test]
fn line_numbers_are_sequential_from_one() {
    let mut store = LogStore::new();
    store.load("a\nb\nc");
    let numbers: Vec<usize> = store.all().iter().map(|r| r.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn append_continues_the_sequence() {
    let mut store = LogStore::new();
    store.load("a\nb");
    let result = store.append("c\nd");
    assert_eq!(result.count, 2);
    let numbers: Vec<usize> = store.all().iter().map(|r| r.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn load_replaces_previous_content() {
    let mut store = LogStore::new();
    store.load("a\nb\nc");
    store.load("x");
    let lines: Vec<&str> = store.all().iter().map(|r| r.raw_line.as_str()).collect();
    assert_eq!(lines, vec!["x"]);
    assert_eq!(store.all()[0].line_number, 1);
}

#[test]
fn ids_stay_unique_across_clear_and_reload() {
    let mut store = LogStore::new();
    store.load("a\nb");
    let old_ids: Vec<u64> = store.all().iter().map(|r| r.id).collect();
    store.clear();
    assert!(store.is_empty());
    store.load("c\nd");
    for r in store.all() {
        assert!(!old_ids.contains(&r.id));
    }
}

#[test]
fn stale_selection_resolves_to_none_after_clear() {
    let mut store = LogStore::new();
    store.load("a");
    let selected = store.all()[0].id;
    assert!(store.get(selected).is_some());
    store.clear();
    assert!(store.get(selected).is_none());
}

#[test]
fn clear_then_summarize_is_all_zeros() {
    let mut store = LogStore::new();
    store.load("2024-02-01T10:00:00Z ERROR [api] boom");
    store.clear();
    assert!(store.all().is_empty());
    let stats = store.summarize();
    assert_eq!(stats.total_logs, 0);
    assert_eq!(stats.error_count, 0);
    assert_eq!(stats.warn_count, 0);
    assert_eq!(stats.active_services, 0);
    assert_eq!(stats.error_rate, 0.0);
}

#[test]
fn non_utf8_input_is_the_only_load_error() {
    let mut store = LogStore::new();
    assert!(store.load_bytes(&[0xff, 0xfe, 0x00]).is_err());
    let ok = store.load_bytes(b"plain line").unwrap();
    assert_eq!(ok.count, 1);
    assert!(store.append_bytes(&[0xc3, 0x28]).is_err());
}

#[test]
fn raw_line_is_kept_verbatim() {
    let mut store = LogStore::new();
    let line = "  2024-02-01T10:00:00Z INFO [api] padded  ";
    store.load(line);
    assert_eq!(store.all()[0].raw_line, line);
}

#[test]
fn sample_corpus_loads_clean() {
    let mut store = LogStore::new();
    let result = store.load(&logsift::sample::sample_corpus());
    assert_eq!(result.count, 40);
    let stats = store.summarize();
    assert!(stats.error_count > 0);
    assert!(stats.active_services >= 5);
}
