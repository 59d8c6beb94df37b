use logsift::correlate::related;
use logsift::store::LogStore;

#[test]
fn related_returns_sharers_in_original_order() {
    let mut store = LogStore::new();
    store.load(
        "2024-02-01T10:00:00Z INFO [api] accepted request_id=abc-123\n\
         2024-02-01T10:00:01Z INFO [db] queried request_id=other-1\n\
         2024-02-01T10:00:02Z ERROR [api] failed request_id=abc-123",
    );
    let hits = related(store.all(), "abc-123");
    let lines: Vec<usize> = hits.iter().map(|r| r.line_number).collect();
    assert_eq!(lines, vec![1, 3]);
}

#[test]
fn level_differences_do_not_matter() {
    let mut store = LogStore::new();
    store.load(
        "2024-02-01T10:00:00Z DEBUG [api] enter request_id=abc-123\n\
         2024-02-01T10:00:01Z ERROR [api] exit request_id=abc-123",
    );
    assert_eq!(related(store.all(), "abc-123").len(), 2);
}

#[test]
fn every_record_is_related_to_its_own_request_id() {
    let mut store = LogStore::new();
    store.load(&logsift::sample::sample_corpus());
    for record in store.all() {
        if let Some(id) = &record.request_id {
            let hits = related(store.all(), id);
            assert!(hits.iter().any(|r| r.id == record.id));
        }
    }
}

#[test]
fn unknown_id_yields_empty_not_error() {
    let mut store = LogStore::new();
    store.load("2024-02-01T10:00:00Z INFO [api] no ids here");
    assert!(related(store.all(), "nope").is_empty());
    assert!(store.related("nope").is_empty());
}

#[test]
fn uuid_request_ids_correlate_too() {
    let mut store = LogStore::new();
    store.load(
        "2024-02-01T10:00:00Z INFO [api] span 550e8400-e29b-41d4-a716-446655440000 start\n\
         2024-02-01T10:00:05Z INFO [worker] span 550e8400-e29b-41d4-a716-446655440000 done",
    );
    let hits = store.related("550e8400-e29b-41d4-a716-446655440000");
    assert_eq!(hits.len(), 2);
}
