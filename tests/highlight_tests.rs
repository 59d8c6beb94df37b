use logsift::highlight::{highlight, SpanKind};

fn rejoin(spans: &[logsift::highlight::HighlightSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn plain_message_is_a_single_span() {
    let spans = highlight("nothing special here");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, SpanKind::Plain);
    assert_eq!(spans[0].text, "nothing special here");
}

#[test]
fn empty_message_yields_no_spans() {
    assert!(highlight("").is_empty());
}

#[test]
fn ip_and_status_are_classified() {
    let spans = highlight("Request from 192.168.1.10 returned 404");
    let kinds: Vec<SpanKind> = spans.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SpanKind::Plain, SpanKind::Ip, SpanKind::Plain, SpanKind::Status]
    );
    assert_eq!(spans[1].text, "192.168.1.10");
    assert_eq!(spans[3].text, "404");
}

#[test]
fn url_absorbs_an_embedded_uuid() {
    let msg = "see https://api.example.com/jobs/550e8400-e29b-41d4-a716-446655440000 for status";
    let spans = highlight(msg);
    let urls: Vec<&str> = spans
        .iter()
        .filter(|s| s.kind == SpanKind::Url)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(
        urls,
        vec!["https://api.example.com/jobs/550e8400-e29b-41d4-a716-446655440000"]
    );
    assert!(spans.iter().all(|s| s.kind != SpanKind::Uuid));
}

#[test]
fn standalone_uuid_is_classified() {
    let spans = highlight("trace 550e8400-e29b-41d4-a716-446655440000 opened");
    assert!(spans
        .iter()
        .any(|s| s.kind == SpanKind::Uuid && s.text == "550e8400-e29b-41d4-a716-446655440000"));
}

#[test]
fn concatenation_reproduces_the_message_exactly() {
    let messages = [
        "",
        "plain",
        "ip 10.0.0.1 status 503 url https://x.io/a?b=c uuid 550e8400-e29b-41d4-a716-446655440000",
        "  leading and trailing  ",
        "503 at start and end 404",
        "unicode ✓ and 10.0.0.1",
    ];
    for msg in messages {
        assert_eq!(rejoin(&highlight(msg)), msg, "round trip failed for {msg:?}");
    }
}

#[test]
fn spans_are_contiguous_without_overlap() {
    let msg = "from 10.0.0.1 to https://x.io/y 200 done";
    let spans = highlight(msg);
    let mut pos = 0;
    for s in &spans {
        assert!(!s.text.is_empty());
        assert_eq!(&msg[pos..pos + s.text.len()], s.text);
        pos += s.text.len();
    }
    assert_eq!(pos, msg.len());
}
