mod common;

use common::{added_line, deleted_line, modified_line, ChunkReader, FailingReader};
use std::io::{Cursor, ErrorKind};
use watchfold::{Events, LineDecoder, WatchError, WatchEvent};

fn collect_ok(events: Events<impl std::io::Read>) -> Vec<WatchEvent> {
    events.map(|e| e.unwrap()).collect()
}

#[test]
fn test_single_chunk_multiple_lines() {
    let body = format!(
        "{}{}{}",
        added_line("1", "a"),
        added_line("2", "b"),
        deleted_line("1")
    );
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind(), "ADDED");
    assert_eq!(events[0].record().uid(), "1");
    assert_eq!(events[1].record().uid(), "2");
    assert_eq!(events[2].kind(), "DELETED");
}

#[test]
fn test_chunk_boundary_mid_line() {
    let body = format!("{}{}", added_line("1", "a"), modified_line("1", "a2"));
    // Two-byte chunks cut every line several times, including inside JSON
    // string literals.
    let events = collect_ok(Events::new(ChunkReader::fixed(body.clone(), 2)));
    let whole = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events, whole);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_chunk_boundary_mid_multibyte_char() {
    // "héllo→" holds a two-byte and a three-byte character; one-byte chunks
    // cut both.
    let body = added_line("1", "héllo→wörld");
    let events = collect_ok(Events::new(ChunkReader::fixed(body, 1)));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].record().field("name").unwrap(), "héllo→wörld");
}

#[test]
fn test_chunk_with_zero_and_many_terminators() {
    let line_a = added_line("1", "a");
    let line_b = added_line("2", "b");
    let line_c = added_line("3", "c");
    // First chunk: no terminator. Second: two terminators. Third: the rest.
    let body = format!("{line_a}{line_b}{line_c}");
    let first_split = line_a.len() - 5;
    let second_split = line_a.len() + line_b.len() + line_c.len() - 3;
    let sizes = vec![first_split, second_split - first_split, 3];
    let events = collect_ok(Events::new(ChunkReader::new(body, sizes)));
    let uids: Vec<&str> = events.iter().map(|e| e.record().uid()).collect();
    assert_eq!(uids, ["1", "2", "3"]);
}

#[test]
fn test_blank_lines_ignored() {
    let body = format!("\n   \n{}\t\n\n{}", added_line("1", "a"), added_line("2", "b"));
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 2);
}

#[test]
fn test_crlf_terminated_lines() {
    let body = format!(
        "{}\r\n{}\r\n",
        added_line("1", "a").trim_end(),
        deleted_line("1").trim_end()
    );
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind(), "DELETED");
}

#[test]
fn test_malformed_line_between_valid_lines() {
    let body = format!(
        "{}this is not json\n{}",
        added_line("1", "a"),
        added_line("2", "b")
    );
    let events = collect_ok(Events::new(Cursor::new(body)));
    let uids: Vec<&str> = events.iter().map(|e| e.record().uid()).collect();
    assert_eq!(uids, ["1", "2"], "valid events must survive, in order");
}

#[test]
fn test_invalid_utf8_line_skipped() {
    let mut body = added_line("1", "a").into_bytes();
    body.extend_from_slice(&[0xff, 0xfe, 0xfd, b'\n']);
    body.extend_from_slice(added_line("2", "b").as_bytes());
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 2);
}

#[test]
fn test_record_without_uid_skipped() {
    let body = format!(
        "{}{{\"type\":\"ADDED\",\"object\":{{\"metadata\":{{}}}}}}\n{}",
        added_line("1", "a"),
        added_line("2", "b")
    );
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 2);
}

#[test]
fn test_unknown_event_type_decodes_as_other() {
    let body = "{\"type\":\"BOOKMARK\",\"object\":{\"metadata\":{\"uid\":\"9\"}}}\n";
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "BOOKMARK");
    assert!(matches!(events[0], WatchEvent::Other { .. }));
}

#[test]
fn test_trailing_unterminated_fragment_dropped() {
    let body = format!("{}{}", added_line("1", "a"), added_line("2", "b").trim_end());
    let events = collect_ok(Events::new(Cursor::new(body)));
    assert_eq!(events.len(), 1, "fragment without terminator must not parse");
    assert_eq!(events[0].record().uid(), "1");
}

#[test]
fn test_transport_error_surfaced_once_then_ends() {
    let body = format!("{}{}", added_line("1", "a"), added_line("2", "b"));
    let mut events = Events::new(FailingReader::new(body, ErrorKind::ConnectionReset));

    assert_eq!(events.next().unwrap().unwrap().record().uid(), "1");
    assert_eq!(events.next().unwrap().unwrap().record().uid(), "2");
    match events.next() {
        Some(Err(WatchError::Transport(err))) => {
            assert_eq!(err.kind(), ErrorKind::ConnectionReset);
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(events.next().is_none(), "sequence must end after the error");
}

#[test]
fn test_decoder_holds_partial_line_across_feeds() {
    let line = added_line("1", "a");
    let (head, tail) = line.split_at(10);

    let mut decoder = LineDecoder::new();
    decoder.feed(head.as_bytes());
    assert!(decoder.next_event().is_none());
    assert_eq!(decoder.buffered(), head.len());

    decoder.feed(tail.as_bytes());
    let event = decoder.next_event().expect("line completed by second feed");
    assert_eq!(event.record().uid(), "1");
    assert_eq!(decoder.buffered(), 0);
}

#[test]
fn test_decoder_finish_discards_fragment() {
    let mut decoder = LineDecoder::new();
    decoder.feed(b"{\"type\":\"ADDED\"");
    decoder.finish();
    assert_eq!(decoder.buffered(), 0);
    assert!(decoder.next_event().is_none());
}

#[test]
fn test_event_serializes_back_to_wire_shape() {
    let line = added_line("1", "a");
    let event: WatchEvent = serde_json::from_str(line.trim_end()).unwrap();
    let wire: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(wire["type"], "ADDED");
    assert_eq!(wire["object"]["metadata"]["uid"], "1");
    assert_eq!(wire["object"]["name"], "a");
}
