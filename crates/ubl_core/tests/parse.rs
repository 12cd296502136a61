use pretty_assertions::assert_eq;
use ubl_core::{parse_payload, ParseError};

#[test]
fn header_and_entries_are_split_in_order() {
    let list = parse_payload("v1\nentryA\nentryB").unwrap();
    assert_eq!(list.header(), "v1");
    assert_eq!(list.entries(), ["entryA", "entryB"]);
}

#[test]
fn crlf_line_endings_are_stripped() {
    let list = parse_payload("2024-01-01,ver=3\r\nalice\r\nbob\r\n").unwrap();
    assert_eq!(list.header(), "2024-01-01,ver=3");
    assert_eq!(list.entries(), ["alice", "bob"]);
}

#[test]
fn empty_and_single_line_payloads_are_empty() {
    for payload in ["", "\n", "header only", "header only\n", "header\r\n\r\n\n"] {
        assert!(
            matches!(parse_payload(payload), Err(ParseError::Empty { .. })),
            "payload {payload:?} should be empty"
        );
    }
}

#[test]
fn empty_error_reports_usable_line_count() {
    assert_eq!(parse_payload(""), Err(ParseError::Empty { lines: 0 }));
    assert_eq!(parse_payload("h\n\n"), Err(ParseError::Empty { lines: 1 }));
}

#[test]
fn interior_blank_lines_are_kept_as_entries() {
    let list = parse_payload("h\na\n\nb\n").unwrap();
    assert_eq!(list.entries(), ["a", "", "b"]);
}

#[test]
fn entries_are_not_normalized() {
    let list = parse_payload("h\n  Spaced Name \nUPPER").unwrap();
    assert_eq!(list.entries(), ["  Spaced Name ", "UPPER"]);
}

#[test]
fn bare_carriage_return_is_not_a_line_break() {
    let list = parse_payload("h\na\rb\nc").unwrap();
    assert_eq!(list.entries(), ["a\rb", "c"]);
}

#[test]
fn into_parts_returns_header_and_entries() {
    let (header, entries) = parse_payload("v9\nx").unwrap().into_parts();
    assert_eq!(header, "v9");
    assert_eq!(entries, vec!["x".to_string()]);
}
