//! Integration tests for loading recordings from disk

use castplay::{Session, SessionError};

use super::helpers::{fixtures_dir, load_fixture, ms, temp_fixture};

#[test]
fn loads_v1_recording() {
    let (temp_dir, path) = temp_fixture("sample.cast");
    let session = Session::load(&path).expect("Should load v1 recording");

    let offsets: Vec<_> = session.events().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![ms(0), ms(500), ms(750), ms(1750)]);
    assert_eq!(session.duration(), ms(1750));

    let meta = session.meta();
    assert_eq!((meta.width, meta.height), (100, 30));
    assert_eq!(meta.title.as_deref(), Some("demo session"));
    assert_eq!(meta.command.as_deref(), Some("/bin/bash"));

    drop(temp_dir);
}

#[test]
fn loads_v3_recording() {
    let session = Session::load(fixtures_dir().join("sample_v3.cast")).expect("Should load v3");

    // Marker and exit events advance time but produce no output
    let offsets: Vec<_> = session.events().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![ms(500), ms(700), ms(900)]);
    assert_eq!(session.duration(), ms(1200));
    assert_eq!(session.meta().timestamp, Some(1_700_000_000));
    assert_eq!(session.meta().title.as_deref(), Some("v3 demo"));
}

#[test]
fn parse_str_matches_load() {
    let from_file = Session::load(fixtures_dir().join("sample.cast")).unwrap();
    let from_str = Session::parse_str(&load_fixture("sample.cast")).unwrap();

    assert_eq!(from_file.events(), from_str.events());
    assert_eq!(from_file.duration(), from_str.duration());
}

#[test]
fn prefix_output_follows_event_times() {
    let session = Session::load(fixtures_dir().join("sample.cast")).unwrap();

    assert_eq!(session.count_at(ms(0)), 1);
    assert_eq!(session.count_at(ms(749)), 2);
    assert_eq!(session.count_at(ms(750)), 3);
    assert_eq!(
        session.prefix_output(session.count_at(ms(1000))),
        b"$ echo hi\r\nhi\r\n".to_vec()
    );
}

#[test]
fn negative_interval_is_a_parse_error() {
    let err = Session::load(fixtures_dir().join("broken.cast")).unwrap_err();
    match err {
        SessionError::Parse { at, .. } => assert_eq!(at, "line 3"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Session::load("/nonexistent/path/file.cast").unwrap_err();
    assert!(matches!(err, SessionError::Io(_)));
}
