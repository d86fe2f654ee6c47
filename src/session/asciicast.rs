// Derived from asciinema (https://github.com/asciinema/asciinema)
// Copyright (c) asciinema authors
// Licensed under GPL-3.0-or-later
// Vendored by castplay project

//! asciicast loaders.
//!
//! Two layouts are understood:
//!
//! - v1: one JSON document with a `stdout` array of `[delta, data]` pairs,
//!   as written by the recorder.
//! - v3: newline-delimited; a header object followed by
//!   `[interval, code, data]` events.
//!
//! Both store per-event intervals relative to the previous event. They are
//! folded into absolute offsets here so the player only ever sees absolute
//! times.

use std::time::Duration;

use serde::Deserialize;

use super::{Event, Session, SessionError, SessionMeta};

#[derive(Debug, Deserialize)]
struct V1Document {
    width: Option<u16>,
    height: Option<u16>,
    command: Option<String>,
    title: Option<String>,
    stdout: Vec<(f64, String)>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct V3Header {
    version: u64,
    term: Option<V3Term>,
    timestamp: Option<i64>,
    duration: Option<f64>,
    title: Option<String>,
    command: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V3Term {
    cols: Option<u16>,
    rows: Option<u16>,
}

/// Parse either layout, picking v1 when the whole input is a single
/// JSON document declaring `"version": 1`.
pub(super) fn parse(content: &str) -> Result<Session, SessionError> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(content) {
        if value.get("version").and_then(|v| v.as_u64()) == Some(1) {
            let doc: V1Document = serde_json::from_value(value)?;
            return parse_v1(doc);
        }
    }

    parse_v3(content)
}

fn parse_v1(doc: V1Document) -> Result<Session, SessionError> {
    let mut events = Vec::with_capacity(doc.stdout.len());
    let mut offset = Duration::ZERO;

    for (i, (delta, data)) in doc.stdout.into_iter().enumerate() {
        offset += interval(delta, || format!("stdout[{}]", i))?;
        events.push(Event::new(offset, data.into_bytes()));
    }

    let duration = match doc.duration {
        // The recorder rounds the total more coarsely than the deltas
        Some(secs) => interval(secs, || "duration".to_string())?.max(offset),
        None => offset,
    };

    let meta = SessionMeta {
        width: doc.width.unwrap_or(80),
        height: doc.height.unwrap_or(24),
        title: doc.title.filter(|t| !t.is_empty()),
        command: doc.command.filter(|c| !c.is_empty()),
        timestamp: None,
    };

    Ok(Session::with_duration(events, duration)?.with_meta(meta))
}

fn parse_v3(content: &str) -> Result<Session, SessionError> {
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(SessionError::Empty)?;
    let header: V3Header = serde_json::from_str(header_line).map_err(|e| SessionError::Parse {
        at: "line 1".to_string(),
        message: format!("invalid header: {}", e),
    })?;

    if header.version != 3 {
        return Err(SessionError::UnsupportedVersion(header.version));
    }

    let mut events = Vec::new();
    let mut clock = Duration::ZERO;

    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let at = || format!("line {}", line_num + 2);
        let (delta, code, data) = parse_v3_event(line).map_err(|message| SessionError::Parse {
            at: at(),
            message,
        })?;

        clock += interval(delta, at)?;

        match code.as_str() {
            "o" => events.push(Event::new(clock, data.into_bytes())),
            "i" | "m" | "r" | "x" => {}
            other => {
                return Err(SessionError::Parse {
                    at: at(),
                    message: format!("unknown event type: {}", other),
                })
            }
        }
    }

    let last = events.last().map(|e| e.offset).unwrap_or_default();
    let duration = match header.duration {
        Some(secs) => interval(secs, || "header duration".to_string())?.max(last),
        None => clock,
    };

    let (width, height) = header
        .term
        .map(|t| (t.cols.unwrap_or(80), t.rows.unwrap_or(24)))
        .unwrap_or((80, 24));

    let meta = SessionMeta {
        width,
        height,
        title: header.title,
        command: header.command,
        timestamp: header.timestamp,
    };

    Ok(Session::with_duration(events, duration)?.with_meta(meta))
}

fn parse_v3_event(line: &str) -> Result<(f64, String, String), String> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON: {}", e))?;

    let arr = value.as_array().ok_or("event must be a JSON array")?;
    if arr.len() < 3 {
        return Err("event array must have at least 3 elements".to_string());
    }

    let time = arr[0].as_f64().ok_or("event time must be a number")?;
    let code = arr[1].as_str().ok_or("event type must be a string")?;
    let data = arr[2].as_str().ok_or("event data must be a string")?;

    Ok((time, code.to_string(), data.to_string()))
}

/// Convert an interval in seconds to a `Duration` at microsecond precision.
fn interval(secs: f64, at: impl FnOnce() -> String) -> Result<Duration, SessionError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(SessionError::Parse {
            at: at(),
            message: format!("invalid interval: {}", secs),
        });
    }
    Ok(Duration::from_micros((secs * 1_000_000.0).round() as u64))
}
