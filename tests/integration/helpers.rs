//! Shared helpers for integration tests

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use castplay::reporter::PositionDisplay;
use tempfile::TempDir;

/// Directory holding the fixture recordings.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Read a fixture file into a string.
pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Copy a fixture into a fresh temp dir.
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::copy(fixtures_dir().join(name), &path).expect("Failed to copy fixture");
    (temp_dir, path)
}

/// Position display that remembers everything it was shown.
#[derive(Debug, Default)]
pub struct Positions {
    pub values: Vec<Duration>,
    pub max: Option<Duration>,
}

impl Positions {
    pub fn last(&self) -> Option<Duration> {
        self.values.last().copied()
    }
}

impl PositionDisplay for Positions {
    fn set_value(&mut self, position: Duration) -> io::Result<()> {
        self.values.push(position);
        Ok(())
    }

    fn set_max(&mut self, max: Duration) -> io::Result<()> {
        self.max = Some(max);
        Ok(())
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
