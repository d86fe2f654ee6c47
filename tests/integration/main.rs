//! Integration tests for castplay
//!
//! Run with: cargo test --test integration

mod helpers;

mod cli_test;
mod playback_test;
mod session_test;
