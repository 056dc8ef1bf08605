//! Integration tests for pdf-gather
//!
//! These tests use wiremock to stand in for document servers and tempfile
//! directories for the output library.

mod download_tests;
mod gather_tests;
