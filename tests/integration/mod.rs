//! Integration tests for end-to-end functionality.
//!
//! Tests for:
//! - Full session import cycles from raw files
//! - Archive lifecycle: staging, listing, reimport

pub mod archive_tests;
pub mod session_import_tests;
