//! Core behavior tests.
//!
//! Tests for:
//! - Box-plot aggregation conventions
//! - Cross-session comparison alignment

pub mod stats_tests;
