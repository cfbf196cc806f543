//! riglog - log analysis and comparison for multi-camera tracking rigs
//!
//! This library turns folders of loosely-structured `key: value` text logs
//! into typed numeric series with box-plot statistics, and aligns them
//! across archived sessions for comparison charts.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Line classification, value-shape inference, normalization
//! - [`analysis`] - Percentiles, IQR fences, and outlier partition
//! - [`session`] - Session import, general-file metadata, cached aggregates
//! - [`compare`] - Aligned per-session comparison structures for charting
//! - [`archive`] - Persisted session store with a versioned JSON index
//! - [`source`] - Log source providers filling a staging folder
//! - [`progress`] - File-granularity progress observer
//! - [`settings`] - User settings persistence
//! - [`cli`] - Command-line driver

pub mod analysis;
pub mod archive;
pub mod cli;
pub mod compare;
pub mod parsers;
pub mod progress;
pub mod session;
pub mod settings;
pub mod source;
