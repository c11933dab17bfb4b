//! Test Module
//!
//! Cross-module test suite for the ceremony classifier.
//!
//! ## Test Categories
//! - `ceremony_tests`: End-to-end classification of realistic transcripts and engine properties
//! - `config_tests`: Environment overrides and validation of classifier thresholds
//! - `text_extract_tests`: Transcript extraction from files, then classification

pub mod config_tests;
