//! # shexgen Bench
//!
//! Benchmarking utilities for shexgen performance testing.

pub mod fixtures;
