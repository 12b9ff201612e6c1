//! Internal test modules - whitebox tests with crate access
//!
//! Tests here exercise cross-module behavior (engine + indexer + pool) that
//! unit tests inside each module don't cover, using the shared test harness.
