//! Shared test utilities for visitdesk integration tests.
//!
//! This module provides:
//! - `TestHarness` for stores backed by a throwaway database
//! - Builder patterns for visit requests and configs

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
