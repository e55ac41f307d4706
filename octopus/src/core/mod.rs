//! Deterministic, pure logic shared by the API clients and the orchestrator.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! records and return deterministic outputs suitable for tests.

pub mod matching;
pub mod types;
