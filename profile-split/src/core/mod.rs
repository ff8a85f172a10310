//! Deterministic, pure decomposition logic.
//!
//! Core modules must be free of I/O side effects. They turn an in-memory
//! profile into a [`plan::Plan`] that the sink in `io` realises on disk.

pub mod category;
pub mod conflict;
pub mod decompose;
pub mod error;
pub mod keys;
pub mod layout;
pub mod plan;
pub mod summary;
