//! I/O helpers: profile loading, configuration and the filesystem sink.

pub mod config;
pub mod profile_store;
pub mod sink;
