//! Decompose a consolidated permission profile into a reviewable file tree.
//!
//! A profile document carries every application, class, page, tab, user,
//! object, field, layout and record type permission in one file. This crate
//! splits it into one small JSON document per entry so that changes show up
//! as focused diffs. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic mapping from a [`profile::Profile`]
//!   to an ordered [`core::plan::Plan`]. No I/O.
//! - **[`io`]**: Profile loading, configuration and the filesystem sink.
//!
//! [`split`] wires the two together for the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod profile;
pub mod split;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
