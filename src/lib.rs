//! Builds installer cabinets for legacy handheld devices.
//!
//! The core of the crate is [`header`], which lays out the binary package
//! header. [`config`] and [`expand`] turn a manifest into the resolved
//! configuration the header is built from, and [`compress`] stages the
//! payloads and hands them to an external cabinet tool.

pub mod compress;
pub mod config;
pub mod error;
pub mod expand;
pub mod header;
pub mod types;

#[cfg(test)]
mod compress_tests;
#[cfg(test)]
mod expand_tests;

pub use error::{Error, Result};
pub use header::{build_package, PackageHeader, Section};
