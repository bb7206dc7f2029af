use std::path::PathBuf;

use thiserror::Error;

use crate::header::Section;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown architecture: {0}")]
    UnknownArchitecture(String),

    #[error("missing required package metadata: {0}")]
    MissingRequiredMetadata(&'static str),

    #[error("link target is neither an installed file nor a directory: {0}")]
    LinkTargetNotFound(String),

    #[error("unknown path variable: $({0})")]
    UnknownPathVariable(String),

    #[error("{section:?} section declared {declared} bytes but wrote {written}")]
    SectionLengthMismatch {
        section:  Section,
        declared: u32,
        written:  u64,
    },

    #[error("install path has no directory part: {0}")]
    InvalidDestination(String),

    #[error("file installed twice: {0}")]
    DuplicateFile(String),

    #[error("link created twice: {0}")]
    DuplicateLink(String),

    #[error("{0} table is full")]
    TableFull(&'static str),

    #[error("{field} does not fit its field: {value}")]
    FieldOverflow { field: &'static str, value: u64 },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("cabinet tool not found: {0}")]
    ToolNotFound(String),

    #[error("cabinet tool failed with {0}")]
    ToolFailed(std::process::ExitStatus),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
