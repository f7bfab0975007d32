use std::path::PathBuf;

use crate::device::Source;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read failed: {path}: {source}")]
    SysfsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{source_kind} listing unavailable: {detail}")]
    SourceUnavailable { source_kind: Source, detail: String },

    #[error("{program} failed: {detail}")]
    Command { program: String, detail: String },

    #[error("cannot determine system identity: {0}")]
    Identity(String),

    #[error("no bug database available for {distro}-{kernel} in {}", .dir.display())]
    MissingDatabase {
        distro: String,
        kernel: String,
        dir: PathBuf,
    },

    #[error("common bug database unreadable: {path}: {source}")]
    CommonDatabaseMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bug database unreadable: {path}: {source}")]
    DatabaseRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bug database {path} is not valid JSON: {source}")]
    DatabaseParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("bug database {path} is malformed: {detail}")]
    InvalidDatabase { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
