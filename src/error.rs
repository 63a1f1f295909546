// src/error.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::lump::LumpKind;

/// Structural problems with a map file. Any of these aborts the load.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("file is {len} bytes, too small for the {need}-byte header")]
    HeaderTooSmall { len: usize, need: usize },

    #[error("unsupported BSP version {0}")]
    UnsupportedVersion(i32),

    #[error("{kind} lump spans {offset}+{length}, past the end of a {file_len}-byte file")]
    LumpOutOfBounds {
        kind: LumpKind,
        offset: i64,
        length: i64,
        file_len: usize,
    },

    #[error("{kind} lump length {length} is not a multiple of its {record_size}-byte record")]
    LumpMisaligned {
        kind: LumpKind,
        length: usize,
        record_size: usize,
    },

    #[error("{context}: index {index} out of range for {kind} lump ({count} entries)")]
    IndexOutOfRange {
        kind: LumpKind,
        index: i64,
        count: usize,
        context: &'static str,
    },

    #[error("entity text block starting at byte {offset} is not terminated")]
    UnterminatedEntity { offset: usize },

    #[error("entity text expected a quoted string at byte {offset}")]
    MalformedEntity { offset: usize },

    #[error("clip tree for hull {hull} of model {model} is not present")]
    MissingHull { model: usize, hull: usize },

    #[error("face {face} has unusable texture extents {min:?} to {max:?}")]
    BadSurfaceExtents {
        face: usize,
        min: [f32; 2],
        max: [f32; 2],
    },
}

/// Everything that can go wrong while turning a file name into a `BspAsset`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed map: {0}")]
    Format(#[from] FormatError),

    #[error("resource not found: {0}")]
    ResourceMissing(String),

    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;
