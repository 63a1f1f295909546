// src/lib.rs
//! Loading of Half-Life (GoldSrc) BSP maps.
//!
//! [`BspAsset`] reads a map once and exposes its entities, renderable
//! surfaces with lightmaps, and collision hulls. The lower-level pieces
//! (`lump`, `entity`, `surface`, `bsp`) work directly on a [`lump::BspFile`]
//! and can be used on their own.

pub mod asset;
pub mod bsp;
pub mod config;
pub mod entity;
pub mod error;
pub mod fs;
pub mod lump;
pub mod map;
pub mod surface;
pub mod utils;

#[cfg(test)]
mod test_util;

pub use asset::BspAsset;
pub use config::{ClipConfig, LoaderConfig};
pub use error::{FormatError, LoadError};
pub use fs::{FileSystem, SearchPathFileSystem};
