// src/lump/mod.rs
mod directory;
mod view;

pub use self::directory::{BspFile, LumpEntry, LumpKind, BSP_VERSION, HEADER_SIZE, LUMP_COUNT};
pub use self::view::LumpView;
