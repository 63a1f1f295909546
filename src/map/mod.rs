// src/map/mod.rs
//! Fixed-size records stored in the homogeneous lumps of a BSP file.
//!
//! Every record knows its on-disk size and which lump it lives in, and can
//! read itself from a little-endian byte stream. `LumpView` in the `lump`
//! module uses this to hand out typed records on demand without copying
//! whole lumps at load time.

use std::io::{self, Read};

use crate::lump::LumpKind;

pub mod clipnode;
pub mod edge;
pub mod face;
pub mod leaf;
pub mod miptex;
pub mod model;
pub mod node;
pub mod plane;
pub mod texinfo;
pub mod vertex;

pub use clipnode::ClipNode;
pub use edge::{Edge, MarkSurface, SurfEdge};
pub use face::Face;
pub use leaf::Leaf;
pub use miptex::{MiptexHeader, MiptexTable};
pub use model::{Model, MAX_HULLS};
pub use node::Node;
pub use plane::Plane;
pub use texinfo::TexInfo;
pub use vertex::Vertex;

/// A fixed-size record that makes up a homogeneous lump.
pub trait Record: Sized {
    /// The lump this record type is stored in.
    const KIND: LumpKind;

    /// On-disk size in bytes.
    const SIZE: usize;

    /// Reads one record. The reader must hold at least `SIZE` bytes.
    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self>;
}
