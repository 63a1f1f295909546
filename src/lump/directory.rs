// src/lump/directory.rs

use std::fmt;
use std::ops::Range;

use byteorder::{ReadBytesExt, LE};
use log::debug;

use crate::error::{FormatError, FormatResult};
use crate::lump::LumpView;
use crate::map::{
    ClipNode, Edge, Face, Leaf, MarkSurface, Model, Node, Plane, Record, SurfEdge, TexInfo, Vertex,
};

/// Half-Life map version. Quake's version 29 shares the same lump layout.
pub const BSP_VERSION: i32 = 30;
const QUAKE_BSP_VERSION: i32 = 29;

pub const LUMP_COUNT: usize = 15;

/// 4-byte version + 15 (offset, length) pairs.
pub const HEADER_SIZE: usize = 4 + LUMP_COUNT * 8;

/// The fixed slots of the lump directory, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LumpKind {
    Entities,
    Planes,
    Textures,
    Vertices,
    Visibility,
    Nodes,
    TexInfo,
    Faces,
    Lighting,
    ClipNodes,
    Leaves,
    MarkSurfaces,
    Edges,
    SurfEdges,
    Models,
}

impl LumpKind {
    pub const ALL: [LumpKind; LUMP_COUNT] = [
        LumpKind::Entities,
        LumpKind::Planes,
        LumpKind::Textures,
        LumpKind::Vertices,
        LumpKind::Visibility,
        LumpKind::Nodes,
        LumpKind::TexInfo,
        LumpKind::Faces,
        LumpKind::Lighting,
        LumpKind::ClipNodes,
        LumpKind::Leaves,
        LumpKind::MarkSurfaces,
        LumpKind::Edges,
        LumpKind::SurfEdges,
        LumpKind::Models,
    ];

    /// Slot in the header directory.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            LumpKind::Entities => "entities",
            LumpKind::Planes => "planes",
            LumpKind::Textures => "textures",
            LumpKind::Vertices => "vertices",
            LumpKind::Visibility => "visibility",
            LumpKind::Nodes => "nodes",
            LumpKind::TexInfo => "texinfo",
            LumpKind::Faces => "faces",
            LumpKind::Lighting => "lighting",
            LumpKind::ClipNodes => "clipnodes",
            LumpKind::Leaves => "leaves",
            LumpKind::MarkSurfaces => "marksurfaces",
            LumpKind::Edges => "edges",
            LumpKind::SurfEdges => "surfedges",
            LumpKind::Models => "models",
        }
    }

    /// Record size for homogeneous lumps, `None` for the byte blobs
    /// (entities, textures, visibility, lighting).
    pub fn record_size(self) -> Option<usize> {
        match self {
            LumpKind::Entities
            | LumpKind::Textures
            | LumpKind::Visibility
            | LumpKind::Lighting => None,
            LumpKind::Planes => Some(Plane::SIZE),
            LumpKind::Vertices => Some(Vertex::SIZE),
            LumpKind::Nodes => Some(Node::SIZE),
            LumpKind::TexInfo => Some(TexInfo::SIZE),
            LumpKind::Faces => Some(Face::SIZE),
            LumpKind::ClipNodes => Some(ClipNode::SIZE),
            LumpKind::Leaves => Some(Leaf::SIZE),
            LumpKind::MarkSurfaces => Some(MarkSurface::SIZE),
            LumpKind::Edges => Some(Edge::SIZE),
            LumpKind::SurfEdges => Some(SurfEdge::SIZE),
            LumpKind::Models => Some(Model::SIZE),
        }
    }
}

impl fmt::Display for LumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single (offset, length) entry of the lump directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumpEntry {
    pub offset: i32,
    pub length: i32,
}

impl LumpEntry {
    /// Byte range inside the file. Only valid after `BspFile` has checked it.
    fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }

    /// Element count for a homogeneous lump.
    pub fn count(&self, record_size: usize) -> usize {
        self.length.max(0) as usize / record_size
    }
}

/// A map file held in memory with a validated lump directory.
///
/// The file buffer is owned here for the lifetime of the asset; lump views
/// borrow from it and never copy.
#[derive(Debug, Clone)]
pub struct BspFile {
    data: Vec<u8>,
    version: i32,
    directory: [LumpEntry; LUMP_COUNT],
}

impl BspFile {
    /// Parses the header and checks every directory entry against the buffer.
    pub fn from_bytes(data: Vec<u8>) -> FormatResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::HeaderTooSmall {
                len: data.len(),
                need: HEADER_SIZE,
            });
        }

        // The header is fully in bounds, so none of these reads can run short.
        let mut header = &data[..HEADER_SIZE];
        let short = |_| FormatError::HeaderTooSmall {
            len: data.len(),
            need: HEADER_SIZE,
        };
        let version = header.read_i32::<LE>().map_err(short)?;
        if version != BSP_VERSION && version != QUAKE_BSP_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let mut directory = [LumpEntry::default(); LUMP_COUNT];
        for (entry, kind) in directory.iter_mut().zip(LumpKind::ALL) {
            let offset = header.read_i32::<LE>().map_err(short)?;
            let length = header.read_i32::<LE>().map_err(short)?;

            let end = offset as i64 + length as i64;
            if offset < 0 || length < 0 || end > data.len() as i64 {
                return Err(FormatError::LumpOutOfBounds {
                    kind,
                    offset: offset as i64,
                    length: length as i64,
                    file_len: data.len(),
                });
            }
            if let Some(record_size) = kind.record_size() {
                if length as usize % record_size != 0 {
                    return Err(FormatError::LumpMisaligned {
                        kind,
                        length: length as usize,
                        record_size,
                    });
                }
            }

            debug!("lump {:<12} offset {:>8} length {:>8}", kind, offset, length);
            *entry = LumpEntry { offset, length };
        }

        Ok(BspFile {
            data,
            version,
            directory,
        })
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn entry(&self, kind: LumpKind) -> LumpEntry {
        self.directory[kind.index()]
    }

    /// Raw bytes of a lump.
    pub fn lump_bytes(&self, kind: LumpKind) -> &[u8] {
        self.data
            .get(self.entry(kind).range())
            .unwrap_or_default()
    }

    /// Typed view over a homogeneous lump.
    pub fn view<T: Record>(&self) -> LumpView<'_, T> {
        LumpView::new(self.lump_bytes(T::KIND))
    }

    pub fn planes(&self) -> LumpView<'_, Plane> {
        self.view()
    }

    pub fn vertices(&self) -> LumpView<'_, Vertex> {
        self.view()
    }

    pub fn nodes(&self) -> LumpView<'_, Node> {
        self.view()
    }

    pub fn texinfo(&self) -> LumpView<'_, TexInfo> {
        self.view()
    }

    pub fn faces(&self) -> LumpView<'_, Face> {
        self.view()
    }

    pub fn clip_nodes(&self) -> LumpView<'_, ClipNode> {
        self.view()
    }

    pub fn leaves(&self) -> LumpView<'_, Leaf> {
        self.view()
    }

    pub fn mark_surfaces(&self) -> LumpView<'_, MarkSurface> {
        self.view()
    }

    pub fn edges(&self) -> LumpView<'_, Edge> {
        self.view()
    }

    pub fn surf_edges(&self) -> LumpView<'_, SurfEdge> {
        self.view()
    }

    pub fn models(&self) -> LumpView<'_, Model> {
        self.view()
    }
}
