// src/map/edge.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;

/// Two vertex indices. Faces never store vertices directly; they walk edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub vertices: [u16; 2],
}

impl Edge {
    /// The vertex index at `endpoint` (0 or 1).
    pub fn vertex(&self, endpoint: usize) -> usize {
        self.vertices[endpoint & 1] as usize
    }
}

impl Record for Edge {
    const KIND: LumpKind = LumpKind::Edges;
    const SIZE: usize = 4;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Edge {
            vertices: [reader.read_u16::<LE>()?, reader.read_u16::<LE>()?],
        })
    }
}

/// A signed edge reference from a face's edge run.
///
/// The magnitude indexes the edge lump; the sign says which end of that edge
/// this corner of the face starts at. Walking a face's surface-edges in order
/// and taking the selected endpoint of each yields the face's winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfEdge(pub i32);

impl SurfEdge {
    /// Returns `(edge_index, endpoint)`. Non-negative values (zero included)
    /// select the edge's first vertex, negative values its second.
    pub fn resolve(self) -> (usize, usize) {
        let edge = self.0.unsigned_abs() as usize;
        let endpoint = if self.0 >= 0 { 0 } else { 1 };
        (edge, endpoint)
    }
}

impl Record for SurfEdge {
    const KIND: LumpKind = LumpKind::SurfEdges;
    const SIZE: usize = 4;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(SurfEdge(reader.read_i32::<LE>()?))
    }
}

/// Index into the face lump, listed per leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkSurface(pub u16);

impl Record for MarkSurface {
    const KIND: LumpKind = LumpKind::MarkSurfaces;
    const SIZE: usize = 2;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(MarkSurface(reader.read_u16::<LE>()?))
    }
}
