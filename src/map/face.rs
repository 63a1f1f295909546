// src/map/face.rs
use std::io::{self, Read};
use std::ops::Range;

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;

/// A raw face as stored in the face lump (20 bytes).
///
/// Layout (all little-endian):
///
/// ```text
/// offset  field          type
/// ------  -------------  -------
///  0-1    plane          u16
///  2-3    side           u16   (non-zero: face lies on the back of `plane`)
///  4-7    first_edge     i32   (index into the surface-edge lump)
///  8-9    edge_count     u16
/// 10-11   texinfo        u16
/// 12-15   styles         [u8; 4]
/// 16-19   light_offset   i32   (byte offset into the lighting lump, -1 = none)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub plane: u16,
    pub side: u16,
    pub first_edge: i32,
    pub edge_count: u16,
    pub texinfo: u16,
    pub styles: [u8; 4],
    pub light_offset: i32,
}

impl Face {
    /// Whether the plane normal has to be negated to face out of the solid.
    pub fn is_flipped(&self) -> bool {
        self.side != 0
    }

    /// The contiguous run of surface-edges that make up this face's winding.
    /// Kept signed so a corrupt negative `first_edge` stays visible to the caller.
    pub fn edge_range(&self) -> Range<i64> {
        let first = self.first_edge as i64;
        first..first + self.edge_count as i64
    }
}

impl Record for Face {
    const KIND: LumpKind = LumpKind::Faces;
    const SIZE: usize = 20;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let plane = reader.read_u16::<LE>()?;
        let side = reader.read_u16::<LE>()?;
        let first_edge = reader.read_i32::<LE>()?;
        let edge_count = reader.read_u16::<LE>()?;
        let texinfo = reader.read_u16::<LE>()?;
        let mut styles = [0u8; 4];
        reader.read_exact(&mut styles)?;
        let light_offset = reader.read_i32::<LE>()?;

        Ok(Face {
            plane,
            side,
            first_edge,
            edge_count,
            texinfo,
            styles,
            light_offset,
        })
    }
}
