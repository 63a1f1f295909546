// src/map/leaf.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;

/// A convex leaf of the node tree (28 bytes).
///
/// ```text
///  0-3    contents             i32
///  4-7    vis_offset           i32   (-1 = no visibility row)
///  8-19   mins, maxs           [i16; 3] x 2
/// 20-21   first_mark_surface   u16
/// 22-23   mark_surface_count   u16
/// 24-27   ambient levels       [u8; 4]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub contents: i32,
    pub vis_offset: i32,
    pub mins: [i16; 3],
    pub maxs: [i16; 3],
    pub first_mark_surface: u16,
    pub mark_surface_count: u16,
    pub ambient: [u8; 4],
}

impl Record for Leaf {
    const KIND: LumpKind = LumpKind::Leaves;
    const SIZE: usize = 28;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let contents = reader.read_i32::<LE>()?;
        let vis_offset = reader.read_i32::<LE>()?;
        let mut mins = [0i16; 3];
        let mut maxs = [0i16; 3];
        for v in mins.iter_mut().chain(maxs.iter_mut()) {
            *v = reader.read_i16::<LE>()?;
        }
        let first_mark_surface = reader.read_u16::<LE>()?;
        let mark_surface_count = reader.read_u16::<LE>()?;
        let mut ambient = [0u8; 4];
        reader.read_exact(&mut ambient)?;

        Ok(Leaf {
            contents,
            vis_offset,
            mins,
            maxs,
            first_mark_surface,
            mark_surface_count,
            ambient,
        })
    }
}
