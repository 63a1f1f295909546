// src/map/node.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;

/// A render/visibility node (24 bytes).
///
/// Children `>= 0` index the node lump; a negative child `c` refers to leaf
/// `-c - 1`. The point-sized collision hull is derived from this tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub plane: i32,
    pub children: [i16; 2],
    pub mins: [i16; 3],
    pub maxs: [i16; 3],
    pub first_face: u16,
    pub face_count: u16,
}

impl Record for Node {
    const KIND: LumpKind = LumpKind::Nodes;
    const SIZE: usize = 24;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let plane = reader.read_i32::<LE>()?;
        let children = [reader.read_i16::<LE>()?, reader.read_i16::<LE>()?];
        let mut mins = [0i16; 3];
        let mut maxs = [0i16; 3];
        for v in mins.iter_mut().chain(maxs.iter_mut()) {
            *v = reader.read_i16::<LE>()?;
        }
        Ok(Node {
            plane,
            children,
            mins,
            maxs,
            first_face: reader.read_u16::<LE>()?,
            face_count: reader.read_u16::<LE>()?,
        })
    }
}
