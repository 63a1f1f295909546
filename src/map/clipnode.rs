// src/map/clipnode.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;

/// A raw clip-node: a plane and two children. A child `>= 0` is another
/// clip-node, a negative child is a contents code (`-1` empty, `-2` solid, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipNode {
    pub plane: i32,
    pub children: [i16; 2],
}

impl Record for ClipNode {
    const KIND: LumpKind = LumpKind::ClipNodes;
    const SIZE: usize = 8;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(ClipNode {
            plane: reader.read_i32::<LE>()?,
            children: [reader.read_i16::<LE>()?, reader.read_i16::<LE>()?],
        })
    }
}
