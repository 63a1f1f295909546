// src/map/vertex.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;
use crate::utils::geometry::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
}

impl Record for Vertex {
    const KIND: LumpKind = LumpKind::Vertices;
    const SIZE: usize = 12;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Vertex {
            position: Vec3::new(
                reader.read_f32::<LE>()?,
                reader.read_f32::<LE>()?,
                reader.read_f32::<LE>()?,
            ),
        })
    }
}
