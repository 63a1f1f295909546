// src/map/texinfo.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;
use crate::utils::geometry::Vec3;

/// Texture projection for a face (40 bytes).
///
/// Each of the two rows of `vecs` is a direction (first three components) and
/// an offset (fourth). Projecting a world position onto a row gives the `s`
/// or `t` coordinate in texel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexInfo {
    pub vecs: [[f32; 4]; 2],

    /// Index into the mip-texture table of the texture lump.
    pub miptex: i32,

    /// Zero for ordinary lit surfaces; sky, water and other special surfaces
    /// set bits here and carry no lightmap.
    pub flags: i32,
}

impl TexInfo {
    /// Projects `position` onto both basis rows, returning `[s, t]`.
    pub fn project(&self, position: &Vec3) -> [f32; 2] {
        let mut st = [0.0f32; 2];
        for (out, row) in st.iter_mut().zip(self.vecs.iter()) {
            *out = position.x * row[0] + position.y * row[1] + position.z * row[2] + row[3];
        }
        st
    }

    pub fn is_special(&self) -> bool {
        self.flags != 0
    }
}

impl Record for TexInfo {
    const KIND: LumpKind = LumpKind::TexInfo;
    const SIZE: usize = 40;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut vecs = [[0.0f32; 4]; 2];
        for row in vecs.iter_mut() {
            for value in row.iter_mut() {
                *value = reader.read_f32::<LE>()?;
            }
        }
        Ok(TexInfo {
            vecs,
            miptex: reader.read_i32::<LE>()?,
            flags: reader.read_i32::<LE>()?,
        })
    }
}
