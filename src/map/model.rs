// src/map/model.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;
use crate::utils::geometry::{BoundingBox, Vec3};

/// Number of collision hulls per model (point, player, large, crouch).
pub const MAX_HULLS: usize = 4;

/// A brush model (64 bytes). Model 0 is the static world; brush entities such
/// as doors reference later models with `"model" "*N"` and are drawn from the
/// same face array, offset by `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    pub bounds: BoundingBox,
    pub origin: Vec3,
    pub head_nodes: [i32; MAX_HULLS],
    pub vis_leaves: i32,
    pub first_face: i32,
    pub face_count: i32,
}

impl Model {
    /// The model's slice of the face array, or `None` when the stored range
    /// is negative.
    pub fn face_range(&self) -> Option<std::ops::Range<usize>> {
        let first = usize::try_from(self.first_face).ok()?;
        let count = usize::try_from(self.face_count).ok()?;
        Some(first..first + count)
    }
}

fn read_vec3<R: Read>(reader: &mut R) -> io::Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32::<LE>()?,
        reader.read_f32::<LE>()?,
        reader.read_f32::<LE>()?,
    ))
}

impl Record for Model {
    const KIND: LumpKind = LumpKind::Models;
    const SIZE: usize = 64;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mins = read_vec3(reader)?;
        let maxs = read_vec3(reader)?;
        let origin = read_vec3(reader)?;
        let mut head_nodes = [0i32; MAX_HULLS];
        for node in head_nodes.iter_mut() {
            *node = reader.read_i32::<LE>()?;
        }
        Ok(Model {
            bounds: BoundingBox::new(mins, maxs),
            origin,
            head_nodes,
            vis_leaves: reader.read_i32::<LE>()?,
            first_face: reader.read_i32::<LE>()?,
            face_count: reader.read_i32::<LE>()?,
        })
    }
}
