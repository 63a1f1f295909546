// src/map/plane.rs
use std::io::{self, Read};

use byteorder::{ReadBytesExt, LE};

use crate::lump::LumpKind;
use crate::map::Record;
use crate::utils::geometry::Vec3;

/// A splitting plane (20 bytes).
///
/// ```text
/// offset  field      type
/// ------  ---------  --------
///  0-11   normal     [f32; 3]
/// 12-15   distance   f32
/// 16-19   type       i32   (axial hint, unused here)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,

    /// Signed distance from the origin along `normal`.
    pub distance: f32,

    pub plane_type: i32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Plane {
            normal,
            distance,
            plane_type: 0,
        }
    }

    /// Signed distance of `point` from the plane; positive is in front.
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// The same plane facing the other way. All four components flip.
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            distance: -self.distance,
            plane_type: self.plane_type,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.distance]
    }
}

impl Record for Plane {
    const KIND: LumpKind = LumpKind::Planes;
    const SIZE: usize = 20;

    fn from_bsp<R: Read>(reader: &mut R) -> io::Result<Self> {
        let normal = Vec3::new(
            reader.read_f32::<LE>()?,
            reader.read_f32::<LE>()?,
            reader.read_f32::<LE>()?,
        );
        Ok(Plane {
            normal,
            distance: reader.read_f32::<LE>()?,
            plane_type: reader.read_i32::<LE>()?,
        })
    }
}
