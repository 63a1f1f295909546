// src/surface/extents.rs

use crate::error::FormatResult;
use crate::lump::BspFile;
use crate::map::{Face, TexInfo};
use crate::utils::geometry::Vec3;

/// World units covered by one lightmap sample.
pub const LIGHTMAP_TEXEL_SIZE: f32 = 16.0;

/// Largest lightmap side, in samples, accepted for any face.
pub const MAX_LIGHTMAP_SIZE: u32 = 256;

/// Bounding rectangle of a face in texture space (`s`, `t`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtents {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl SurfaceExtents {
    /// Projects every position with `info` and keeps the running min/max.
    /// A face without vertices gets a zero-sized rectangle at the origin.
    pub fn calculate(info: &TexInfo, positions: &[Vec3]) -> Self {
        let mut points = positions.iter().map(|p| info.project(p));
        let Some(first) = points.next() else {
            return SurfaceExtents {
                min: [0.0; 2],
                max: [0.0; 2],
            };
        };

        let mut extents = SurfaceExtents {
            min: first,
            max: first,
        };
        for st in points {
            for axis in 0..2 {
                extents.min[axis] = extents.min[axis].min(st[axis]);
                extents.max[axis] = extents.max[axis].max(st[axis]);
            }
        }
        extents
    }

    /// Lightmap size in samples: `ceil(max / 16) - floor(min / 16) + 1`
    /// per axis. `None` when the extents are not finite or either side
    /// exceeds `MAX_LIGHTMAP_SIZE`.
    pub fn lightmap_size(&self) -> Option<(u32, u32)> {
        let texel = LIGHTMAP_TEXEL_SIZE as f64;
        let axis = |a: usize| {
            let lo = (self.min[a] as f64 / texel).floor();
            let hi = (self.max[a] as f64 / texel).ceil();
            let size = hi - lo + 1.0;
            (1.0..=MAX_LIGHTMAP_SIZE as f64)
                .contains(&size)
                .then_some(size as u32)
        };
        Some((axis(0)?, axis(1)?))
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
        ]
    }
}

/// Resolves a face's corner positions in winding order through its run of
/// surface-edges.
pub fn face_winding(file: &BspFile, face: &Face) -> FormatResult<Vec<Vec3>> {
    let surf_edges = file.surf_edges();
    let edges = file.edges();
    let vertices = file.vertices();

    let mut positions = Vec::with_capacity(face.edge_count as usize);
    for i in face.edge_range() {
        let (edge_index, endpoint) = surf_edges.try_get(i, "face edge run")?.resolve();
        let edge = edges.try_get(edge_index as i64, "surface-edge")?;
        let vertex = vertices.try_get(edge.vertex(endpoint) as i64, "edge vertex")?;
        positions.push(vertex.position);
    }
    Ok(positions)
}
