// src/surface/reconstruct.rs
//! Turns the indirect face records of a map (face -> surface-edge -> edge ->
//! vertex) into flat, renderable vertex runs.
//!
//! Each face gets one `SurfaceVertex` per edge, in winding order, carrying
//! two texture coordinate sets:
//!
//! * diffuse: the texture-space projection divided by the texture size,
//! * lightmap: the projection re-centered on the face's lightmap and
//!   normalized to `[0, 1]` across it.
//!
//! Faces are independent, so they are built in parallel and then
//! concatenated in file order.

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{FormatError, FormatResult};
use crate::lump::{BspFile, LumpKind};
use crate::surface::extents::{face_winding, SurfaceExtents, LIGHTMAP_TEXEL_SIZE};
use crate::surface::lightmap::{LightSamples, Lightmap};
use crate::surface::texture::TextureRef;
use crate::utils::geometry::Vec3;

/// Bone index for vertices that belong to the static world.
pub const NO_BONE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceVertex {
    pub position: Vec3,
    /// `[diffuse, lightmap]`, each as `[u, v]`.
    pub texcoords: [[f32; 2]; 2],
    pub normal: Vec3,
    pub bone: i32,
}

/// A face ready for drawing: a run of `vertex_count` vertices starting at
/// `first_vertex`, forming a convex polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceFace {
    pub first_vertex: usize,
    pub vertex_count: usize,
    /// Index into `Surfaces::lightmaps`; always equal to the face index.
    pub lightmap: usize,
    /// Index into the texture list.
    pub texture: usize,
    pub flags: i32,
    /// Plane as `[nx, ny, nz, d]`, already flipped to face outward.
    pub plane: [f32; 4],
}

/// Everything the reconstructor derives from the face lumps.
#[derive(Debug, Clone, Default)]
pub struct Surfaces {
    pub vertices: Vec<SurfaceVertex>,
    pub faces: Vec<SurfaceFace>,
    pub lightmaps: Vec<Lightmap>,
}

struct FaceBuild {
    vertices: Vec<SurfaceVertex>,
    texture: usize,
    flags: i32,
    plane: [f32; 4],
    lightmap: Lightmap,
}

fn lightmap_for(
    index: usize,
    special: bool,
    light_offset: i32,
    size: (u32, u32),
    lighting_len: usize,
) -> FormatResult<Lightmap> {
    let (width, height) = size;
    // Sky and liquid faces carry no samples; neither do faces compiled
    // without light.
    let Ok(offset) = usize::try_from(light_offset) else {
        return Ok(Lightmap::blank(width, height));
    };
    if special {
        return Ok(Lightmap::blank(width, height));
    }

    let lightmap = Lightmap {
        width,
        height,
        samples: LightSamples::Stored { offset },
    };
    match offset.checked_add(lightmap.byte_len()) {
        Some(end) if end <= lighting_len => Ok(lightmap),
        _ => {
            debug!(
                "Face {} lightmap {}x{} at {} overruns lighting ({} bytes)",
                index, width, height, offset, lighting_len
            );
            Err(FormatError::IndexOutOfRange {
                kind: LumpKind::Lighting,
                index: light_offset as i64,
                count: lighting_len,
                context: "face lightmap samples",
            })
        }
    }
}

fn build_face(file: &BspFile, textures: &[TextureRef], index: usize) -> FormatResult<FaceBuild> {
    let face = file.faces().try_get(index as i64, "face")?;
    let mut plane = file.planes().try_get(face.plane as i64, "face plane")?;
    if face.is_flipped() {
        plane = plane.flipped();
    }

    let info = file.texinfo().try_get(face.texinfo as i64, "face texinfo")?;
    let texture_index = usize::try_from(info.miptex)
        .ok()
        .filter(|&i| i < textures.len())
        .ok_or(FormatError::IndexOutOfRange {
            kind: LumpKind::Textures,
            index: info.miptex as i64,
            count: textures.len(),
            context: "texinfo mip-texture",
        })?;
    let scale = textures[texture_index].uv_scale();

    let positions = face_winding(file, &face)?;
    let extents = SurfaceExtents::calculate(&info, &positions);
    let (width, height) = extents
        .lightmap_size()
        .ok_or(FormatError::BadSurfaceExtents {
            face: index,
            min: extents.min,
            max: extents.max,
        })?;
    let lightmap = lightmap_for(
        index,
        info.is_special(),
        face.light_offset,
        (width, height),
        file.lump_bytes(LumpKind::Lighting).len(),
    )?;

    let mid = extents.midpoint();
    let dims = [width as f32, height as f32];
    let vertices = positions
        .iter()
        .map(|position| {
            let st = info.project(position);
            let mut texcoords = [[0.0; 2]; 2];
            for axis in 0..2 {
                texcoords[0][axis] = st[axis] / scale[axis];
                texcoords[1][axis] =
                    (dims[axis] / 2.0 + (st[axis] - mid[axis]) / LIGHTMAP_TEXEL_SIZE) / dims[axis];
            }
            SurfaceVertex {
                position: *position,
                texcoords,
                normal: plane.normal,
                bone: NO_BONE,
            }
        })
        .collect();

    Ok(FaceBuild {
        vertices,
        texture: texture_index,
        flags: info.flags,
        plane: plane.to_array(),
        lightmap,
    })
}

/// Rebuilds every face of the map. Any bad index aborts the whole run.
pub fn reconstruct_surfaces(file: &BspFile, textures: &[TextureRef]) -> FormatResult<Surfaces> {
    let face_count = file.faces().len();
    let built = (0..face_count)
        .into_par_iter()
        .map(|index| build_face(file, textures, index))
        .collect::<FormatResult<Vec<_>>>()?;

    let mut surfaces = Surfaces {
        vertices: Vec::with_capacity(built.iter().map(|f| f.vertices.len()).sum()),
        faces: Vec::with_capacity(face_count),
        lightmaps: Vec::with_capacity(face_count),
    };
    for (index, face) in built.into_iter().enumerate() {
        surfaces.faces.push(SurfaceFace {
            first_vertex: surfaces.vertices.len(),
            vertex_count: face.vertices.len(),
            lightmap: index,
            texture: face.texture,
            flags: face.flags,
            plane: face.plane,
        });
        surfaces.lightmaps.push(face.lightmap);
        surfaces.vertices.extend(face.vertices);
    }

    debug!(
        "Reconstructed {} faces with {} vertices",
        surfaces.faces.len(),
        surfaces.vertices.len()
    );
    Ok(surfaces)
}
