// src/surface/mod.rs
mod extents;
mod lightmap;
mod reconstruct;
mod texture;

pub use self::extents::{face_winding, SurfaceExtents, LIGHTMAP_TEXEL_SIZE, MAX_LIGHTMAP_SIZE};
pub use self::lightmap::{LightSamples, Lightmap};
pub use self::reconstruct::{reconstruct_surfaces, SurfaceFace, SurfaceVertex, Surfaces, NO_BONE};
pub use self::texture::{
    load_texture_refs, placeholder_texture, resolve_texture, TextureProvider, TextureRef,
};
