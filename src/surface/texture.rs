// src/surface/texture.rs

use image::{Rgba, RgbaImage};
use log::{debug, warn};

use crate::error::FormatResult;
use crate::map::MiptexTable;

/// Side length of one checker cell in the placeholder texture.
const CHECKER_CELL: u32 = 8;

/// Size used for texture slots the map marks as absent.
const MISSING_TEXTURE_SIZE: u32 = 16;

/// A texture referenced by the map's faces. Pixels live either inside the
/// map (`embedded`) or in an external WAD package found by `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRef {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub embedded: bool,
}

impl TextureRef {
    fn missing() -> Self {
        TextureRef {
            name: String::new(),
            width: MISSING_TEXTURE_SIZE,
            height: MISSING_TEXTURE_SIZE,
            embedded: false,
        }
    }

    /// Width and height as divisors for texture coordinates.
    pub(crate) fn uv_scale(&self) -> [f32; 2] {
        [self.width.max(1) as f32, self.height.max(1) as f32]
    }
}

/// Reads every slot of the texture lump, in table order.
pub fn load_texture_refs(lump: &[u8]) -> FormatResult<Vec<TextureRef>> {
    let table = MiptexTable::parse(lump)?;
    let mut textures = Vec::with_capacity(table.len());
    for index in 0..table.len() {
        let texture = match table.header(index)? {
            Some(header) => TextureRef {
                embedded: header.is_embedded(),
                name: header.name,
                width: header.width,
                height: header.height,
            },
            None => {
                warn!("Texture slot {} is empty", index);
                TextureRef::missing()
            }
        };
        textures.push(texture);
    }
    debug!("Read {} texture references", textures.len());
    Ok(textures)
}

/// Source of decoded pixels for a texture, typically a WAD reader.
pub trait TextureProvider {
    fn rgba(&self, texture: &TextureRef) -> Option<RgbaImage>;
}

/// Black and white checkerboard shown in place of textures that cannot be
/// found.
pub fn placeholder_texture(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width.max(1), height.max(1), |x, y| {
        let odd = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 1;
        let value = if odd { 255 } else { 0 };
        Rgba([value, value, value, 255])
    })
}

/// Asks `provider` for the texture's pixels, falling back to the
/// placeholder when it has none.
pub fn resolve_texture(provider: &dyn TextureProvider, texture: &TextureRef) -> RgbaImage {
    provider.rgba(texture).unwrap_or_else(|| {
        warn!("Texture '{}' not found, using placeholder", texture.name);
        placeholder_texture(texture.width, texture.height)
    })
}
