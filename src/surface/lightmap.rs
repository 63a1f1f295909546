// src/surface/lightmap.rs

use image::{Rgb, RgbImage};

/// Where a face's lightmap samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSamples {
    /// `width * height` RGB triples starting at this byte of the lighting lump.
    Stored { offset: usize },
    /// No stored samples; the face is drawn fully lit.
    Blank,
}

/// Per-face lightmap descriptor. Samples are not copied out of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lightmap {
    pub width: u32,
    pub height: u32,
    pub samples: LightSamples,
}

impl Lightmap {
    pub fn blank(width: u32, height: u32) -> Self {
        Lightmap {
            width,
            height,
            samples: LightSamples::Blank,
        }
    }

    /// Bytes of RGB data the lightmap covers.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    pub fn is_blank(&self) -> bool {
        self.samples == LightSamples::Blank
    }

    /// The raw samples within `lighting`, or `None` for blank lightmaps and
    /// spans that do not fit.
    pub fn rgb_bytes<'a>(&self, lighting: &'a [u8]) -> Option<&'a [u8]> {
        match self.samples {
            LightSamples::Stored { offset } => {
                lighting.get(offset..offset.checked_add(self.byte_len())?)
            }
            LightSamples::Blank => None,
        }
    }

    /// Decodes the lightmap into an image. Blank lightmaps come out white.
    pub fn to_image(&self, lighting: &[u8]) -> Option<RgbImage> {
        match self.samples {
            LightSamples::Stored { .. } => {
                let bytes = self.rgb_bytes(lighting)?;
                RgbImage::from_raw(self.width, self.height, bytes.to_vec())
            }
            LightSamples::Blank => Some(RgbImage::from_pixel(
                self.width,
                self.height,
                Rgb([255, 255, 255]),
            )),
        }
    }
}
