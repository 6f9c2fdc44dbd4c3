//! Image-to-palette extraction.
//!
//! Sampling is independently random per slot: the same pixel may be picked
//! more than once and the palette is not guaranteed to be visually diverse.

use crate::error::{Error, Result};
use image::RgbaImage;
use rand::Rng;
use std::rc::Rc;

/// Linear RGB triple with channels in \[0, 1\].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Normalize 8-bit channels to \[0, 1\].
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

/// Immutable ordered color samples. Cloning shares the same samples;
/// a new upload produces a new `Palette` rather than mutating this one.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Rc<[Rgb]>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self {
            colors: colors.into(),
        }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Uniformly random entry, or `None` for an empty palette.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Rgb> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[rng.gen_range(0..self.colors.len())])
    }
}

/// Sample `count` colors from a decoded raster. A `count` of zero is treated
/// as one so a successful extraction never yields an empty palette.
pub fn extract_palette<R: Rng + ?Sized>(
    raster: &RgbaImage,
    count: usize,
    rng: &mut R,
) -> Result<Palette> {
    let (w, h) = raster.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::ImageDecode(format!("zero-sized image {}x{}", w, h)));
    }
    // The backing buffer may be longer than w*h pixels; only address the image
    let colors = (0..count.max(1))
        .map(|_| {
            let [r, g, b, _] = raster.get_pixel(rng.gen_range(0..w), rng.gen_range(0..h)).0;
            Rgb::from_u8(r, g, b)
        })
        .collect();
    Ok(Palette::new(colors))
}

/// Decode an uploaded file (any format the `image` features enable) and
/// sample it.
pub fn extract_palette_from_bytes<R: Rng + ?Sized>(
    bytes: &[u8],
    count: usize,
    rng: &mut R,
) -> Result<Palette> {
    if bytes.is_empty() {
        return Err(Error::ImageDecode("empty file".into()));
    }
    let raster = image::load_from_memory(bytes)?.to_rgba8();
    extract_palette(&raster, count, rng)
}
