use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

/// Channel layout of decoded texture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    R8,
    Rgb8,
    #[default]
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Sampling parameters requested for a texture.
///
/// Part of the resource cache key: the same image loaded with two different
/// configs yields two GPU textures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub wrap_x: WrapMode,
    pub wrap_y: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub border_color: [f32; 4],
    pub generate_mipmaps: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            wrap_x: WrapMode::Repeat,
            wrap_y: WrapMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            border_color: [0.0, 0.0, 0.0, 1.0],
            generate_mipmaps: false,
        }
    }
}

impl TextureConfig {
    /// Nearest-neighbour sampling clamped to the edge, for pixel art and glyph atlases.
    pub fn pixel_art() -> Self {
        Self {
            wrap_x: WrapMode::ClampToEdge,
            wrap_y: WrapMode::ClampToEdge,
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            ..Self::default()
        }
    }

    fn border_bits(&self) -> [u32; 4] {
        self.border_color.map(f32::to_bits)
    }
}

// Compared bitwise so configs can key hash maps.
impl PartialEq for TextureConfig {
    fn eq(&self, other: &Self) -> bool {
        self.wrap_x == other.wrap_x
            && self.wrap_y == other.wrap_y
            && self.min_filter == other.min_filter
            && self.mag_filter == other.mag_filter
            && self.border_bits() == other.border_bits()
            && self.generate_mipmaps == other.generate_mipmaps
    }
}

impl Eq for TextureConfig {}

impl Hash for TextureConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wrap_x.hash(state);
        self.wrap_y.hash(state);
        self.min_filter.hash(state);
        self.mag_filter.hash(state);
        self.border_bits().hash(state);
        self.generate_mipmaps.hash(state);
    }
}

/// Decoded pixels ready for upload. Rows are stored bottom-up.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Decode an encoded image (PNG, JPEG, BMP) and flip it vertically.
    ///
    /// Single-channel images stay `R8`, three-channel images stay `Rgb8`,
    /// everything else is expanded to `Rgba8`.
    pub fn decode(path: &str, bytes: &[u8]) -> EngineResult<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| EngineError::LoadError { path: path.to_string(), reason: e.to_string() })?
            .flipv();

        let (width, height) = (image.width(), image.height());
        let (format, pixels) = match image.color().channel_count() {
            1 => (PixelFormat::R8, image.to_luma8().into_raw()),
            3 => (PixelFormat::Rgb8, image.to_rgb8().into_raw()),
            _ => (PixelFormat::Rgba8, image.to_rgba8().into_raw()),
        };
        Self::from_raw(path, width, height, format, pixels)
    }

    /// Wrap raw pixels, checking the length against the dimensions.
    pub fn from_raw(
        label: &str,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> EngineResult<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(EngineError::LoadError {
                path: label.to_string(),
                reason: format!(
                    "{}x{} {:?} needs {} bytes, got {}",
                    width,
                    height,
                    format,
                    expected,
                    pixels.len()
                ),
            });
        }
        Ok(Self { width, height, format, pixels })
    }

    /// A texture filled with one RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            pixels: rgba.repeat(count),
        }
    }
}
