// Procedurally generated stand-ins for the demo's art, encoded as PNG so
// they go through the same decode path as files on disk.

use std::io::Cursor;

use image::{ImageFormat, ImageResult, Rgba, RgbaImage};
use scrap_engine::MemoryAssets;

pub const MANIFEST: &str = r#"{
    "textures": {
        "orb":    { "path": "orb.png",    "config": { "min_filter": "nearest", "mag_filter": "nearest" } },
        "button": { "path": "button.png" }
    },
    "fonts": {
        "ui": { "path": "font.png" }
    },
    "sounds": {
        "music": { "path": "music.ogg", "volume": 0.6 }
    }
}"#;

fn encode(image: RgbaImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn gradient(width: u32, height: u32, from: [u8; 3], to: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let t = y as f32 / (height.max(2) - 1) as f32;
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Rgba([mix(from[0], to[0]), mix(from[1], to[1]), mix(from[2], to[2]), 255])
    })
}

fn disc(size: u32) -> RgbaImage {
    let r = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 + 0.5 - r).powi(2) + (y as f32 + 0.5 - r).powi(2)).sqrt();
        let alpha = if d <= r { 255 } else { 0 };
        Rgba([255, 255, 255, alpha])
    })
}

/// 16x6 grid of 8x8 cells starting at ' ', every glyph a filled box with a
/// one-pixel gutter.
fn font_atlas() -> RgbaImage {
    RgbaImage::from_fn(16 * 8, 6 * 8, |x, y| {
        let (cx, cy) = (x % 8, y % 8);
        let ink = cx > 0 && cx < 7 && cy > 0 && cy < 7 && !(x < 8 && y < 8);
        Rgba([255, 255, 255, if ink { 255 } else { 0 }])
    })
}

pub fn build() -> ImageResult<MemoryAssets> {
    Ok(MemoryAssets::new()
        .with("logo.png", encode(gradient(64, 64, [240, 120, 40], [120, 30, 160]))?)
        .with("info.png", encode(gradient(96, 32, [200, 200, 200], [90, 90, 90]))?)
        .with("load_bg.png", encode(gradient(32, 32, [10, 10, 30], [30, 30, 70]))?)
        .with("load_bar.png", encode(gradient(16, 16, [80, 220, 120], [20, 120, 60]))?)
        .with("orb.png", encode(disc(32))?)
        .with("button.png", encode(gradient(32, 16, [70, 70, 200], [30, 30, 120]))?)
        .with("font.png", encode(font_atlas())?))
}
