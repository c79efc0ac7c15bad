//! Bitmap font atlases.
//!
//! A font atlas is an ordinary texture with glyphs laid out on a grid in
//! ASCII order, typically 16 columns x 6 rows for printable ASCII (32-127).

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::texture_allocator::TextureHandle;

new_key_type! {
    pub struct FontHandle;
}

/// Upper bound on atlas grid cells; larger grids are rejected at load.
pub const MAX_CELLS: u32 = 1 << 16;

/// Grid layout of a bitmap font atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Number of columns in the font atlas grid.
    pub cols: u32,
    /// Number of rows in the font atlas grid.
    pub rows: u32,
    /// First ASCII code in the atlas (typically 32 = space).
    pub start_char: u8,
    /// Horizontal advance as fraction of glyph width (e.g., 0.55 for tight, 1.0 for monospace).
    pub spacing: f32,
    /// Vertical advance between lines as fraction of glyph height.
    pub line_height: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            cols: 16,
            rows: 6,
            start_char: 32,
            spacing: 0.55,
            line_height: 1.2,
        }
    }
}

impl FontConfig {
    pub fn with_grid(mut self, cols: u32, rows: u32) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    pub fn with_start_char(mut self, start_char: u8) -> Self {
        self.start_char = start_char;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Number of grid cells, or `None` when the grid is empty or too large
    /// to index.
    pub fn cell_count(&self) -> Option<u32> {
        self.cols
            .checked_mul(self.rows)
            .filter(|&cells| cells > 0 && cells <= MAX_CELLS)
    }

    /// Grid cell (col, row) of a character, or `None` outside the atlas range.
    pub fn char_to_grid(&self, c: char) -> Option<(u32, u32)> {
        let index = (c as u32).checked_sub(self.start_char as u32)?;
        if index >= self.cell_count()? {
            return None;
        }
        Some((index % self.cols, index / self.cols))
    }
}

impl PartialEq for FontConfig {
    fn eq(&self, other: &Self) -> bool {
        self.cols == other.cols
            && self.rows == other.rows
            && self.start_char == other.start_char
            && self.spacing.to_bits() == other.spacing.to_bits()
            && self.line_height.to_bits() == other.line_height.to_bits()
    }
}

impl Eq for FontConfig {}

impl Hash for FontConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cols.hash(state);
        self.rows.hash(state);
        self.start_char.hash(state);
        self.spacing.to_bits().hash(state);
        self.line_height.to_bits().hash(state);
    }
}

/// Placement data for one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Bottom-left corner of the glyph in UV space.
    pub uv_origin: Vec2,
    pub uv_size: Vec2,
    /// Glyph size in atlas pixels.
    pub size: Vec2,
    /// Pen advance in atlas pixels.
    pub advance: f32,
    /// Offset from the pen position to the glyph's bottom-left, in atlas pixels.
    pub offset: Vec2,
}

/// A loaded font: its atlas texture plus the glyph table.
#[derive(Debug, Clone)]
pub struct Font {
    pub texture: TextureHandle,
    pub config: FontConfig,
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Build the glyph table for a grid atlas of `width` x `height` pixels.
    ///
    /// Grids past [`MAX_CELLS`] only get glyphs for their first `MAX_CELLS` cells.
    pub fn from_grid(texture: TextureHandle, width: u32, height: u32, config: FontConfig) -> Self {
        let cols = config.cols.max(1);
        let rows = config.rows.max(1);
        let cell = Vec2::new(width as f32 / cols as f32, height as f32 / rows as f32);
        let uv_size = Vec2::new(1.0 / cols as f32, 1.0 / rows as f32);
        let cells = cols.checked_mul(rows).unwrap_or(MAX_CELLS).min(MAX_CELLS);

        let mut glyphs = HashMap::with_capacity(cells as usize);
        for index in 0..cells {
            let Some(c) = char::from_u32(config.start_char as u32 + index) else {
                continue;
            };
            let (col, row) = (index % cols, index / cols);
            // Atlas rows count from the top, texture storage is flipped.
            let uv_origin = Vec2::new(col as f32 * uv_size.x, 1.0 - (row + 1) as f32 * uv_size.y);
            glyphs.insert(
                c,
                Glyph {
                    uv_origin,
                    uv_size,
                    size: cell,
                    advance: cell.x * config.spacing,
                    offset: Vec2::ZERO,
                },
            );
        }

        Self {
            texture,
            config,
            line_height: cell.y * config.line_height,
            glyphs,
        }
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Lay out `text` starting at the origin. Returns each glyph with its
    /// bottom-left pen position in atlas pixels. Unknown characters are
    /// skipped but still advance by a space width when the font has one.
    pub fn layout(&self, text: &str) -> Vec<(Glyph, Vec2)> {
        let mut placed = Vec::with_capacity(text.len());
        let mut pen = Vec2::ZERO;
        for c in text.chars() {
            if c == '\n' {
                pen.x = 0.0;
                pen.y -= self.line_height;
                continue;
            }
            match self.glyph(c) {
                Some(glyph) => {
                    placed.push((*glyph, pen + glyph.offset));
                    pen.x += glyph.advance;
                }
                None => {
                    if let Some(space) = self.glyph(' ') {
                        pen.x += space.advance;
                    }
                }
            }
        }
        placed
    }

    /// Width of the widest line of `text` in atlas pixels.
    pub fn measure(&self, text: &str) -> f32 {
        text.split('\n')
            .map(|line| {
                line.chars()
                    .filter_map(|c| self.glyph(c).or_else(|| self.glyph(' ')))
                    .map(|g| g.advance)
                    .sum::<f32>()
            })
            .fold(0.0, f32::max)
    }
}
