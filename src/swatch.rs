//! Typed draw instructions for color swatches.
//!
//! A swatch is a filled, rounded rectangle with an optional label whose
//! text color is picked for contrast against the fill. Layout produces
//! absolute pixel geometry; how it is painted (DOM, terminal, PNG) is up to
//! the caller. [`rasterize`] is the PNG path.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Fills at or above this luminance get dark text.
pub const LIGHT_TEXT_BELOW: f32 = 186.0;

/// Perceptual brightness, `0.299 R + 0.587 G + 0.114 B` on the 0..255 scale.
pub fn luminance(c: Rgb) -> f32 {
    0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    /// White text, for dark fills.
    Light,
    /// Black text, for light fills.
    Dark,
}

impl TextTone {
    pub fn color(self) -> Rgb {
        match self {
            TextTone::Light => Rgb::WHITE,
            TextTone::Dark => Rgb::BLACK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextTone::Light => "light",
            TextTone::Dark => "dark",
        }
    }
}

pub fn text_tone(fill: Rgb) -> TextTone {
    if luminance(fill) < LIGHT_TEXT_BELOW {
        TextTone::Light
    } else {
        TextTone::Dark
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub corner_radius: u32,
}

impl Rect {
    fn right(&self) -> u32 {
        self.x + self.width
    }

    fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether pixel `(px, py)` is covered once corners are rounded.
    fn covers(&self, px: u32, py: u32) -> bool {
        if px < self.x || py < self.y || px >= self.right() || py >= self.bottom() {
            return false;
        }
        let r = self.corner_radius.min(self.width / 2).min(self.height / 2) as f32;
        if r == 0.0 {
            return true;
        }
        // Distance from the pixel center to the rectangle shrunk by `r`.
        let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
        let cx = fx.clamp(self.x as f32 + r, self.right() as f32 - r);
        let cy = fy.clamp(self.y as f32 + r, self.bottom() as f32 - r);
        (fx - cx).powi(2) + (fy - cy).powi(2) <= r * r
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub tone: TextTone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSwatch {
    pub rect: Rect,
    pub fill: Rgb,
    pub label: Option<Label>,
}

impl DrawSwatch {
    /// Swatch labelled with its own hex code.
    pub fn hex_labelled(fill: Rgb, rect: Rect) -> Self {
        DrawSwatch {
            rect,
            fill,
            label: Some(Label { text: fill.to_hex(), tone: text_tone(fill) }),
        }
    }

    pub fn unlabelled(fill: Rgb, rect: Rect) -> Self {
        DrawSwatch { rect, fill, label: None }
    }
}

/// Cell geometry for a wrapping grid of swatches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStyle {
    pub per_row: usize,
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap: u32,
    pub corner_radius: u32,
}

impl Default for GridStyle {
    /// Eight 100×80 boxes per row with 8px rounded corners.
    fn default() -> Self {
        GridStyle {
            per_row: 8,
            cell_width: 100,
            cell_height: 80,
            gap: 8,
            corner_radius: 8,
        }
    }
}

impl GridStyle {
    /// Single column of small chips, used by the reference table.
    pub fn reference() -> Self {
        GridStyle {
            per_row: 1,
            cell_width: 60,
            cell_height: 25,
            gap: 5,
            corner_radius: 5,
        }
    }

    fn columns(&self) -> usize {
        self.per_row.max(1)
    }

    /// Rectangle of the `index`-th cell, filling rows left to right.
    pub fn cell(&self, index: usize) -> Rect {
        let cols = self.columns();
        let (row, col) = ((index / cols) as u32, (index % cols) as u32);
        Rect {
            x: col * (self.cell_width + self.gap),
            y: row * (self.cell_height + self.gap),
            width: self.cell_width,
            height: self.cell_height,
            corner_radius: self.corner_radius,
        }
    }

    /// Pixel size of a sheet holding `count` cells.
    pub fn sheet_size(&self, count: usize) -> (u32, u32) {
        if count == 0 {
            return (0, 0);
        }
        let cols = count.min(self.columns()) as u32;
        let rows = count.div_ceil(self.columns()) as u32;
        (
            cols * self.cell_width + (cols - 1) * self.gap,
            rows * self.cell_height + (rows - 1) * self.gap,
        )
    }
}

/// Lay out hex-labelled swatches in rows of `style.per_row`.
pub fn swatch_grid(colors: &[Rgb], style: &GridStyle) -> Vec<DrawSwatch> {
    colors
        .iter()
        .enumerate()
        .map(|(i, &c)| DrawSwatch::hex_labelled(c, style.cell(i)))
        .collect()
}

/// Paint swatch fills onto a transparent canvas just large enough to hold
/// them. Labels are not drawn.
pub fn rasterize(swatches: &[DrawSwatch]) -> RgbaImage {
    let width = swatches.iter().map(|s| s.rect.right()).max().unwrap_or(0);
    let height = swatches.iter().map(|s| s.rect.bottom()).max().unwrap_or(0);
    let mut canvas = RgbaImage::new(width, height);
    for s in swatches {
        let fill = Rgba([s.fill.r, s.fill.g, s.fill.b, 255]);
        for py in s.rect.y..s.rect.bottom() {
            for px in s.rect.x..s.rect.right() {
                if s.rect.covers(px, py) {
                    canvas.put_pixel(px, py, fill);
                }
            }
        }
    }
    canvas
}

pub fn encode_png(img: RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(buf)
}
