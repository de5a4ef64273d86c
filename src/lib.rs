//! Representative colors from uploaded images.
//!
//! Pipeline: decode (JPEG / PNG / AVIF) → optional downsample → flatten →
//! k-means or exact unique counting → hex-labelled swatches. The same
//! functions back the browser surface exported through `wasm-bindgen` and
//! the native `palette-cli` binary.

use js_sys::{Array, Object, Reflect, Uint8Array};
use log::info;
use wasm_bindgen::prelude::*;

pub mod cache;
pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod input;
pub mod reference;
pub mod swatch;
pub mod unique;

pub use cache::PaletteCache;
pub use color::Rgb;
pub use config::{ColorCount, ExtractOptions};
pub use error::{Error, Result};
pub use extract::{ColorCluster, extract};
pub use reference::{REFERENCE_COLORS, ReferenceColor, ReferenceRow, reference_rows};
pub use swatch::{DrawSwatch, GridStyle, TextTone, luminance, swatch_grid, text_tone};
pub use unique::{histogram, unique};

/// Decode `input` and cluster it into `n_colors` representative colors.
pub fn extract_palette_bytes(
    input: &[u8],
    n_colors: usize,
    options: &ExtractOptions,
) -> Result<Vec<ColorCluster>> {
    let pixels = input::load_pixels(input, options.resize)?;
    let clusters = extract(&pixels, n_colors, options)?;
    info!("extracted {} colors from {} pixels", clusters.len(), pixels.len());
    Ok(clusters)
}

/// Decode `input` and list its distinct colors in lexicographic order.
pub fn unique_colors_bytes(input: &[u8], options: &ExtractOptions) -> Result<Vec<Rgb>> {
    let pixels = input::load_pixels(input, options.resize)?;
    let colors = unique(&pixels);
    info!("found {} distinct colors in {} pixels", colors.len(), pixels.len());
    Ok(colors)
}

/// Hex-labelled swatches for `clusters`, in order, on the default grid.
pub fn cluster_swatches(clusters: &[ColorCluster]) -> Vec<DrawSwatch> {
    let colors: Vec<Rgb> = clusters.iter().map(|c| c.color).collect();
    swatch_grid(&colors, &GridStyle::default())
}

/// PNG sheet of the cluster colors laid out with the default grid.
pub fn palette_sheet_png(clusters: &[ColorCluster]) -> Result<Vec<u8>> {
    swatch::encode_png(swatch::rasterize(&cluster_swatches(clusters)))
}

// ------------------------------------------------------------
// Browser surface
// ------------------------------------------------------------

fn js_error(err: Error) -> JsValue {
    JsValue::from_str(&err.user_message())
}

fn set(target: &Object, key: &str, value: &JsValue) -> std::result::Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn swatch_object(swatch: &DrawSwatch, share: Option<f32>) -> std::result::Result<Object, JsValue> {
    let obj = Object::new();
    set(&obj, "hex", &JsValue::from_str(&swatch.fill.to_hex()))?;
    set(&obj, "r", &JsValue::from(swatch.fill.r))?;
    set(&obj, "g", &JsValue::from(swatch.fill.g))?;
    set(&obj, "b", &JsValue::from(swatch.fill.b))?;
    set(&obj, "text", &JsValue::from_str(text_tone(swatch.fill).as_str()))?;
    set(&obj, "x", &JsValue::from(swatch.rect.x))?;
    set(&obj, "y", &JsValue::from(swatch.rect.y))?;
    set(&obj, "width", &JsValue::from(swatch.rect.width))?;
    set(&obj, "height", &JsValue::from(swatch.rect.height))?;
    set(&obj, "radius", &JsValue::from(swatch.rect.corner_radius))?;
    if let Some(share) = share {
        set(&obj, "share", &JsValue::from_f64(share as f64))?;
    }
    Ok(obj)
}

/// One page's worth of extraction state: the options and a memo of past
/// results so slider redraws over the same upload are free.
///
/// The memo is never evicted. Call `clear_cache` when the user uploads a
/// new image so results for earlier uploads do not accumulate.
#[wasm_bindgen]
pub struct PaletteSession {
    cache: PaletteCache,
}

impl Default for PaletteSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PaletteSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PaletteSession {
        PaletteSession { cache: PaletteCache::new(ExtractOptions::default()) }
    }

    /// Returns `{ colors: [{hex, r, g, b, text, share, x, y, width, height, radius}], image }`
    /// where `image` is a PNG of the swatch grid. `n_colors` is clamped to 2..=40.
    pub fn extract(&mut self, input: Vec<u8>, n_colors: usize) -> std::result::Result<Object, JsValue> {
        let k = ColorCount::clamped(n_colors).get();
        let clusters = self.cache.get_or_extract(&input, k).map_err(js_error)?;

        let swatches = cluster_swatches(&clusters);
        let colors_js = Array::new();
        for (swatch, cluster) in swatches.iter().zip(&clusters) {
            let obj = swatch_object(swatch, Some(cluster.share))?;
            colors_js.push(&obj);
        }

        let png = swatch::encode_png(swatch::rasterize(&swatches)).map_err(js_error)?;

        let result = Object::new();
        set(&result, "colors", &colors_js)?;
        set(&result, "image", &Uint8Array::from(png.as_slice()))?;
        Ok(result)
    }

    /// Every distinct color as a `#rrggbb` string, sorted.
    pub fn unique(&self, input: Vec<u8>) -> std::result::Result<Array, JsValue> {
        let colors = unique_colors_bytes(&input, self.cache.options()).map_err(js_error)?;
        let out = Array::new();
        for c in colors {
            out.push(&JsValue::from_str(&c.to_hex()));
        }
        Ok(out)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

/// The fixed reference table: `[{name, hex, text, x, y, width, height, radius, ...}]`.
#[wasm_bindgen]
pub fn reference_colors() -> std::result::Result<Array, JsValue> {
    let out = Array::new();
    for row in reference_rows(&GridStyle::reference()) {
        let obj = swatch_object(&row.swatch, None)?;
        set(&obj, "name", &JsValue::from_str(row.name))?;
        out.push(&obj);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_swatches_follow_cluster_order() {
        let clusters = [
            ColorCluster { color: Rgb::new(0, 0, 255), share: 0.75 },
            ColorCluster { color: Rgb::WHITE, share: 0.25 },
        ];
        let swatches = cluster_swatches(&clusters);
        assert_eq!(swatches.len(), 2);
        assert_eq!(swatches[0].fill, Rgb::new(0, 0, 255));
        assert_eq!(swatches[1].rect.x, 108);
        assert_eq!(swatches[1].label.as_ref().map(|l| l.tone), Some(TextTone::Dark));
    }
}
