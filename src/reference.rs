//! Fixed table of well-known colors shown next to extracted palettes.

use serde::Serialize;

use crate::color::Rgb;
use crate::swatch::{DrawSwatch, GridStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReferenceColor {
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: Rgb,
}

const fn entry(name: &'static str, hex: &'static str, r: u8, g: u8, b: u8) -> ReferenceColor {
    ReferenceColor { name, hex, rgb: Rgb::new(r, g, b) }
}

pub const REFERENCE_COLORS: [ReferenceColor; 9] = [
    entry("red", "#ff0000", 255, 0, 0),
    entry("blue", "#0000ff", 0, 0, 255),
    entry("yellow", "#ffff00", 255, 255, 0),
    entry("green", "#008000", 0, 128, 0),
    entry("yellow-green", "#9acd32", 154, 205, 50),
    entry("purple", "#800080", 128, 0, 128),
    entry("orange", "#ffa500", 255, 165, 0),
    entry("dark-orange", "#ff8c00", 255, 140, 0),
    entry("brown", "#8b4513", 139, 69, 19),
];

/// One table row: a chip, then the name and hex columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReferenceRow {
    pub swatch: DrawSwatch,
    pub name: &'static str,
    pub hex: &'static str,
}

pub fn reference_rows(style: &GridStyle) -> Vec<ReferenceRow> {
    REFERENCE_COLORS
        .iter()
        .enumerate()
        .map(|(i, c)| ReferenceRow {
            swatch: DrawSwatch::unlabelled(c.rgb, style.cell(i)),
            name: c.name,
            hex: c.hex,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_rgb_agree() {
        for c in &REFERENCE_COLORS {
            assert_eq!(Rgb::from_hex(c.hex).unwrap(), c.rgb, "{}", c.name);
            assert_eq!(c.rgb.to_hex(), c.hex);
        }
    }

    #[test]
    fn always_nine_rows_in_one_column() {
        let rows = reference_rows(&GridStyle::reference());
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.swatch.rect.x == 0 && r.swatch.label.is_none()));
        assert_eq!(rows[8].name, "brown");
        assert_eq!(rows[8].swatch.rect.y, 8 * 30);
    }
}
