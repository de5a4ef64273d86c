//! Exact color counting, the alternative to clustering.

use std::collections::{BTreeMap, HashSet};

use crate::color::Rgb;

/// Every distinct color once, in lexicographic `(r, g, b)` order.
pub fn unique(pixels: &[Rgb]) -> Vec<Rgb> {
    histogram(pixels).into_keys().collect()
}

/// Pixel count per distinct color, keyed in lexicographic order.
pub fn histogram(pixels: &[Rgb]) -> BTreeMap<Rgb, usize> {
    let mut counts = BTreeMap::new();
    for &px in pixels {
        *counts.entry(px).or_insert(0) += 1;
    }
    counts
}

pub(crate) fn distinct_count(pixels: &[Rgb]) -> usize {
    pixels.iter().collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_without_duplicates() {
        let pixels = [
            Rgb::new(9, 0, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(9, 0, 0),
            Rgb::new(0, 0, 1),
        ];
        assert_eq!(
            unique(&pixels),
            vec![Rgb::new(0, 0, 1), Rgb::new(0, 0, 255), Rgb::new(9, 0, 0)]
        );
    }

    #[test]
    fn never_larger_than_the_image() {
        let pixels: Vec<Rgb> = (0..64u8).map(|i| Rgb::new(i % 5, i % 3, 0)).collect();
        let colors = unique(&pixels);
        assert!(colors.len() <= pixels.len());
        assert_eq!(colors.len(), distinct_count(&pixels));
        assert!(colors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn histogram_counts_every_pixel() {
        let pixels = [Rgb::WHITE, Rgb::BLACK, Rgb::WHITE];
        let counts = histogram(&pixels);
        assert_eq!(counts[&Rgb::WHITE], 2);
        assert_eq!(counts[&Rgb::BLACK], 1);
        assert_eq!(counts.values().sum::<usize>(), pixels.len());
    }

    #[test]
    fn empty_input() {
        assert!(unique(&[]).is_empty());
    }
}
