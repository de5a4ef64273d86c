//! Representative colors by k-means clustering.
//!
//! Pixels are clustered in sRGB (channels scaled to 0..1) with
//! `kmeans_colors`. Several seeded restarts are run and the one with the
//! lowest inertia (sum of squared distances to assigned centroids) is kept,
//! so the result is a pure function of the pixels, `k` and the options.

use kmeans_colors::{Kmeans, get_kmeans};
use log::debug;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::ExtractOptions;
use crate::error::{Error, Result};
use crate::unique::distinct_count;

/// One centroid and the fraction of pixels assigned to it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorCluster {
    pub color: Rgb,
    pub share: f32,
}

/// Partition `pixels` into `k` clusters and return their mean colors.
///
/// Clusters are ordered by descending share, ties by color. Fails with
/// [`Error::TooFewColors`] when the pixels hold fewer than `k` distinct
/// values rather than returning duplicated centroids.
pub fn extract(pixels: &[Rgb], k: usize, options: &ExtractOptions) -> Result<Vec<ColorCluster>> {
    if pixels.is_empty() {
        return Err(Error::EmptyImage);
    }
    if k == 0 || k > u8::MAX as usize {
        return Err(Error::InvalidColorCount(k));
    }
    options.validate()?;

    let distinct = distinct_count(pixels);
    if distinct < k {
        return Err(Error::TooFewColors { requested: k, distinct });
    }

    let buf: Vec<Srgb<f32>> = pixels
        .iter()
        .map(|&c| Srgb::<u8>::from(c).into_format::<f32>())
        .collect();

    let best = best_run(&buf, k, options);

    let mut counts = vec![0usize; best.centroids.len()];
    for &idx in &best.indices {
        counts[idx as usize] += 1;
    }

    let total = pixels.len() as f32;
    let mut clusters: Vec<ColorCluster> = best
        .centroids
        .iter()
        .zip(&counts)
        .map(|(&centroid, &count)| ColorCluster {
            color: Rgb::from(centroid.into_format::<u8>()),
            share: count as f32 / total,
        })
        .collect();

    clusters.sort_by(|a, b| b.share.total_cmp(&a.share).then(a.color.cmp(&b.color)));
    Ok(clusters)
}

fn best_run(buf: &[Srgb<f32>], k: usize, options: &ExtractOptions) -> Kmeans<Srgb<f32>> {
    let mut best: Option<(f32, Kmeans<Srgb<f32>>)> = None;
    for run in 0..options.runs {
        let seed = options.seed.wrapping_add(run as u64);
        let result = get_kmeans(k, options.max_iter, options.converge, false, buf, seed);
        let score = inertia(buf, &result);
        debug!("k-means run {run} (seed {seed}): inertia {score}");
        // Strict comparison keeps the earliest run on ties.
        if best.as_ref().is_none_or(|(b, _)| score < *b) {
            best = Some((score, result));
        }
    }
    match best {
        Some((_, result)) => result,
        // `validate` rejects zero runs; fall back to a single run anyway.
        None => get_kmeans(k, options.max_iter, options.converge, false, buf, options.seed),
    }
}

/// Sum of squared distances from each pixel to its assigned centroid.
fn inertia(buf: &[Srgb<f32>], result: &Kmeans<Srgb<f32>>) -> f32 {
    buf.iter()
        .zip(&result.indices)
        .map(|(px, &idx)| {
            let c = result.centroids[idx as usize];
            let (dr, dg, db) = (px.red - c.red, px.green - c.green, px.blue - c.blue);
            dr * dr + dg * dg + db * db
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ExtractOptions {
        ExtractOptions { runs: 3, ..ExtractOptions::default() }
    }

    fn colors(clusters: &[ColorCluster]) -> Vec<Rgb> {
        let mut v: Vec<Rgb> = clusters.iter().map(|c| c.color).collect();
        v.sort();
        v
    }

    #[test]
    fn two_by_two_red_blue() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let clusters = extract(&[red, red, blue, blue], 2, &options()).unwrap();
        assert_eq!(colors(&clusters), vec![blue, red]);
        assert!(clusters.iter().all(|c| (c.share - 0.5).abs() < 1e-6));
    }

    #[test]
    fn centroid_is_the_rounded_mean() {
        let pixels = [
            Rgb::new(10, 20, 30),
            Rgb::new(12, 20, 30),
            Rgb::new(250, 240, 230),
            Rgb::new(250, 240, 230),
            Rgb::new(250, 240, 230),
        ];
        let clusters = extract(&pixels, 2, &options()).unwrap();
        assert_eq!(colors(&clusters), vec![Rgb::new(11, 20, 30), Rgb::new(250, 240, 230)]);
        assert_eq!(clusters[0].color, Rgb::new(250, 240, 230));
    }

    #[test]
    fn returns_exactly_k_and_is_deterministic() {
        let pixels: Vec<Rgb> = (0..400u32)
            .map(|i| Rgb::new((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8))
            .collect();
        for k in [2, 5, 20] {
            let a = extract(&pixels, k, &options()).unwrap();
            let b = extract(&pixels, k, &options()).unwrap();
            assert_eq!(a.len(), k);
            assert_eq!(a, b);
            let total: f32 = a.iter().map(|c| c.share).sum();
            assert!((total - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn ordered_by_share() {
        let mut pixels = vec![Rgb::new(0, 255, 0); 6];
        pixels.extend([Rgb::new(0, 0, 0); 2]);
        let clusters = extract(&pixels, 2, &options()).unwrap();
        assert_eq!(clusters[0].color, Rgb::new(0, 255, 0));
        assert!(clusters[0].share > clusters[1].share);
    }

    #[test]
    fn serialized_cluster_includes_hex() {
        let cluster = ColorCluster { color: Rgb::new(154, 205, 50), share: 0.5 };
        let json = serde_json::to_value(cluster).unwrap();
        assert_eq!(json["color"]["hex"], "#9acd32");
        assert_eq!(json["share"], 0.5);
    }

    #[test]
    fn too_few_distinct_colors() {
        let pixels = [Rgb::WHITE, Rgb::WHITE, Rgb::BLACK];
        let err = extract(&pixels, 3, &options()).unwrap_err();
        assert!(matches!(err, Error::TooFewColors { requested: 3, distinct: 2 }));
    }

    #[test]
    fn rejects_empty_and_zero() {
        assert!(matches!(extract(&[], 2, &options()), Err(Error::EmptyImage)));
        assert!(matches!(extract(&[Rgb::WHITE], 0, &options()), Err(Error::InvalidColorCount(0))));
        assert!(matches!(extract(&[Rgb::WHITE], 300, &options()), Err(Error::InvalidColorCount(300))));
    }
}
