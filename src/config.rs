//! Request-scoped parameters for palette extraction.
//!
//! Options are plain values passed into every call; nothing is read from
//! process-wide state. They can be built in code or loaded from JSON:
//!
//! ```no_run
//! use image_palette_wasm::ExtractOptions;
//! use std::path::Path;
//!
//! let options = ExtractOptions::from_json_file(Path::new("palette.json"))?;
//! # Ok::<(), image_palette_wasm::Error>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Side of the square the original scripts resize uploads to before clustering.
pub const DEFAULT_RESIZE: u32 = 150;

/// Tuning for the k-means pass and the optional downsample in front of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Seed of the first run; run `i` uses `seed + i`.
    pub seed: u64,
    /// Number of k-means restarts; the lowest-inertia result wins.
    pub runs: usize,
    /// Iteration cap for a single run.
    pub max_iter: usize,
    /// Convergence threshold on centroid movement (RGB scaled to 0..1).
    pub converge: f32,
    /// Downsample images larger than `side × side` to exactly that square.
    /// `None` clusters every pixel of the original.
    pub resize: Option<u32>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            runs: 10,
            max_iter: 300,
            converge: 1e-4,
            resize: Some(DEFAULT_RESIZE),
        }
    }
}

impl ExtractOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: ExtractOptions =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(Error::Config("runs must be at least 1".into()));
        }
        if self.max_iter == 0 {
            return Err(Error::Config("max_iter must be at least 1".into()));
        }
        if !(self.converge.is_finite() && self.converge >= 0.0) {
            return Err(Error::Config(format!("converge must be a non-negative number, got {}", self.converge)));
        }
        if self.resize == Some(0) {
            return Err(Error::Config("resize side must be at least 1".into()));
        }
        Ok(())
    }
}

/// Number of representative colors a user may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ColorCount(usize);

impl ColorCount {
    pub const MIN: usize = 2;
    pub const MAX: usize = 40;
    pub const DEFAULT: ColorCount = ColorCount(20);

    /// Checked constructor; `None` when `k` is outside `[MIN, MAX]`.
    pub fn new(k: usize) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&k).then_some(ColorCount(k))
    }

    /// Slider behavior: any value is pulled into `[MIN, MAX]`.
    pub fn clamped(k: usize) -> Self {
        ColorCount(k.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for ColorCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for ColorCount {
    type Error = Error;

    fn try_from(k: usize) -> Result<Self> {
        ColorCount::new(k).ok_or_else(|| {
            Error::Config(format!(
                "color count must be between {} and {}, got {k}",
                ColorCount::MIN,
                ColorCount::MAX
            ))
        })
    }
}

impl From<ColorCount> for usize {
    fn from(k: ColorCount) -> usize {
        k.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_upload_page() {
        let options = ExtractOptions::default();
        assert_eq!(options.seed, 0);
        assert_eq!(options.runs, 10);
        assert_eq!(options.resize, Some(150));
        assert_eq!(ColorCount::default().get(), 20);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options = ExtractOptions::from_json_str(r#"{ "seed": 7, "resize": null }"#).unwrap();
        assert_eq!(options.seed, 7);
        assert_eq!(options.resize, None);
        assert_eq!(options.runs, 10);
    }

    #[test]
    fn rejects_zero_runs() {
        let err = ExtractOptions::from_json_str(r#"{ "runs": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn color_count_bounds() {
        assert_eq!(ColorCount::new(1), None);
        assert_eq!(ColorCount::new(41), None);
        assert_eq!(ColorCount::new(2).map(ColorCount::get), Some(2));
        assert_eq!(ColorCount::clamped(0).get(), 2);
        assert_eq!(ColorCount::clamped(99).get(), 40);
        assert_eq!(ColorCount::clamped(13).get(), 13);
    }
}
