use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PlotError;
use crate::render::panel::DEFAULT_BUCKETS;

/// Pixel dimensions of a rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        CanvasSize { width, height }
    }

    /// Fails with [`PlotError::InvalidConfig`] when either side is zero.
    pub fn ensure_drawable(self, setting: &str) -> crate::error::Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::InvalidConfig(format!(
                "{setting} must be at least 1×1 pixels, got {}×{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Plot configuration
// ---------------------------------------------------------------------------

/// Output location and geometry shared by every renderer.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Directory all images are written to.
    pub output_dir: PathBuf,
    /// Edge length of one pair-grid panel.
    pub tile_size: u32,
    /// Model overlay and data scatter canvas.
    pub model_size: CanvasSize,
    /// Metrics comparison canvas.
    pub metrics_size: CanvasSize,
    /// Histogram buckets on the pair-grid diagonal.
    pub bucket_count: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plot"),
            tile_size: 400,
            model_size: CanvasSize::new(800, 400),
            metrics_size: CanvasSize::new(1000, 500),
            bucket_count: DEFAULT_BUCKETS,
        }
    }
}

impl PlotConfig {
    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).context("parsing plot config")
    }

    /// `<output_dir>/data_<l1>_<l2>_..._<lN>.png`
    pub fn pair_grid_path<S: AsRef<str>>(&self, labels: &[S]) -> PathBuf {
        let joined: Vec<&str> = labels.iter().map(|l| l.as_ref()).collect();
        self.output_dir.join(format!("data_{}.png", joined.join("_")))
    }

    /// `<output_dir>/model_plot.png`
    pub fn model_plot_path(&self) -> PathBuf {
        self.output_dir.join("model_plot.png")
    }

    /// `<output_dir>/comparison_metrics.png`
    pub fn metrics_path(&self) -> PathBuf {
        self.output_dir.join("comparison_metrics.png")
    }

    /// `<output_dir>/data_<feature>_<label>.png`
    pub fn data_plot_path(&self, feature: &str, label: &str) -> PathBuf {
        self.output_dir.join(format!("data_{feature}_{label}.png"))
    }
}
