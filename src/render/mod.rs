//! Chart rendering on top of the plotters bitmap backend.
//!
//! ```text
//!   Panel (scatter | histogram | scatter+line)
//!        │  PanelSink::draw_panel(region, panel)
//!        ▼
//!   BitmapCanvas ──► save_png ──► plot/*.png
//!        ▲
//!   grid::draw_grid (K×K placements)   overlay (one full-canvas panel)
//! ```

pub mod canvas;
pub mod grid;
pub mod overlay;
pub mod panel;

pub use canvas::{ensure_dir, BitmapCanvas, Renderable};
pub use grid::{
    compose_pair_grid, draw_grid, render_pair_grid, render_pair_grid_with, Grid, Placement,
};
pub use overlay::{model_fit_panel, render_data_plot, render_model_fit, render_model_fit_with};
pub use panel::{
    draw_histogram, draw_scatter, draw_scatter_with_line, Axes, HistogramBins, Panel, PanelKind,
    PanelSink, Region, DEFAULT_BUCKETS,
};

/// Titles, axis captions and legends need a font backend.
pub(crate) const ANNOTATE: bool = cfg!(feature = "ttf");

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(feature = "ttf")]
    #[allow(clippy::assertions_on_constants)]
    fn default_build_draws_text() {
        assert!(super::ANNOTATE);
    }
}
