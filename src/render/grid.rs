use std::path::Path;

use super::canvas::BitmapCanvas;
use super::panel::{Panel, PanelSink, Region, DEFAULT_BUCKETS};
use crate::config::{CanvasSize, PlotConfig};
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Grid – the laid-out pair plot
// ---------------------------------------------------------------------------

/// One panel and where it lands on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub region: Region,
    pub panel: Panel,
}

/// K×K pair plot: histograms on the diagonal, scatters elsewhere.
///
/// Columns run left to right. Row 0 is the **bottom** row of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    labels: Vec<String>,
    tile: u32,
    placements: Vec<Placement>,
}

impl Grid {
    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Placements in row-major order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, row: usize, col: usize) -> Option<&Placement> {
        self.placements.get(row * self.dimension() + col)
    }

    /// Canvas edge length: `tile * dimension`.
    pub fn canvas_size(&self) -> (u32, u32) {
        let edge = self.tile * self.dimension() as u32;
        (edge, edge)
    }
}

/// Lay out the pair plot for `columns` without drawing anything.
///
/// Cell (row, col) is a histogram of column `col` when `row == col`, else a
/// scatter with x from column `col` and y from column `row`.
pub fn compose_pair_grid<S, V>(
    columns: &[(S, V)],
    tile: u32,
    bucket_count: usize,
) -> Result<Grid>
where
    S: AsRef<str>,
    V: AsRef<[f64]>,
{
    if columns.is_empty() {
        return Err(PlotError::EmptyInput("pair grid needs at least one column".to_string()));
    }

    let k = columns.len();
    let mut placements = Vec::with_capacity(k * k);

    for (row, (y_name, y_values)) in columns.iter().enumerate() {
        for (col, (x_name, x_values)) in columns.iter().enumerate() {
            let (x_name, y_name) = (x_name.as_ref(), y_name.as_ref());
            let panel = if row == col {
                Panel::histogram(x_values.as_ref(), x_name, bucket_count)?
            } else {
                Panel::scatter(x_values.as_ref(), y_values.as_ref(), x_name, y_name)?
            };

            let region = Region::new(
                col as u32 * tile,
                (k - row - 1) as u32 * tile,
                tile,
                tile,
            );
            placements.push(Placement {
                row,
                col,
                region,
                panel,
            });
        }
    }

    Ok(Grid {
        labels: columns.iter().map(|(n, _)| n.as_ref().to_string()).collect(),
        tile,
        placements,
    })
}

/// Issue one draw call per placement.
pub fn draw_grid<P: PanelSink + ?Sized>(sink: &mut P, grid: &Grid) -> Result<()> {
    for placement in grid.placements() {
        sink.draw_panel(placement.region, &placement.panel)?;
    }
    Ok(())
}

/// Render the pair plot of `columns` to `output_path` with default geometry.
pub fn render_pair_grid<S, V>(columns: &[(S, V)], output_path: &Path) -> Result<()>
where
    S: AsRef<str>,
    V: AsRef<[f64]>,
{
    render_pair_grid_with(columns, output_path, &PlotConfig::default())
}

/// Render the pair plot using the tile size and bucket count of `config`.
pub fn render_pair_grid_with<S, V>(
    columns: &[(S, V)],
    output_path: &Path,
    config: &PlotConfig,
) -> Result<()>
where
    S: AsRef<str>,
    V: AsRef<[f64]>,
{
    let bucket_count = if config.bucket_count == 0 {
        DEFAULT_BUCKETS
    } else {
        config.bucket_count
    };
    let tile = CanvasSize::new(config.tile_size, config.tile_size).ensure_drawable("tile_size")?;
    let grid = compose_pair_grid(columns, tile.width, bucket_count)?;
    let (width, height) = grid.canvas_size();
    log::debug!(
        "rendering {0}×{0} pair grid on a {width}×{height} canvas",
        grid.dimension()
    );

    let mut canvas = BitmapCanvas::new(width, height);
    draw_grid(&mut canvas, &grid)?;
    canvas.save_png(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::panel::PanelKind;

    fn columns() -> Vec<(&'static str, Vec<f64>)> {
        vec![
            ("miles", vec![1.0, 2.0, 3.0]),
            ("seconds", vec![60.0, f64::NAN, 200.0]),
            ("fare", vec![5.0, 7.0, 9.5]),
        ]
    }

    #[test]
    fn diagonal_is_histogram_rest_is_scatter() {
        let grid = compose_pair_grid(&columns(), 100, 16).unwrap();
        assert_eq!(grid.dimension(), 3);
        assert_eq!(grid.placements().len(), 9);
        for p in grid.placements() {
            let expected = if p.row == p.col {
                PanelKind::Histogram
            } else {
                PanelKind::Scatter
            };
            assert_eq!(p.panel.kind(), expected, "cell ({}, {})", p.row, p.col);
        }
    }

    #[test]
    fn x_follows_column_and_y_follows_row() {
        let grid = compose_pair_grid(&columns(), 100, 16).unwrap();
        let cell = grid.placement(0, 2).unwrap();
        assert_eq!(cell.panel.axes().x_label, "fare");
        assert_eq!(cell.panel.axes().y_label, "miles");
        assert_eq!(cell.panel.points()[1], (7.0, 2.0));

        // NaN in "seconds" shows up as 0 rather than being dropped.
        let cell = grid.placement(1, 0).unwrap();
        assert_eq!(cell.panel.points()[1], (2.0, 0.0));
    }

    #[test]
    fn row_zero_is_the_bottom_row() {
        let grid = compose_pair_grid(&columns(), 100, 16).unwrap();
        assert_eq!(grid.canvas_size(), (300, 300));
        assert_eq!(grid.placement(0, 0).unwrap().region, Region::new(0, 200, 100, 100));
        assert_eq!(grid.placement(0, 2).unwrap().region, Region::new(200, 200, 100, 100));
        assert_eq!(grid.placement(2, 0).unwrap().region, Region::new(0, 0, 100, 100));
        assert_eq!(grid.placement(1, 1).unwrap().region, Region::new(100, 100, 100, 100));
    }

    #[test]
    fn default_config_gives_sixteen_buckets() {
        let config = PlotConfig::default();
        let grid = compose_pair_grid(&columns(), config.tile_size, config.bucket_count).unwrap();
        for i in 0..grid.dimension() {
            match &grid.placement(i, i).unwrap().panel {
                Panel::Histogram { bucket_count, .. } => assert_eq!(*bucket_count, 16),
                other => panic!("diagonal cell ({i}, {i}) is {:?}", other.kind()),
            }
        }
        assert_eq!(grid.canvas_size(), (1200, 1200));
    }

    #[test]
    fn zero_tile_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let config = PlotConfig {
            tile_size: 0,
            ..PlotConfig::default()
        };
        let err = render_pair_grid_with(&columns(), &path, &config).unwrap_err();
        assert!(matches!(err, PlotError::InvalidConfig(_)));
        assert!(!path.exists());
    }

    #[test]
    fn empty_and_mismatched_input_fail() {
        let none: Vec<(&str, Vec<f64>)> = Vec::new();
        assert!(matches!(
            compose_pair_grid(&none, 100, 16),
            Err(PlotError::EmptyInput(_))
        ));

        let ragged = vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])];
        assert!(matches!(
            compose_pair_grid(&ragged, 100, 16),
            Err(PlotError::LengthMismatch { .. })
        ));
    }
}
