use std::path::Path;

use super::canvas::BitmapCanvas;
use super::panel::{Panel, PanelSink, Region};
use crate::config::PlotConfig;
use crate::error::{PlotError, Result};

/// Scatter of `(xs[i], ys[i])` with the fitted line `weight * x + bias`.
///
/// The line is sampled at exactly the x values in `xs`, so it spans the same
/// domain as the data.
pub fn model_fit_panel(
    xs: &[f64],
    ys: &[f64],
    weight: f64,
    bias: f64,
    x_label: &str,
    y_label: &str,
) -> Result<Panel> {
    if xs.len() != ys.len() {
        return Err(PlotError::length_mismatch(
            format!("model fit {x_label}/{y_label}"),
            xs.len(),
            ys.len(),
        ));
    }
    Ok(Panel::scatter_with_line(xs, ys, weight, bias, x_label, y_label)?.with_title("Model Plot"))
}

/// Render the model overlay to `output_path` on the default canvas.
pub fn render_model_fit(
    xs: &[f64],
    ys: &[f64],
    weight: f64,
    bias: f64,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    let panel = model_fit_panel(xs, ys, weight, bias, x_label, y_label)?;
    render_single(&panel, output_path, &PlotConfig::default())
}

/// As [`render_model_fit`], sized by `config.model_size`.
#[allow(clippy::too_many_arguments)]
pub fn render_model_fit_with(
    xs: &[f64],
    ys: &[f64],
    weight: f64,
    bias: f64,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    let panel = model_fit_panel(xs, ys, weight, bias, x_label, y_label)?;
    render_single(&panel, output_path, config)
}

/// Plain feature/label scatter, without a model line.
pub fn render_data_plot(
    xs: &[f64],
    ys: &[f64],
    feature: &str,
    label: &str,
    output_path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    let panel = Panel::scatter(xs, ys, feature, label)?.with_title("Data Plot");
    render_single(&panel, output_path, config)
}

fn render_single(panel: &Panel, output_path: &Path, config: &PlotConfig) -> Result<()> {
    let size = config.model_size.ensure_drawable("model_size")?;
    let mut canvas = BitmapCanvas::new(size.width, size.height);
    canvas.draw_panel(Region::full(size.width, size.height), panel)?;
    canvas.save_png(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_passes_through_each_sample() {
        let panel =
            model_fit_panel(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], 2.0, 1.0, "x", "y").unwrap();
        let line = panel.line_points().unwrap();
        let expected = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        assert_eq!(line.len(), expected.len());
        for ((x, y), (ex, ey)) in line.iter().zip(expected) {
            assert!((x - ex).abs() < 1e-12);
            assert!((y - ey).abs() < 1e-12);
        }
        assert_eq!(panel.axes().title, "Model Plot");
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = model_fit_panel(&[0.0, 1.0], &[1.0], 2.0, 1.0, "x", "y").unwrap_err();
        assert!(matches!(
            err,
            PlotError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn writes_fixed_size_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot").join("model_plot.png");
        render_model_fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], 2.0, 1.0, "x", "y", &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (800, 400));
    }

    #[test]
    fn zero_model_size_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig {
            output_dir: dir.path().to_path_buf(),
            model_size: crate::config::CanvasSize::new(800, 0),
            ..PlotConfig::default()
        };
        let path = config.model_plot_path();
        let err = render_model_fit_with(&[1.0], &[2.0], 1.0, 0.0, "x", "y", &path, &config)
            .unwrap_err();
        assert!(matches!(err, PlotError::InvalidConfig(_)));
        assert!(!path.exists());
    }

    #[test]
    fn data_plot_uses_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlotConfig::default();
        config.output_dir = dir.path().to_path_buf();
        config.model_size = crate::config::CanvasSize::new(320, 160);

        let path = config.data_plot_path("miles", "fare");
        render_data_plot(&[1.0, 2.0], &[3.0, 4.0], "miles", "fare", &path, &config).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (320, 160));
    }
}
