use std::ops::Range;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::canvas::{DrawResult, Renderable};
use super::ANNOTATE;
use crate::error::{PlotError, Result};

/// Histogram buckets used when the caller does not choose a count.
pub const DEFAULT_BUCKETS: usize = 16;

const MARKER_RADIUS: i32 = 2;
const POINT_COLOR: RGBColor = RGBColor(0, 0, 255);
const HIST_FILL: RGBColor = RGBColor(100, 150, 200);
const LINE_COLOR: RGBColor = RGBColor(220, 50, 47);

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Pixel rectangle on a canvas, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width × height` canvas.
    pub const fn full(width: u32, height: u32) -> Self {
        Region::new(0, 0, width, height)
    }
}

/// Title and axis captions of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Axes {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Axes {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Panel – one chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Scatter,
    Histogram,
    ScatterWithLine,
}

/// A single chart, ready to be drawn into a [`Region`].
///
/// Constructors replace `NaN` inputs with `0.0`: missing cells stay visible
/// at the axis origin instead of silently changing the point count.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Scatter {
        points: Vec<(f64, f64)>,
        axes: Axes,
    },
    Histogram {
        values: Vec<f64>,
        bucket_count: usize,
        axes: Axes,
    },
    ScatterWithLine {
        points: Vec<(f64, f64)>,
        slope: f64,
        intercept: f64,
        axes: Axes,
    },
}

impl Panel {
    pub fn scatter(xs: &[f64], ys: &[f64], x_label: &str, y_label: &str) -> Result<Self> {
        Ok(Panel::Scatter {
            points: paired_points(xs, ys)?,
            axes: Axes::new(format!("{y_label} vs {x_label}"), x_label, y_label),
        })
    }

    pub fn histogram(values: &[f64], label: &str, bucket_count: usize) -> Result<Self> {
        if values.is_empty() {
            return Err(PlotError::EmptyInput(format!("histogram of '{label}'")));
        }
        if bucket_count == 0 {
            return Err(PlotError::InvalidBucketCount);
        }
        Ok(Panel::Histogram {
            values: substitute_nan(values),
            bucket_count,
            axes: Axes::new(format!("Distribution of {label}"), label, "Count"),
        })
    }

    pub fn scatter_with_line(
        xs: &[f64],
        ys: &[f64],
        slope: f64,
        intercept: f64,
        x_label: &str,
        y_label: &str,
    ) -> Result<Self> {
        Ok(Panel::ScatterWithLine {
            points: paired_points(xs, ys)?,
            slope,
            intercept,
            axes: Axes::new(format!("{y_label} vs {x_label}"), x_label, y_label),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        match &mut self {
            Panel::Scatter { axes, .. }
            | Panel::Histogram { axes, .. }
            | Panel::ScatterWithLine { axes, .. } => axes.title = title.into(),
        }
        self
    }

    pub fn kind(&self) -> PanelKind {
        match self {
            Panel::Scatter { .. } => PanelKind::Scatter,
            Panel::Histogram { .. } => PanelKind::Histogram,
            Panel::ScatterWithLine { .. } => PanelKind::ScatterWithLine,
        }
    }

    pub fn axes(&self) -> &Axes {
        match self {
            Panel::Scatter { axes, .. }
            | Panel::Histogram { axes, .. }
            | Panel::ScatterWithLine { axes, .. } => axes,
        }
    }

    /// Scatter points; empty for a histogram.
    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            Panel::Scatter { points, .. } | Panel::ScatterWithLine { points, .. } => points,
            Panel::Histogram { .. } => &[],
        }
    }

    /// The fitted line sampled at every point's x, in point order.
    pub fn line_points(&self) -> Option<Vec<(f64, f64)>> {
        match self {
            Panel::ScatterWithLine {
                points,
                slope,
                intercept,
                ..
            } => Some(
                points
                    .iter()
                    .map(|&(x, _)| (x, slope * x + intercept))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Copy of `values` with every `NaN` replaced by `0.0`.
pub fn substitute_nan(values: &[f64]) -> Vec<f64> {
    let replaced = values.iter().filter(|v| v.is_nan()).count();
    if replaced > 0 {
        log::debug!("plotting {replaced} NaN value(s) as 0");
    }
    values
        .iter()
        .map(|&v| if v.is_nan() { 0.0 } else { v })
        .collect()
}

fn paired_points(xs: &[f64], ys: &[f64]) -> Result<Vec<(f64, f64)>> {
    if xs.len() != ys.len() {
        return Err(PlotError::length_mismatch("scatter x/y", xs.len(), ys.len()));
    }
    if xs.is_empty() {
        return Err(PlotError::EmptyInput("scatter has no points".to_string()));
    }
    Ok(substitute_nan(xs)
        .into_iter()
        .zip(substitute_nan(ys))
        .collect())
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Equal-width buckets spanning `[min, max]` of the input.
///
/// The maximum lands in the last bucket. A constant input is centred in a
/// unit-wide range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    lower: f64,
    width: f64,
    counts: Vec<usize>,
}

impl HistogramBins {
    pub fn from_values(values: &[f64], bucket_count: usize) -> Self {
        let n = bucket_count.max(1);
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        let (lower, width) = if !min.is_finite() {
            (0.0, 1.0 / n as f64)
        } else if max == min {
            (min - 0.5, 1.0 / n as f64)
        } else {
            (min, (max - min) / n as f64)
        };

        let mut counts = vec![0usize; n];
        for &v in values.iter().filter(|v| !v.is_nan()) {
            let idx = (((v - lower) / width).floor().max(0.0) as usize).min(n - 1);
            counts[idx] += 1;
        }

        HistogramBins {
            lower,
            width,
            counts,
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.lower + self.width * self.counts.len() as f64
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left edge, right edge, count)` for every bucket.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &c)| {
            let lo = self.lower + self.width * i as f64;
            (lo, lo + self.width, c)
        })
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Anything that can receive panels: the bitmap canvas, or a recorder in tests.
pub trait PanelSink {
    fn draw_panel(&mut self, region: Region, panel: &Panel) -> Result<()>;
}

/// Scatter of `(xs[i], ys[i])` into `region`.
pub fn draw_scatter<S: PanelSink + ?Sized>(
    sink: &mut S,
    region: Region,
    xs: &[f64],
    ys: &[f64],
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    let panel = Panel::scatter(xs, ys, x_label, y_label)?;
    sink.draw_panel(region, &panel)
}

/// Histogram of `values` into `region`.
pub fn draw_histogram<S: PanelSink + ?Sized>(
    sink: &mut S,
    region: Region,
    values: &[f64],
    label: &str,
    bucket_count: usize,
) -> Result<()> {
    let panel = Panel::histogram(values, label, bucket_count)?;
    sink.draw_panel(region, &panel)
}

/// Scatter plus the line `slope * x + intercept` sampled at every x.
#[allow(clippy::too_many_arguments)]
pub fn draw_scatter_with_line<S: PanelSink + ?Sized>(
    sink: &mut S,
    region: Region,
    xs: &[f64],
    ys: &[f64],
    slope: f64,
    intercept: f64,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    let panel = Panel::scatter_with_line(xs, ys, slope, intercept, x_label, y_label)?;
    sink.draw_panel(region, &panel)
}

/// Padded axis range over the finite values; never empty.
pub(crate) fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return -1.0..1.0;
    }
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = span * 0.05;
    (lo - pad)..(hi + pad)
}

pub(crate) type XyChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Chart with captions when text is enabled, or a plain frame otherwise.
pub(crate) fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    axes: &Axes,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> DrawResult<XyChart<'a, DB>, DB> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if ANNOTATE {
        builder
            .caption(&axes.title, ("sans-serif", 18))
            .x_label_area_size(35)
            .y_label_area_size(50);
    }
    let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

    if ANNOTATE {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(axes.x_label.as_str())
            .y_desc(axes.y_label.as_str())
            .draw()?;
    } else {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x_range.start, y_range.start), (x_range.end, y_range.end)],
            BLACK.stroke_width(1),
        )))?;
    }
    Ok(chart)
}

fn draw_points<DB: DrawingBackend>(
    chart: &mut XyChart<'_, DB>,
    points: &[(f64, f64)],
) -> DrawResult<(), DB> {
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), MARKER_RADIUS, POINT_COLOR.filled())),
    )?;
    Ok(())
}

impl Renderable for Panel {
    fn render<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<(), DB> {
        match self {
            Panel::Scatter { points, axes } => {
                let x_range = axis_range(points.iter().map(|p| p.0));
                let y_range = axis_range(points.iter().map(|p| p.1));
                let mut chart = build_chart(area, axes, x_range, y_range)?;
                draw_points(&mut chart, points)?;
            }
            Panel::Histogram {
                values,
                bucket_count,
                axes,
            } => {
                let bins = HistogramBins::from_values(values, *bucket_count);
                let top = (bins.max_count().max(1) as f64) * 1.1;
                let mut chart = build_chart(area, axes, bins.lower()..bins.upper(), 0.0..top)?;
                chart.draw_series(bins.buckets().map(|(lo, hi, count)| {
                    Rectangle::new([(lo, 0.0), (hi, count as f64)], HIST_FILL.filled())
                }))?;
            }
            Panel::ScatterWithLine { axes, .. } => {
                let points = self.points();
                let line = self.line_points().unwrap_or_default();
                let x_range = axis_range(points.iter().map(|p| p.0));
                let y_range = axis_range(points.iter().chain(&line).map(|p| p.1));
                let mut chart = build_chart(area, axes, x_range, y_range)?;
                draw_points(&mut chart, points)?;
                chart.draw_series(LineSeries::new(line, LINE_COLOR.stroke_width(2)))?;
            }
        }
        Ok(())
    }
}
