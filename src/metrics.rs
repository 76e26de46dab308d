use std::collections::BTreeMap;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::SeriesColors;
use crate::config::PlotConfig;
use crate::error::{PlotError, Result};
use crate::render::canvas::{BitmapCanvas, DrawResult, Renderable};
use crate::render::panel::{axis_range, build_chart, Axes, Region};
use crate::render::ANNOTATE;

/// One scalar observation delivered by the training loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub epoch: usize,
    pub metric: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// MetricsAggregator
// ---------------------------------------------------------------------------

/// Per-run accumulator of named metric series, one value per epoch.
///
/// Owned by the training loop for the duration of a run; there is no internal
/// locking, callers with several writer threads must serialize `record`.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    series: BTreeMap<String, Vec<f64>>,
    order: Option<Vec<String>>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the drawing order (colour and z-order) of the series.
    ///
    /// Names never recorded are skipped; recorded names missing from `order`
    /// are drawn after it, lexicographically.
    pub fn with_order<S: AsRef<str>>(mut self, order: &[S]) -> Self {
        self.order = Some(order.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    /// Build an aggregator by replaying `records` in order.
    pub fn from_records<I: IntoIterator<Item = MetricRecord>>(records: I) -> Self {
        let mut agg = Self::new();
        for r in records {
            agg.record(&r.metric, r.epoch, r.value);
        }
        agg
    }

    /// Append `value` to `metric_name`, creating the series on first use.
    ///
    /// `epoch_index` is 1-based; it is only checked against the series length
    /// and logged, never used to place the value.
    pub fn record(&mut self, metric_name: &str, epoch_index: usize, value: f64) {
        let series = self.series.entry(metric_name.to_string()).or_default();
        if epoch_index != series.len() + 1 {
            log::warn!(
                "metric '{metric_name}': got epoch {epoch_index}, expected {}",
                series.len() + 1
            );
        }
        log::trace!("epoch {epoch_index}: {metric_name} = {value}");
        series.push(value);
    }

    pub fn series(&self, metric_name: &str) -> Option<&[f64]> {
        self.series.get(metric_name).map(|v| v.as_slice())
    }

    /// Series names in drawing order.
    pub fn metric_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.series.len());
        if let Some(order) = &self.order {
            for name in order {
                if self.series.contains_key(name) && !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        for name in self.series.keys() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    /// Every value as a record, series in drawing order.
    pub fn records(&self) -> Vec<MetricRecord> {
        self.metric_names()
            .into_iter()
            .flat_map(|name| {
                self.series[name]
                    .iter()
                    .enumerate()
                    .map(move |(i, &value)| MetricRecord {
                        epoch: i + 1,
                        metric: name.to_string(),
                        value,
                    })
            })
            .collect()
    }

    /// Longest series length; a sensible epoch count for a finished run.
    pub fn max_len(&self) -> usize {
        self.series.values().map(|v| v.len()).max().unwrap_or(0)
    }

    /// Check every series covers exactly `epoch_count` epochs and build the chart.
    pub fn comparison_chart(&self, epoch_count: usize) -> Result<ComparisonChart> {
        if self.series.is_empty() {
            return Err(PlotError::EmptyInput("no metrics recorded".to_string()));
        }

        let names = self.metric_names();
        let colors = SeriesColors::new(&names);
        let mut lines = Vec::with_capacity(names.len());

        for (name, color) in colors.legend_entries() {
            let values = &self.series[name.as_str()];
            if values.len() != epoch_count {
                return Err(PlotError::IncompleteSeries {
                    metric: name.clone(),
                    expected: epoch_count,
                    actual: values.len(),
                });
            }
            lines.push(SeriesLine {
                name: name.clone(),
                color: *color,
                values: values.clone(),
            });
        }

        Ok(ComparisonChart { epoch_count, lines })
    }

    /// Draw one line per series against epochs `1..=epoch_count`.
    pub fn render_comparison(&self, epoch_count: usize, output_path: &Path) -> Result<()> {
        self.render_comparison_with(epoch_count, output_path, &PlotConfig::default())
    }

    /// As [`render_comparison`](Self::render_comparison), sized by `config.metrics_size`.
    pub fn render_comparison_with(
        &self,
        epoch_count: usize,
        output_path: &Path,
        config: &PlotConfig,
    ) -> Result<()> {
        let size = config.metrics_size.ensure_drawable("metrics_size")?;
        let chart = self.comparison_chart(epoch_count)?;
        let mut canvas = BitmapCanvas::new(size.width, size.height);
        canvas.draw(Region::full(size.width, size.height), &chart)?;
        canvas.save_png(output_path)
    }
}

// ---------------------------------------------------------------------------
// ComparisonChart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub name: String,
    pub color: RGBColor,
    pub values: Vec<f64>,
}

/// Validated, ordered lines ready to be drawn; index 0 is drawn first.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub epoch_count: usize,
    pub lines: Vec<SeriesLine>,
}

impl Renderable for ComparisonChart {
    fn render<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<(), DB> {
        let axes = Axes::new("Metrics Across Epochs", "Epochs", "Value");
        let x_range = axis_range((1..=self.epoch_count).map(|e| e as f64));
        let y_range = axis_range(self.lines.iter().flat_map(|l| l.values.iter().copied()));
        let mut chart = build_chart(area, &axes, x_range, y_range)?;

        for line in &self.lines {
            let color = line.color;
            chart
                .draw_series(LineSeries::new(
                    line.values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| ((i + 1) as f64, v)),
                    color.stroke_width(2),
                ))?
                .label(line.name.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        if ANNOTATE {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(epochs: usize) -> MetricsAggregator {
        let mut agg = MetricsAggregator::new();
        for e in 1..=epochs {
            agg.record("root_mean_squared_error", e, 10.0 / e as f64);
            agg.record("loss", e, 100.0 / e as f64);
            agg.record("mean_absolute_error", e, 5.0 / e as f64);
        }
        agg
    }

    #[test]
    fn record_creates_and_appends() {
        let agg = filled(3);
        assert_eq!(agg.len(), 3);
        assert_eq!(agg.series("loss").unwrap(), &[100.0, 50.0, 100.0 / 3.0]);
        assert!(agg.series("accuracy").is_none());
        assert_eq!(agg.max_len(), 3);
    }

    #[test]
    fn default_order_is_lexicographic() {
        let agg = filled(1);
        assert_eq!(
            agg.metric_names(),
            vec!["loss", "mean_absolute_error", "root_mean_squared_error"]
        );
    }

    #[test]
    fn caller_order_wins_and_unknowns_are_skipped() {
        let agg = filled(1).with_order(&["root_mean_squared_error", "accuracy", "loss"]);
        assert_eq!(
            agg.metric_names(),
            vec!["root_mean_squared_error", "loss", "mean_absolute_error"]
        );
        let chart = agg.comparison_chart(1).unwrap();
        assert_eq!(chart.lines[0].name, "root_mean_squared_error");
    }

    #[test]
    fn colours_do_not_depend_on_insertion_order() {
        let mut reversed = MetricsAggregator::new();
        for name in ["mean_absolute_error", "loss", "root_mean_squared_error"] {
            reversed.record(name, 1, 1.0);
        }
        let a = filled(1).comparison_chart(1).unwrap();
        let b = reversed.comparison_chart(1).unwrap();
        let names_colors = |c: &ComparisonChart| {
            c.lines
                .iter()
                .map(|l| (l.name.clone(), l.color))
                .collect::<Vec<_>>()
        };
        assert_eq!(names_colors(&a), names_colors(&b));
    }

    #[test]
    fn short_series_is_incomplete() {
        let mut agg = filled(3);
        agg.record("val_loss", 1, 1.0);
        let err = agg.comparison_chart(3).unwrap_err();
        assert!(matches!(
            err,
            PlotError::IncompleteSeries {
                ref metric,
                expected: 3,
                actual: 1,
            } if metric == "val_loss"
        ));
    }

    #[test]
    fn long_series_is_rejected_too() {
        let err = filled(4).comparison_chart(3).unwrap_err();
        assert!(matches!(err, PlotError::IncompleteSeries { actual: 4, .. }));
    }

    #[test]
    fn nothing_recorded_is_empty_input() {
        let err = MetricsAggregator::new().comparison_chart(3).unwrap_err();
        assert!(matches!(err, PlotError::EmptyInput(_)));
    }

    #[test]
    fn records_round_trip_through_json() {
        let agg = filled(2);
        let json = serde_json::to_string(&agg.records()).unwrap();
        let parsed: Vec<MetricRecord> = serde_json::from_str(&json).unwrap();
        let rebuilt = MetricsAggregator::from_records(parsed);
        assert_eq!(rebuilt.metric_names(), agg.metric_names());
        assert_eq!(rebuilt.series("loss"), agg.series("loss"));
    }

    #[test]
    fn clear_drops_all_series() {
        let mut agg = filled(2);
        agg.clear();
        assert!(agg.is_empty());
    }

    #[test]
    fn renders_comparison_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot").join("comparison_metrics.png");
        filled(5).render_comparison(5, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (1000, 500));
    }
}
