//! Statistics and charts for tabular numeric data and regression training runs.
//!
//! * [`stats`] – correlation matrix and per-column summaries of a [`TableView`]
//! * [`render`] – pair-plot grid, model overlay, single panels
//! * [`metrics`] – per-epoch metric series and their comparison chart
//!
//! Images are written as PNG; directories are created on demand.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod render;
pub mod stats;

pub use config::{CanvasSize, PlotConfig};
pub use data::{Column, TableView};
pub use error::{PlotError, Result};
pub use metrics::{MetricRecord, MetricsAggregator};
pub use render::{render_model_fit, render_pair_grid, Panel, PanelKind, PanelSink, Region};
pub use stats::{compute_correlation_matrix, describe, CorrelationMatrix};
