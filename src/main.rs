use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use rusty_pairplot::data::loader::load_file;
use rusty_pairplot::metrics::{MetricRecord, MetricsAggregator};
use rusty_pairplot::render::{render_data_plot, render_model_fit_with, render_pair_grid_with};
use rusty_pairplot::stats::{compute_correlation_matrix, describe};
use rusty_pairplot::PlotConfig;

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "rusty-pairplot")]
#[command(
    about = "Summarize a numeric table: correlation matrix, pair plot, model fit and metrics charts"
)]
#[command(version)]
struct Cli {
    /// Table to analyse (.csv, .json or .parquet)
    file: PathBuf,

    /// Columns to include, comma separated (default: every column)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// JSON file with plot settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the images are written to (overrides the config)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Feature column for the data / model plot
    #[arg(long, requires = "fit_label")]
    fit_feature: Option<String>,

    /// Label column for the data / model plot
    #[arg(long, requires = "fit_feature")]
    fit_label: Option<String>,

    /// Learned weight of the single-feature model
    #[arg(long, allow_hyphen_values = true, requires = "bias")]
    weight: Option<f64>,

    /// Learned bias of the single-feature model
    #[arg(long, allow_hyphen_values = true, requires = "weight")]
    bias: Option<f64>,

    /// JSON array of {"epoch", "metric", "value"} records to chart
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Epoch count for the metrics chart (default: longest series)
    #[arg(long)]
    epochs: Option<usize>,

    /// Drawing order of the metric series, comma separated
    #[arg(long, value_delimiter = ',')]
    metric_order: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => PlotConfig::from_json_file(path)?,
        None => PlotConfig::default(),
    };
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }

    let loaded = load_file(&cli.file).with_context(|| format!("loading {}", cli.file.display()))?;
    let table = if cli.columns.is_empty() {
        loaded.clone()
    } else {
        loaded.select(&cli.columns)?
    };
    log::info!(
        "Loaded {} rows with columns {:?}",
        table.row_count(),
        table.column_names()
    );

    // ---- Summary and correlation ----
    println!("{}", describe(&table));

    let names = table.column_names();
    let matrix = compute_correlation_matrix(&table, &names)?;
    println!("{matrix}");

    // ---- Pair plot ----
    let grid_path = config.pair_grid_path(&names);
    render_pair_grid_with(&table.named_columns(), &grid_path, &config)?;

    // ---- Feature / label plots ----
    if let (Some(feature), Some(label)) = (&cli.fit_feature, &cli.fit_label) {
        let xs = loaded.column(feature)?;
        let ys = loaded.column(label)?;
        render_data_plot(xs, ys, feature, label, &config.data_plot_path(feature, label), &config)?;

        if let (Some(weight), Some(bias)) = (cli.weight, cli.bias) {
            render_model_fit_with(
                xs,
                ys,
                weight,
                bias,
                feature,
                label,
                &config.model_plot_path(),
                &config,
            )?;
        }
    } else if cli.weight.is_some() {
        bail!("--weight/--bias need --fit-feature and --fit-label");
    }

    // ---- Metrics ----
    if let Some(path) = &cli.metrics {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading metrics {}", path.display()))?;
        let records: Vec<MetricRecord> =
            serde_json::from_str(&text).context("parsing metrics records")?;

        let aggregator = MetricsAggregator::from_records(records).with_order(&cli.metric_order);
        let epochs = cli.epochs.unwrap_or_else(|| aggregator.max_len());
        aggregator.render_comparison_with(epochs, &config.metrics_path(), &config)?;
    }

    Ok(())
}
