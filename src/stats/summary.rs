use std::fmt;

use crate::data::{Column, TableView};

/// Descriptive statistics of one column, `NaN` cells excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub nan_count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator).
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn of(column: &Column) -> Self {
        let present: Vec<f64> = column.values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = present.len();

        let (mean, std, min, max) = if count == 0 {
            (f64::NAN, f64::NAN, f64::NAN, f64::NAN)
        } else {
            let mean = present.iter().sum::<f64>() / count as f64;
            let std = if count < 2 {
                f64::NAN
            } else {
                let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (count - 1) as f64).sqrt()
            };
            let min = present.iter().copied().fold(f64::INFINITY, f64::min);
            let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (mean, std, min, max)
        };

        ColumnSummary {
            name: column.name.clone(),
            count,
            nan_count: column.values.len() - count,
            mean,
            std,
            min,
            max,
        }
    }
}

/// Per-column summary of the whole table, in table order.
pub fn describe(table: &TableView) -> TableSummary {
    TableSummary {
        rows: table.row_count(),
        columns: table.columns().iter().map(ColumnSummary::of).collect(),
    }
}

/// Output of [`describe`]; `Display` prints one line per column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .columns
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(6);

        writeln!(f, "[{} × {}]", self.rows, self.columns.len())?;
        write!(
            f,
            "{:<width$} {:>8} {:>6} {:>12} {:>12} {:>12} {:>12}",
            "column", "count", "nan", "mean", "std", "min", "max"
        )?;
        for c in &self.columns {
            write!(
                f,
                "\n{:<width$} {:>8} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                c.name, c.count, c.nan_count, c.mean, c.std, c.min, c.max
            )?;
        }
        Ok(())
    }
}
