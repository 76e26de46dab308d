use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::TableView;
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Symmetric matrix of Pearson coefficients, indexed in the order the columns
/// were requested.
///
/// The diagonal is exactly `1.0`. Off-diagonal entries lie in `[-1, 1]`, or are
/// `NaN` when the pair has fewer than two complete rows or zero variance.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    /// Coefficient for two named columns.
    pub fn get_by_name(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.values[i][j])
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == name)
            .ok_or_else(|| PlotError::UnknownColumn(name.to_string()))
    }

    /// The matrix as an Arrow batch: a label column, then one column per label
    /// holding the coefficients formatted to two decimals.
    pub fn to_record_batch(&self) -> std::result::Result<RecordBatch, ArrowError> {
        let mut fields = vec![Field::new("", DataType::Utf8, false)];
        let mut columns: Vec<ArrayRef> =
            vec![Arc::new(StringArray::from_iter_values(self.labels.iter()))];

        for (j, label) in self.labels.iter().enumerate() {
            fields.push(Field::new(label.as_str(), DataType::Utf8, false));
            columns.push(Arc::new(StringArray::from_iter_values(
                self.values.iter().map(|row| format!("{:.2}", row[j])),
            )));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
    }
}

/// Prints a bordered table with one header row and two decimals per cell.
impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let batch = self.to_record_batch().map_err(|_| fmt::Error)?;
        let table = pretty_format_batches(&[batch]).map_err(|_| fmt::Error)?;
        write!(f, "{table}")
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Correlation matrix over `column_names`, in that order.
///
/// Each unordered pair is computed once over the rows where both values are
/// present and mirrored into the lower triangle.
pub fn compute_correlation_matrix<S: AsRef<str>>(
    table: &TableView,
    column_names: &[S],
) -> Result<CorrelationMatrix> {
    let columns = column_names
        .iter()
        .map(|name| table.column(name.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(columns[i], columns[j])?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    log::debug!("computed {n}×{n} correlation matrix over {} rows", table.row_count());

    Ok(CorrelationMatrix {
        labels: column_names.iter().map(|s| s.as_ref().to_string()).collect(),
        values,
    })
}

/// Pearson coefficient of two equal-length series, skipping rows where either
/// value is `NaN`.
///
/// Returns `NaN` when fewer than two complete rows remain or either side has
/// zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(PlotError::length_mismatch("pearson", xs.len(), ys.len()));
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Ok(f64::NAN);
    }

    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}
