use std::collections::BTreeSet;

use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Column – one named numeric series
// ---------------------------------------------------------------------------

/// A named column of floating-point cells.
///
/// Missing or non-numeric cells are stored as `NaN` so that rows stay aligned
/// across columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Number of `NaN` cells in the column.
    pub fn nan_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

// ---------------------------------------------------------------------------
// TableView – the column-oriented table handed to the engine
// ---------------------------------------------------------------------------

/// Read-only, column-oriented numeric table.
///
/// Column names are unique and every column has the same number of rows.
#[derive(Debug, Clone)]
pub struct TableView {
    columns: Vec<Column>,
    row_count: usize,
}

impl TableView {
    /// Build a table, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(PlotError::DuplicateColumn(col.name.clone()));
            }
        }

        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|c| c.values.len() != row_count) {
            return Err(PlotError::length_mismatch(
                format!("column '{}'", ragged.name),
                row_count,
                ragged.values.len(),
            ));
        }

        Ok(TableView { columns, row_count })
    }

    /// Convenience constructor from `(name, values)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        TableView::new(
            pairs
                .into_iter()
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| PlotError::UnknownColumn(name.to_string()))
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns as borrowed `(name, values)` pairs, in table order.
    pub fn named_columns(&self) -> Vec<(&str, &[f64])> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.as_slice()))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count == 0
    }

    /// A new table holding only `names`, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<TableView> {
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column(name).map(|values| Column::new(name, values.to_vec()))
            })
            .collect::<Result<Vec<_>>>()?;
        TableView::new(columns)
    }
}
