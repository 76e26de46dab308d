//! Descriptive statistics over a [`TableView`](crate::data::TableView).

pub mod correlation;
pub mod summary;

pub use correlation::{compute_correlation_matrix, pearson, CorrelationMatrix};
pub use summary::{describe, ColumnSummary, TableSummary};
