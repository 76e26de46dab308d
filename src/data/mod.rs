/// Data layer: the numeric table and the file loaders that build it.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TableView (non-numeric cells → NaN)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ TableView  │  named, equal-length f64 columns
///   └───────────┘
///        │
///        ▼
///   stats / render
/// ```

pub mod loader;
pub mod model;

pub use model::{Column, TableView};
