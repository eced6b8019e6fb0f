/// Data layer: table model, loading, transformation stages, and export.
///
/// Architecture:
/// ```text
///   .csv  (.xlsx: recognised, not readable)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (date column parsed)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  trailing day window, then column selection
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform  │  target = source × exchange rate
///   └───────────┘
///        │
///        ├──────────────► stats   (min / max / mean per column)
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → .csv
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod stats;
pub mod transform;

pub use error::{LoadError, PipelineError};
pub use model::{Dataset, Row, Value};
