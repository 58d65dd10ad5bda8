/// Data layer: core types, loading, normalization, aggregation and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  RawRow → VehicleRecord (total, never fails)
///   └───────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌───────────┐         ┌──────────┐
///   │ aggregate  │         │  filter   │  FilterState → visible indices
///   └───────────┘         └──────────┘
///     AggregateSummary
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;

use std::path::Path;

use error::LoadResult;
use model::EvDataset;

/// Load and normalize a dataset file in one step.
pub fn load_dataset(path: &Path) -> LoadResult<EvDataset> {
    let rows = loader::load_file(path)?;
    Ok(EvDataset::from_records(normalize::normalize_rows(&rows)))
}
