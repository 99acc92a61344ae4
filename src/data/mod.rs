/// Data layer: core types, loading, and the filter pipeline.
///
/// Architecture:
/// ```text
///   integridad.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (all cells as text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  validate → institutions → programs → subset + series
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
