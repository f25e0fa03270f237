/// Data layer: core types, loading, and reshaping.
///
/// Architecture:
/// ```text
///  wide solver table.csv
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  split per system size → <prefix><size>.csv
///   └──────────┘
///        │
///        ▼
///  <fname>_energies.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectrumTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SpectrumTable │  j column + level matrix
///   └──────────────┘
/// ```
pub mod loader;
pub mod model;
pub mod reshape;
