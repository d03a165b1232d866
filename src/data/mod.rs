/// Data layer: parsing, aggregation, and table I/O.
///
/// Architecture:
/// ```text
///  Sample_Assemblage-Inclusion.txt  (SoWat output)
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  one file → SummaryEntry + PointRecords
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  batch → Dataset (points, optional summary)
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │  export   │ ────▶ │  loader   │  csv / parquet tables
///   └──────────┘        └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod identifier;
pub mod loader;
pub mod model;
pub mod parser;
