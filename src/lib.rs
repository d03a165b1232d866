//! Batch processing of SoWat isochore files and trapping P-T envelopes.

pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod plate;

pub use data::aggregate::{aggregate, discover_sources, AggregateOptions, ErrorPolicy, SourceFile};
pub use data::model::{Dataset, PointRecord, SummaryEntry};
pub use data::parser::parse_record;
pub use error::IsochoreError;
pub use geometry::envelope::{EnvelopeBuilder, TrappingEnvelope};
