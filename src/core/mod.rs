//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod dates;
pub mod export;
pub mod log;
pub mod pipeline;
pub mod rates;
pub mod statement;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use pipeline::BatchOptions;
pub use rates::{RateResolver, RateSource};
pub use statement::{Conversion, ConversionReport, EnrichedRow, StatementRow};
