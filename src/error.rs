//! Typed errors surfaced by the analysis pipeline.
//!
//! The CLI layer decides how these are presented to the user; the pipeline
//! itself never retries or recovers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A city name outside the three supported datasets.
    #[error("unknown city {0:?} (expected chicago, new york city, or washington)")]
    UnknownCity(String),

    /// A trip row whose start timestamp could not be parsed.
    #[error("record {record}: unparseable start time {value:?}")]
    MalformedRecord { record: usize, value: String },

    /// A statistic that needs at least one value was computed over none.
    #[error("no trips to aggregate for {0}")]
    EmptyAggregation(&'static str),
}
