//! Statistics snapshots for status endpoints

pub mod metrics;

pub use metrics::{RelaySummary, StreamStatistics};
