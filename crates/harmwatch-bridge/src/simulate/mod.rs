//! Ingestion simulator: posts sample events to a running bridge

mod runner;
mod samples;

pub use runner::{run, SimulateOptions, SimulateSummary};
pub use samples::sample_posts;
