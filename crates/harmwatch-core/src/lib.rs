//! HarmWatch Core
//!
//! Core types shared across HarmWatch components.
//!
//! This crate provides:
//! - The event records that flow through the ingestion hub (`RawEvent`, `EnrichedEvent`)
//! - The classification verdict model (`HarmLabel`, `RiskLevel`, `ClassificationVerdict`)
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ClassificationVerdict, EnrichedEvent, HarmLabel, IngestRequest, RawEvent, RiskLevel,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        ClassificationVerdict, EnrichedEvent, HarmLabel, IngestRequest, RawEvent, RiskLevel,
    };
}
