//! Broadcast hub: subscriber registry, ingestion and fan-out

mod broadcast;
mod registry;
mod stats;

pub use broadcast::{BroadcastHub, BroadcastReport, HealthStatus, HubOptions, IngestReceipt};
pub use registry::{
    ConnectionId, ConnectionState, Payload, SubscriberHandle, SubscriberRegistry, Subscription,
};
pub use stats::{IngestStats, RiskLevelCounts, StatsSnapshot};
