//! HarmWatch Bridge
//!
//! Accepts social media events over HTTP, classifies each one for harm and
//! pushes the enriched record to every connected WebSocket subscriber.

pub mod cli;
pub mod config;
pub mod hub;
pub mod server;
pub mod simulate;

pub use cli::{Cli, Commands, ServeArgs};
pub use config::BridgeConfig;
pub use hub::{BroadcastHub, BroadcastReport, HealthStatus, HubOptions, IngestReceipt};
pub use server::{build_app, run_server, BridgeAppState};
