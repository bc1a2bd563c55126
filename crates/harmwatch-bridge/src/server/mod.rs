pub mod app;
pub mod routes;
pub mod state;
pub mod websocket;

pub use app::*;
pub use state::BridgeAppState;
