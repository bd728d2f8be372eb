// netnest-api: Async Rust client for the NetworkNest telemetry API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{Client, DISCOVERY_ENDPOINT, STATES_ENDPOINT};
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{DevicePayload, DiscoveryInfo, StatesPayload};
