//! Reactive data layer between `netnest-api` and the CLI.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the netnest workspace:
//!
//! - **[`Coordinator`]** — Fetch scheduler for one hub:
//!   [`first_refresh()`](Coordinator::first_refresh) loads initial data,
//!   [`start_polling()`](Coordinator::start_polling) spawns the periodic
//!   fetch loop, and every fetch is single-flight. Failures never
//!   disturb previously stored data.
//!
//! - **[`SnapshotStore`]** — Single-slot reactive storage built on
//!   `tokio::sync::watch`. Consumers read the current [`Snapshot`] or
//!   subscribe for change notification; torn snapshots are impossible.
//!
//! - **[`SensorRegistry`]** — Recomputes the published [`Reading`] set
//!   on every snapshot change and carries entities across snapshots
//!   (a reading once seen never silently vanishes).
//!
//! - **[`ServiceCommand`]** — Typed invocations (`refresh now`, `update
//!   device`) dispatched against a [`HubSet`] by [`services::dispatch`].
//!
//! - **Domain model** ([`model`]) — Canonical types ([`Snapshot`],
//!   [`Device`], [`Reading`]) converted from raw API payloads.

pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod hub;
pub mod mapping;
pub mod model;
pub mod sensors;
pub mod services;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthPolicy, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, HubConfig};
pub use coordinator::{Coordinator, HubState};
pub use error::CoreError;
pub use hub::{Hub, HubSet};
pub use sensors::SensorRegistry;
pub use services::{ServiceCommand, ServiceOutcome, dispatch};
pub use store::SnapshotStore;
pub use validate::validate;

// Re-export model types at the crate root for ergonomics.
pub use model::{Device, DeviceStatus, Reading, ReadingValue, Snapshot};

// Identity metadata returned by `validate` and `Coordinator::discovery`.
pub use netnest_api::DiscoveryInfo;
