// ── Domain model ──
//
// Canonical types produced by `convert` from raw API payloads and
// consumed by the mapping layer and CLI renderers.

mod device;
mod reading;
mod snapshot;

pub use device::{Device, DeviceStatus};
pub use reading::{DeviceAttributes, DeviceClass, Reading, ReadingKind, ReadingValue, StateClass, Unit};
pub use snapshot::Snapshot;
