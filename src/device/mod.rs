//! Device records and device-level processing.
//!
//! This module contains the typed device record that flows through the
//! pipeline, and the enrichment, filtering, grouping and field validation
//! helpers applied to device lists before classification.

pub mod processing;
pub mod types;

pub use processing::{
    enrich_device, enrich_devices, filter_devices, group_devices, validate_devices, DeviceFilter,
    GroupBy,
};
pub use types::{Classification, DeviceCategory, DeviceRecord, NetworkLayer};
