//! Network topology module.
//!
//! This module partitions devices into layers, computes the layered 3D
//! layout, runs the per-layer spacing pass and validates the resulting
//! graph.

pub mod builder;
pub mod layering;
pub mod types;
pub mod validation;

// Re-export key types and functions for easier access
pub use builder::TopologyBuilder;
pub use layering::{assign_layer, group_devices_by_layer};
pub use types::{
    ConnectionEdge, ConnectionEntry, Dimensions, Layout, LayoutPosition, TopologyGraph,
    TopologyLayer, TopologyMetadata, ValidationReport,
};
pub use validation::validate_topology;
