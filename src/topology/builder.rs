//! Layered topology construction and the per-layer spacing pass.
//!
//! The builder only holds its layout settings. Every call takes its inputs
//! and returns a self-contained result, so one builder can be shared across
//! threads without locking.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::layering::group_devices_by_layer;
use super::types::*;
use super::validation::validate_topology;
use crate::config::LayoutConfig;
use crate::device::DeviceRecord;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash of a device id
fn fnv1a(id: &str) -> u64 {
    id.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Builds, optimizes and validates layered topologies
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    config: LayoutConfig,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Build a topology from devices and raw connection entries.
    ///
    /// Malformed connection entries are set aside in
    /// `rejected_connections` and counted in the metadata; they never stop
    /// the build.
    pub fn build_topology(
        &self,
        devices: Vec<DeviceRecord>,
        connections: Vec<ConnectionEntry>,
    ) -> TopologyGraph {
        let mut edges = Vec::with_capacity(connections.len());
        let mut rejected = Vec::new();
        for entry in connections {
            match entry.normalize() {
                Ok(edge) => edges.push(edge),
                Err(value) => {
                    warn!("Skipping malformed connection entry: {}", value);
                    rejected.push(value);
                }
            }
        }

        let layout = self.layered_layout(&devices);
        let metadata = TopologyMetadata::layered(devices.len(), edges.len(), rejected.len());

        info!(
            "Built topology with {} devices and {} connections across {} layers",
            metadata.total_devices,
            metadata.total_connections,
            layout.layers.len()
        );

        TopologyGraph {
            devices,
            connections: edges,
            rejected_connections: rejected,
            layout,
            metadata,
        }
    }

    /// Compute the layered layout for a set of devices
    pub fn layered_layout(&self, devices: &[DeviceRecord]) -> Layout {
        let groups = group_devices_by_layer(devices);
        let spacing = self.config.device_spacing;

        let mut positions = BTreeMap::new();
        let mut width: f64 = 0.0;

        for (index, (layer, members)) in groups.iter().enumerate() {
            let y = index as f64 * self.config.layer_height;
            let layer_width = members.len() as f64 * spacing;
            let start_x = -layer_width / 2.0;
            width = width.max(layer_width);

            for (slot, device) in members.iter().enumerate() {
                let Some(id) = device.id() else {
                    warn!("Device without id in layer {} gets no position", layer);
                    continue;
                };

                let position = LayoutPosition {
                    x: start_x + slot as f64 * spacing,
                    y,
                    z: self.depth_jitter(id),
                    layer: *layer,
                };
                if positions.insert(id.to_string(), position).is_some() {
                    warn!("Duplicate device id {}; keeping the last position", id);
                }
            }

            debug!("Layer {} at y={} holds {} devices", layer, y, members.len());
        }

        Layout {
            positions,
            layers: groups.iter().map(|(layer, _)| *layer).collect(),
            dimensions: Dimensions {
                width,
                height: groups.len() as f64 * self.config.layer_height,
                depth: self.config.depth,
            },
            optimized: false,
        }
    }

    /// Depth offset derived from the device id and the configured seed
    fn depth_jitter(&self, id: &str) -> f64 {
        let range = self.config.depth_jitter;
        if range <= 0.0 {
            return 0.0;
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed ^ fnv1a(id));
        rng.gen_range(-range..=range)
    }

    /// Enforce a minimum horizontal gap within each layer.
    ///
    /// Devices keep their left-to-right order; each layer is re-spaced from
    /// its leftmost device at `min_spacing`. Only `x` changes among the
    /// positions; `dimensions.width` is recomputed as the widest re-spaced
    /// layer. This does not attempt crossing minimization across layers.
    pub fn optimize_layout(&self, mut layout: Layout) -> Layout {
        let mut by_layer: BTreeMap<TopologyLayer, Vec<(String, f64)>> = BTreeMap::new();
        for (id, position) in &layout.positions {
            by_layer
                .entry(position.layer)
                .or_default()
                .push((id.clone(), position.x));
        }

        let spacing = self.config.min_spacing;
        let mut width: f64 = 0.0;

        for (layer, mut members) in by_layer {
            width = width.max(members.len() as f64 * spacing);
            members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

            let start_x = members[0].1;
            for (slot, (id, _)) in members.iter().enumerate() {
                if let Some(position) = layout.positions.get_mut(id) {
                    position.x = start_x + slot as f64 * spacing;
                }
            }

            debug!("Re-spaced {} devices in layer {}", members.len(), layer);
        }

        if !layout.positions.is_empty() {
            layout.dimensions.width = width;
        }
        layout.optimized = true;
        layout
    }

    /// Validate a topology; see [`validate_topology`]
    pub fn validate_topology(&self, topology: &TopologyGraph) -> ValidationReport {
        validate_topology(topology)
    }
}
