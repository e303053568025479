//! Topology graph type definitions.
//!
//! This file contains the JSON-serializable graph handed to rendering and
//! export: devices, normalized connections, the layered layout and
//! summary metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::device::DeviceRecord;

/// Layout tier a device is drawn in, listed in stacking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyLayer {
    Core,
    Distribution,
    Access,
    Endpoints,
}

impl TopologyLayer {
    /// All layers, top of the drawing first
    pub const ORDER: [TopologyLayer; 4] = [
        TopologyLayer::Core,
        TopologyLayer::Distribution,
        TopologyLayer::Access,
        TopologyLayer::Endpoints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyLayer::Core => "core",
            TopologyLayer::Distribution => "distribution",
            TopologyLayer::Access => "access",
            TopologyLayer::Endpoints => "endpoints",
        }
    }
}

impl std::fmt::Display for TopologyLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical link between two devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ConnectionEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: None,
        }
    }
}

/// A connection as received on the wire.
///
/// Accepts `[source, target]` or `{"source": .., "target": ..}`; anything
/// else is kept verbatim as `Malformed` so it can be reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConnectionEntry {
    Edge(ConnectionEdge),
    Pair(String, String),
    Malformed(Value),
}

impl ConnectionEntry {
    pub fn pair(source: impl Into<String>, target: impl Into<String>) -> Self {
        ConnectionEntry::Pair(source.into(), target.into())
    }

    /// Classify a raw JSON value into one of the accepted shapes
    pub fn from_value(value: Value) -> Self {
        match &value {
            Value::Array(items) if items.len() == 2 => {
                if let (Some(source), Some(target)) = (items[0].as_str(), items[1].as_str()) {
                    return ConnectionEntry::Pair(source.to_string(), target.to_string());
                }
            }
            Value::Object(map) => {
                let source = map.get("source").and_then(Value::as_str);
                let target = map.get("target").and_then(Value::as_str);
                if let (Some(source), Some(target)) = (source, target) {
                    return ConnectionEntry::Edge(ConnectionEdge {
                        source: source.to_string(),
                        target: target.to_string(),
                        kind: map.get("type").and_then(Value::as_str).map(str::to_string),
                    });
                }
            }
            _ => {}
        }
        ConnectionEntry::Malformed(value)
    }

    /// Canonical edge, or the raw value if the entry is malformed
    pub fn normalize(self) -> Result<ConnectionEdge, Value> {
        match self {
            ConnectionEntry::Edge(edge) => Ok(edge),
            ConnectionEntry::Pair(source, target) => Ok(ConnectionEdge::new(source, target)),
            ConnectionEntry::Malformed(value) => Err(value),
        }
    }
}

impl<'de> Deserialize<'de> for ConnectionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ConnectionEntry::from_value)
    }
}

impl From<ConnectionEdge> for ConnectionEntry {
    fn from(edge: ConnectionEdge) -> Self {
        ConnectionEntry::Edge(edge)
    }
}

/// Spatial coordinates of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub x: f64,
    /// Pure function of `layer`
    pub y: f64,
    /// Depth jitter, visual only
    pub z: f64,
    pub layer: TopologyLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Layered layout of a topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub positions: BTreeMap<String, LayoutPosition>,
    /// Non-empty layers in stacking order
    pub layers: Vec<TopologyLayer>,
    pub dimensions: Dimensions,
    /// Set once the spacing pass has run
    pub optimized: bool,
}

/// Summary counts attached to a topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyMetadata {
    pub total_devices: usize,
    pub total_connections: usize,
    /// Connection entries in neither accepted shape
    #[serde(default)]
    pub rejected_connections: usize,
    pub layout_algorithm: String,
    pub topology_type: String,
}

impl TopologyMetadata {
    pub fn layered(total_devices: usize, total_connections: usize, rejected_connections: usize) -> Self {
        Self {
            total_devices,
            total_connections,
            rejected_connections,
            layout_algorithm: "layered".to_string(),
            topology_type: "network".to_string(),
        }
    }
}

/// A built topology: devices, links, layout and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTopologyGraph")]
pub struct TopologyGraph {
    pub devices: Vec<DeviceRecord>,
    pub connections: Vec<ConnectionEdge>,
    /// Raw entries that were in neither accepted shape
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_connections: Vec<Value>,
    pub layout: Layout,
    pub metadata: TopologyMetadata,
}

/// Wire form of a topology; connections may still be in raw shapes
#[derive(Deserialize)]
struct RawTopologyGraph {
    #[serde(default)]
    devices: Vec<DeviceRecord>,
    #[serde(default)]
    connections: Vec<ConnectionEntry>,
    #[serde(default)]
    rejected_connections: Vec<Value>,
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    metadata: Option<TopologyMetadata>,
}

impl From<RawTopologyGraph> for TopologyGraph {
    fn from(raw: RawTopologyGraph) -> Self {
        let mut connections = Vec::with_capacity(raw.connections.len());
        let mut rejected = raw.rejected_connections;
        for entry in raw.connections {
            match entry.normalize() {
                Ok(edge) => connections.push(edge),
                Err(value) => rejected.push(value),
            }
        }

        let metadata = raw.metadata.unwrap_or_else(|| {
            TopologyMetadata::layered(raw.devices.len(), connections.len(), rejected.len())
        });

        Self {
            devices: raw.devices,
            connections,
            rejected_connections: rejected,
            layout: raw.layout,
            metadata,
        }
    }
}

/// Outcome of validating a topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}
