//! Structural validation of topology graphs.

use std::collections::HashSet;

use log::{info, warn};

use super::types::{TopologyGraph, ValidationReport};

/// Validate a topology for consistency and completeness
///
/// Checks for:
/// - Devices without an id (error)
/// - Connections whose source or target is not a declared device (error)
/// - Connection entries in neither accepted shape (error)
/// - Devices that appear in no connection (warning)
/// - Devices with no layout position (warning)
/// - Device ids declared more than once (warning)
///
/// `valid` is true exactly when no errors were found.
///
/// # Examples
/// ```
/// use netmapper::topology::{validate_topology, TopologyGraph};
/// use serde_json::json;
///
/// let graph: TopologyGraph = serde_json::from_value(json!({
///     "devices": [{"id": "fw1"}],
///     "connections": [{"source": "fw1", "target": "ghost"}]
/// })).unwrap();
///
/// let report = validate_topology(&graph);
/// assert!(!report.valid);
/// assert!(report.errors.iter().any(|e| e.contains("ghost")));
/// ```
pub fn validate_topology(topology: &TopologyGraph) -> ValidationReport {
    let mut report = ValidationReport::default();

    let connected: HashSet<&str> = topology
        .connections
        .iter()
        .flat_map(|c| [c.source.as_str(), c.target.as_str()])
        .collect();

    // Orphaned devices
    for device in &topology.devices {
        if let Some(id) = device.id() {
            if !connected.contains(id) {
                report.warnings.push(format!("Device {} has no connections", id));
            }
        }
    }

    // Missing ids and positions
    let mut device_ids = HashSet::new();
    for device in &topology.devices {
        match device.id() {
            None => report.errors.push("Device found without ID".to_string()),
            Some(id) => {
                if !topology.layout.positions.contains_key(id) {
                    report.warnings.push(format!("Device {} has no position", id));
                }
                if !device_ids.insert(id) {
                    report.warnings.push(format!("Duplicate device id {}", id));
                }
            }
        }
    }

    // Dangling and malformed connections
    for connection in &topology.connections {
        if !device_ids.contains(connection.source.as_str()) {
            report
                .errors
                .push(format!("Connection source {} not found in devices", connection.source));
        }
        if !device_ids.contains(connection.target.as_str()) {
            report
                .errors
                .push(format!("Connection target {} not found in devices", connection.target));
        }
    }
    for entry in &topology.rejected_connections {
        report.errors.push(format!("Invalid connection format: {}", entry));
    }

    report.valid = report.errors.is_empty();

    if report.valid {
        info!("Topology valid with {} warnings", report.warnings.len());
    } else {
        warn!(
            "Topology invalid: {} errors, {} warnings",
            report.errors.len(),
            report.warnings.len()
        );
    }

    report
}
