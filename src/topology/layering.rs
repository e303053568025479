//! Partitioning devices into layout layers.
//!
//! A classified device is drawn in the tier matching its `network_layer`,
//! so every device the classifier puts in one layer shares one `y`.
//! Unclassified devices, and those classified `unknown`, fall back to
//! ordered keyword checks on their free-form type. In that fallback,
//! switches are split into distribution and access by looking for "core"
//! or "distribution" in the device name; that split is a low-confidence
//! heuristic over a free-text label and is kept exactly as is so existing
//! inventories lay out the same way.

use log::debug;

use super::types::TopologyLayer;
use crate::device::{DeviceRecord, NetworkLayer};

const CORE_KEYWORDS: &[&str] = &["router", "gateway", "fortigate", "firewall"];
const SWITCH_KEYWORDS: &[&str] = &["switch", "fortiswitch"];
const ACCESS_POINT_KEYWORDS: &[&str] = &["ap", "access_point", "fortiap"];
const ENDPOINT_KEYWORDS: &[&str] = &["client", "endpoint", "device", "virtual_machine"];
const UPLINK_NAME_HINTS: &[&str] = &["core", "distribution"];

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Tier for a classifier layer; service hosts hang off the access tier
fn tier_for(layer: NetworkLayer) -> Option<TopologyLayer> {
    match layer {
        NetworkLayer::Core => Some(TopologyLayer::Core),
        NetworkLayer::Distribution => Some(TopologyLayer::Distribution),
        NetworkLayer::Access | NetworkLayer::Service => Some(TopologyLayer::Access),
        NetworkLayer::Endpoint => Some(TopologyLayer::Endpoints),
        NetworkLayer::Unknown => None,
    }
}

/// Pick the layout layer for a single device; unmatched devices go to access
pub fn assign_layer(device: &DeviceRecord) -> TopologyLayer {
    if let Some(tier) = tier_for(device.network_layer()) {
        return tier;
    }
    layer_from_type(device)
}

fn layer_from_type(device: &DeviceRecord) -> TopologyLayer {
    let device_type = device.device_type().to_lowercase();

    if contains_any(&device_type, CORE_KEYWORDS) {
        return TopologyLayer::Core;
    }

    if contains_any(&device_type, SWITCH_KEYWORDS) {
        let name = device.name().to_lowercase();
        if contains_any(&name, UPLINK_NAME_HINTS) {
            debug!(
                "Switch {} placed in distribution from its name (low-confidence heuristic)",
                device.id().unwrap_or("<no id>")
            );
            return TopologyLayer::Distribution;
        }
        return TopologyLayer::Access;
    }

    if contains_any(&device_type, ACCESS_POINT_KEYWORDS) {
        return TopologyLayer::Access;
    }

    if contains_any(&device_type, ENDPOINT_KEYWORDS) {
        return TopologyLayer::Endpoints;
    }

    TopologyLayer::Access
}

/// Group devices by layer in stacking order, dropping empty layers.
///
/// Devices keep their input order within a layer.
pub fn group_devices_by_layer(devices: &[DeviceRecord]) -> Vec<(TopologyLayer, Vec<&DeviceRecord>)> {
    let mut buckets: [Vec<&DeviceRecord>; 4] = Default::default();

    for device in devices {
        let layer = assign_layer(device);
        let slot = TopologyLayer::ORDER
            .iter()
            .position(|l| *l == layer)
            .unwrap_or(TopologyLayer::ORDER.len() - 1);
        buckets[slot].push(device);
    }

    TopologyLayer::ORDER
        .into_iter()
        .zip(buckets)
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Classification;

    fn typed(id: &str, name: &str, device_type: &str) -> DeviceRecord {
        DeviceRecord::new(id, name).with_type(device_type)
    }

    #[test]
    fn test_assign_layer_keywords() {
        assert_eq!(assign_layer(&typed("fw1", "", "firewall")), TopologyLayer::Core);
        assert_eq!(assign_layer(&typed("gw", "", "Gateway")), TopologyLayer::Core);
        assert_eq!(assign_layer(&typed("sw1", "", "switch")), TopologyLayer::Access);
        assert_eq!(assign_layer(&typed("ap1", "", "access_point")), TopologyLayer::Access);
        assert_eq!(assign_layer(&typed("pc1", "", "client")), TopologyLayer::Endpoints);
        assert_eq!(assign_layer(&typed("nd", "", "network_device")), TopologyLayer::Endpoints);
        assert_eq!(assign_layer(&typed("vm", "", "virtual_machine")), TopologyLayer::Endpoints);
        assert_eq!(assign_layer(&typed("x", "", "printer")), TopologyLayer::Access);
        assert_eq!(assign_layer(&DeviceRecord::new("y", "Router")), TopologyLayer::Access);
    }

    fn classified(id: &str, device_type: &str, layer: NetworkLayer) -> DeviceRecord {
        let mut device = typed(id, id, device_type);
        device.classification = Some(Classification {
            network_layer: layer,
            ..Classification::unknown()
        });
        device
    }

    #[test]
    fn test_classified_layer_wins_over_type() {
        assert_eq!(
            assign_layer(&classified("sw1", "switch", NetworkLayer::Distribution)),
            TopologyLayer::Distribution
        );
        assert_eq!(
            assign_layer(&classified("fw9", "", NetworkLayer::Core)),
            TopologyLayer::Core
        );
        assert_eq!(
            assign_layer(&classified("dns1", "client", NetworkLayer::Service)),
            TopologyLayer::Access
        );
        assert_eq!(
            assign_layer(&classified("vm1", "", NetworkLayer::Endpoint)),
            TopologyLayer::Endpoints
        );
        // A soft miss keeps the type heuristics
        assert_eq!(
            assign_layer(&classified("pc1", "client", NetworkLayer::Unknown)),
            TopologyLayer::Endpoints
        );
    }

    #[test]
    fn test_switch_name_heuristic() {
        assert_eq!(
            assign_layer(&typed("sw1", "Core Switch 1", "fortiswitch")),
            TopologyLayer::Distribution
        );
        assert_eq!(
            assign_layer(&typed("sw2", "bldg-distribution-02", "switch")),
            TopologyLayer::Distribution
        );
        assert_eq!(
            assign_layer(&typed("sw3", "Closet 4", "switch")),
            TopologyLayer::Access
        );
    }

    #[test]
    fn test_grouping_order_and_empty_layers() {
        let devices = vec![
            typed("pc1", "", "client"),
            typed("sw1", "", "switch"),
            typed("fw1", "", "firewall"),
            typed("ap1", "", "access_point"),
        ];
        let groups = group_devices_by_layer(&devices);

        let layers: Vec<_> = groups.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            layers,
            vec![TopologyLayer::Core, TopologyLayer::Access, TopologyLayer::Endpoints]
        );

        let access: Vec<_> = groups[1].1.iter().map(|d| d.id().unwrap()).collect();
        assert_eq!(access, vec!["sw1", "ap1"]);
    }

    #[test]
    fn test_grouping_empty_input() {
        assert!(group_devices_by_layer(&[]).is_empty());
    }
}
