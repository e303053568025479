//! Device list processing: signature enrichment, filtering, grouping and
//! field validation.

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::DeviceRecord;
use crate::signatures::{MatchSource, SignatureMatcher};
use crate::utils::{is_valid_ipv4, is_valid_mac_format};

/// Fill in vendor, type and capabilities from the device's signatures.
///
/// Values the caller already supplied are never overwritten. The match
/// itself is recorded in the extra bag as `match_confidence`, `matched_by`
/// and `matched_model`.
pub fn enrich_device(matcher: &SignatureMatcher, device: &DeviceRecord) -> DeviceRecord {
    let mut enriched = device.clone();

    let model_name = device
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .or(device.name.as_deref());
    let hint = matcher.match_device(
        device.mac_address.as_deref(),
        model_name,
        device.ip_address.as_deref(),
    );

    let Some(source) = hint.matched_by else {
        return enriched;
    };

    // An address scope says nothing about vendor or device type
    if source != MatchSource::IpPattern {
        if enriched.vendor().is_empty() {
            enriched.vendor = Some(hint.vendor.clone());
        }
        if enriched.device_type().is_empty() && hint.device_type != "unknown" {
            enriched.device_type = Some(hint.device_type.clone());
        }
        if enriched.capabilities.is_empty() {
            enriched.capabilities = hint.capabilities.clone();
        }
        if hint.model != "unknown" {
            enriched
                .extra
                .insert("matched_model".to_string(), Value::from(hint.model.clone()));
        }
    }

    enriched
        .extra
        .insert("match_confidence".to_string(), Value::from(hint.confidence));
    enriched
        .extra
        .insert("matched_by".to_string(), Value::from(source.to_string()));

    debug!(
        "Enriched device {} via {} (vendor={}, type={})",
        device.id().unwrap_or("<no id>"),
        source,
        enriched.vendor(),
        enriched.device_type()
    );

    enriched
}

/// Enrich every device, preserving order
pub fn enrich_devices(matcher: &SignatureMatcher, devices: &[DeviceRecord]) -> Vec<DeviceRecord> {
    let enriched: Vec<DeviceRecord> = devices.iter().map(|d| enrich_device(matcher, d)).collect();
    info!("Processed {} devices", enriched.len());
    enriched
}

/// Criteria for [`filter_devices`]; every criterion that is set must match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceFilter {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub capability: Option<String>,
}

/// Filter devices case-insensitively by vendor, type, status and capability
pub fn filter_devices(devices: &[DeviceRecord], filter: &DeviceFilter) -> Vec<DeviceRecord> {
    let matches = |wanted: &Option<String>, actual: &str| {
        wanted
            .as_deref()
            .map_or(true, |w| w.eq_ignore_ascii_case(actual))
    };

    devices
        .iter()
        .filter(|d| matches(&filter.vendor, d.vendor()))
        .filter(|d| matches(&filter.device_type, d.device_type()))
        .filter(|d| matches(&filter.status, d.status()))
        .filter(|d| {
            filter
                .capability
                .as_deref()
                .map_or(true, |c| d.has_capability(c))
        })
        .cloned()
        .collect()
}

/// Attribute to group devices by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Vendor,
    Type,
    Status,
    Category,
    Layer,
}

/// Group devices by an attribute; devices missing it land under `unknown`
pub fn group_devices(devices: &[DeviceRecord], group_by: GroupBy) -> BTreeMap<String, Vec<DeviceRecord>> {
    let mut groups: BTreeMap<String, Vec<DeviceRecord>> = BTreeMap::new();

    for device in devices {
        let key = match group_by {
            GroupBy::Vendor => device.vendor().to_string(),
            GroupBy::Type => device.device_type().to_string(),
            GroupBy::Status => device.status().to_string(),
            GroupBy::Category => device.category().to_string(),
            GroupBy::Layer => device.network_layer().to_string(),
        };
        let key = if key.is_empty() { "unknown".to_string() } else { key };
        groups.entry(key).or_default().push(device.clone());
    }

    groups
}

/// Check required fields and address formats.
///
/// Returns the devices that passed and one message per problem found.
pub fn validate_devices(devices: &[DeviceRecord]) -> (Vec<DeviceRecord>, Vec<String>) {
    let mut valid = Vec::new();
    let mut errors = Vec::new();

    for (index, device) in devices.iter().enumerate() {
        let problems = validate_device(device);
        if problems.is_empty() {
            valid.push(device.clone());
            continue;
        }

        let label = device.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("unknown");
        errors.extend(
            problems
                .into_iter()
                .map(|p| format!("Device {} ({}): {}", index, label, p)),
        );
    }

    (valid, errors)
}

fn validate_device(device: &DeviceRecord) -> Vec<String> {
    let mut problems = Vec::new();

    if device.id().is_none() {
        problems.push("Missing required field: id".to_string());
    }
    if device.name().is_empty() {
        problems.push("Missing required field: name".to_string());
    }

    if let Some(mac) = device.mac_address.as_deref().filter(|m| !m.is_empty()) {
        if !is_valid_mac_format(mac) {
            problems.push(format!("Invalid MAC address format: {}", mac));
        }
    }

    if let Some(ip) = device.ip_address.as_deref().filter(|i| !i.is_empty()) {
        if !is_valid_ipv4(ip) {
            problems.push(format!("Invalid IP address format: {}", ip));
        }
    }

    problems
}
