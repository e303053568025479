//! Core data types for device records and their classification.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Coarse architectural tier assigned to a device by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkLayer {
    Core,
    Distribution,
    Access,
    Service,
    Endpoint,
    #[default]
    Unknown,
}

impl NetworkLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkLayer::Core => "core",
            NetworkLayer::Distribution => "distribution",
            NetworkLayer::Access => "access",
            NetworkLayer::Service => "service",
            NetworkLayer::Endpoint => "endpoint",
            NetworkLayer::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NetworkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed device category taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    CoreRouter,
    DistributionSwitch,
    AccessSwitch,
    WirelessAp,
    Workstation,
    MobileDevice,
    IotDevice,
    Server,
    NetworkService,
    #[default]
    Unknown,
}

impl DeviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::CoreRouter => "core_router",
            DeviceCategory::DistributionSwitch => "distribution_switch",
            DeviceCategory::AccessSwitch => "access_switch",
            DeviceCategory::WirelessAp => "wireless_ap",
            DeviceCategory::Workstation => "workstation",
            DeviceCategory::MobileDevice => "mobile_device",
            DeviceCategory::IotDevice => "iot_device",
            DeviceCategory::Server => "server",
            DeviceCategory::NetworkService => "network_service",
            DeviceCategory::Unknown => "unknown",
        }
    }

    /// Returns true for switching categories (distribution or access)
    pub fn is_switch(&self) -> bool {
        matches!(self, DeviceCategory::DistributionSwitch | DeviceCategory::AccessSwitch)
    }
}

impl std::fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a device, flattened into the device record on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub device_category: DeviceCategory,
    #[serde(default)]
    pub network_layer: NetworkLayer,
    #[serde(default)]
    pub classification_score: f64,
    #[serde(default)]
    pub classification_confidence: f64,
    #[serde(default)]
    pub expected_capabilities: Vec<String>,
    /// Typical port-count band for the layer (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_ports: Option<String>,
    /// Typical power draw for the category (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_typical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_ip: Option<String>,
}

impl Classification {
    /// Soft miss: no rule matched the device
    pub fn unknown() -> Self {
        Self {
            device_category: DeviceCategory::Unknown,
            network_layer: NetworkLayer::Unknown,
            classification_score: 0.0,
            classification_confidence: 0.0,
            expected_capabilities: Vec::new(),
            typical_ports: None,
            power_typical: None,
            management_ip: None,
        }
    }
}

/// A network device as supplied by upstream collectors.
///
/// Known attributes are typed; any other keys survive in `extra` and are
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDeviceRecord")]
pub struct DeviceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form device type (`type` or `device_type` on input)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub classification: Option<Classification>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Keys written by the classifier
const CLASSIFICATION_KEYS: &[&str] = &[
    "device_category",
    "network_layer",
    "classification_score",
    "classification_confidence",
    "expected_capabilities",
    "typical_ports",
    "power_typical",
    "management_ip",
];

/// Wire form of a device; every alias is a separate field so inputs that
/// carry both spellings still parse
#[derive(Deserialize)]
struct RawDeviceRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    device_type: Option<String>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    mac_address: Option<String>,
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// The canonical spelling wins unless it is missing or empty
fn prefer(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    match primary {
        Some(value) if !value.is_empty() => Some(value),
        other => fallback.or(other),
    }
}

/// Lift classifier output out of the open key set.
///
/// Only a block whose `device_category` is in the taxonomy is taken; any
/// other classification-looking keys stay in `extra` untouched.
fn take_classification(rest: &mut Map<String, Value>) -> Option<Classification> {
    if !rest.contains_key("device_category") {
        return None;
    }

    let fields: Map<String, Value> = CLASSIFICATION_KEYS
        .iter()
        .filter_map(|key| rest.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect();

    match serde_json::from_value::<Classification>(Value::Object(fields)) {
        Ok(classification) => {
            for key in CLASSIFICATION_KEYS {
                rest.remove(*key);
            }
            Some(classification)
        }
        Err(err) => {
            debug!("Keeping unrecognised classification fields as extra metadata: {}", err);
            None
        }
    }
}

impl From<RawDeviceRecord> for DeviceRecord {
    fn from(raw: RawDeviceRecord) -> Self {
        let mut rest = raw.rest;
        let classification = take_classification(&mut rest);

        Self {
            id: raw.id,
            name: raw.name,
            device_type: prefer(raw.kind, raw.device_type),
            vendor: raw.vendor,
            model: raw.model,
            mac_address: prefer(raw.mac_address, raw.mac),
            ip_address: prefer(raw.ip_address, raw.ip),
            capabilities: raw.capabilities,
            status: raw.status,
            classification,
            extra: rest,
        }
    }
}

impl DeviceRecord {
    /// Create a device with an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac_address = Some(mac.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Device id, treating an empty string as missing
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn device_type(&self) -> &str {
        self.device_type.as_deref().unwrap_or("")
    }

    pub fn vendor(&self) -> &str {
        self.vendor.as_deref().unwrap_or("")
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    /// Assigned category, `Unknown` when the device has not been classified
    pub fn category(&self) -> DeviceCategory {
        self.classification
            .as_ref()
            .map(|c| c.device_category)
            .unwrap_or_default()
    }

    /// Assigned network layer, `Unknown` when the device has not been classified
    pub fn network_layer(&self) -> NetworkLayer {
        self.classification
            .as_ref()
            .map(|c| c.network_layer)
            .unwrap_or_default()
    }

    /// Case-insensitive capability membership test
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(capability))
    }
}
