//! Multi-signal device signature matching.
//!
//! Three independent sub-matchers (MAC OUI, model name, IP address) each
//! produce a hint with a fixed confidence. The strongest hint wins; ties
//! keep the earlier one in MAC, model, IP order.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::oui::lookup_oui;
use crate::utils::ip_utils::is_private_ip;

/// Confidence of an OUI table hit
pub const MAC_CONFIDENCE: f64 = 0.8;
/// Confidence of a model-name family hit
pub const MODEL_CONFIDENCE: f64 = 0.9;
/// Confidence of an IP-only hint (always weak)
pub const IP_CONFIDENCE: f64 = 0.1;

const UNKNOWN: &str = "unknown";

/// Which sub-matcher produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    MacOui,
    ModelName,
    IpPattern,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::MacOui => write!(f, "mac_oui"),
            MatchSource::ModelName => write!(f, "model_name"),
            MatchSource::IpPattern => write!(f, "ip_pattern"),
        }
    }
}

/// Vendor/type/capability hints recovered from a device's signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureMatch {
    pub vendor: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub model: String,
    pub capabilities: Vec<String>,
    pub confidence: f64,
    pub matched_by: Option<MatchSource>,
}

impl SignatureMatch {
    fn none() -> Self {
        Self {
            vendor: UNKNOWN.to_string(),
            device_type: UNKNOWN.to_string(),
            model: UNKNOWN.to_string(),
            capabilities: Vec::new(),
            confidence: 0.0,
            matched_by: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.confidence > 0.0
    }
}

/// A model family recognised from its name
struct ModelSignature {
    pattern: Regex,
    vendor: &'static str,
    device_type: &'static str,
    capabilities: &'static [&'static str],
}

impl ModelSignature {
    fn new(
        pattern: &str,
        vendor: &'static str,
        device_type: &'static str,
        capabilities: &'static [&'static str],
    ) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Invalid model signature regex"),
            vendor,
            device_type,
            capabilities,
        }
    }
}

const SECURITY_CAPS: &[&str] = &["firewall", "routing", "vpn"];
const SWITCH_CAPS: &[&str] = &["switching", "poe"];
const WIRELESS_CAPS: &[&str] = &["wifi", "wlan"];

/// Model families, checked in order; Fortinet before Meraki
static MODEL_SIGNATURES: LazyLock<Vec<ModelSignature>> = LazyLock::new(|| {
    vec![
        ModelSignature::new(r"(?i)fortigate|^fgt?-?\d", "fortinet", "firewall", SECURITY_CAPS),
        ModelSignature::new(r"(?i)fortiswitch|^fs-?\d", "fortinet", "switch", SWITCH_CAPS),
        ModelSignature::new(r"(?i)fortiap|^fap-?\d", "fortinet", "access_point", WIRELESS_CAPS),
        ModelSignature::new(r"(?i)\bmx(\d|\b)", "meraki", "firewall", SECURITY_CAPS),
        ModelSignature::new(r"(?i)\bms(\d|\b)", "meraki", "switch", SWITCH_CAPS),
        ModelSignature::new(r"(?i)\bmr(\d|\b)", "meraki", "access_point", WIRELESS_CAPS),
    ]
});

/// Stateless signature matcher over the static OUI and model tables
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureMatcher;

impl SignatureMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Match a device by whichever of its MAC, model name and IP are present.
    ///
    /// Never fails; with no usable input the result has confidence 0.0.
    pub fn match_device(
        &self,
        mac: Option<&str>,
        model_name: Option<&str>,
        ip: Option<&str>,
    ) -> SignatureMatch {
        let mut best = SignatureMatch::none();

        let candidates = [
            mac.and_then(|m| self.match_by_mac(m)),
            model_name.and_then(|m| self.match_by_model(m)),
            ip.and_then(|i| self.match_by_ip(i)),
        ];

        for candidate in candidates.into_iter().flatten() {
            if candidate.confidence > best.confidence {
                best = candidate;
            }
        }

        if let Some(source) = best.matched_by {
            debug!(
                "Signature match via {}: vendor={} type={} confidence={}",
                source, best.vendor, best.device_type, best.confidence
            );
        }

        best
    }

    /// Match by MAC address OUI
    pub fn match_by_mac(&self, mac: &str) -> Option<SignatureMatch> {
        let sig = lookup_oui(mac)?;
        Some(SignatureMatch {
            vendor: sig.vendor.to_string(),
            device_type: sig.device_type.unwrap_or(UNKNOWN).to_string(),
            model: UNKNOWN.to_string(),
            capabilities: Vec::new(),
            confidence: MAC_CONFIDENCE,
            matched_by: Some(MatchSource::MacOui),
        })
    }

    /// Match by model family name
    pub fn match_by_model(&self, model_name: &str) -> Option<SignatureMatch> {
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return None;
        }

        let sig = MODEL_SIGNATURES
            .iter()
            .find(|sig| sig.pattern.is_match(model_name))?;

        Some(SignatureMatch {
            vendor: sig.vendor.to_string(),
            device_type: sig.device_type.to_string(),
            model: model_name.to_string(),
            capabilities: sig.capabilities.iter().map(|c| c.to_string()).collect(),
            confidence: MODEL_CONFIDENCE,
            matched_by: Some(MatchSource::ModelName),
        })
    }

    /// Weak hint from the address scope alone
    pub fn match_by_ip(&self, ip: &str) -> Option<SignatureMatch> {
        let private = is_private_ip(ip).ok()?;
        let scope = if private { "private_network" } else { "public_network" };

        Some(SignatureMatch {
            device_type: scope.to_string(),
            confidence: IP_CONFIDENCE,
            matched_by: Some(MatchSource::IpPattern),
            ..SignatureMatch::none()
        })
    }
}
