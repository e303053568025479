//! Multi-signal scoring classifier.
//!
//! Every category rule is scored against the device; the highest score
//! wins, with ties going to the rule listed first.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info};
use rayon::prelude::*;

use super::rules::{compile_rules, default_rules, CategoryRule, CompiledRule, RuleError};
use crate::config::{ClassificationConfig, ValidationError};
use crate::device::{Classification, DeviceCategory, DeviceRecord, NetworkLayer};
use crate::signatures::lookup_oui;

const KEYWORD_WEIGHT: f64 = 2.0;
const VENDOR_WEIGHT: f64 = 3.0;
const CAPABILITY_WEIGHT: f64 = 1.5;
const OUI_WEIGHT: f64 = 2.0;
const MODEL_PATTERN_WEIGHT: f64 = 1.5;

/// Device attributes prepared once and reused for every rule
struct DeviceSignals {
    text: String,
    vendor: String,
    model: String,
    capabilities: HashSet<String>,
    oui_categories: &'static [DeviceCategory],
}

impl DeviceSignals {
    fn from_device(device: &DeviceRecord) -> Self {
        Self {
            text: format!("{} {}", device.name(), device.model()).to_lowercase(),
            vendor: device.vendor().trim().to_lowercase(),
            model: device.model().to_lowercase(),
            capabilities: device.capabilities.iter().map(|c| c.to_lowercase()).collect(),
            oui_categories: device
                .mac_address
                .as_deref()
                .and_then(lookup_oui)
                .map(|sig| sig.categories)
                .unwrap_or(&[]),
        }
    }
}

/// Scores devices against an ordered rule table.
///
/// Immutable after construction, so one instance can classify from many
/// threads at once.
#[derive(Debug, Clone)]
pub struct DeviceClassifier {
    rules: Vec<CompiledRule>,
    confidence_scale: f64,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::with_rules(default_rules()).expect("Invalid built-in classification rules")
    }
}

impl DeviceClassifier {
    /// Classifier over the built-in rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier over a caller-supplied rule table
    pub fn with_rules(rules: Vec<CategoryRule>) -> Result<Self, RuleError> {
        Ok(Self {
            rules: compile_rules(rules)?,
            confidence_scale: ClassificationConfig::default().confidence_scale,
        })
    }

    /// Classifier built from configuration (custom rules or the built-in table).
    ///
    /// The configuration is validated first, so confidences stay in [0, 1].
    pub fn from_config(config: &ClassificationConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let rules = config.rules.clone().unwrap_or_else(default_rules);
        Ok(Self {
            rules: compile_rules(rules)?,
            confidence_scale: config.confidence_scale,
        })
    }

    /// The rule table in tie-break order
    pub fn rules(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter().map(|r| &r.rule)
    }

    /// Score of every rule against the device, in rule order
    pub fn score_device(&self, device: &DeviceRecord) -> Vec<(DeviceCategory, f64)> {
        let signals = DeviceSignals::from_device(device);
        self.rules
            .iter()
            .map(|rule| (rule.rule.category, Self::score_rule(&signals, rule)))
            .collect()
    }

    fn score_rule(signals: &DeviceSignals, rule: &CompiledRule) -> f64 {
        let mut score = 0.0;

        for keyword in &rule.keywords {
            if signals.text.contains(keyword.as_str()) {
                score += KEYWORD_WEIGHT;
            }
        }

        if !signals.vendor.is_empty() && rule.vendors.contains(&signals.vendor) {
            score += VENDOR_WEIGHT;
        }

        let shared = rule
            .capabilities
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|c| signals.capabilities.contains(c.as_str()))
            .count();
        score += shared as f64 * CAPABILITY_WEIGHT;

        if signals.oui_categories.contains(&rule.rule.category) {
            score += OUI_WEIGHT;
        }

        for pattern in &rule.model_patterns {
            if pattern.is_match(&signals.model) {
                score += MODEL_PATTERN_WEIGHT;
            }
        }

        score
    }

    /// Classify a single device, returning a copy with its classification set
    pub fn classify(&self, device: &DeviceRecord) -> DeviceRecord {
        let signals = DeviceSignals::from_device(device);

        // Strict comparison keeps the earliest rule on ties
        let mut best: Option<(&CompiledRule, f64)> = None;
        for rule in &self.rules {
            let score = Self::score_rule(&signals, rule);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((rule, score));
            }
        }

        let classification = match best {
            Some((rule, score)) => self.classification_for(device, &rule.rule, score),
            None => Classification::unknown(),
        };

        debug!(
            "Classified device {} as {} ({}, score {:.1})",
            device.id().unwrap_or("<no id>"),
            classification.device_category,
            classification.network_layer,
            classification.classification_score
        );

        let mut classified = device.clone();
        classified.classification = Some(classification);
        classified
    }

    fn classification_for(&self, device: &DeviceRecord, rule: &CategoryRule, score: f64) -> Classification {
        let management_ip = if device.extra.contains_key("management_ip") {
            None
        } else {
            device.ip_address.clone().filter(|ip| !ip.is_empty())
        };

        Classification {
            device_category: rule.category,
            network_layer: rule.layer,
            classification_score: score,
            classification_confidence: (score / self.confidence_scale).min(1.0),
            expected_capabilities: rule.capabilities.clone(),
            typical_ports: typical_ports(rule.layer).map(str::to_string),
            power_typical: typical_power(rule.category).map(str::to_string),
            management_ip,
        }
    }

    /// Classify a batch of devices in parallel, preserving input order
    pub fn classify_batch(&self, devices: &[DeviceRecord]) -> Vec<DeviceRecord> {
        let classified: Vec<DeviceRecord> = devices.par_iter().map(|d| self.classify(d)).collect();
        info!("Classified {} devices", classified.len());
        classified
    }

    /// Number of devices per assigned category
    pub fn category_stats(devices: &[DeviceRecord]) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for device in devices {
            *stats.entry(device.category().to_string()).or_insert(0) += 1;
        }
        stats
    }

    /// Warnings for capabilities that contradict the assigned category
    pub fn validate_classification(device: &DeviceRecord) -> Vec<String> {
        let mut warnings = Vec::new();

        match device.category() {
            DeviceCategory::WirelessAp if device.has_capability("routing") => {
                warnings.push("Wireless AP should not have routing capabilities".to_string());
            }
            DeviceCategory::Workstation if device.has_capability("poe") => {
                warnings.push("Workstation should not have PoE capabilities".to_string());
            }
            _ => {}
        }

        warnings
    }
}

/// Typical port-count band for a layer
fn typical_ports(layer: NetworkLayer) -> Option<&'static str> {
    match layer {
        NetworkLayer::Access => Some("24-48"),
        NetworkLayer::Distribution => Some("24-96"),
        NetworkLayer::Core => Some("4-16"),
        _ => None,
    }
}

/// Typical power draw for a category
fn typical_power(category: DeviceCategory) -> Option<&'static str> {
    match category {
        c if c.is_switch() => Some("100-500W"),
        DeviceCategory::CoreRouter => Some("50-200W"),
        DeviceCategory::WirelessAp => Some("10-30W"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(device: &DeviceRecord) -> Classification {
        DeviceClassifier::new()
            .classify(device)
            .classification
            .unwrap()
    }

    #[test]
    fn test_fortigate_is_core_router() {
        let device = DeviceRecord::new("fw1", "FortiGate-60F")
            .with_model("FG-60F")
            .with_vendor("fortinet");
        let c = classification(&device);

        assert_eq!(c.device_category, DeviceCategory::CoreRouter);
        assert_eq!(c.network_layer, NetworkLayer::Core);
        assert_eq!(c.classification_score, 5.0);
        assert_eq!(c.classification_confidence, 0.5);
        assert_eq!(c.typical_ports.as_deref(), Some("4-16"));
        assert_eq!(c.power_typical.as_deref(), Some("50-200W"));
    }

    #[test]
    fn test_no_signal_is_unknown() {
        let device = DeviceRecord::new("x1", "Blob").with_vendor("acme");
        let c = classification(&device);

        assert_eq!(c, Classification::unknown());
    }

    #[test]
    fn test_ties_go_to_earlier_rule() {
        // Vendor alone scores 3.0 for all four infrastructure rules
        let device = DeviceRecord::new("d1", "Unit").with_vendor("Cisco");
        let scores = DeviceClassifier::new().score_device(&device);
        assert_eq!(scores[0], (DeviceCategory::CoreRouter, 3.0));
        assert_eq!(scores[3], (DeviceCategory::WirelessAp, 3.0));

        assert_eq!(classification(&device).device_category, DeviceCategory::CoreRouter);
    }

    #[test]
    fn test_capabilities_and_oui_signals() {
        let device = DeviceRecord::new("vm1", "build-host")
            .with_mac("00:50:56:01:02:03")
            .with_capabilities(["Computing", "computing"]);
        let scores: BTreeMap<_, _> = DeviceClassifier::new().score_device(&device).into_iter().collect();

        // OUI hit (2.0) plus one distinct shared capability (1.5)
        assert_eq!(scores[&DeviceCategory::Workstation], 3.5);
        assert_eq!(scores[&DeviceCategory::Server], 1.5);
        assert_eq!(classification(&device).device_category, DeviceCategory::Workstation);
    }

    #[test]
    fn test_model_pattern_bonus() {
        let device = DeviceRecord::new("ap1", "Lobby").with_model("MR46");
        let c = classification(&device);

        // "mr" keyword (2.0) plus the mr\d+ pattern (1.5)
        assert_eq!(c.device_category, DeviceCategory::WirelessAp);
        assert_eq!(c.classification_score, 3.5);
        assert_eq!(c.power_typical.as_deref(), Some("10-30W"));
    }

    #[test]
    fn test_confidence_is_capped() {
        let device = DeviceRecord::new("core1", "core router gateway fortigate")
            .with_model("FortiGate-600E")
            .with_vendor("fortinet")
            .with_capabilities(["routing", "firewall", "vpn"]);
        let c = classification(&device);

        assert!(c.classification_score > 10.0);
        assert_eq!(c.classification_confidence, 1.0);
    }

    #[test]
    fn test_management_ip_inferred() {
        let device = DeviceRecord::new("sw1", "edge switch").with_ip("10.0.0.2");
        let c = classification(&device);
        assert_eq!(c.management_ip.as_deref(), Some("10.0.0.2"));

        let mut device = device;
        device.extra.insert("management_ip".to_string(), "10.9.9.9".into());
        assert_eq!(classification(&device).management_ip, None);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = DeviceClassifier::new();
        let device = DeviceRecord::new("sw9", "Distribution Switch 9")
            .with_vendor("meraki")
            .with_model("MS425-32");

        let first = classifier.classify(&device);
        let second = classifier.classify(&device);
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let devices = vec![
            DeviceRecord::new("a", "FortiGate").with_vendor("fortinet"),
            DeviceRecord::new("b", "Desktop 14"),
            DeviceRecord::new("c", "Nothing to see"),
        ];
        let classified = DeviceClassifier::new().classify_batch(&devices);

        assert_eq!(classified.len(), devices.len());
        let ids: Vec<_> = classified.iter().map(|d| d.id().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(classified[1].category(), DeviceCategory::Workstation);
        assert_eq!(classified[2].category(), DeviceCategory::Unknown);
    }

    #[test]
    fn test_category_stats() {
        let devices = DeviceClassifier::new().classify_batch(&[
            DeviceRecord::new("a", "workstation"),
            DeviceRecord::new("b", "desktop"),
            DeviceRecord::new("c", "??"),
        ]);
        let stats = DeviceClassifier::category_stats(&devices);

        assert_eq!(stats["workstation"], 2);
        assert_eq!(stats["unknown"], 1);
    }

    #[test]
    fn test_validate_classification() {
        let classifier = DeviceClassifier::new();

        let ap = classifier.classify(&DeviceRecord::new("ap", "wireless").with_capabilities(["wifi", "routing"]));
        assert_eq!(ap.category(), DeviceCategory::WirelessAp);
        assert_eq!(DeviceClassifier::validate_classification(&ap).len(), 1);

        let pc = classifier.classify(&DeviceRecord::new("pc", "desktop").with_capabilities(["poe"]));
        assert_eq!(
            DeviceClassifier::validate_classification(&pc),
            vec!["Workstation should not have PoE capabilities".to_string()]
        );
    }

    #[test]
    fn test_custom_rules_and_scale() {
        let config = ClassificationConfig {
            confidence_scale: 4.0,
            rules: Some(vec![CategoryRule {
                category: DeviceCategory::Server,
                keywords: vec!["nas".to_string()],
                vendors: vec!["synology".to_string()],
                capabilities: Vec::new(),
                layer: NetworkLayer::Service,
                priority: 1,
                model_patterns: Vec::new(),
            }]),
        };
        let classifier = DeviceClassifier::from_config(&config).unwrap();
        let c = classifier
            .classify(&DeviceRecord::new("n1", "nas01").with_vendor("Synology"))
            .classification
            .unwrap();

        assert_eq!(c.device_category, DeviceCategory::Server);
        assert_eq!(c.classification_score, 5.0);
        assert_eq!(c.classification_confidence, 1.0);
        assert_eq!(c.typical_ports, None);
    }

    #[test]
    fn test_from_config_rejects_non_positive_scale() {
        for scale in [0.0, -10.0, f64::NAN] {
            let config = ClassificationConfig {
                confidence_scale: scale,
                rules: None,
            };
            assert!(matches!(
                DeviceClassifier::from_config(&config),
                Err(ValidationError::InvalidClassification(_))
            ));
        }

        let config = ClassificationConfig {
            confidence_scale: 10.0,
            rules: Some(Vec::new()),
        };
        assert!(matches!(
            DeviceClassifier::from_config(&config),
            Err(ValidationError::InvalidRules(RuleError::EmptyTable))
        ));
    }
}
