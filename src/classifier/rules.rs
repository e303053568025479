//! Category rule table for the device classifier.
//!
//! Rules are kept in an explicit, ordered list: when two categories score
//! the same, the one listed first wins.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceCategory, NetworkLayer};

/// Scoring rule for one device category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: DeviceCategory,
    /// Substrings looked for in the device's name and model
    pub keywords: Vec<String>,
    #[serde(default)]
    pub vendors: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub layer: NetworkLayer,
    /// Base priority (informational; ties are broken by rule order)
    #[serde(default)]
    pub priority: u32,
    /// Case-insensitive regexes matched against the model string
    #[serde(default)]
    pub model_patterns: Vec<String>,
}

impl CategoryRule {
    fn new(
        category: DeviceCategory,
        keywords: &[&str],
        vendors: &[&str],
        capabilities: &[&str],
        layer: NetworkLayer,
        priority: u32,
        model_patterns: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            category,
            keywords: owned(keywords),
            vendors: owned(vendors),
            capabilities: owned(capabilities),
            layer,
            priority,
            model_patterns: owned(model_patterns),
        }
    }
}

/// Errors in a rule table. These are configuration defects, not data problems.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Classification rule table is empty")]
    EmptyTable,
    #[error("Duplicate classification rule for category '{0}'")]
    DuplicateCategory(DeviceCategory),
    #[error("Category 'unknown' is reserved for unmatched devices and cannot have a rule")]
    ReservedCategory,
    #[error("Invalid model pattern '{pattern}' for category '{category}': {source}")]
    InvalidPattern {
        category: DeviceCategory,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A rule with its matchers lower-cased and compiled
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub rule: CategoryRule,
    pub keywords: Vec<String>,
    pub vendors: Vec<String>,
    pub capabilities: Vec<String>,
    pub model_patterns: Vec<Regex>,
}

/// Check and compile a rule table, preserving its order
pub(crate) fn compile_rules(rules: Vec<CategoryRule>) -> Result<Vec<CompiledRule>, RuleError> {
    if rules.is_empty() {
        return Err(RuleError::EmptyTable);
    }

    let mut seen = Vec::with_capacity(rules.len());
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules {
        if rule.category == DeviceCategory::Unknown {
            return Err(RuleError::ReservedCategory);
        }
        if seen.contains(&rule.category) {
            return Err(RuleError::DuplicateCategory(rule.category));
        }
        seen.push(rule.category);

        let model_patterns = rule
            .model_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleError::InvalidPattern {
                        category: rule.category,
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let lower = |items: &[String]| items.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        compiled.push(CompiledRule {
            keywords: lower(&rule.keywords),
            vendors: lower(&rule.vendors),
            capabilities: lower(&rule.capabilities),
            model_patterns,
            rule,
        });
    }

    Ok(compiled)
}

/// The built-in rule table, in tie-break order
pub fn default_rules() -> Vec<CategoryRule> {
    use DeviceCategory::*;

    let infra_vendors = ["cisco", "fortinet", "meraki"];

    vec![
        // Network infrastructure
        CategoryRule::new(
            CoreRouter,
            &["router", "core", "gateway", "fortigate", "mx"],
            &["cisco", "fortinet", "meraki", "juniper"],
            &["routing", "firewall", "vpn"],
            NetworkLayer::Core,
            10,
            &[r"fortigate", r"mx\d+", r"asa\d+"],
        ),
        CategoryRule::new(
            DistributionSwitch,
            &["distribution", "switch", "fortiswitch", "ms"],
            &infra_vendors,
            &["switching", "vlan", "poe"],
            NetworkLayer::Distribution,
            8,
            &[],
        ),
        CategoryRule::new(
            AccessSwitch,
            &["access", "switch", "edge"],
            &infra_vendors,
            &["switching", "poe"],
            NetworkLayer::Access,
            6,
            &[r"fortiswitch", r"ms\d+", r"sg\d+"],
        ),
        CategoryRule::new(
            WirelessAp,
            &["ap", "access_point", "fortiap", "mr", "wireless"],
            &["cisco", "fortinet", "meraki", "aruba"],
            &["wifi", "wlan"],
            NetworkLayer::Access,
            7,
            &[r"fortiap", r"mr\d+", r"ap\d+"],
        ),
        // End devices
        CategoryRule::new(
            Workstation,
            &["workstation", "desktop", "laptop", "pc"],
            &[],
            &["computing"],
            NetworkLayer::Endpoint,
            3,
            &[],
        ),
        CategoryRule::new(
            MobileDevice,
            &["mobile", "phone", "tablet", "iphone", "android"],
            &[],
            &["mobile", "computing"],
            NetworkLayer::Endpoint,
            3,
            &[],
        ),
        CategoryRule::new(
            IotDevice,
            &["iot", "sensor", "camera", "printer", "iot_device"],
            &[],
            &["iot", "sensing"],
            NetworkLayer::Endpoint,
            2,
            &[],
        ),
        // Network services
        CategoryRule::new(
            Server,
            &["server", "vm", "virtual_machine", "hypervisor"],
            &[],
            &["computing", "serving"],
            NetworkLayer::Service,
            5,
            &[],
        ),
        CategoryRule::new(
            NetworkService,
            &["dhcp", "dns", "ntp", "syslog"],
            &[],
            &["service"],
            NetworkLayer::Service,
            4,
            &[],
        ),
    ]
}
