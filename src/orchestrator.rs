//! Pipeline orchestrator.
//!
//! This module coordinates one end-to-end run: signature enrichment,
//! classification, topology construction, the optional spacing pass and
//! validation. A `Pipeline` holds only immutable collaborators, so a single
//! instance can serve concurrent runs.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::classifier::DeviceClassifier;
use crate::config::{PipelineConfig, ValidationError};
use crate::device::{enrich_devices, validate_devices, DeviceRecord};
use crate::signatures::SignatureMatcher;
use crate::topology::{ConnectionEntry, TopologyBuilder, TopologyGraph, ValidationReport};

/// Devices and connections as delivered by upstream collectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineInput {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
}

/// Everything one run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub topology: TopologyGraph,
    pub validation: ValidationReport,
    pub category_stats: BTreeMap<String, usize>,
    /// Field format problems (missing name, malformed MAC or IP)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<String>,
    /// Capabilities that contradict a device's assigned category
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classification_warnings: Vec<String>,
}

/// Configured classification and layout pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    matcher: SignatureMatcher,
    classifier: DeviceClassifier,
    builder: TopologyBuilder,
    optimize: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            matcher: SignatureMatcher::new(),
            classifier: DeviceClassifier::new(),
            builder: TopologyBuilder::new(),
            optimize: false,
        }
    }
}

impl Pipeline {
    /// Build a pipeline from configuration.
    ///
    /// Fails when the layout settings, confidence scale or rule table are
    /// unusable.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            matcher: SignatureMatcher::new(),
            classifier: DeviceClassifier::from_config(&config.classification)?,
            builder: TopologyBuilder::with_config(config.layout.clone()),
            optimize: config.optimize,
        })
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn classifier(&self) -> &DeviceClassifier {
        &self.classifier
    }

    pub fn builder(&self) -> &TopologyBuilder {
        &self.builder
    }

    /// Enrich and classify devices, preserving order and count
    pub fn classify(&self, devices: &[DeviceRecord]) -> Vec<DeviceRecord> {
        let enriched = enrich_devices(&self.matcher, devices);
        self.classifier.classify_batch(&enriched)
    }

    /// Run the full pipeline over one input
    pub fn run(&self, input: PipelineInput) -> PipelineOutput {
        info!(
            "Running pipeline over {} devices and {} connection entries",
            input.devices.len(),
            input.connections.len()
        );

        let (_, field_errors) = validate_devices(&input.devices);
        for error in &field_errors {
            warn!("{}", error);
        }

        let classified = self.classify(&input.devices);
        let category_stats = DeviceClassifier::category_stats(&classified);
        let classification_warnings: Vec<String> = classified
            .iter()
            .flat_map(|device| {
                let id = device.id().unwrap_or("<no id>").to_string();
                DeviceClassifier::validate_classification(device)
                    .into_iter()
                    .map(move |w| format!("Device {}: {}", id, w))
            })
            .collect();

        let mut topology = self.builder.build_topology(classified, input.connections);
        if self.optimize {
            topology.layout = self.builder.optimize_layout(topology.layout);
        }

        let validation = self.builder.validate_topology(&topology);

        PipelineOutput {
            topology,
            validation,
            category_stats,
            field_errors,
            classification_warnings,
        }
    }
}
