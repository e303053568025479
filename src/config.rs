use serde::{Deserialize, Serialize};

use crate::classifier::rules::{compile_rules, CategoryRule, RuleError};

/// Pipeline configuration; every section has defaults so an empty file is valid
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// Run the spacing pass after building the layout
    #[serde(default)]
    pub optimize: bool,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.layout.validate()?;
        self.classification.validate()?;
        Ok(())
    }
}

/// Layered layout geometry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance between consecutive layers
    pub layer_height: f64,
    /// Horizontal distance between devices when first placed
    pub device_spacing: f64,
    /// Minimum horizontal gap enforced by the spacing pass
    pub min_spacing: f64,
    /// Reported depth of the layout volume
    pub depth: f64,
    /// `z` is drawn from `[-depth_jitter, depth_jitter]`
    pub depth_jitter: f64,
    /// Mixed into every device's depth jitter
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_height: 200.0,
            device_spacing: 150.0,
            min_spacing: 120.0,
            depth: 100.0,
            depth_jitter: 50.0,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("layer_height", self.layer_height),
            ("device_spacing", self.device_spacing),
            ("min_spacing", self.min_spacing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidLayout(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(ValidationError::InvalidLayout(format!(
                "depth cannot be negative, got {}",
                self.depth
            )));
        }
        if !self.depth_jitter.is_finite() || self.depth_jitter < 0.0 {
            return Err(ValidationError::InvalidLayout(format!(
                "depth_jitter cannot be negative, got {}",
                self.depth_jitter
            )));
        }

        Ok(())
    }
}

/// Classifier settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Score that maps to full confidence
    pub confidence_scale: f64,
    /// Replaces the built-in rule table when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<CategoryRule>>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            confidence_scale: 10.0,
            rules: None,
        }
    }
}

impl ClassificationConfig {
    /// Validate the confidence scale and any custom rule table
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.confidence_scale.is_finite() || self.confidence_scale <= 0.0 {
            return Err(ValidationError::InvalidClassification(format!(
                "confidence_scale must be a positive number, got {}",
                self.confidence_scale
            )));
        }

        if let Some(rules) = &self.rules {
            compile_rules(rules.clone())?;
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid layout configuration: {0}")]
    InvalidLayout(String),
    #[error("Invalid classification configuration: {0}")]
    InvalidClassification(String),
    #[error("Invalid classification rules: {0}")]
    InvalidRules(#[from] RuleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: PipelineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.layout.layer_height, 200.0);
        assert_eq!(config.layout.device_spacing, 150.0);
        assert_eq!(config.layout.min_spacing, 120.0);
        assert_eq!(config.classification.confidence_scale, 10.0);
        assert!(!config.optimize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_layout_section() {
        let yaml = r#"
layout:
  min_spacing: 80
  seed: 42
optimize: true
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.min_spacing, 80.0);
        assert_eq!(config.layout.seed, 42);
        assert_eq!(config.layout.layer_height, 200.0);
        assert!(config.optimize);
    }

    #[test]
    fn test_rejects_bad_layout() {
        let mut config = PipelineConfig::default();
        config.layout.device_spacing = 0.0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidLayout(_))));

        let mut config = PipelineConfig::default();
        config.layout.depth_jitter = -1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.layout.min_spacing = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_classification() {
        let mut config = PipelineConfig::default();
        config.classification.confidence_scale = -10.0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidClassification(_))
        ));

        let mut config = PipelineConfig::default();
        config.classification.rules = Some(Vec::new());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRules(RuleError::EmptyTable))
        ));
    }
}
