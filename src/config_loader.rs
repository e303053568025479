use crate::config::PipelineConfig;
use crate::orchestrator::PipelineInput;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and validate pipeline configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<PipelineConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: PipelineConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    if config.classification.rules.is_some() {
        info!("Using custom classification rule table");
    }

    config.validate()?;

    Ok(config)
}

/// Load devices and connections from a JSON file
pub fn load_input(input_path: &Path) -> Result<PipelineInput> {
    info!("Loading devices from: {:?}", input_path);

    let file = File::open(input_path)
        .wrap_err_with(|| format!("Failed to open input file '{}'", input_path.display()))?;

    let input: PipelineInput = serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to parse input file '{}'", input_path.display()))?;

    info!(
        "Loaded {} devices and {} connection entries",
        input.devices.len(),
        input.connections.len()
    );

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
layout:
  layer_height: 250
  seed: 42
optimize: true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.layout.layer_height, 250.0);
        assert_eq!(config.layout.seed, 42);
        assert_eq!(config.layout.device_spacing, 150.0);
        assert!(config.optimize);
        assert!(config.classification.rules.is_none());
    }

    #[test]
    fn test_load_config_with_rules() {
        let yaml = r#"
classification:
  confidence_scale: 5.0
  rules:
    - category: core_router
      keywords: [gateway]
      layer: core
      priority: 10
    - category: iot_device
      keywords: [camera]
      layer: endpoint
      priority: 2
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let rules = config.classification.rules.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].category, DeviceCategory::IotDevice);
    }

    #[test]
    fn test_load_config_rejects_invalid_layout() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "layout:\n  device_spacing: -1\n").unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/netmapper.yaml")).is_err());
    }

    #[test]
    fn test_load_input() {
        let json = r#"{
            "devices": [
                {"id": "fw1", "name": "Gateway", "type": "firewall"},
                {"id": "sw1", "name": "Switch", "type": "switch", "rack": "A3"}
            ],
            "connections": [["fw1", "sw1"], "fw1->sw1"]
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json).unwrap();

        let input = load_input(temp_file.path()).unwrap();
        assert_eq!(input.devices.len(), 2);
        assert_eq!(input.connections.len(), 2);
        assert_eq!(input.devices[1].extra["rack"], "A3");
    }
}
