//! # Netmapper - Device classification and layered topology layout
//!
//! This library turns a raw inventory of network devices and the links
//! between them into a classified, layered topology ready for 3D rendering.
//!
//! ## Overview
//!
//! Upstream collectors deliver partially described devices: a MAC address
//! here, a model string there, sometimes only a name. Netmapper recovers
//! vendor and type hints from those signals, scores every device against a
//! table of category rules, and arranges the result into stacked layers
//! (core, distribution, access, endpoints) with deterministic coordinates.
//!
//! ## Key Features
//!
//! - **Signature Matching**: MAC OUI, model-family and IP-scope hints with fixed confidences
//! - **Rule-based Classification**: Weighted keyword, vendor, capability, OUI and model-pattern scoring
//! - **Custom Rule Tables**: Replace the built-in categories from YAML
//! - **Layered Layout**: Reproducible positions; depth jitter seeded per device id
//! - **Spacing Pass**: Minimum horizontal gap per layer, idempotent
//! - **Validation**: Dangling links, missing ids and malformed connections reported, never panicked on
//!
//! ## Architecture
//!
//! - `device`: Typed device records, enrichment, filtering and field checks
//! - `signatures`: Static OUI and model-family signature tables
//! - `classifier`: Category rules and the scoring classifier
//! - `topology`: Layer assignment, layout, spacing pass and validation
//! - `config`: Layout and classification settings
//! - `config_loader`: YAML configuration and JSON input loading
//! - `orchestrator`: End-to-end pipeline runs
//! - `utils`: MAC and IP helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use netmapper::{config_loader, orchestrator::Pipeline};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("netmapper.yaml"))?;
//! let input = config_loader::load_input(Path::new("devices.json"))?;
//!
//! let output = Pipeline::from_config(&config)?.run(input);
//! println!("{}", serde_json::to_string_pretty(&output.topology)?);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! Every section is optional:
//!
//! ```yaml
//! layout:
//!   layer_height: 200
//!   device_spacing: 150
//!   min_spacing: 120
//!   depth_jitter: 50
//!   seed: 0
//!
//! classification:
//!   confidence_scale: 10.0
//!
//! optimize: false
//! ```
//!
//! ## Error Handling
//!
//! Library modules report domain errors through `thiserror` enums
//! (`RuleError`, `ValidationError`). File loading and the binary use
//! `color_eyre` for error reports with context. Malformed device or
//! connection data is never an error: it surfaces as warnings and
//! validation findings.

pub mod classifier;
pub mod config;
pub mod config_loader;
pub mod device;
pub mod orchestrator;
pub mod signatures;
pub mod topology;
pub mod utils;
