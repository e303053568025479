//! Device classification.
//!
//! Assigns each device a category, a network layer and a confidence by
//! scoring it against an ordered table of category rules.

pub mod device_classifier;
pub mod rules;

pub use device_classifier::DeviceClassifier;
pub use rules::{default_rules, CategoryRule, RuleError};
