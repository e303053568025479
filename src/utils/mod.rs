//! Shared utilities: MAC normalisation and IP helpers.

pub mod ip_utils;
pub mod mac;

pub use ip_utils::{is_private_ip, is_valid_ipv4};
pub use mac::{is_valid_mac_format, normalize_mac, oui_prefix};
