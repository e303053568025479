//! MAC address normalisation helpers.

use regex::Regex;
use std::sync::LazyLock;

/// Match: "00:09:0F:AA:BB:CC" or "00-09-0F-AA-BB-CC"
static MAC_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("Invalid MAC format regex")
});

/// Strip separators from a MAC address and upper-case it.
///
/// Returns `None` unless at least six hex digits remain (enough for an OUI).
pub fn normalize_mac(mac: &str) -> Option<String> {
    let cleaned: String = mac.trim().replace([':', '-', '.'], "").to_uppercase();

    if cleaned.len() < 6 || !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(cleaned)
}

/// The vendor prefix (first six hex digits) of a MAC address
pub fn oui_prefix(mac: &str) -> Option<String> {
    normalize_mac(mac).map(|m| m[..6].to_string())
}

/// Check for the canonical `XX:XX:XX:XX:XX:XX` or `XX-XX-XX-XX-XX-XX` form
pub fn is_valid_mac_format(mac: &str) -> bool {
    MAC_FORMAT.is_match(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mac() {
        assert_eq!(normalize_mac("00:09:0f:aa:bb:cc"), Some("00090FAABBCC".to_string()));
        assert_eq!(normalize_mac("0009.0faa.bbcc"), Some("00090FAABBCC".to_string()));
        assert_eq!(normalize_mac("00-0C-29"), Some("000C29".to_string()));
        assert_eq!(normalize_mac("00:0C"), None);
        assert_eq!(normalize_mac("zz:zz:zz:zz:zz:zz"), None);
    }

    #[test]
    fn test_oui_prefix() {
        assert_eq!(oui_prefix("08:00:27:12:34:56"), Some("080027".to_string()));
        assert_eq!(oui_prefix(""), None);
    }

    #[test]
    fn test_mac_format() {
        assert!(is_valid_mac_format("00:09:0F:AA:BB:CC"));
        assert!(is_valid_mac_format("00-09-0f-aa-bb-cc"));
        assert!(!is_valid_mac_format("0009.0faa.bbcc"));
        assert!(!is_valid_mac_format("00:09:0F:AA:BB"));
    }
}
