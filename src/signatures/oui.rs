//! Static MAC OUI signature table.
//!
//! A small, curated subset of the IEEE registry covering the vendors that
//! show up in managed enterprise networks, each tagged with the device
//! categories its hardware is normally classified as.

use crate::device::DeviceCategory;
use crate::utils::mac::oui_prefix;

/// One OUI prefix and what it tells us about the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuiSignature {
    /// Six upper-case hex digits
    pub prefix: &'static str,
    pub vendor: &'static str,
    /// Set only when the prefix pins down the kind of hardware
    pub device_type: Option<&'static str>,
    /// Categories this OUI is consistent with
    pub categories: &'static [DeviceCategory],
}

const FORTINET_CATEGORIES: &[DeviceCategory] =
    &[DeviceCategory::CoreRouter, DeviceCategory::WirelessAp];
const VIRTUAL_CATEGORIES: &[DeviceCategory] = &[DeviceCategory::Workstation];

pub const OUI_SIGNATURES: &[OuiSignature] = &[
    OuiSignature { prefix: "00090F", vendor: "fortinet", device_type: None, categories: FORTINET_CATEGORIES },
    OuiSignature { prefix: "085B0E", vendor: "fortinet", device_type: None, categories: FORTINET_CATEGORIES },
    OuiSignature { prefix: "704CA5", vendor: "fortinet", device_type: None, categories: FORTINET_CATEGORIES },
    OuiSignature { prefix: "906CAC", vendor: "fortinet", device_type: None, categories: FORTINET_CATEGORIES },
    OuiSignature { prefix: "00180A", vendor: "meraki", device_type: None, categories: &[] },
    OuiSignature { prefix: "881544", vendor: "meraki", device_type: None, categories: &[] },
    OuiSignature { prefix: "000B86", vendor: "aruba", device_type: Some("access_point"), categories: &[DeviceCategory::WirelessAp] },
    OuiSignature { prefix: "000C29", vendor: "vmware", device_type: Some("virtual_machine"), categories: VIRTUAL_CATEGORIES },
    OuiSignature { prefix: "005056", vendor: "vmware", device_type: Some("virtual_machine"), categories: VIRTUAL_CATEGORIES },
    OuiSignature { prefix: "080027", vendor: "virtualbox", device_type: Some("virtual_machine"), categories: VIRTUAL_CATEGORIES },
];

/// Look up the signature for a MAC address in any common notation
pub fn lookup_oui(mac: &str) -> Option<&'static OuiSignature> {
    let prefix = oui_prefix(mac)?;
    let found = OUI_SIGNATURES.iter().find(|sig| sig.prefix == prefix);

    match found {
        Some(sig) => log::debug!("OUI lookup for {}: {}", mac, sig.vendor),
        None => log::debug!("OUI lookup for {}: not in signature table", mac),
    }

    found
}
