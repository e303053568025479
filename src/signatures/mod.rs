//! Device signature matching.
//!
//! Recovers vendor, type and capability hints from a device's MAC address,
//! model string or IP address using static signature tables.

pub mod matcher;
pub mod oui;

pub use matcher::{MatchSource, SignatureMatch, SignatureMatcher};
pub use oui::{lookup_oui, OuiSignature, OUI_SIGNATURES};
