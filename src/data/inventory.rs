//! Installed software inventory structures

use std::collections::BTreeMap;

/// Installed program name mapped to its version string
pub type Inventory = BTreeMap<String, String>;

/// Result of comparing one installed program against its latest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareStatus {
    pub name: String,
    pub installed: String,
    /// Newer version when one is available
    pub available: Option<String>,
}

impl SoftwareStatus {
    pub fn has_update(&self) -> bool {
        self.available.is_some()
    }
}
