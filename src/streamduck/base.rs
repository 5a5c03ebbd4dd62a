//! Identifiers shared by requests, responses and events.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct NamespacedName {
    pub plugin_name: String,
    pub name: String,
}

impl NamespacedName {
    pub fn core(name: &str) -> NamespacedName {
        NamespacedName {
            plugin_name: "Core".to_string(),
            name: name.to_string(),
        }
    }
}

impl Display for NamespacedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.plugin_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceIdentifier {
    pub identifier: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct NamespacedDeviceIdentifier {
    #[serde(rename = "NamespacedName")]
    pub name: NamespacedName,
    #[serde(rename = "DeviceIdentifier")]
    pub identifier: DeviceIdentifier,
}

impl Display for NamespacedDeviceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) by {}",
            self.identifier.identifier, self.identifier.description, self.name
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Device {
    pub identifier: NamespacedDeviceIdentifier,
    pub connected: bool,
    pub autoconnect: bool,
}
