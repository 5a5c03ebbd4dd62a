use serde::de::DeserializeOwned;
use serde::Serialize;

use super::base::{Device, NamespacedDeviceIdentifier};
use super::message::SocketEvent;

/// Events forwarded to the webview as `streamduck-event`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum StreamduckEvent {
    ClientConnected,
    ClientDisconnected,
    SocketError(String),
    DeviceConnected(Device),
    DeviceDisconnected(NamespacedDeviceIdentifier),
    DeviceAppeared(Device),
    DeviceDisappeared(NamespacedDeviceIdentifier),
    Other(SocketEvent),
}

fn payload<T: DeserializeOwned>(event: &SocketEvent) -> Option<T> {
    let data = event.data.clone()?;
    match serde_json::from_value(data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(
                plugin = %event.plugin_name,
                event = %event.event_name,
                "failed to parse event payload: {}",
                e
            );
            None
        }
    }
}

impl From<SocketEvent> for StreamduckEvent {
    fn from(event: SocketEvent) -> Self {
        let known = match (event.plugin_name.as_str(), event.event_name.as_str()) {
            ("Core", "Device Connected") => payload(&event).map(Self::DeviceConnected),
            ("Core", "Device Disconnected") => payload(&event).map(Self::DeviceDisconnected),
            ("Core", "Device Appeared") => payload(&event).map(Self::DeviceAppeared),
            ("Core", "Device Disappeared") => payload(&event).map(Self::DeviceDisappeared),
            _ => None,
        };
        known.unwrap_or(Self::Other(event))
    }
}
