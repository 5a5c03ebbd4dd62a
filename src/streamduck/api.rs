//! The daemon operations this client knows about.
//!
//! [`Operation::ALL`] is the client's capability surface. Each deferred
//! operation maps to one daemon request name; arguments arrive as JSON and
//! are decoded positionally.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::base::{NamespacedDeviceIdentifier, NamespacedName};
use super::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    IsConnected,
    RequestTimeout,
    CoreVersion,
    ListDevices,
    SetDeviceAutoconnect,
    GetDeviceInputs,
    ConnectDevice,
    GetDeviceItems,
    GetDeviceScreenStack,
    PopScreen,
    PushNewEmptyScreen,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::IsConnected,
        Operation::RequestTimeout,
        Operation::CoreVersion,
        Operation::ListDevices,
        Operation::SetDeviceAutoconnect,
        Operation::GetDeviceInputs,
        Operation::ConnectDevice,
        Operation::GetDeviceItems,
        Operation::GetDeviceScreenStack,
        Operation::PopScreen,
        Operation::PushNewEmptyScreen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::IsConnected => "is_connected",
            Operation::RequestTimeout => "request_timeout",
            Operation::CoreVersion => "core_version",
            Operation::ListDevices => "list_devices",
            Operation::SetDeviceAutoconnect => "set_device_autoconnect",
            Operation::GetDeviceInputs => "get_device_inputs",
            Operation::ConnectDevice => "connect_device",
            Operation::GetDeviceItems => "get_device_items",
            Operation::GetDeviceScreenStack => "get_device_screen_stack",
            Operation::PopScreen => "pop_screen",
            Operation::PushNewEmptyScreen => "push_new_empty_screen",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Operations answered locally, without a round trip.
    pub fn is_immediate(self) -> bool {
        matches!(self, Operation::IsConnected | Operation::RequestTimeout)
    }

    /// Build the daemon request for a deferred operation.
    pub fn request(self, args: &[Value]) -> Result<Request, ClientError> {
        let request = match self {
            Operation::IsConnected | Operation::RequestTimeout => {
                return Err(ClientError::InvalidArgument(format!(
                    "{} is answered locally",
                    self.name()
                )))
            }
            Operation::CoreVersion => Request::empty("Socket Version"),
            Operation::ListDevices => Request::empty("List Devices"),
            Operation::SetDeviceAutoconnect => Request::new(
                "Set Device Autoconnect",
                &SetDeviceAutoconnect {
                    identifier: arg(args, 0, "identifier")?,
                    autoconnect: arg(args, 1, "autoconnect")?,
                },
            )?,
            Operation::GetDeviceInputs => {
                Request::new("Get Device Inputs", &ForDevice::decode(args)?)?
            }
            Operation::ConnectDevice => Request::new("Connect Device", &ForDevice::decode(args)?)?,
            Operation::GetDeviceItems => Request::new(
                "Get Device Items",
                &GetDeviceItems {
                    identifier: arg(args, 0, "identifier")?,
                    get_previews: arg::<Option<bool>>(args, 1, "previews")?.unwrap_or(false),
                },
            )?,
            Operation::GetDeviceScreenStack => {
                Request::new("Get Device Screen Stack", &ForDevice::decode(args)?)?
            }
            Operation::PopScreen => Request::new("Pop Screen", &ForDevice::decode(args)?)?,
            Operation::PushNewEmptyScreen => {
                Request::new("Push New Empty Screen", &ForDevice::decode(args)?)?
            }
        };
        Ok(request)
    }
}

/// Name and payload of a daemon request, ready to be wrapped in an envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub name: NamespacedName,
    pub data: Value,
}

impl Request {
    fn empty(name: &str) -> Request {
        Request {
            name: NamespacedName::core(name),
            data: Value::Null,
        }
    }

    fn new<T: Serialize>(name: &str, body: &T) -> Result<Request, ClientError> {
        Ok(Request {
            name: NamespacedName::core(name),
            data: serde_json::to_value(body)?,
        })
    }
}

/// Positional argument; a missing slot decodes as `null`.
fn arg<T: DeserializeOwned>(args: &[Value], index: usize, name: &str) -> Result<T, ClientError> {
    let value = args.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| ClientError::InvalidArgument(format!("{}: {}", name, e)))
}

// ── Request Bodies ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForDevice {
    identifier: NamespacedDeviceIdentifier,
}

impl ForDevice {
    fn decode(args: &[Value]) -> Result<ForDevice, ClientError> {
        Ok(ForDevice {
            identifier: arg(args, 0, "identifier")?,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SetDeviceAutoconnect {
    identifier: NamespacedDeviceIdentifier,
    autoconnect: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetDeviceItems {
    identifier: NamespacedDeviceIdentifier,
    get_previews: bool,
}
