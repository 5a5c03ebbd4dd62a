//! Websocket client for the Streamduck daemon.

mod api;
mod base;
mod client;
mod event;
mod message;

pub use api::{Operation, Request};
pub use base::{Device, DeviceIdentifier, NamespacedDeviceIdentifier, NamespacedName};
pub use client::{ClientConfig, StreamduckClient};
pub use event::StreamduckEvent;
pub use message::SocketEvent;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid daemon url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("not connected to the Streamduck daemon")]
    NotConnected,
    #[error("connection closed before a response arrived")]
    ConnectionClosed,
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid argument {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Request(String),
}
