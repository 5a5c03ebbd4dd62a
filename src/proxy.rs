//! Capability proxy over an RPC client.
//!
//! The webview cannot hold a live reference to the daemon client, so the
//! client's surface is enumerated once at startup and every operation is
//! wrapped into a callable that yields plain data. Primitive results come
//! back immediately; anything object-shaped (including pending requests)
//! comes back as a deferred value with a uniform failure message.

use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{BridgeError, Result};

/// Surface entry that is never treated as an operation.
pub const CONSTRUCTOR: &str = "constructor";

/// A pending result from the underlying client. The error is the raw reason.
pub type Deferred = BoxFuture<'static, std::result::Result<Value, String>>;

/// What a client hands back for a single call.
pub enum Invocation {
    Immediate(Value),
    Deferred(Deferred),
}

/// A client whose operations can be proxied.
///
/// `surface` plays the role of runtime reflection: it lists every name the
/// client answers to, and may include [`CONSTRUCTOR`]. `invoke` must dispatch
/// the request before returning so that calls reach the client in the order
/// they were issued.
pub trait RpcClient: Send + Sync + 'static {
    fn surface(&self) -> Vec<&'static str>;

    fn invoke(&self, operation: &str, args: Vec<Value>) -> Invocation;
}

/// Result of calling a proxied operation.
pub enum Reply {
    Value(Value),
    Deferred(BoxFuture<'static, Result<Value>>),
}

impl Reply {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Reply::Deferred(_))
    }

    /// Resolve to the final value, awaiting if deferred.
    pub async fn settle(self) -> Result<Value> {
        match self {
            Reply::Value(value) => Ok(value),
            Reply::Deferred(pending) => pending.await,
        }
    }
}

/// Receives one message per failed proxied call, before the failure is returned.
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

type Wrapper = Box<dyn Fn(Vec<Value>) -> Reply + Send + Sync>;

pub fn failure_message(operation: &str, reason: &str) -> String {
    format!("Failed {} request: {}", operation, reason)
}

fn is_object(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

pub struct CapabilityProxy {
    operations: BTreeMap<String, Wrapper>,
}

impl CapabilityProxy {
    /// Build the proxy, logging call failures through `tracing`.
    pub fn generate(client: Arc<dyn RpcClient>) -> Self {
        Self::generate_with_sink(
            client,
            Arc::new(|message: &str| tracing::warn!("{}", message)),
        )
    }

    pub fn generate_with_sink(client: Arc<dyn RpcClient>, sink: DiagnosticSink) -> Self {
        let mut operations: BTreeMap<String, Wrapper> = BTreeMap::new();

        for name in client.surface() {
            if name == CONSTRUCTOR || operations.contains_key(name) {
                continue;
            }
            operations.insert(
                name.to_string(),
                wrap(Arc::clone(&client), name, Arc::clone(&sink)),
            );
        }

        tracing::debug!(count = operations.len(), "capability proxy generated");
        Self { operations }
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.keys().cloned().collect()
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Call a proxied operation. Names outside the proxy never reach the client.
    pub fn call(&self, operation: &str, args: Vec<Value>) -> Result<Reply> {
        let wrapper = self
            .operations
            .get(operation)
            .ok_or_else(|| BridgeError::UnknownOperation(operation.to_string()))?;
        Ok(wrapper(args))
    }
}

fn wrap(client: Arc<dyn RpcClient>, operation: &'static str, sink: DiagnosticSink) -> Wrapper {
    Box::new(move |args| match client.invoke(operation, args) {
        Invocation::Immediate(value) if is_object(&value) => {
            Reply::Deferred(Box::pin(future::ready(Ok(value))))
        }
        Invocation::Immediate(value) => Reply::Value(value),
        Invocation::Deferred(pending) => {
            let sink = Arc::clone(&sink);
            Reply::Deferred(Box::pin(async move {
                pending.await.map_err(|reason| {
                    let message = failure_message(operation, &reason);
                    sink(&message);
                    BridgeError::OperationFailed(message)
                })
            }))
        }
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
