use futures::future;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use url::Url;
use uuid::Uuid;

use super::api::{Operation, Request};
use super::event::StreamduckEvent;
use super::message::{Incoming, SocketMessage, SocketResponse};
use super::ClientError;
use crate::proxy::{Deferred, Invocation, RpcClient};

const EVENT_BUFFER: usize = 50;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    pub request_timeout: Duration,
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    pub fn new(url: &str, request_timeout_ms: u64) -> Result<ClientConfig, ClientError> {
        Ok(ClientConfig {
            url: Url::parse(url)?,
            request_timeout: Duration::from_millis(request_timeout_ms),
            reconnect_delay: Duration::from_secs(2),
        })
    }
}

type Pending = Arc<Mutex<HashMap<String, oneshot::Sender<SocketResponse>>>>;

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<String, oneshot::Sender<SocketResponse>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A serialized request waiting for the connection task.
#[derive(Debug)]
struct Outgoing {
    request_id: String,
    text: String,
}

fn rejected(error: ClientError) -> Deferred {
    Box::pin(future::ready(Err(error.to_string())))
}

// ── Client ───────────────────────────────────────────────────────────────────

/// Handle shared with the capability proxy. Requests are queued to the
/// connection task and answered through the pending-request table.
pub struct StreamduckClient {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    pending: Pending,
    connected: Arc<AtomicBool>,
    request_timeout: Duration,
}

impl StreamduckClient {
    /// Start the connection task. It keeps reconnecting for the life of the
    /// runtime; requests made while disconnected fail straight away.
    pub fn spawn(config: ClientConfig) -> (Arc<StreamduckClient>, mpsc::Receiver<StreamduckEvent>) {
        let (client, outgoing, link, events) = Self::pair(config.request_timeout);
        tokio::spawn(run_connection(config, outgoing, link));
        (client, events)
    }

    fn pair(
        request_timeout: Duration,
    ) -> (
        Arc<StreamduckClient>,
        mpsc::UnboundedReceiver<Outgoing>,
        Link,
        mpsc::Receiver<StreamduckEvent>,
    ) {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let client = Arc::new(StreamduckClient {
            outgoing: outgoing_tx,
            pending: Arc::default(),
            connected: Arc::default(),
            request_timeout,
        });
        let link = Link {
            pending: Arc::clone(&client.pending),
            connected: Arc::clone(&client.connected),
            events: event_tx,
        };
        (client, outgoing_rx, link, event_rx)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout.as_millis() as u64
    }

    /// Queue a request and return its pending answer. The request is on the
    /// outgoing queue by the time this returns.
    pub fn send(&self, request: Request) -> Deferred {
        if !self.is_connected() {
            return rejected(ClientError::NotConnected);
        }

        let request_id = Uuid::new_v4().to_string();
        let packet = SocketMessage {
            name: request.name,
            data: request.data,
            request_id: request_id.clone(),
        };
        let text = match serde_json::to_string(&packet) {
            Ok(text) => text,
            Err(e) => return rejected(e.into()),
        };

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(request_id.clone(), tx);
        let frame = Outgoing {
            request_id: request_id.clone(),
            text,
        };
        if self.outgoing.send(frame).is_err() {
            lock(&self.pending).remove(&request_id);
            return rejected(ClientError::ConnectionClosed);
        }

        let pending = Arc::clone(&self.pending);
        let timeout = self.request_timeout;
        Box::pin(async move {
            match tokio::time::timeout(timeout, rx).await {
                Ok(Ok(response)) => response.into_result(),
                Ok(Err(_)) => Err(ClientError::ConnectionClosed.to_string()),
                Err(_) => {
                    lock(&pending).remove(&request_id);
                    Err(ClientError::Timeout(timeout.as_millis() as u64).to_string())
                }
            }
        })
    }
}

impl RpcClient for StreamduckClient {
    fn surface(&self) -> Vec<&'static str> {
        Operation::ALL.iter().map(|op| op.name()).collect()
    }

    fn invoke(&self, operation: &str, args: Vec<Value>) -> Invocation {
        let Some(op) = Operation::from_name(operation) else {
            return Invocation::Deferred(rejected(ClientError::Request(format!(
                "unsupported operation {}",
                operation
            ))));
        };

        match op {
            Operation::IsConnected => Invocation::Immediate(Value::Bool(self.is_connected())),
            Operation::RequestTimeout => Invocation::Immediate(json!(self.request_timeout_ms())),
            _ => match op.request(&args) {
                Ok(request) => Invocation::Deferred(self.send(request)),
                Err(e) => Invocation::Deferred(rejected(e)),
            },
        }
    }
}

// ── Connection ───────────────────────────────────────────────────────────────

/// Connection-side view of the client's shared state.
struct Link {
    pending: Pending,
    connected: Arc<AtomicBool>,
    events: mpsc::Sender<StreamduckEvent>,
}

impl Link {
    async fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        let event = if connected {
            StreamduckEvent::ClientConnected
        } else {
            StreamduckEvent::ClientDisconnected
        };
        self.events.send(event).await.ok();
    }

    /// Dropping the senders fails every outstanding request.
    fn fail_pending(&self) {
        lock(&self.pending).clear();
    }

    /// A request whose caller already gave up (timeout or disconnect) has no
    /// pending slot and must not reach the daemon.
    fn is_pending(&self, request_id: &str) -> bool {
        lock(&self.pending).contains_key(request_id)
    }

    /// Fail outstanding requests and discard frames queued for this session.
    async fn end_session(&self, outgoing: &mut mpsc::UnboundedReceiver<Outgoing>) {
        self.set_connected(false).await;
        self.fail_pending();
        let mut discarded = 0;
        while outgoing.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "dropped requests queued before disconnect");
        }
    }

    async fn route(&self, text: &str) {
        match serde_json::from_str::<Incoming>(text) {
            Ok(Incoming::Response(response)) => {
                let sender = lock(&self.pending).remove(&response.request_id);
                match sender {
                    Some(sender) => {
                        sender.send(response).ok();
                    }
                    None => tracing::debug!(
                        request_id = %response.request_id,
                        "response for unknown request"
                    ),
                }
            }
            Ok(Incoming::Event(event)) => {
                self.events.send(StreamduckEvent::from(event)).await.ok();
            }
            Ok(Incoming::Error(error)) => {
                tracing::warn!("daemon reported error: {}", error.error);
                self.events
                    .send(StreamduckEvent::SocketError(error.error))
                    .await
                    .ok();
            }
            Err(e) => tracing::debug!("ignoring unrecognised message: {}", e),
        }
    }
}

async fn run_connection(
    config: ClientConfig,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    link: Link,
) {
    loop {
        match tokio_tungstenite::connect_async(config.url.as_str()).await {
            Ok((socket, _)) => {
                tracing::info!(url = %config.url, "connected to streamduck daemon");
                link.set_connected(true).await;
                run_session(socket, &mut outgoing, &link).await;
                link.end_session(&mut outgoing).await;
                tracing::info!(url = %config.url, "disconnected from streamduck daemon");
            }
            Err(e) => {
                tracing::debug!(url = %config.url, "daemon connection failed: {}", e);
            }
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

async fn run_session<S>(
    socket: WebSocketStream<S>,
    outgoing: &mut mpsc::UnboundedReceiver<Outgoing>,
    link: &Link,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            Some(frame) = outgoing.recv() => {
                if !link.is_pending(&frame.request_id) {
                    tracing::debug!(request_id = %frame.request_id, "skipping abandoned request");
                    continue;
                }
                if let Err(e) = sink.send(Message::Text(frame.text)).await {
                    tracing::warn!("failed to send request: {}", e);
                    break;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => link.route(&text).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("daemon socket error: {}", e);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{CapabilityProxy, Reply};
    use tokio::net::{TcpListener, TcpStream};

    fn identifier() -> Value {
        json!({
            "NamespacedName": {"PluginName": "Elgato", "Name": "Stream Deck"},
            "DeviceIdentifier": {"Identifier": "AL123", "Description": "MK.2"}
        })
    }

    fn connected_pair(
        timeout: Duration,
    ) -> (
        Arc<StreamduckClient>,
        mpsc::UnboundedReceiver<Outgoing>,
        Link,
        mpsc::Receiver<StreamduckEvent>,
    ) {
        let parts = StreamduckClient::pair(timeout);
        parts.2.connected.store(true, Ordering::SeqCst);
        parts
    }

    fn request_id(text: &str) -> String {
        let value: Value = serde_json::from_str(text).unwrap();
        value["RequestID"].as_str().unwrap().to_string()
    }

    fn response(id: &str, data: Value) -> String {
        json!({
            "Name": {"PluginName": "Core", "Name": "x"},
            "Data": data,
            "RequestID": id
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_rejects_while_disconnected() {
        let (client, mut outgoing, _link, _events) = StreamduckClient::pair(Duration::from_secs(1));
        let err = client
            .send(Operation::ListDevices.request(&[]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, "not connected to the Streamduck daemon");
        assert!(outgoing.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_response_resolves_matching_request() {
        let (client, mut outgoing, link, _events) = connected_pair(Duration::from_secs(5));

        let pending = client.send(Operation::ListDevices.request(&[]).unwrap());
        let sent = outgoing.recv().await.unwrap().text;
        let sent_json: Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(sent_json["Name"]["Name"], json!("List Devices"));

        link.route(&response(&request_id(&sent), json!([]))).await;
        assert_eq!(pending.await.unwrap(), json!([]));
        assert!(lock(&client.pending).is_empty());
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        let (client, mut outgoing, link, _events) = connected_pair(Duration::from_secs(5));

        let first = client.send(Operation::CoreVersion.request(&[]).unwrap());
        let second = client.send(Operation::PopScreen.request(&[identifier()]).unwrap());
        let first_id = outgoing.recv().await.unwrap().request_id;
        let second_id = outgoing.recv().await.unwrap().request_id;

        link.route(&response(&second_id, json!(true))).await;
        link.route(&response(&first_id, json!("0.2.0"))).await;

        assert_eq!(second.await.unwrap(), json!(true));
        assert_eq!(first.await.unwrap(), json!("0.2.0"));
    }

    #[tokio::test]
    async fn test_error_body_rejects() {
        let (client, mut outgoing, link, _events) = connected_pair(Duration::from_secs(5));

        let pending = client.send(Operation::ConnectDevice.request(&[identifier()]).unwrap());
        let id = outgoing.recv().await.unwrap().request_id;
        link.route(&response(&id, json!({"Error": "device busy"}))).await;

        assert_eq!(pending.await.unwrap_err(), "device busy");
    }

    #[tokio::test]
    async fn test_timeout_clears_pending_slot() {
        let (client, _outgoing, _link, _events) = connected_pair(Duration::from_millis(20));

        let err = client
            .send(Operation::ListDevices.request(&[]).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, "request timed out after 20 ms");
        assert!(lock(&client.pending).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_fails_outstanding_requests() {
        let (client, mut outgoing, link, mut events) = connected_pair(Duration::from_secs(5));

        let pending = client.send(Operation::PopScreen.request(&[identifier()]).unwrap());
        link.end_session(&mut outgoing).await;

        assert_eq!(
            pending.await.unwrap_err(),
            "connection closed before a response arrived"
        );
        // The failed request must not be replayed on the next connection.
        assert!(outgoing.try_recv().is_err());
        assert_eq!(events.recv().await, Some(StreamduckEvent::ClientDisconnected));
        assert!(!client.is_connected());
    }

    async fn loopback() -> (WebSocketStream<TcpStream>, WebSocketStream<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (client_tcp, server_tcp) = tokio::join!(TcpStream::connect(addr), async {
            listener.accept().await.unwrap().0
        });
        let url = format!("ws://{}", addr);
        let (client, server) = tokio::join!(
            tokio_tungstenite::client_async(url.as_str(), client_tcp.unwrap()),
            tokio_tungstenite::accept_async(server_tcp)
        );
        (client.unwrap().0, server.unwrap())
    }

    async fn next_text(daemon: &mut WebSocketStream<TcpStream>) -> String {
        daemon.next().await.unwrap().unwrap().into_text().unwrap()
    }

    #[tokio::test]
    async fn test_session_round_trip_over_socket() {
        let (client, outgoing, link, _events) = connected_pair(Duration::from_secs(5));
        let (socket, mut daemon) = loopback().await;
        let session = tokio::spawn(async move {
            let mut outgoing = outgoing;
            run_session(socket, &mut outgoing, &link).await;
        });

        let pending = client.send(Operation::CoreVersion.request(&[]).unwrap());
        let frame = next_text(&mut daemon).await;
        daemon
            .send(Message::Text(response(&request_id(&frame), json!("0.2.0"))))
            .await
            .unwrap();
        assert_eq!(pending.await.unwrap(), json!("0.2.0"));

        // A close from the daemon ends the session.
        daemon.close(None).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), session)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_session_skips_timed_out_requests() {
        let (client, outgoing, link, _events) = connected_pair(Duration::from_millis(20));

        let abandoned = client.send(Operation::PopScreen.request(&[identifier()]).unwrap());
        assert_eq!(abandoned.await.unwrap_err(), "request timed out after 20 ms");
        // Not polled until answered, so its own timeout cannot fire first.
        let live = client.send(Operation::ListDevices.request(&[]).unwrap());

        let (socket, mut daemon) = loopback().await;
        tokio::spawn(async move {
            let mut outgoing = outgoing;
            run_session(socket, &mut outgoing, &link).await;
        });

        let frame = next_text(&mut daemon).await;
        let sent: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(sent["Name"]["Name"], json!("List Devices"));

        daemon
            .send(Message::Text(response(&request_id(&frame), json!([]))))
            .await
            .unwrap();
        assert_eq!(live.await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_events_and_errors_are_forwarded() {
        let (_client, _outgoing, link, mut events) = connected_pair(Duration::from_secs(5));

        link.route(
            &json!({
                "PluginName": "Core",
                "EventName": "Device Disconnected",
                "Data": identifier()
            })
            .to_string(),
        )
        .await;
        link.route(r#"{"Error":"malformed request"}"#).await;

        match events.recv().await {
            Some(StreamduckEvent::DeviceDisconnected(id)) => {
                assert_eq!(id.identifier.description, "MK.2")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            events.recv().await,
            Some(StreamduckEvent::SocketError("malformed request".into()))
        );
    }

    #[tokio::test]
    async fn test_proxy_over_client() {
        let (client, mut outgoing, link, _events) = connected_pair(Duration::from_secs(5));
        let proxy = CapabilityProxy::generate(client.clone());

        assert_eq!(proxy.len(), Operation::ALL.len());

        match proxy.call("is_connected", vec![]).unwrap() {
            Reply::Value(v) => assert_eq!(v, json!(true)),
            Reply::Deferred(_) => panic!("is_connected should be immediate"),
        }
        match proxy.call("request_timeout", vec![]).unwrap() {
            Reply::Value(v) => assert_eq!(v, json!(5000)),
            Reply::Deferred(_) => panic!("request_timeout should be immediate"),
        }

        let reply = proxy.call("core_version", vec![]).unwrap();
        let id = outgoing.recv().await.unwrap().request_id;
        link.route(&response(&id, json!({"Error": "unavailable"}))).await;
        assert_eq!(
            reply.settle().await.unwrap_err().to_string(),
            "Failed core_version request: unavailable"
        );

        let bad = proxy.call("pop_screen", vec![json!(42)]).unwrap();
        let message = bad.settle().await.unwrap_err().to_string();
        assert!(message.starts_with("Failed pop_screen request: invalid argument identifier"));
    }
}
