//! ZeroMQ SUB transport
//!
//! Connects to the multiplexer's ZMQ output, subscribes to every topic and
//! hands each message to the caller as one contiguous buffer.

use crate::{MessageSource, Result, TransportError, TransportInfo, TransportType};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use eti_codec::DEFAULT_MAX_MESSAGE_SIZE;
use tracing::{debug, info, warn};
use zeromq::{Socket, SocketRecv, SubSocket, ZmqError, ZmqMessage};

/// ZeroMQ subscriber configuration
#[derive(Debug, Clone)]
pub struct ZmqSubscriberConfig {
    /// Publisher endpoint, e.g. `tcp://localhost:9100`
    pub endpoint: String,
    /// Messages longer than this are truncated before parsing
    pub max_message_size: usize,
}

impl ZmqSubscriberConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Endpoint for a TCP publisher
    pub fn tcp(host: &str, port: u16) -> Self {
        Self::new(format!("tcp://{host}:{port}"))
    }
}

/// Subscriber to a ZeroMQ PUB socket carrying ETI messages
pub struct ZmqSubscriber {
    socket: SubSocket,
    config: ZmqSubscriberConfig,
    messages_received: u64,
    bytes_received: u64,
}

impl ZmqSubscriber {
    /// Connect to the publisher and subscribe to all topics
    pub async fn connect(config: ZmqSubscriberConfig) -> Result<Self> {
        let mut socket = SubSocket::new();

        info!("Connecting to {}", config.endpoint);
        socket.connect(&config.endpoint).await.map_err(|e| {
            TransportError::connection_with_source(&config.endpoint, "connect failed", e)
        })?;

        socket.subscribe("").await.map_err(|e| {
            TransportError::connection_with_source(&config.endpoint, "subscribe failed", e)
        })?;
        info!("Subscribed to all topics on {}", config.endpoint);

        Ok(Self {
            socket,
            config,
            messages_received: 0,
            bytes_received: 0,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl MessageSource for ZmqSubscriber {
    async fn receive(&mut self) -> Result<Bytes> {
        let message = self.socket.recv().await.map_err(classify_recv_error)?;
        let mut bytes = flatten(message);

        if bytes.len() > self.config.max_message_size {
            warn!(
                received = bytes.len(),
                max = self.config.max_message_size,
                "Message exceeds maximum size, truncating"
            );
            bytes.truncate(self.config.max_message_size);
        }

        self.messages_received += 1;
        self.bytes_received += bytes.len() as u64;
        debug!(len = bytes.len(), "Received message");
        Ok(bytes)
    }

    fn transport_info(&self) -> TransportInfo {
        TransportInfo {
            transport_type: TransportType::ZmqSub,
            remote_address: Some(self.config.endpoint.clone()),
            messages_received: self.messages_received,
            bytes_received: self.bytes_received,
        }
    }
}

/// Join the parts of a multipart message into one buffer
fn flatten(message: ZmqMessage) -> Bytes {
    let mut parts = message.into_vec();
    if parts.len() == 1 {
        return parts.remove(0);
    }
    join_parts(&parts)
}

fn join_parts(parts: &[Bytes]) -> Bytes {
    let total = parts.iter().map(Bytes::len).sum();
    let mut joined = BytesMut::with_capacity(total);
    for part in parts {
        joined.extend_from_slice(part);
    }
    joined.freeze()
}

fn classify_recv_error(err: ZmqError) -> TransportError {
    match err {
        ZmqError::Network(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            TransportError::Interrupted
        }
        other => TransportError::receive_with_source("receive failed", other),
    }
}
