//! In-memory transport for session and pool tests.
//!
//! A [`MockConnector`] hands out channels that answer every request with the
//! frames produced by a responder closure. All channels opened by one
//! connector share a single log of sent messages.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value as JsonValue};

use super::driver::{DriverConfig, ServerAddress};
use crate::gremlin::{Channel, Connector, Message, TransportError, TransportResult, MIME_TYPE};

type Responder = dyn Fn(&JsonValue) -> Vec<Message> + Send + Sync;

#[derive(Default)]
struct Shared {
    sent: Mutex<Vec<Message>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Scripted connector.
#[derive(Clone)]
pub(crate) struct MockConnector {
    responder: Arc<Responder>,
    shared: Arc<Shared>,
    delay: Duration,
    failed_opens: usize,
    failing_close: bool,
}

impl MockConnector {
    pub(crate) fn new<F>(responder: F) -> Self
    where
        F: Fn(&JsonValue) -> Vec<Message> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            shared: Arc::new(Shared::default()),
            delay: Duration::ZERO,
            failed_opens: 0,
            failing_close: false,
        }
    }

    /// Answers each request with a one-element list holding its script.
    pub(crate) fn echo() -> Self {
        Self::new(|request| {
            let script = request["args"]["gremlin"].clone();
            vec![results_frame(request, 200, json!({"@type": "g:List", "@value": [script]}))]
        })
    }

    /// Every open fails.
    pub(crate) fn unreachable() -> Self {
        Self::echo().with_failed_opens(usize::MAX)
    }

    /// Delay before each response frame is delivered.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The first `count` opens fail.
    pub(crate) fn with_failed_opens(mut self, count: usize) -> Self {
        self.failed_opens = count;
        self
    }

    /// `close` reports an error (after counting the attempt).
    pub(crate) fn with_failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    /// Request envelopes sent on any channel, in order.
    pub(crate) fn requests(&self) -> Vec<JsonValue> {
        self.shared
            .sent
            .lock()
            .iter()
            .filter_map(parse_request)
            .collect()
    }

    /// Kinds of all sent messages, in order.
    pub(crate) fn sent_kinds(&self) -> Vec<&'static str> {
        self.shared.sent.lock().iter().map(Message::name).collect()
    }

    pub(crate) fn opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Highest number of requests outstanding at once across all channels.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(&self, _address: &ServerAddress) -> TransportResult<Box<dyn Channel>> {
        let attempt = self.shared.opened.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failed_opens {
            return Err(TransportError::Connection("connection refused".to_string()));
        }

        Ok(Box::new(MockChannel {
            responder: Arc::clone(&self.responder),
            shared: Arc::clone(&self.shared),
            delay: self.delay,
            failing_close: self.failing_close,
            pending: VecDeque::new(),
            busy: false,
        }))
    }
}

struct MockChannel {
    responder: Arc<Responder>,
    shared: Arc<Shared>,
    delay: Duration,
    failing_close: bool,
    pending: VecDeque<Message>,
    busy: bool,
}

impl MockChannel {
    fn begin(&mut self) {
        if !self.busy {
            self.busy = true;
            let now = self.shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.shared.max_in_flight.fetch_max(now, Ordering::SeqCst);
        }
    }

    fn finish(&mut self) {
        if self.busy {
            self.busy = false;
            self.shared.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Channel for MockChannel {
    async fn send(&mut self, message: Message) -> TransportResult<()> {
        let request = parse_request(&message);
        self.shared.sent.lock().push(message);

        if let Some(request) = request {
            self.begin();
            let frames = (self.responder)(&request);
            self.pending.extend(frames);
        }
        Ok(())
    }

    async fn receive(&mut self) -> TransportResult<Option<Message>> {
        if self.pending.is_empty() {
            // nothing scripted: behave like a server that never answers
            return futures::future::pending().await;
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let message = self.pending.pop_front();
        if self.pending.is_empty() {
            self.finish();
        }
        Ok(message)
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.finish();
        self.shared.closed.fetch_add(1, Ordering::SeqCst);
        if self.failing_close {
            return Err(TransportError::ConnectionClosed);
        }
        Ok(())
    }
}

fn parse_request(message: &Message) -> Option<JsonValue> {
    match message {
        Message::Text(text) => serde_json::from_str(text).ok(),
        Message::Binary(bytes) => {
            let skip = 1 + MIME_TYPE.len();
            serde_json::from_slice(bytes.get(skip..)?).ok()
        }
        _ => None,
    }
}

/// Response frame carrying `data` for `request`.
pub(crate) fn results_frame(request: &JsonValue, code: u16, data: JsonValue) -> Message {
    Message::Text(
        json!({
            "requestId": request["requestId"],
            "status": {"code": code, "message": "", "attributes": {}},
            "result": {"data": data, "meta": {}}
        })
        .to_string(),
    )
}

/// Data-less response frame with a status message.
pub(crate) fn frame(request: &JsonValue, code: u16, message: &str) -> Message {
    Message::Text(
        json!({
            "requestId": request["requestId"],
            "status": {"code": code, "message": message, "attributes": {}},
            "result": {"data": null, "meta": {}}
        })
        .to_string(),
    )
}

/// Default test configuration with keepalive disabled.
pub(crate) fn config() -> DriverConfig {
    DriverConfig::builder("ws://localhost:8182/gremlin")
        .expect("valid uri")
        .with_ping_interval(Duration::ZERO)
        .build()
}
