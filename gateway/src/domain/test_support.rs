//! Shared test doubles for the domain services.
//!
//! Hand-rolled fakes in place of the real adapters: a recording transport
//! with programmable replies, a blocking transport for in-flight
//! assertions, a frozen clock, and a counting blob sink.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use serde_json::Value;
use tokio::sync::Notify;

use super::error::GatewayError;
use super::ports::{BlobHandle, BlobSink, Transport, TransportCall, TransportError, TransportReply};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build a JSON reply with the standard content type.
pub(crate) fn json_reply(status: u16, value: Value) -> TransportReply {
    TransportReply {
        status,
        content_type: Some("application/json".to_owned()),
        bytes: serde_json::to_vec(&value).expect("fixture payload should encode"),
        credential_update: None,
    }
}

/// Build a plain-text reply.
pub(crate) fn text_reply(status: u16, content_type: &str, text: &str) -> TransportReply {
    TransportReply {
        status,
        content_type: Some(content_type.to_owned()),
        bytes: text.as_bytes().to_vec(),
        credential_update: None,
    }
}

/// Build a binary reply.
pub(crate) fn binary_reply(status: u16, content_type: &str, bytes: &[u8]) -> TransportReply {
    TransportReply {
        status,
        content_type: Some(content_type.to_owned()),
        bytes: bytes.to_vec(),
        credential_update: None,
    }
}

/// Transport double that records calls and pops programmed replies.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    replies: Mutex<VecDeque<Result<TransportReply, TransportError>>>,
    calls: Mutex<Vec<TransportCall>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_reply(&self, reply: Result<TransportReply, TransportError>) {
        lock(&self.replies).push_back(reply);
    }

    pub(crate) fn calls(&self) -> Vec<TransportCall> {
        lock(&self.calls).clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, call: TransportCall) -> Result<TransportReply, TransportError> {
        lock(&self.calls).push(call);
        lock(&self.replies)
            .pop_front()
            .expect("no transport reply queued for this call")
    }
}

/// Transport double that parks until released, for in-flight assertions.
pub(crate) struct BlockingTransport {
    release: Arc<Notify>,
    entered: Notify,
    reply: TransportReply,
    calls: AtomicUsize,
}

impl BlockingTransport {
    pub(crate) fn new(release: Arc<Notify>, reply: TransportReply) -> Self {
        Self {
            release,
            entered: Notify::new(),
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait until a call has entered the transport.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for BlockingTransport {
    async fn execute(&self, _call: TransportCall) -> Result<TransportReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

/// Clock pinned to one instant.
pub(crate) struct FrozenClock(DateTime<Utc>);

impl FrozenClock {
    pub(crate) fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Blob sink double counting saves and releases.
#[derive(Default)]
pub(crate) struct RecordingSink {
    saves: Mutex<Vec<String>>,
    releases: AtomicUsize,
    fail_next_save: AtomicBool,
    next_handle: AtomicUsize,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make the next save action fail.
    pub(crate) fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    pub(crate) fn saved_filenames(&self) -> Vec<String> {
        lock(&self.saves).clone()
    }

    pub(crate) fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl BlobSink for RecordingSink {
    fn materialize(&self, _bytes: &[u8], _content_type: &str) -> Result<BlobHandle, GatewayError> {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        Ok(BlobHandle::new(format!("blob-{id}")))
    }

    fn trigger_save(&self, _handle: &BlobHandle, filename: &str) -> Result<(), GatewayError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::sink("disk full"));
        }
        lock(&self.saves).push(filename.to_owned());
        Ok(())
    }

    fn release(&self, _handle: BlobHandle) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
