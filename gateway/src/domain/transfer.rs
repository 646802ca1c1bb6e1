//! Binary download and multipart upload operations.
//!
//! Both flows bypass the unified client's JSON handling but share its
//! credential and error-surfacing policy. Neither is cancellable once
//! dispatched; the flight gate only suppresses re-entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mockable::Clock;
use serde_json::Value;

use super::error::GatewayError;
use super::ports::{BlobSink, CallBody, FilePart, Transport, TransportCall};
use super::session::CredentialJar;

/// Multipart field name the upload endpoint expects.
const UPLOAD_FIELD: &str = "file";

/// Content type assumed when a download reply does not declare one.
const OCTET_STREAM: &str = "application/octet-stream";

/// Re-entry gate: `Idle -> InFlight -> Idle`.
///
/// A permit is held for the lifetime of one dispatched operation and
/// returns the gate to idle on drop. The gate suppresses re-entry only; it
/// does not abort the in-flight request.
#[derive(Debug, Default)]
pub struct FlightGate(AtomicBool);

impl FlightGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt the `Idle -> InFlight` transition.
    pub fn try_begin(&self) -> Option<FlightPermit<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then_some(FlightPermit { gate: self })
    }

    /// Whether an operation currently holds the gate.
    pub fn is_in_flight(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Held while an operation is in flight; releases the gate on drop.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    gate: &'a FlightGate,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.gate.0.store(false, Ordering::SeqCst);
    }
}

/// Receipt for a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    /// Date-stamped filename the save action used.
    pub filename: String,
    /// Size of the saved payload in bytes.
    pub byte_count: usize,
}

/// Fetches a backend resource as a binary payload and hands it to the
/// local sink under a date-stamped filename.
pub struct DownloadOperation {
    transport: Arc<dyn Transport>,
    jar: Arc<CredentialJar>,
    sink: Arc<dyn BlobSink>,
    clock: Arc<dyn Clock>,
    gate: FlightGate,
}

impl DownloadOperation {
    /// Build the operation over its ports.
    pub fn new(
        transport: Arc<dyn Transport>,
        jar: Arc<CredentialJar>,
        sink: Arc<dyn BlobSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            jar,
            sink,
            clock,
            gate: FlightGate::new(),
        }
    }

    /// Fetch `path` and trigger one save action.
    ///
    /// A non-success status raises [`GatewayError::Transfer`] carrying the
    /// response body text. On success the staged object is released after
    /// the save on every path, so repeated downloads never leak staged
    /// payloads.
    pub async fn download(
        &self,
        path: &str,
        base_name: &str,
    ) -> Result<DownloadReceipt, GatewayError> {
        let Some(_permit) = self.gate.try_begin() else {
            return Err(GatewayError::Busy);
        };
        let call = TransportCall::get(path).with_credential(self.jar.current());
        let reply = self.transport.execute(call).await?;
        if !reply.is_success() {
            tracing::warn!(status = reply.status, "download rejected by origin");
            return Err(GatewayError::transfer(reply.status, reply.text()));
        }

        let content_type = reply
            .content_type
            .clone()
            .unwrap_or_else(|| OCTET_STREAM.to_owned());
        let filename = self.stamped_filename(base_name, &content_type);
        let handle = self.sink.materialize(&reply.bytes, &content_type)?;
        let saved = self.sink.trigger_save(&handle, &filename);
        // Release is mandatory cleanup whether or not the save succeeded.
        self.sink.release(handle);
        saved?;

        tracing::debug!(%filename, bytes = reply.bytes.len(), "download saved");
        Ok(DownloadReceipt {
            filename,
            byte_count: reply.bytes.len(),
        })
    }

    fn stamped_filename(&self, base_name: &str, content_type: &str) -> String {
        let date = self.clock.utc().format("%Y-%m-%d");
        match extension_for(content_type) {
            Some(ext) => format!("{base_name}-{date}.{ext}"),
            None => format!("{base_name}-{date}"),
        }
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().map_or("", str::trim);
    match essence {
        "application/pdf" => Some("pdf"),
        "text/csv" => Some("csv"),
        "application/zip" => Some("zip"),
        _ => None,
    }
}

/// File selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// Client-side filename.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Receipt returned when the origin accepts an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Backend-provided completion message, when one was sent.
    pub message: Option<String>,
}

/// POSTs a selected file as a single-field multipart body.
pub struct UploadOperation {
    transport: Arc<dyn Transport>,
    jar: Arc<CredentialJar>,
    gate: FlightGate,
}

impl UploadOperation {
    /// Build the operation over its ports.
    pub fn new(transport: Arc<dyn Transport>, jar: Arc<CredentialJar>) -> Self {
        Self {
            transport,
            jar,
            gate: FlightGate::new(),
        }
    }

    /// Dispatch the selected file to `path`.
    ///
    /// Rejects up front, before any network call, when no file is
    /// selected. Success consumes the selection, clearing it for the
    /// caller, and signals completion through the receipt.
    pub async fn upload(
        &self,
        path: &str,
        selection: Option<FilePayload>,
    ) -> Result<UploadReceipt, GatewayError> {
        let Some(file) = selection else {
            return Err(GatewayError::invalid_request("select a file before uploading"));
        };
        let Some(_permit) = self.gate.try_begin() else {
            return Err(GatewayError::Busy);
        };

        let part = FilePart {
            field: UPLOAD_FIELD.to_owned(),
            filename: file.filename,
            content_type: file.content_type,
            bytes: file.bytes,
        };
        let call = TransportCall::post(path, CallBody::Multipart(part))
            .with_credential(self.jar.current());
        let reply = self.transport.execute(call).await?;
        if !reply.is_success() {
            tracing::warn!(status = reply.status, "upload rejected by origin");
            return Err(GatewayError::transfer(reply.status, reply.text()));
        }

        // Transfer replies skip the negotiator; peek at the message only.
        let message = serde_json::from_slice::<Value>(&reply.bytes)
            .ok()
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        tracing::debug!("upload accepted by origin");
        Ok(UploadReceipt { message })
    }
}
