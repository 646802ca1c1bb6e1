//! Reqwest-backed transport adapter.
//!
//! Owns transport details only: URL resolution through the origin rule,
//! explicit credential attachment as the session cookie, body encoding,
//! and the mapping of reqwest failures into the transport error variants.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};

use crate::domain::ports::{
    CallBody, CallMethod, FilePart, Transport, TransportCall, TransportError, TransportReply,
};
use crate::domain::session::{CredentialUpdate, SessionCredential};

use super::resolver::OriginResolver;

/// Content type applied to JSON bodies when the call carries no override.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport adapter over one reqwest client.
pub struct ReqwestTransport {
    client: Client,
    resolver: OriginResolver,
    cookie_name: String,
}

impl ReqwestTransport {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        resolver: OriginResolver,
        cookie_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            resolver,
            cookie_name: cookie_name.into(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, call: TransportCall) -> Result<TransportReply, TransportError> {
        let url = self
            .resolver
            .resolve(&call.path)
            .map_err(|error| TransportError::connect(error.to_string()))?;
        let mut request = match call.method {
            CallMethod::Get => self.client.get(url),
            CallMethod::Post => self.client.post(url),
            CallMethod::Put => self.client.put(url),
            CallMethod::Delete => self.client.delete(url),
        };

        let has_content_type = call
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        request = match call.body {
            CallBody::Empty => request,
            CallBody::Json(value) => {
                let payload = serde_json::to_vec(&value).map_err(|error| {
                    TransportError::connect(format!("failed to encode request body: {error}"))
                })?;
                if has_content_type {
                    request.body(payload)
                } else {
                    request
                        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
                        .body(payload)
                }
            }
            CallBody::Multipart(part) => request.multipart(build_form(part)?),
        };
        for (name, value) in &call.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(credential) = &call.credential {
            request = request.header(
                header::COOKIE,
                format!("{}={}", self.cookie_name, credential.expose()),
            );
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let credential_update = extract_credential_update(response.headers(), &self.cookie_name);
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(TransportReply {
            status,
            content_type,
            bytes: bytes.to_vec(),
            credential_update,
        })
    }
}

fn build_form(part: FilePart) -> Result<reqwest::multipart::Form, TransportError> {
    let file = reqwest::multipart::Part::bytes(part.bytes)
        .file_name(part.filename)
        .mime_str(&part.content_type)
        .map_err(|error| {
            TransportError::connect(format!("invalid file content type: {error}"))
        })?;
    Ok(reqwest::multipart::Form::new().part(part.field, file))
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::connect(error.to_string())
    }
}

fn extract_credential_update(
    headers: &header::HeaderMap,
    cookie_name: &str,
) -> Option<CredentialUpdate> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| parse_set_cookie(raw, cookie_name))
}

/// Parse one `Set-Cookie` header, returning an update when it names the
/// session cookie. An empty value or `Max-Age=0` clears the credential.
fn parse_set_cookie(raw: &str, cookie_name: &str) -> Option<CredentialUpdate> {
    let mut attributes = raw.split(';');
    let pair = attributes.next()?;
    let (name, value) = pair.split_once('=')?;
    if name.trim() != cookie_name {
        return None;
    }
    let value = value.trim();
    let expired = attributes.any(|attribute| {
        attribute.trim().to_ascii_lowercase().replace(' ', "") == "max-age=0"
    });
    if value.is_empty() || expired {
        Some(CredentialUpdate::Clear)
    } else {
        Some(CredentialUpdate::Set(SessionCredential::new(value)))
    }
}
