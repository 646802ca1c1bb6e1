//! Gateway configuration and assembly.
//!
//! One builder-style configuration wires the credential jar, origin
//! resolver, transport, unified client, session guard, and both transfer
//! operations. Portal views hold the assembled [`Gateway`] and never touch
//! the adapters directly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use thiserror::Error;
use url::Url;

use crate::domain::client::ApiClient;
use crate::domain::guard::SessionGuard;
use crate::domain::ports::{BlobSink, SessionQuery, Transport};
use crate::domain::role::PortalRoutes;
use crate::domain::session::CredentialJar;
use crate::domain::transfer::{DownloadOperation, UploadOperation};
use crate::outbound::fs::SpoolBlobSink;
use crate::outbound::http::resolver::{OriginResolver, ResolverValidationError};
use crate::outbound::http::transport::ReqwestTransport;

/// Local prefix every API call is addressed under.
const DEFAULT_API_PREFIX: &str = "/api";
/// Cookie carrying the opaque session credential.
const DEFAULT_COOKIE_NAME: &str = "session";
/// Request deadline applied to every transport call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder-style configuration for assembling a [`Gateway`].
pub struct GatewayConfig {
    origin: Url,
    api_prefix: String,
    cookie_name: String,
    timeout: Duration,
    routes: PortalRoutes,
    download_dir: PathBuf,
}

impl GatewayConfig {
    /// Configuration with defaults for one backend origin.
    #[must_use]
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            routes: PortalRoutes::default(),
            download_dir: std::env::temp_dir().join("portal-downloads"),
        }
    }

    /// Override the local API prefix.
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Override the session cookie name.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Override the transport timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the navigation routes used by guard redirects.
    #[must_use]
    pub fn with_routes(mut self, routes: PortalRoutes) -> Self {
        self.routes = routes;
        self
    }

    /// Override where downloads are saved.
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}

/// Failures raised while wiring the gateway.
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    /// The origin or prefix failed validation.
    #[error("invalid origin or prefix: {0}")]
    Resolver(#[from] ResolverValidationError),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fully wired gateway: unified client, session guard, transfer
/// operations.
pub struct Gateway {
    /// Unified API client for all JSON-oriented operations.
    pub client: Arc<ApiClient>,
    /// Session guard applied by protected views on mount.
    pub guard: SessionGuard,
    /// Binary download operation.
    pub download: DownloadOperation,
    /// Multipart upload operation.
    pub upload: UploadOperation,
}

impl Gateway {
    /// Assemble every component from one configuration.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayBuildError> {
        let resolver = OriginResolver::new(config.origin, config.api_prefix)?;
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(
            resolver,
            config.cookie_name,
            config.timeout,
        )?);
        let jar = Arc::new(CredentialJar::new());
        let client = Arc::new(ApiClient::new(
            Arc::clone(&transport),
            Arc::clone(&jar),
            config.routes.clone(),
        ));
        let sessions: Arc<dyn SessionQuery> = Arc::<ApiClient>::clone(&client);
        let guard = SessionGuard::new(sessions, config.routes);
        let sink: Arc<dyn BlobSink> = Arc::new(SpoolBlobSink::new(config.download_dir));
        let download = DownloadOperation::new(
            Arc::clone(&transport),
            Arc::clone(&jar),
            sink,
            Arc::new(DefaultClock),
        );
        let upload = UploadOperation::new(transport, jar);
        Ok(Self {
            client,
            guard,
            download,
            upload,
        })
    }
}
