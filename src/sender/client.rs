use super::context::PushContext;
use super::response::{body_text, read_bounded};
use crate::domain::{ORG_ID_HEADER, TenantId};
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

/// Label listing endpoint, used as the connectivity check.
pub const LABEL_PATH: &str = "/loki/api/v1/label";
/// Ingestion endpoint.
pub const PUSH_PATH: &str = "/loki/api/v1/push";
/// Upper bound on how much of a response body is kept.
pub const MAX_ERROR_BODY_BYTES: usize = 1024;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP error: {status} - {body}")]
    HttpError { status: u16, body: String },
    #[error("Request timeout: {0}")]
    RequestTimeout(String),
    #[error("Request cancelled")]
    Cancelled,
    #[error("Deadline exceeded")]
    DeadlineExceeded,
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Coarse classification of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any request was made.
    Configuration,
    /// No usable response: connect failure, timeout, cancellation.
    Transport,
    /// The backend answered with a non-2xx status.
    Rejection,
}

impl ClientError {
    fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout(err.to_string())
        } else {
            Self::NetworkError(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(_) => ErrorKind::Configuration,
            Self::HttpError { .. } => ErrorKind::Rejection,
            Self::RequestTimeout(_)
            | Self::Cancelled
            | Self::DeadlineExceeded
            | Self::NetworkError(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Loki base URL. A URL that already ends in the push path is accepted too.
    pub endpoint: String,
    /// Explicit push URL, overriding the one derived from `endpoint`.
    pub push_url: Option<String>,
    /// Tenant sent as `X-Scope-OrgID`; empty disables the header.
    pub org_id: String,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub max_connections: usize,
    pub keep_alive_timeout: Duration,
    pub user_agent: String,
    pub content_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3100".to_string(),
            push_url: None,
            org_id: String::new(),
            timeout: Duration::from_secs(10),
            connection_timeout: Duration::from_secs(5),
            max_connections: 10,
            keep_alive_timeout: Duration::from_secs(60),
            user_agent: format!("remotelog/{}", env!("CARGO_PKG_VERSION")),
            content_type: "application/x-protobuf".to_string(),
        }
    }
}

/// Result of a successful push.
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub status: u16,
    pub bytes_sent: usize,
    /// Response body, bounded by `MAX_ERROR_BODY_BYTES`.
    pub body: Bytes,
}

/// Client for a Loki-compatible push API.
///
/// Configuration is fixed at construction; calls take `&self` and can run
/// concurrently. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct LokiClient {
    client: Client,
    label_url: Url,
    push_url: Url,
    tenant: TenantId,
    org_id: Option<HeaderValue>,
    content_type: HeaderValue,
}

impl LokiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint_url = parse_http_url(&config.endpoint, "endpoint")?;

        let prefix = path_prefix(&endpoint_url);
        let label_url = with_path(&endpoint_url, &prefix, LABEL_PATH);
        let push_url = match config.push_url.as_deref() {
            Some(url) => parse_http_url(url, "push")?,
            None => with_path(&endpoint_url, &prefix, PUSH_PATH),
        };

        let tenant = TenantId::new(config.org_id);
        let org_id = tenant.header_value().map_err(|e| {
            ClientError::InvalidConfiguration(format!("Invalid org ID '{tenant}': {e}"))
        })?;

        let content_type = HeaderValue::from_str(&config.content_type).map_err(|e| {
            ClientError::InvalidConfiguration(format!(
                "Invalid content type '{}': {e}",
                config.content_type
            ))
        })?;

        // One pool per client, reused by every call
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .pool_max_idle_per_host(config.max_connections)
            .pool_idle_timeout(config.keep_alive_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ClientError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            label_url,
            push_url,
            tenant,
            org_id,
            content_type,
        })
    }

    /// Replaces the push URL. Meant to be called before the first push.
    pub fn set_push_url(&mut self, url: &str) -> Result<(), ClientError> {
        self.push_url = parse_http_url(url, "push")?;
        Ok(())
    }

    pub fn with_push_url(mut self, url: &str) -> Result<Self, ClientError> {
        self.set_push_url(url)?;
        Ok(self)
    }

    pub fn label_url(&self) -> &Url {
        &self.label_url
    }

    pub fn push_url(&self) -> &Url {
        &self.push_url
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Checks the label endpoint once. Any 2xx counts as reachable.
    pub async fn setup(&self) -> Result<(), ClientError> {
        debug!(url = %self.label_url, tenant = %self.tenant, "Checking Loki label endpoint");

        let response = self
            .request(Method::GET, self.label_url.clone())
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = read_bounded(response, MAX_ERROR_BODY_BYTES).await;
        Err(rejection(status, body))
    }

    /// Posts one payload to the push endpoint.
    ///
    /// The request is abandoned as soon as `ctx` is cancelled or its deadline
    /// passes. Failures are returned as-is; nothing is retried.
    pub async fn send(
        &self,
        ctx: &PushContext,
        payload: impl Into<Bytes>,
    ) -> Result<PushOutcome, ClientError> {
        let payload: Bytes = payload.into();
        let bytes_sent = payload.len();

        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let request = self
            .request(Method::POST, self.push_url.clone())
            .header(CONTENT_TYPE, self.content_type.clone())
            .body(payload);

        trace!(url = %self.push_url, bytes = bytes_sent, "Pushing payload");

        let (status, body) = ctx
            .run(async {
                let response = request.send().await.map_err(ClientError::transport)?;
                let status = response.status();
                let body = read_bounded(response, MAX_ERROR_BODY_BYTES).await;
                Ok((status, body))
            })
            .await?;

        if !status.is_success() {
            return Err(rejection(status, body));
        }

        // The status already confirmed delivery; an unreadable body is not a failure
        Ok(PushOutcome {
            status: status.as_u16(),
            bytes_sent,
            body: body.unwrap_or_default(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.org_id {
            Some(org_id) => builder.header(ORG_ID_HEADER, org_id.clone()),
            None => builder,
        }
    }
}

/// Non-2xx outcome. When the body could not be read, the read error takes its
/// place so the rejection still says why it is empty.
fn rejection(status: StatusCode, body: Result<Bytes, reqwest::Error>) -> ClientError {
    let body = match body {
        Ok(body) => body_text(&body),
        Err(e) => format!("<body unreadable: {e}>"),
    };
    ClientError::HttpError {
        status: status.as_u16(),
        body,
    }
}

fn parse_http_url(raw: &str, what: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|e| {
        ClientError::InvalidConfiguration(format!("Invalid {what} URL '{raw}': {e}"))
    })?;

    if matches!(url.scheme(), "http" | "https") && url.has_host() {
        Ok(url)
    } else {
        Err(ClientError::InvalidConfiguration(format!(
            "Invalid {what} URL '{raw}': expected http(s) with a host"
        )))
    }
}

/// Path prefix of a base URL, with a trailing push path stripped.
fn path_prefix(url: &Url) -> String {
    let path = url.path().trim_end_matches('/');
    path.strip_suffix(PUSH_PATH).unwrap_or(path).to_string()
}

fn with_path(base: &Url, prefix: &str, suffix: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("{prefix}{suffix}"));
    url.set_query(None);
    url.set_fragment(None);
    url
}
