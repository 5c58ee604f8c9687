//! Gateway to the GitHub contents API.
//!
//! All outbound requests go through [`GithubGateway::fetch_json`], which owns
//! URL construction and header assembly for the configured repository.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderValue},
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GithubSettings;

use super::error::InfraError;

/// Media types understood by the contents endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// JSON object with a base64 `content` field.
    Json,
    /// The file itself; the server may still answer with the JSON wrapper.
    Raw,
}

impl MediaType {
    pub fn header_value(self) -> &'static str {
        match self {
            MediaType::Json => "application/vnd.github.v3+json",
            MediaType::Raw => "application/vnd.github.v3.raw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("request for `{path}` failed: {status} {status_text}")]
    Status {
        path: String,
        status: u16,
        status_text: String,
    },
    #[error("request for `{path}` could not be completed: {message}")]
    Transport { path: String, message: String },
    #[error("response for `{path}` is not valid JSON: {message}")]
    Body { path: String, message: String },
    #[error("cannot build request for `{path}`: {message}")]
    Request { path: String, message: String },
}

impl GatewayError {
    fn status(path: &str, status: StatusCode) -> Self {
        Self::Status {
            path: path.to_string(),
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
        }
    }

    fn transport(path: &str, err: &reqwest::Error) -> Self {
        Self::Transport {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    fn request(path: &str, message: impl Into<String>) -> Self {
        Self::Request {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// Read access to files of the content repository.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Fetch `path` (relative to the repository root) and parse the body as JSON.
    async fn fetch_json(&self, path: &str, accept: MediaType) -> Result<Value, GatewayError>;
}

pub struct GithubGateway {
    client: Client,
    api_base: Url,
    owner: String,
    repo: String,
    branch: String,
    token: Option<String>,
}

impl GithubGateway {
    pub fn new(settings: &GithubSettings) -> Result<Self, InfraError> {
        let client = build_client(settings.timeout)?;
        Ok(Self {
            client,
            api_base: settings.api_base.clone(),
            owner: settings.owner.clone(),
            repo: settings.repo.clone(),
            branch: settings.branch.clone(),
            token: settings.token.clone(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("insightarc/", env!("CARGO_PKG_VERSION"))
    }

    /// `{api_base}/repos/{owner}/{repo}/contents/{path}?ref={branch}`
    pub fn url(&self, path: &str) -> Result<Url, GatewayError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::request(path, "API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.query_pairs_mut().clear().append_pair("ref", &self.branch);
        Ok(url)
    }

    fn auth_header(&self, path: &str) -> Result<Option<HeaderValue>, GatewayError> {
        self.token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("token {token}"))
                    .map_err(|err| GatewayError::request(path, err.to_string()))
            })
            .transpose()
    }
}

fn build_client(timeout: Duration) -> Result<Client, InfraError> {
    Client::builder()
        .user_agent(GithubGateway::user_agent())
        .timeout(timeout)
        .build()
        .map_err(|err| InfraError::http_client(err.to_string()))
}

#[async_trait]
impl ContentGateway for GithubGateway {
    async fn fetch_json(&self, path: &str, accept: MediaType) -> Result<Value, GatewayError> {
        let url = self.url(path)?;
        let mut req = self
            .client
            .get(url)
            .header(ACCEPT, accept.header_value());
        if let Some(auth) = self.auth_header(path)? {
            req = req.header(AUTHORIZATION, auth);
        }

        debug!(
            target = "insightarc::gateway",
            path,
            accept = accept.header_value(),
            authenticated = self.token.is_some(),
            "Fetching repository content"
        );

        let resp = req
            .send()
            .await
            .map_err(|err| GatewayError::transport(path, &err))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(
                target = "insightarc::gateway",
                path,
                status = status.as_u16(),
                "Repository content request failed"
            );
            return Err(GatewayError::status(path, status));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|err| GatewayError::transport(path, &err))?;
        serde_json::from_slice(&bytes).map_err(|err| GatewayError::Body {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}
