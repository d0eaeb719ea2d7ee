// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter for the dehazing service.
//!
//! Sends one multipart POST per upload. The image-only workflow sends a
//! single `image` part; the combined workflow sends `type`, `model` and
//! `file`. The service reports processing failures as a JSON body
//! `{"error": "..."}`, sometimes with a 200 status, so JSON bodies are
//! never treated as media.

use crate::application::port::{DehazeService, ServiceError, ServiceResponse};
use crate::domain::upload::UploadRequest;
use crate::error::Result;
use futures_util::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("IcedDehaze/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpDehazeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpClientConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpDehazeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDehazeClient {
    /// Builds a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::error::Error::Http) if the TLS backend
    /// cannot be initialized.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

/// Builds the multipart payload for a request.
fn build_form(request: &UploadRequest) -> std::result::Result<Form, ServiceError> {
    let file = &request.file;
    let mut part = Part::bytes(file.blob.bytes().to_vec()).file_name(file.name.clone());
    if !file.mime().is_empty() {
        part = part
            .mime_str(file.mime())
            .map_err(|e| ServiceError::Other(format!("Invalid MIME type: {e}")))?;
    }

    let form = match request.selection {
        None => Form::new().part("image", part),
        Some(selection) => Form::new()
            .text("type", selection.kind.as_str())
            .text("model", selection.model.as_str())
            .part("file", part),
    };
    Ok(form)
}

fn map_transport_error(err: &reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else if err.is_connect() {
        ServiceError::Connection(err.to_string())
    } else {
        ServiceError::Other(err.to_string())
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
    })
}

async fn send(
    client: reqwest::Client,
    endpoint: String,
    request: UploadRequest,
) -> std::result::Result<ServiceResponse, ServiceError> {
    let form = build_form(&request)?;

    let response = client
        .post(&endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(|e| map_transport_error(&e))?;

    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_transport_error(&e))?;

    if is_json(content_type.as_deref()) {
        return Err(match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => ServiceError::Rejected(body.error),
            Err(_) if !status.is_success() => ServiceError::Status(status.as_u16()),
            Err(_) => ServiceError::Other("Unexpected JSON response".to_string()),
        });
    }

    if !status.is_success() {
        return Err(ServiceError::Status(status.as_u16()));
    }

    if bytes.is_empty() {
        return Err(ServiceError::EmptyBody);
    }

    Ok(ServiceResponse {
        bytes: bytes.to_vec(),
        content_type,
    })
}

impl DehazeService for HttpDehazeClient {
    fn dehaze(
        &self,
        request: UploadRequest,
    ) -> BoxFuture<'static, std::result::Result<ServiceResponse, ServiceError>> {
        Box::pin(send(self.client.clone(), self.endpoint.clone(), request))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
