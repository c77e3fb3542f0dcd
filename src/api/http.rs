//! Implements the `Transport` trait over `reqwest`.

use crate::api::{Method, Transport, TransportRequest, TransportResponse};
use crate::{ApiError, Result};
use anyhow::Context;
use tracing::trace;

/// The production transport: a shared `reqwest` client with rustls.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Unable to construct the HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, ApiError> {
        trace!("{} {}", request.method.as_str(), request.url);
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        trace!("{} {} -> {status}", request.method.as_str(), request.url);
        Ok(TransportResponse { status, body })
    }
}
