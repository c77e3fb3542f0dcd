//! The client for the remote bookkeeping backend.
//!
//! The backend is a REST/JSON service: five flat collections, each supporting list, create and
//! delete-by-id, plus a token endpoint (username + password -> access/refresh pair) and a token
//! refresh endpoint. The wire layer is abstracted behind the `Transport` trait so that the
//! credential and retry policy in `Client` can be exercised against scripted responses without a
//! network.

mod client;
mod http;
mod session;

pub use client::Client;
pub use http::HttpTransport;
pub use session::Session;

use crate::ApiError;
use serde::de::DeserializeOwned;

pub(crate) const MATERIALS: &str = "materials";
pub(crate) const CUSTOMERS: &str = "customers";
pub(crate) const TRANSACTIONS: &str = "transactions";
pub(crate) const EXPENSES: &str = "expenses";
pub(crate) const STARTING_CAPITAL: &str = "startingcapital";

pub(crate) const TOKEN: &str = "token/";
pub(crate) const TOKEN_REFRESH: &str = "token/refresh/";

/// The HTTP methods the backend contract uses. There is no update operation on any collection,
/// so there is no PUT or PATCH.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One request as handed to a `Transport`: already resolved to a full URL, with the bearer
/// token (if any) attached by the caller.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

/// A raw response. Status interpretation belongs to `Client`, not the transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON. A body we cannot make sense of is reported as a network-class
    /// failure since it means the transport gave us something other than the backend contract.
    pub fn json<T>(&self) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::Network(format!("malformed response body: {e}")))
    }
}

/// Executes requests against the backend. Implemented over `reqwest` in production and over an
/// in-memory script in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, ApiError>;
}
