//! Authenticated client for the Sentino text-analysis API.
//!
//! # Design
//! `SentinoClient` precomputes its header set at construction and never
//! mutates it afterwards. Each operation is split into a `build_*` method
//! that produces an `HttpRequest` and a shared `dispatch` that executes it
//! through the client's `Transport`. The status gate runs before any JSON
//! decoding, so a documented error status always surfaces as
//! `ApiError::Remote` even when the error body is not JSON.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{ClassifyRequest, ScoreRequest, DEFAULT_LANG};

/// Fixed base URL of the Sentino API.
pub const BASE_URL: &str = "https://api.sentino.org";

pub const SCORE_PATH: &str = "/score";
pub const INVENTORIES_PATH: &str = "/inventories";
pub const CLASSIFY_PATH: &str = "/item/classify";

/// Synchronous client for the Sentino API.
///
/// One request per call, no retries and no caching. Holds no mutable state,
/// so it can be shared wherever its transport can.
#[derive(Debug, Clone)]
pub struct SentinoClient<T = UreqTransport> {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: T,
}

impl SentinoClient<UreqTransport> {
    /// Client for the public API using a blocking ureq transport. No network
    /// call is made here.
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Self::with_transport(api_key, UreqTransport::new())
    }
}

impl<T: Transport> SentinoClient<T> {
    pub fn with_transport(api_key: &str, transport: T) -> Result<Self, ApiError> {
        if api_key.is_empty() {
            return Err(ApiError::EmptyCredential);
        }
        Ok(Self {
            base_url: BASE_URL.to_string(),
            headers: vec![
                ("Authorization".to_string(), format!("Token {api_key}")),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            transport,
        })
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Score `text` against the Big Five inventory in English.
    pub fn score_text(&self, text: &str) -> Result<Value, ApiError> {
        self.score_text_in(text, DEFAULT_LANG)
    }

    /// Score `text` against the Big Five inventory in `lang`.
    ///
    /// The result maps each trait to its facets' scores in `[0, 1]`; the
    /// shape is the server's and is not checked here.
    pub fn score_text_in(&self, text: &str, lang: &str) -> Result<Value, ApiError> {
        let request = self.build_score_text(text, lang)?;
        self.dispatch(request)
    }

    /// List the personality inventories the service offers.
    pub fn get_inventories(&self) -> Result<Value, ApiError> {
        self.dispatch(self.build_get_inventories())
    }

    /// Probability per category that `text` belongs to it. See
    /// `relevant_categories` for the usual 0.5 cut-off.
    pub fn classify(&self, text: &str) -> Result<Value, ApiError> {
        let request = self.build_classify(text)?;
        self.dispatch(request)
    }

    pub fn build_score_text(&self, text: &str, lang: &str) -> Result<HttpRequest, ApiError> {
        let payload = ScoreRequest::big5(text, lang);
        self.build_request(HttpMethod::Post, SCORE_PATH, Some(&payload))
    }

    pub fn build_get_inventories(&self) -> HttpRequest {
        self.request(HttpMethod::Get, INVENTORIES_PATH, None)
    }

    pub fn build_classify(&self, text: &str) -> Result<HttpRequest, ApiError> {
        let payload = ClassifyRequest { text };
        self.build_request(HttpMethod::Post, CLASSIFY_PATH, Some(&payload))
    }

    /// Request for `path` carrying the client's headers and `body` encoded as
    /// JSON.
    pub fn build_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, path, body))
    }

    /// Execute `request` and decode the JSON body of a non-error response.
    ///
    /// The client's header set replaces any `Authorization` or
    /// `Content-Type` already on the request; other headers are kept.
    pub fn dispatch(&self, mut request: HttpRequest) -> Result<Value, ApiError> {
        self.attach_headers(&mut request);
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport.execute(&request)?;
        parse_response(response)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: self.headers.clone(),
            body,
        }
    }

    fn attach_headers(&self, request: &mut HttpRequest) {
        request
            .headers
            .retain(|(name, _)| !self.headers.iter().any(|(own, _)| own.eq_ignore_ascii_case(name)));
        request.headers.extend(self.headers.iter().cloned());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Fail with `ApiError::Remote` when the status is in the error table;
/// return every other response unchanged.
pub fn handle_response(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    match ApiError::from_status(response.status) {
        Some(err) => {
            warn!(status = response.status, "request rejected by server");
            Err(err)
        }
        None => Ok(response),
    }
}

/// `handle_response`, then decode the body as JSON. An empty body decodes to
/// `Value::Null`.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    let response = handle_response(response)?;
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
