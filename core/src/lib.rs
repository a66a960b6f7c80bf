//! Synchronous client for the Sentino text-analysis API.
//!
//! # Overview
//! Wraps three endpoints: text scoring (`/score`), inventory listing
//! (`/inventories`) and text classification (`/item/classify`). Every call
//! is authenticated with `Authorization: Token <key>`, checked against the
//! service's documented error statuses, and returns the server's JSON as a
//! `serde_json::Value`.
//!
//! # Design
//! - `SentinoClient` holds only its base URL, a header set built once at
//!   construction, and a `Transport`.
//! - Requests and responses are plain data (`HttpRequest`,
//!   `HttpResponse`), so building and gating are testable without I/O.
//! - `UreqTransport` is the default blocking transport. No retries, no
//!   caching, one request per call.
//!
//! ```no_run
//! use sentino_core::SentinoClient;
//!
//! # fn main() -> Result<(), sentino_core::ApiError> {
//! let client = SentinoClient::new("my-token")?;
//! let scores = client.score_text("I am a happy person.")?;
//! println!("{scores}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{handle_response, parse_response, SentinoClient, BASE_URL};
pub use error::{error_message, ApiError, ERROR_CODES};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{relevant_categories, BIG5_TRAITS, DEFAULT_LANG, RELEVANCE_THRESHOLD};
