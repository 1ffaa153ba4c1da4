//! Async client for the Lardi-Trans freight API.
//!
//! # Overview
//! Creates cargo proposals and fetches the reference lists (currencies,
//! payment units, body types, areas, ...) needed to fill them in. Every
//! operation is a single HTTP round-trip: no retries, no caching, no
//! pagination.
//!
//! # Design
//! - `LardiClient` is immutable after construction and safe to share.
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`);
//!   the network lives behind the `Transport` trait, with a `reqwest`
//!   implementation as the default. Tests plug in fakes.
//! - Every operation takes a `Context` for cancellation and deadlines.
//! - Errors name the failed operation and separate server rejections
//!   (`ErrorKind::Api`) from local and transport failures.
//!
//! ```no_run
//! use lardi_core::{Config, Context, LardiClient};
//!
//! # async fn run() -> Result<(), lardi_core::Error> {
//! let client = LardiClient::new(Config::new("my-api-key"));
//! let uah = client.find_currency(&Context::background(), "грн.").await?;
//! # let _ = uah;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{Endpoint, LardiClient};
pub use config::{Config, Language};
pub use context::{CancelHandle, Context};
pub use error::{ApiError, Error, ErrorKind, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    find_by_name, CargoPackaging, CargoRequest, CargoResponse, Contact, Coordinates, LoadParams, PaymentForm,
    Reference,
};
