//! Typed API client core for the checkout backend.
//!
//! # Overview
//! Builds `HttpRequest` values from a `Route` and a typed body, and resolves
//! responses into either a decoded value or an `ApiError`. Executing the
//! round-trip is pluggable: `CheckoutClient::dispatch` drives any `Transport`
//! (the `blocking` feature ships one on `ureq`), while the `build_*` /
//! `parse_*` pairs let a native host perform the I/O itself.
//!
//! # Design
//! - `CheckoutClient` is explicitly constructed; base URL, default headers
//!   and the logging flag come from `ClientConfig`.
//! - Error precedence lives in `resolver`: a backend `errors` envelope in the
//!   body beats any transport error reported for the same call.
//! - Every call ends in exactly one `Result`; a body that does not fit the
//!   expected type is an `ApiError::Decode`.
//! - `CallLog` is the optional in-memory audit trail, shared by clones.

pub mod client;
pub mod config;
pub mod currency;
pub mod error;
pub mod http;
pub mod log;
pub mod request;
pub mod resolver;
pub mod route;
pub mod transport;
pub mod types;

pub use client::CheckoutClient;
pub use config::{ClientConfig, DeviceInfo};
pub use currency::CurrencyCode;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use log::{CallLog, LoggedCall};
pub use request::RequestDescriptor;
pub use resolver::resolve_error;
pub use route::Route;
#[cfg(feature = "blocking")]
pub use transport::UreqTransport;
pub use transport::Transport;
pub use types::{
    ConfigRequest, ConfigResponse, Country, CreateTokenCard, CreateTokenRequest, Customer,
    EntitResponse, ErrorEnvelope, Merchant, Phone, SavedCardReference, Source, Token, TokenCard,
    TrackingUrl,
};
