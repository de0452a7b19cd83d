//! Request dispatcher for the checkout backend.
//!
//! # Design
//! `CheckoutClient` is constructed explicitly from a `ClientConfig`; there is
//! no process-wide instance. A call goes through three steps:
//!
//! 1. `prepare` turns a `RequestDescriptor` into an `HttpRequest`.
//! 2. A `Transport` (or the native host, over FFI) executes it.
//! 3. `complete` records the call in the `CallLog` when logging is on and
//!    resolves the outcome into exactly one value or one error.
//!
//! `dispatch` chains all three. Resolution decodes the body into a generic
//! JSON value first, lets the error resolver look for a backend `errors`
//! envelope, and only then projects the value into the expected type. A
//! failed projection is an `ApiError::Decode`; no call ends without a result.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result, TransportError};
use crate::http::{set_header, HttpRequest, HttpResponse};
use crate::log::{CallLog, LoggedCall};
use crate::request::RequestDescriptor;
use crate::resolver::resolve_error;
use crate::route::Route;
use crate::transport::Transport;
use crate::types::{ConfigRequest, ConfigResponse, CreateTokenRequest, EntitResponse, Token};

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct CheckoutClient {
    base_url: Url,
    default_headers: BTreeMap<String, String>,
    logging_enabled: bool,
    log: CallLog,
}

impl CheckoutClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self {
            base_url,
            default_headers: config.default_headers(),
            logging_enabled: config.logging_enabled,
            log: CallLog::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    pub fn set_logging(&mut self, enabled: bool) {
        self.logging_enabled = enabled;
    }

    pub fn call_log(&self) -> &CallLog {
        &self.log
    }

    // -----------------------------------------------------------------------
    // Generic pipeline
    // -----------------------------------------------------------------------

    pub fn prepare<B>(&self, descriptor: &RequestDescriptor<'_, B>) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self
            .base_url
            .join(descriptor.route.path())
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        if !descriptor.params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                descriptor
                    .params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut headers = self.default_headers.clone();
        for (name, value) in &descriptor.headers {
            set_header(&mut headers, name.clone(), value.clone());
        }

        let body = descriptor
            .body
            .map(|b| serde_json::to_string(b))
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        if body.is_some() && !headers.keys().any(|k| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
            headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        }

        debug!(
            route = %descriptor.route,
            method = %descriptor.method,
            url = %url,
            "prepared request"
        );

        Ok(HttpRequest {
            method: descriptor.method,
            url: url.into(),
            headers: headers.into_iter().collect(),
            body,
        })
    }

    /// Record the call (when logging is on) and resolve its outcome.
    pub fn complete<T>(
        &self,
        request: &HttpRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.logging_enabled {
            self.log.append(logged_call(request, &outcome));
        }
        let result = resolve_outcome(outcome);
        match &result {
            Ok(_) => debug!(method = %request.method, url = %request.url, "request completed"),
            Err(err) => warn!(
                method = %request.method,
                url = %request.url,
                status = err.http_status(),
                error = %err,
                "request failed"
            ),
        }
        result
    }

    pub fn dispatch<X, B, T>(
        &self,
        transport: &X,
        descriptor: &RequestDescriptor<'_, B>,
    ) -> Result<T>
    where
        X: Transport + ?Sized,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.prepare(descriptor)?;
        let outcome = transport.execute(&request);
        self.complete(&request, outcome)
    }

    // -----------------------------------------------------------------------
    // Typed operations
    // -----------------------------------------------------------------------

    pub fn currencies<X: Transport + ?Sized>(&self, transport: &X) -> Result<EntitResponse> {
        self.dispatch(transport, &RequestDescriptor::new(Route::Currencies))
    }

    pub fn config<X: Transport + ?Sized>(
        &self,
        transport: &X,
        input: &ConfigRequest,
    ) -> Result<ConfigResponse> {
        self.dispatch(transport, &RequestDescriptor::new(Route::Config).body(input))
    }

    pub fn create_token<X: Transport + ?Sized>(
        &self,
        transport: &X,
        input: &CreateTokenRequest,
    ) -> Result<Token> {
        self.dispatch(transport, &RequestDescriptor::new(Route::Tokens).body(input))
    }

    // -----------------------------------------------------------------------
    // Host-does-IO pairs
    // -----------------------------------------------------------------------

    pub fn build_currencies(&self) -> Result<HttpRequest> {
        self.prepare(&RequestDescriptor::new(Route::Currencies))
    }

    pub fn build_config(&self, input: &ConfigRequest) -> Result<HttpRequest> {
        self.prepare(&RequestDescriptor::new(Route::Config).body(input))
    }

    pub fn build_create_token(&self, input: &CreateTokenRequest) -> Result<HttpRequest> {
        self.prepare(&RequestDescriptor::new(Route::Tokens).body(input))
    }

    pub fn parse_currencies(
        &self,
        request: &HttpRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<EntitResponse> {
        self.complete(request, outcome)
    }

    pub fn parse_config(
        &self,
        request: &HttpRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<ConfigResponse> {
        self.complete(request, outcome)
    }

    pub fn parse_token(
        &self,
        request: &HttpRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Token> {
        self.complete(request, outcome)
    }
}

/// Accept only absolute http(s) URLs and make sure the path ends with `/`, so
/// route paths are appended rather than replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(format!("{raw}: not an http(s) URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn resolve_outcome<T: DeserializeOwned>(
    outcome: Result<HttpResponse, TransportError>,
) -> Result<T> {
    let (raw, transport) = match outcome {
        Ok(response) => {
            let raw = parse_body(&response.body);
            let transport = (!response.is_success()).then(|| TransportError::Status {
                status: response.status,
                body: response.body,
            });
            (raw, transport)
        }
        Err(err) => (None, Some(err)),
    };

    if let Some(err) = resolve_error(raw.as_ref(), transport) {
        return Err(err);
    }
    let raw = raw.ok_or_else(|| ApiError::Decode("response body is not JSON".to_string()))?;
    serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Empty bodies decode as `null`; anything that is not JSON yields `None`.
fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return Some(Value::Null);
    }
    serde_json::from_str(body).ok()
}

fn logged_call(
    request: &HttpRequest,
    outcome: &Result<HttpResponse, TransportError>,
) -> LoggedCall {
    let headers: BTreeMap<&str, &str> = request
        .headers
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    LoggedCall {
        url: request.url.clone(),
        headers: serde_json::to_string(&headers).unwrap_or_default(),
        params: request.body.clone().unwrap_or_else(|| "{}".to_string()),
        method_type: request.method.to_string(),
        response: match outcome {
            Ok(response) => response.body.clone(),
            Err(err) => err.to_string(),
        },
    }
}
