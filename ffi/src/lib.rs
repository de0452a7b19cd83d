//! C-ABI wrapper around `checkout-core`.
//!
//! # Overview
//! Exposes the checkout operations (currencies, config, token creation)
//! through `extern "C"` functions so a native host can build requests, run
//! them on its own HTTP stack and hand the outcome back for resolution.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary. The client holds a lock, so closures are
//!   wrapped in `AssertUnwindSafe`.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - Inputs and decoded payloads cross the boundary as JSON text inside a
//!   single `FfiCheckoutResult` envelope.
//! - The C caller owns all returned pointers and must call the matching
//!   `checkout_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use checkout_core::{ApiError, ClientConfig, ConfigRequest, CreateTokenRequest};
use serde::Serialize;

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CheckoutClient` bound to `base_url`.
///
/// Returns null if `base_url` is null, not an http(s) URL, or if an internal
/// panic occurs. The caller must free the returned pointer with
/// `checkout_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_client_new(
    base_url: *const c_char,
    logging: bool,
) -> *mut FfiCheckoutClient {
    catch_unwind(|| {
        let Some(url) = read_c_str(base_url) else {
            return std::ptr::null_mut();
        };
        match checkout_core::CheckoutClient::new(ClientConfig::new(url).with_logging(logging)) {
            Ok(client) => Box::into_raw(Box::new(FfiCheckoutClient { inner: client })),
            Err(e) => {
                tracing::warn!(error = %e, "rejected base url");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `checkout_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_client_free(client: *mut FfiCheckoutClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Turn call logging on or off for later calls. No-op on null.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_set_logging(client: *mut FfiCheckoutClient, enabled: bool) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *client }.inner.set_logging(enabled);
        }));
    }
}

/// Every logged call so far as a JSON array, oldest first.
///
/// Returns null if `client` is null. Free with `checkout_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_call_log_json(client: *const FfiCheckoutClient) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.call_log().to_json() {
            Ok(json) => into_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the request that lists supported currencies.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `checkout_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_build_currencies(
    client: *const FfiCheckoutClient,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        request_or_null(client.inner.build_currencies(), "checkout_build_currencies")
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build the checkout config request from a JSON-encoded `ConfigRequest`.
///
/// Returns null if an argument is null or `json` does not describe a valid
/// config request.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_build_config(
    client: *const FfiCheckoutClient,
    json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(input) = read_json::<ConfigRequest>(json) else {
            return std::ptr::null_mut();
        };
        request_or_null(client.inner.build_config(&input), "checkout_build_config")
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Build a token request from a JSON-encoded `CreateTokenRequest`, either
/// `{"card": {..}}` or `{"saved_card": {..}}`.
///
/// Returns null if an argument is null or `json` is not a valid token request.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_build_create_token(
    client: *const FfiCheckoutClient,
    json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(input) = read_json::<CreateTokenRequest>(json) else {
            return std::ptr::null_mut();
        };
        request_or_null(client.inner.build_create_token(&input), "checkout_build_create_token")
    }))
    .unwrap_or(std::ptr::null_mut())
}

fn request_or_null(
    built: checkout_core::error::Result<checkout_core::HttpRequest>,
    function: &str,
) -> *mut FfiHttpRequest {
    match built {
        Ok(req) => FfiHttpRequest::from_core(req),
        Err(e) => {
            tracing::warn!(function, error = %e, "request build failed");
            std::ptr::null_mut()
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(json: *const c_char) -> Option<T> {
    let text = read_c_str(json)?;
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "invalid request json");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Shared body of every `checkout_parse_*`: null checks, conversion, and
/// packing the typed result as JSON.
fn parse_with<T, F>(
    client: *const FfiCheckoutClient,
    request: *const FfiHttpRequest,
    response: *const FfiHttpResponse,
    parse: F,
) -> *mut FfiCheckoutResult
where
    T: Serialize,
    F: FnOnce(
        &checkout_core::CheckoutClient,
        &checkout_core::HttpRequest,
        Result<checkout_core::HttpResponse, checkout_core::TransportError>,
    ) -> Result<T, ApiError>,
{
    if client.is_null() {
        return FfiCheckoutResult::null_arg("client");
    }
    if request.is_null() {
        return FfiCheckoutResult::null_arg("request");
    }
    if response.is_null() {
        return FfiCheckoutResult::null_arg("response");
    }
    let client = unsafe { &*client };
    let request = unsafe { &*request }.to_core();
    let outcome = unsafe { &*response }.to_core();

    match parse(&client.inner, &request, outcome) {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => FfiCheckoutResult::ok_json(json),
            Err(e) => FfiCheckoutResult::from_error(ApiError::Serialization(e.to_string())),
        },
        Err(e) => FfiCheckoutResult::from_error(e),
    }
}

/// Parse the outcome of a currencies request.
///
/// `data` holds the entitlement JSON with unknown currency codes dropped.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_parse_currencies(
    client: *const FfiCheckoutClient,
    request: *const FfiHttpRequest,
    response: *const FfiHttpResponse,
) -> *mut FfiCheckoutResult {
    catch_unwind(AssertUnwindSafe(|| {
        parse_with(client, request, response, |c, req, outcome| c.parse_currencies(req, outcome))
    }))
    .unwrap_or_else(|_| panicked("checkout_parse_currencies"))
}

/// Wire shape plus the URL the host should load.
#[derive(Serialize)]
struct ConfigPayload {
    redirect_url: String,
    checkout_url: String,
}

/// Parse the outcome of a config request.
///
/// `data` is `{"redirect_url": .., "checkout_url": ..}`.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_parse_config(
    client: *const FfiCheckoutClient,
    request: *const FfiHttpRequest,
    response: *const FfiHttpResponse,
) -> *mut FfiCheckoutResult {
    catch_unwind(AssertUnwindSafe(|| {
        parse_with(client, request, response, |c, req, outcome| {
            let config = c.parse_config(req, outcome)?;
            Ok(ConfigPayload {
                checkout_url: config.checkout_url(),
                redirect_url: config.redirect_url,
            })
        })
    }))
    .unwrap_or_else(|_| panicked("checkout_parse_config"))
}

/// Parse the outcome of a token request.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_parse_token(
    client: *const FfiCheckoutClient,
    request: *const FfiHttpRequest,
    response: *const FfiHttpResponse,
) -> *mut FfiCheckoutResult {
    catch_unwind(AssertUnwindSafe(|| {
        parse_with(client, request, response, |c, req, outcome| c.parse_token(req, outcome))
    }))
    .unwrap_or_else(|_| panicked("checkout_parse_token"))
}

fn panicked(function: &str) -> *mut FfiCheckoutResult {
    tracing::warn!(function, "panic caught at ffi boundary");
    FfiCheckoutResult::panic(&format!("panic in {function}"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `checkout_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiCheckoutResult` returned by any `checkout_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_free_result(result: *mut FfiCheckoutResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.data);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn checkout_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
