//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Decoded payloads cross the boundary as
//! JSON text, which the host already knows how to decode. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use checkout_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, TransportError};

/// Opaque handle to a `CheckoutClient`.
pub struct FfiCheckoutClient {
    pub(crate) inner: checkout_core::CheckoutClient,
}

/// Allocate a C string, dropping interior NUL bytes rather than failing.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Borrow a C string as UTF-8. Null or invalid UTF-8 yields `None`.
pub(crate) fn read_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Patch => HttpMethod::Patch,
            FfiHttpMethod::Delete => HttpMethod::Delete,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `checkout_build_*`. The host executes it and hands it back,
/// together with the response, to the matching `checkout_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = into_c_string(req.url);
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }

    /// Read the request back into a core `HttpRequest` without taking
    /// ownership of any field.
    pub(crate) fn to_core(&self) -> HttpRequest {
        let headers = if self.headers.is_null() || self.headers_len == 0 {
            Vec::new()
        } else {
            let slice =
                unsafe { std::slice::from_raw_parts(self.headers, self.headers_len as usize) };
            slice
                .iter()
                .filter_map(|h| {
                    let key = read_c_str(h.key)?;
                    let value = read_c_str(h.value)?;
                    Some((key.to_string(), value.to_string()))
                })
                .collect()
        };
        HttpRequest {
            method: self.method.into(),
            url: read_c_str(self.url).unwrap_or_default().to_string(),
            headers,
            body: read_c_str(self.body).map(str::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// How the host's HTTP call failed, if it did.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTransportError {
    None = 0,
    Timeout = 1,
    Connection = 2,
    Other = 3,
}

/// An HTTP outcome described as C-compatible plain data.
///
/// With `transport_error == None`, `status` and `body` describe the response.
/// Otherwise they are ignored and `transport_message` may explain the
/// failure. The FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
    pub transport_error: FfiTransportError,
    pub transport_message: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> Result<HttpResponse, TransportError> {
        let message = || read_c_str(self.transport_message).unwrap_or_default().to_string();
        match self.transport_error {
            FfiTransportError::None => Ok(HttpResponse::new(
                self.status,
                read_c_str(self.body).unwrap_or_default(),
            )),
            FfiTransportError::Timeout => Err(TransportError::Timeout),
            FfiTransportError::Connection => Err(TransportError::Connection(message())),
            FfiTransportError::Other => Err(TransportError::Other(message())),
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transport = 1,
    Http = 2,
    Backend = 3,
    Deserialization = 4,
    Serialization = 5,
    InvalidBaseUrl = 6,
    Panic = 7,
    NullArg = 8,
}

/// Result envelope for every parse operation.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` holds
/// the decoded payload as JSON. On failure `data` is null, `error_message` is
/// human-readable and `http_status` is set when the status is known.
#[repr(C)]
pub struct FfiCheckoutResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data: *mut c_char,
}

impl FfiCheckoutResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: Option<String>,
        http_status: u16,
        data: Option<String>,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiCheckoutResult {
            error_code,
            error_message: error_message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            data: data.map_or(std::ptr::null_mut(), into_c_string),
        }))
    }

    pub(crate) fn ok_json(json: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(json))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let code = match &err {
            ApiError::Transport(TransportError::Status { .. }) => FfiErrorCode::Http,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Backend { .. } => FfiErrorCode::Backend,
            ApiError::Decode(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::InvalidBaseUrl(_) => FfiErrorCode::InvalidBaseUrl,
        };
        let status = err.http_status().unwrap_or(0);
        Self::boxed(code, Some(err.to_string()), status, None)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}
