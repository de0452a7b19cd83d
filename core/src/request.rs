//! Per-call request description, turned into an `HttpRequest` by
//! `CheckoutClient::prepare`.

use serde::Serialize;

use crate::http::HttpMethod;
use crate::route::Route;

/// Placeholder body type for calls that send none.
pub type NoBody = ();

#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor<'a, B: Serialize + ?Sized = NoBody> {
    pub route: Route,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub body: Option<&'a B>,
}

impl RequestDescriptor<'static, NoBody> {
    /// Descriptor for `route` using its default method, with no body.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            method: route.default_method(),
            headers: Vec::new(),
            params: Vec::new(),
            body: None,
        }
    }
}

impl<'a, B: Serialize + ?Sized> RequestDescriptor<'a, B> {
    /// Attach a JSON body. The method is left untouched.
    pub fn body<'b, C: Serialize + ?Sized>(self, body: &'b C) -> RequestDescriptor<'b, C> {
        RequestDescriptor {
            route: self.route,
            method: self.method,
            headers: self.headers,
            params: self.params,
            body: Some(body),
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Append a URL query parameter. Order is preserved.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_route_default_method() {
        assert_eq!(RequestDescriptor::new(Route::Currencies).method, HttpMethod::Get);
        assert_eq!(RequestDescriptor::new(Route::Tokens).method, HttpMethod::Post);
    }

    #[test]
    fn body_keeps_method_headers_and_params() {
        let payload = serde_json::json!({"a": 1});
        let descriptor = RequestDescriptor::new(Route::Charges)
            .method(HttpMethod::Put)
            .header("x-trace", "1")
            .param("page", "2")
            .body(&payload);
        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(descriptor.headers, vec![("x-trace".to_string(), "1".to_string())]);
        assert_eq!(descriptor.params, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(descriptor.body, Some(&payload));
    }
}
