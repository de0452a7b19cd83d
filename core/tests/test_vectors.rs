//! Verify request building and outcome resolution against the JSON vectors in
//! `test-vectors/`.
//!
//! Request vectors pin the method, URL, content type and body each typed
//! operation produces. Response vectors feed a simulated outcome through
//! `complete` and compare the decoded value (as JSON) or the error kind.
//! Comparing parsed JSON rather than raw strings avoids false negatives from
//! field ordering.

use checkout_core::{
    ApiError, CheckoutClient, ClientConfig, ConfigRequest, CreateTokenRequest, HttpMethod,
    HttpRequest, HttpResponse, TransportError,
};
use serde_json::Value;

fn client(base_url: &str) -> CheckoutClient {
    CheckoutClient::new(ClientConfig::new(base_url)).unwrap()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn build(c: &CheckoutClient, case: &Value) -> HttpRequest {
    match case["operation"].as_str().unwrap() {
        "currencies" => c.build_currencies().unwrap(),
        "config" => {
            let input: ConfigRequest = serde_json::from_value(case["input"].clone()).unwrap();
            c.build_config(&input).unwrap()
        }
        "create_token" => {
            let input: CreateTokenRequest = serde_json::from_value(case["input"].clone()).unwrap();
            c.build_create_token(&input).unwrap()
        }
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = client(vectors["base_url"].as_str().unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&c, case);

        let method = parse_method(expected["method"].as_str().unwrap());
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(
            req.header("content-type"),
            expected["content_type"].as_str(),
            "{name}: content type"
        );

        match req.body.as_deref() {
            Some(body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: missing body"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

fn outcome(case: &Value) -> Result<HttpResponse, TransportError> {
    if let Some(kind) = case.get("transport_error") {
        return Err(match kind.as_str().unwrap() {
            "timeout" => TransportError::Timeout,
            other => TransportError::Connection(other.to_string()),
        });
    }
    let sim = &case["response"];
    Ok(HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    ))
}

fn resolve(c: &CheckoutClient, req: &HttpRequest, case: &Value) -> Result<Value, ApiError> {
    let outcome = outcome(case);
    let value = match case["operation"].as_str().unwrap() {
        "currencies" => serde_json::to_value(c.parse_currencies(req, outcome)?),
        "config" => serde_json::to_value(c.parse_config(req, outcome)?),
        "create_token" => serde_json::to_value(c.parse_token(req, outcome)?),
        other => panic!("unknown operation: {other}"),
    };
    Ok(value.unwrap())
}

#[test]
fn response_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = client("http://localhost:3000");
    let req = c.build_currencies().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = resolve(&c, &req, case);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            let kind = expected_error["kind"].as_str().unwrap();
            let matches_kind = match kind {
                "Backend" => matches!(err, ApiError::Backend { .. }),
                "Transport" => matches!(err, ApiError::Transport(_)),
                "Decode" => matches!(err, ApiError::Decode(_)),
                other => panic!("{name}: unknown expected_error: {other}"),
            };
            assert!(matches_kind, "{name}: expected {kind}, got {err:?}");
            if let Some(message) = expected_error.get("message") {
                assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: message");
            }
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}
