//! Play the native host: build requests through the C ABI, execute them with
//! a plain HTTP client against the mock server, and hand the outcome back.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use checkout_ffi::types::{
    FfiCheckoutClient, FfiCheckoutResult, FfiErrorCode, FfiHttpMethod, FfiHttpRequest,
    FfiHttpResponse, FfiTransportError,
};
use checkout_ffi::{
    checkout_build_config, checkout_build_create_token, checkout_build_currencies,
    checkout_call_log_json, checkout_client_free, checkout_client_new, checkout_free_request,
    checkout_free_result, checkout_free_string, checkout_parse_config, checkout_parse_currencies,
    checkout_parse_token,
};

fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn c_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
}

/// Execute an `FfiHttpRequest` the way a host would; returns status and body.
fn execute(req: *const FfiHttpRequest) -> (u16, String) {
    let req = unsafe { &*req };
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let url = c_str(req.url);
    let headers: Vec<(&str, &str)> = if req.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) }
            .iter()
            .map(|h| (c_str(h.key), c_str(h.value)))
            .collect()
    };

    let mut response = match req.method {
        FfiHttpMethod::Get => {
            let mut builder = agent.get(url);
            for (k, v) in &headers {
                builder = builder.header(*k, *v);
            }
            builder.call().unwrap()
        }
        FfiHttpMethod::Post => {
            let mut builder = agent.post(url);
            for (k, v) in &headers {
                builder = builder.header(*k, *v);
            }
            builder.send(c_str(req.body)).unwrap()
        }
        other => panic!("unexpected method {other:?}"),
    };
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap();
    (status, body)
}

fn round_trip(
    client: *mut FfiCheckoutClient,
    req: *mut FfiHttpRequest,
    parse: extern "C" fn(
        *const FfiCheckoutClient,
        *const FfiHttpRequest,
        *const FfiHttpResponse,
    ) -> *mut FfiCheckoutResult,
) -> (FfiErrorCode, Option<String>, Option<serde_json::Value>) {
    assert!(!req.is_null());
    let (status, body) = execute(req);
    let body = CString::new(body).unwrap();
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
        transport_error: FfiTransportError::None,
        transport_message: std::ptr::null(),
    };

    let result = parse(client, req, &resp);
    let r = unsafe { &*result };
    let message = (!r.error_message.is_null()).then(|| c_str(r.error_message).to_string());
    let data = (!r.data.is_null()).then(|| serde_json::from_str(c_str(r.data)).unwrap());
    let code = r.error_code;

    checkout_free_result(result);
    checkout_free_request(req);
    (code, message, data)
}

#[test]
fn host_driven_checkout_flow() {
    let base_url = CString::new(spawn_server()).unwrap();
    let client = checkout_client_new(base_url.as_ptr(), true);
    assert!(!client.is_null());

    let (code, _, data) = round_trip(
        client,
        checkout_build_currencies(client),
        checkout_parse_currencies,
    );
    assert_eq!(code, FfiErrorCode::Ok);
    let currencies = data.unwrap()["currencies"].clone();
    assert!(!currencies.as_array().unwrap().iter().any(|c| c == "ZZZ"));

    let config = CString::new(
        r#"{"save_card":false,"customer":{"email":"a@b.c"},"currency":"USD","source":{"id":"src_all"},"redirect":{"url":"x://"}}"#,
    )
    .unwrap();
    let (code, _, data) = round_trip(
        client,
        checkout_build_config(client, config.as_ptr()),
        checkout_parse_config,
    );
    assert_eq!(code, FfiErrorCode::Ok);
    let checkout_url = data.unwrap()["checkout_url"].as_str().unwrap().to_string();
    assert!(checkout_url.starts_with("https://ios-wrapper.netlify.app/"));
    assert!(checkout_url.ends_with("&fromSDK=true"));

    let card =
        CString::new(r#"{"card":{"number":"42","exp_month":1,"exp_year":2030,"cvc":"1"}}"#)
            .unwrap();
    let (code, message, data) = round_trip(
        client,
        checkout_build_create_token(client, card.as_ptr()),
        checkout_parse_token,
    );
    assert_eq!(code, FfiErrorCode::Backend);
    assert_eq!(message.as_deref(), Some("Invalid card number"));
    assert!(data.is_none());

    let log = checkout_call_log_json(client);
    let calls: serde_json::Value = serde_json::from_str(c_str(log)).unwrap();
    assert_eq!(calls.as_array().unwrap().len(), 3);
    assert_eq!(calls[2]["methodType"], "POST");

    checkout_free_string(log);
    checkout_client_free(client);
}
