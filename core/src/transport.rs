//! The seam between request building and the network.
//!
//! `Transport` executes one `HttpRequest`. Non-2xx statuses are returned as
//! data (`Ok(HttpResponse)`), so the client can still read an error envelope
//! from the body; `Err` is reserved for calls that produced no response.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "blocking")]
pub use blocking::UreqTransport;

#[cfg(feature = "blocking")]
mod blocking {
    use std::time::Duration;

    use ureq::Agent;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Blocking transport on a shared `ureq` agent.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(DEFAULT_TIMEOUT))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url.as_str();
            let body = request.body.as_deref().map(str::as_bytes);

            macro_rules! without_body {
                ($builder:expr) => {{
                    let mut builder = $builder;
                    for (k, v) in &request.headers {
                        builder = builder.header(k.as_str(), v.as_str());
                    }
                    match body {
                        Some(bytes) => builder.force_send_body().send(bytes),
                        None => builder.call(),
                    }
                }};
            }
            macro_rules! with_body {
                ($builder:expr) => {{
                    let mut builder = $builder;
                    for (k, v) in &request.headers {
                        builder = builder.header(k.as_str(), v.as_str());
                    }
                    match body {
                        Some(bytes) => builder.send(bytes),
                        None => builder.send_empty(),
                    }
                }};
            }

            let result = match request.method {
                HttpMethod::Get => without_body!(self.agent.get(url)),
                HttpMethod::Delete => without_body!(self.agent.delete(url)),
                HttpMethod::Post => with_body!(self.agent.post(url)),
                HttpMethod::Put => with_body!(self.agent.put(url)),
                HttpMethod::Patch => with_body!(self.agent.patch(url)),
            };

            let mut response = result.map_err(map_error)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(map_error)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn map_error(err: ureq::Error) -> TransportError {
        match err {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
                TransportError::Connection(err.to_string())
            }
            ureq::Error::Io(io) => TransportError::Connection(io.to_string()),
            other => TransportError::Other(other.to_string()),
        }
    }

}
