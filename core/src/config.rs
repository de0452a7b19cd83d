//! Client configuration: base URL, default headers and the call-log toggle.

use std::collections::BTreeMap;
use std::env;

use crate::error::{ApiError, Result};
use crate::http::set_header;

pub const BASE_URL_ENV: &str = "CHECKOUT_BASE_URL";
pub const LOGGING_ENV: &str = "CHECKOUT_LOGGING";

/// Device and application descriptor sent with every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub app_id: String,
    pub sdk_version: String,
    pub os_name: String,
    pub os_version: String,
    pub device_name: String,
    pub device_type: String,
    pub device_model: String,
    pub sim_network_name: Option<String>,
    pub sim_country_iso: Option<String>,
}

impl DeviceInfo {
    pub fn headers(&self) -> BTreeMap<String, String> {
        let pairs = [
            ("app_id", self.app_id.clone()),
            ("requirer", "SDK".to_string()),
            ("requirer_version", self.sdk_version.clone()),
            ("requirer_os", self.os_name.clone()),
            ("requirer_os_version", self.os_version.clone()),
            ("requirer_device_name", sanitize_device_name(&self.device_name)),
            ("requirer_device_type", self.device_type.clone()),
            ("requirer_device_model", self.device_model.clone()),
            (
                "requirer_sim_network_name",
                self.sim_network_name.clone().unwrap_or_default(),
            ),
            (
                "requirer_sim_country_iso",
                self.sim_country_iso.clone().unwrap_or_default(),
            ),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Device names are user-editable; the backend only takes ASCII letters and
/// the digits 1-9.
fn sanitize_device_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || ('1'..='9').contains(c))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub headers: BTreeMap<String, String>,
    pub device: Option<DeviceInfo>,
    pub logging_enabled: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
            device: None,
            logging_enabled: false,
        }
    }

    /// Build from `CHECKOUT_BASE_URL` and `CHECKOUT_LOGGING`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(BASE_URL_ENV)
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{BASE_URL_ENV} is not set")))?;
        let logging = env::var(LOGGING_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Ok(Self::new(base_url).with_logging(logging))
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, key.into(), value.into());
        self
    }

    pub fn with_device(mut self, device: DeviceInfo) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Headers every request starts from. Explicit `headers` win over the
    /// device descriptor.
    pub fn default_headers(&self) -> BTreeMap<String, String> {
        let mut headers = match &self.device {
            Some(device) => device.headers(),
            None => BTreeMap::from([
                ("device_model".to_string(), "iphone".to_string()),
                ("os_version".to_string(), "ios".to_string()),
            ]),
        };
        for (name, value) in &self.headers {
            set_header(&mut headers, name.clone(), value.clone());
        }
        headers
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
