//! Wire DTOs for the checkout backend.
//!
//! # Design
//! Request models serialize exactly the keys the backend expects and omit
//! absent optionals. Response models are lenient: optional sections decode to
//! `None`, and currency lists drop codes this client does not know instead of
//! failing the whole response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::currency::{deserialize_known_codes, CurrencyCode};

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// `{ "errors": [ { "description": ... } ] }` as declared by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<BackendErrorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendErrorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
    pub description: String,
}

impl ErrorEnvelope {
    pub fn first_description(&self) -> Option<&str> {
        self.errors.first().map(|e| e.description.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shared request models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// Customer attached to a config or payment request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingUrl {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Request payload for the web checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    #[serde(rename = "threeDSecure", default, skip_serializing_if = "Option::is_none")]
    pub three_d_secure: Option<bool>,
    pub save_card: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    pub customer: Customer,
    pub currency: CurrencyCode,
    pub source: Source,
    pub redirect: TrackingUrl,
}

const DEV_CHECKOUT_PREFIX: &str = "https://checkout.dev.tap.company/";
const WRAPPER_CHECKOUT_PREFIX: &str = "https://ios-wrapper.netlify.app/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub redirect_url: String,
}

impl ConfigResponse {
    /// URL the embedded web view should load.
    pub fn checkout_url(&self) -> String {
        let url = self
            .redirect_url
            .replace(DEV_CHECKOUT_PREFIX, WRAPPER_CHECKOUT_PREFIX);
        format!("{url}&fromSDK=true")
    }
}

// ---------------------------------------------------------------------------
// Currencies (entit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Country a GoPay account can log in from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    #[serde(rename = "nameEN", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(rename = "nameAR", default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(rename = "phoneLength", default, skip_serializing_if = "Option::is_none")]
    pub phone_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitResponse {
    #[serde(default)]
    pub merchant: Option<Merchant>,
    #[serde(default, deserialize_with = "deserialize_known_codes")]
    pub currencies: Vec<CurrencyCode>,
    #[serde(rename = "countries", default)]
    pub go_pay_login_countries: Option<Vec<Country>>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenCard {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCardReference {
    pub card_id: String,
    pub customer_id: String,
}

/// Tokenization request. Every mode goes to `Route::Tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateTokenRequest {
    Card(CreateTokenCard),
    SavedCard(SavedCardReference),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCard {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<TokenCard>,
}
