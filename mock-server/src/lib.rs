use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::rejection::JsonRejection,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const DEV_CHECKOUT_URL: &str = "https://checkout.dev.tap.company/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorEntry>,
}

/// A handler failure rendered as a backend `errors` envelope.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    code: &'static str,
    description: String,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            errors: vec![ErrorEntry {
                code: self.code.to_string(),
                description: self.description,
            }],
        };
        (self.status, Json(envelope)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct Customer {
    pub first_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigRequest {
    pub save_card: bool,
    pub customer: Customer,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CardInput {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

#[derive(Debug, Deserialize)]
pub struct SavedCardInput {
    pub card_id: String,
    pub customer_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateTokenRequest {
    Card(CardInput),
    SavedCard(SavedCardInput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCard {
    pub id: String,
    pub last_four: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub brand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub created: u64,
    pub card: Option<TokenCard>,
}

pub fn app() -> Router {
    Router::new()
        .route("/currencies", get(currencies))
        .route("/init", get(init))
        .route("/checkout/config", post(config))
        .route("/tokens/", post(create_token))
        .route("/charges/", post(bad_gateway))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Requests without credentials are let through; present credentials must
/// be a secret key.
fn authorize(headers: &HeaderMap) -> Result<(), Failure> {
    match headers.get(AUTHORIZATION).map(|v| v.to_str()) {
        None => Ok(()),
        Some(Ok(value)) if value.starts_with("Bearer sk_") => Ok(()),
        Some(_) => Err(Failure::new(
            StatusCode::UNAUTHORIZED,
            "2107",
            "Invalid API key",
        )),
    }
}

async fn currencies(headers: HeaderMap) -> Result<Json<serde_json::Value>, Failure> {
    authorize(&headers)?;
    Ok(Json(serde_json::json!({
        "merchant": {
            "id": "1124340",
            "name": "Tap Payments",
            "logo": "https://tap.company/logo.png"
        },
        "currencies": ["AED", "KWD", "SAR", "USD", "ZZZ"],
        "countries": [
            {"code": "965", "nameEN": "Kuwait", "nameAR": "الكويت", "phoneLength": 8},
            {"code": "971", "nameEN": "United Arab Emirates", "phoneLength": 9}
        ]
    })))
}

/// Answers with a shape no client model expects.
async fn init() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "session_token": Uuid::new_v4().to_string() }))
}

async fn config(
    headers: HeaderMap,
    payload: Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<Json<ConfigResponse>, Failure> {
    authorize(&headers)?;
    let Json(input) = payload.map_err(|e| {
        Failure::new(StatusCode::BAD_REQUEST, "1100", format!("Invalid request: {}", e.body_text()))
    })?;
    if input.customer.first_name.is_none() && input.customer.email.is_none() {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "1104",
            "Customer name or email is required",
        ));
    }
    Ok(Json(ConfigResponse {
        redirect_url: format!(
            "{DEV_CHECKOUT_URL}?mode=page&currency={}&save_card={}&token={}",
            input.currency,
            input.save_card,
            Uuid::new_v4().simple()
        ),
    }))
}

async fn create_token(
    headers: HeaderMap,
    payload: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Token>), Failure> {
    authorize(&headers)?;
    let Json(input) = payload.map_err(|e| {
        Failure::new(StatusCode::BAD_REQUEST, "1100", format!("Invalid request: {}", e.body_text()))
    })?;
    let card = match input {
        CreateTokenRequest::Card(card) => tokenize_card(card)?,
        CreateTokenRequest::SavedCard(saved) => {
            if !saved.customer_id.starts_with("cus_") {
                return Err(Failure::new(
                    StatusCode::NOT_FOUND,
                    "1126",
                    "Customer not found",
                ));
            }
            TokenCard {
                id: saved.card_id,
                last_four: "1111".to_string(),
                exp_month: 12,
                exp_year: 2030,
                brand: "VISA".to_string(),
            }
        }
    };
    let token = Token {
        id: format!("tok_{}", Uuid::new_v4().simple()),
        created: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
        card: Some(card),
    };
    Ok((StatusCode::OK, Json(token)))
}

fn tokenize_card(card: CardInput) -> Result<TokenCard, Failure> {
    let digits_only = card.number.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !(13..=19).contains(&card.number.len()) {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "1117",
            "Invalid card number",
        ));
    }
    if !(1..=12).contains(&card.exp_month) || !(3..=4).contains(&card.cvc.len()) {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "1118",
            "Invalid card details",
        ));
    }
    let brand = match card.number.as_bytes()[0] {
        b'4' => "VISA",
        b'5' => "MASTERCARD",
        b'3' => "AMEX",
        _ => "UNKNOWN",
    };
    Ok(TokenCard {
        id: format!("card_{}", Uuid::new_v4().simple()),
        last_four: card.number[card.number.len() - 4..].to_string(),
        exp_month: card.exp_month,
        exp_year: card.exp_year,
        brand: brand.to_string(),
    })
}

async fn bad_gateway() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "Bad Gateway")
}
