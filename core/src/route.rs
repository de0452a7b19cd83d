//! Backend endpoints.
//!
//! Every endpoint is a `Route` variant; its path segment and default method
//! live in the match arms below, so adding an endpoint is a compile-checked
//! change in one place.

use std::fmt;

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Intent payload for the checkout sheet.
    Intent,
    GoPayLogin,
    /// Merchant header, supported currencies and GoPay login countries.
    Currencies,
    /// Session kickstart; must be hit before `PaymentOptions`.
    Init,
    PaymentOptions,
    Authorize,
    BillingAddress,
    Bin,
    Card,
    CardVerification,
    Charges,
    /// Web checkout configuration; answers with a redirect URL.
    Config,
    Customers,
    Token,
    Tokens,
}

impl Route {
    pub const ALL: [Route; 15] = [
        Route::Intent,
        Route::GoPayLogin,
        Route::Currencies,
        Route::Init,
        Route::PaymentOptions,
        Route::Authorize,
        Route::BillingAddress,
        Route::Bin,
        Route::Card,
        Route::CardVerification,
        Route::Charges,
        Route::Config,
        Route::Customers,
        Route::Token,
        Route::Tokens,
    ];

    /// Path segment relative to the client's base URL.
    pub fn path(self) -> &'static str {
        match self {
            Route::Intent => "5720fa1c-9b7e-4b68-810f-dbb79228405c",
            Route::GoPayLogin => "7ffceaa7-0b86-4a18-88bb-c157c9a27aae",
            Route::Currencies => "currencies",
            Route::Init => "init",
            Route::PaymentOptions => "payment/types/",
            Route::Authorize => "authorize/",
            Route::BillingAddress => "billing_address/",
            Route::Bin => "bin/",
            Route::Card => "card/",
            Route::CardVerification => "card/verify/",
            Route::Charges => "charges/",
            Route::Config => "checkout/config",
            Route::Customers => "customers/",
            Route::Token => "token/",
            Route::Tokens => "tokens/",
        }
    }

    pub fn default_method(self) -> HttpMethod {
        match self {
            Route::PaymentOptions
            | Route::Authorize
            | Route::Charges
            | Route::CardVerification
            | Route::Config
            | Route::Token
            | Route::Tokens => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn paths_are_unique() {
        let paths: HashSet<_> = Route::ALL.iter().map(|r| r.path()).collect();
        assert_eq!(paths.len(), Route::ALL.len());
    }

    #[test]
    fn paths_are_relative() {
        for route in Route::ALL {
            assert!(!route.path().starts_with('/'), "{route}");
        }
    }

    #[test]
    fn token_routes_default_to_post() {
        assert_eq!(Route::Tokens.default_method(), HttpMethod::Post);
        assert_eq!(Route::Config.default_method(), HttpMethod::Post);
        assert_eq!(Route::Currencies.default_method(), HttpMethod::Get);
        assert_eq!(Route::Init.default_method(), HttpMethod::Get);
    }
}
