//! ISO 4217 currency codes accepted by the checkout backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

macro_rules! currency_codes {
    ($($variant:ident),+ $(,)?) => {
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CurrencyCode {
            $($variant),+
        }

        impl CurrencyCode {
            pub const ALL: &'static [CurrencyCode] = &[$(CurrencyCode::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $(CurrencyCode::$variant => stringify!($variant)),+
                }
            }
        }
    };
}

currency_codes!(
    AED, BHD, CAD, CHF, CNY, EGP, EUR, GBP, INR, JOD, JPY, KWD, LBP, MAD, OMR, PKR, QAR, SAR,
    TRY, USD,
);

impl CurrencyCode {
    /// Case-insensitive lookup. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Number of minor units shown for amounts in this currency.
    pub fn decimal_digits(self) -> u8 {
        match self {
            CurrencyCode::BHD | CurrencyCode::JOD | CurrencyCode::KWD | CurrencyCode::OMR => 3,
            CurrencyCode::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Decode a list of raw codes, silently dropping the ones we do not know.
/// `null` or a missing field decodes to an empty list.
pub(crate) fn deserialize_known_codes<'de, D>(
    deserializer: D,
) -> Result<Vec<CurrencyCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(filter_known(raw.unwrap_or_default()))
}

pub fn filter_known<I, S>(codes: I) -> Vec<CurrencyCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|c| CurrencyCode::from_code(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(CurrencyCode::from_code("kwd"), Some(CurrencyCode::KWD));
        assert_eq!(CurrencyCode::from_code(" USD "), Some(CurrencyCode::USD));
        assert_eq!(CurrencyCode::from_code("ZZZ"), None);
    }

    #[test]
    fn filter_drops_unknown_codes_and_keeps_order() {
        let codes = filter_known(["AED", "USD", "ZZZ", "sar"]);
        assert_eq!(
            codes,
            vec![CurrencyCode::AED, CurrencyCode::USD, CurrencyCode::SAR]
        );
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let json = serde_json::to_string(&CurrencyCode::BHD).unwrap();
        assert_eq!(json, r#""BHD""#);
    }

    #[test]
    fn strict_deserialize_rejects_unknown() {
        let result: Result<CurrencyCode, _> = serde_json::from_str(r#""ZZZ""#);
        assert!(result.is_err());
    }

    #[test]
    fn three_decimal_gulf_currencies() {
        assert_eq!(CurrencyCode::KWD.decimal_digits(), 3);
        assert_eq!(CurrencyCode::AED.decimal_digits(), 2);
    }
}
