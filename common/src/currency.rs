//! Registry of supported currencies.
//!
//! The set is closed: a code is valid if and only if it appears here. Codes are
//! matched exactly, so `"usd"` is not the same as `"USD"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExchangeError, Result};

macro_rules! currencies {
    ($($code:ident => $name:literal),+ $(,)?) => {
        /// ISO 4217 currency supported by the service.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Currency {
            $(
                #[doc = $name]
                $code,
            )+
        }

        impl Currency {
            /// Every supported currency, in declaration order.
            pub const SUPPORTED: &'static [Currency] = &[$(Currency::$code),+];

            /// Get the three-letter code.
            pub fn code(&self) -> &'static str {
                match self {
                    $(Currency::$code => stringify!($code),)+
                }
            }

            /// Get the human-readable name.
            pub fn display_name(&self) -> &'static str {
                match self {
                    $(Currency::$code => $name,)+
                }
            }
        }

        impl FromStr for Currency {
            type Err = ExchangeError;

            fn from_str(code: &str) -> Result<Self> {
                match code {
                    $(stringify!($code) => Ok(Currency::$code),)+
                    other => Err(ExchangeError::UnknownCurrency(other.to_string())),
                }
            }
        }
    };
}

// Keep alphabetical: `Ord` follows declaration order and callers rely on it
// matching code order.
currencies! {
    AED => "United Arab Emirates Dirham",
    AFN => "Afghan Afghani",
    ALL => "Albanian Lek",
    AMD => "Armenian Dram",
    ANG => "Netherlands Antillean Guilder",
    AOA => "Angolan Kwanza",
    ARS => "Argentine Peso",
    AUD => "Australian Dollar",
    AWG => "Aruban Florin",
    AZN => "Azerbaijani Manat",
    BAM => "Bosnia-Herzegovina Convertible Mark",
    BBD => "Barbadian Dollar",
    BDT => "Bangladeshi Taka",
    BGN => "Bulgarian Lev",
    BHD => "Bahraini Dinar",
    BIF => "Burundian Franc",
    BMD => "Bermudan Dollar",
    BND => "Brunei Dollar",
    BOB => "Bolivian Boliviano",
    BRL => "Brazilian Real",
    CAD => "Canadian Dollar",
    CHF => "Swiss Franc",
    CNY => "Chinese Yuan",
    EUR => "Euro",
    GBP => "British Pound Sterling",
    HKD => "Hong Kong Dollar",
    INR => "Indian Rupee",
    JPY => "Japanese Yen",
    KWD => "Kuwaiti Dinar",
    MXN => "Mexican Peso",
    NZD => "New Zealand Dollar",
    SGD => "Singapore Dollar",
    USD => "United States Dollar",
    ZAR => "South African Rand",
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Registry entry exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    /// Three-letter code.
    pub code: Currency,
    /// Human-readable name.
    pub display_name: &'static str,
}

impl From<Currency> for CurrencyInfo {
    fn from(currency: Currency) -> Self {
        Self {
            code: currency,
            display_name: currency.display_name(),
        }
    }
}

/// Check whether a code is in the registry.
pub fn is_supported(code: &str) -> bool {
    code.parse::<Currency>().is_ok()
}

/// Look up the display name for a code.
pub fn display_name(code: &str) -> Result<&'static str> {
    code.parse::<Currency>().map(|c| c.display_name())
}

/// List every supported currency in a stable order.
pub fn list_all() -> Vec<CurrencyInfo> {
    Currency::SUPPORTED.iter().copied().map(CurrencyInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_supported_code() {
        assert!(is_supported("USD"));
        assert_eq!(display_name("INR").unwrap(), "Indian Rupee");
        assert_eq!("AUD".parse::<Currency>().unwrap(), Currency::AUD);
        assert_eq!(display_name("BIF").unwrap(), "Burundian Franc");
        assert_eq!(display_name("BND").unwrap(), "Brunei Dollar");
        assert_eq!(display_name("BOB").unwrap(), "Bolivian Boliviano");
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert!(!is_supported("usd"));
        assert!(!is_supported("Usd"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_unknown_code_names_the_code() {
        let err = display_name("LKS").unwrap_err();
        assert_eq!(err, ExchangeError::UnknownCurrency("LKS".to_string()));
    }

    #[test]
    fn test_list_all_is_sorted_and_complete() {
        let all = list_all();
        assert_eq!(all.len(), Currency::SUPPORTED.len());

        let codes: Vec<&str> = all.iter().map(|info| info.code.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_ord_matches_code_order() {
        for pair in Currency::SUPPORTED.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].code() < pair[1].code());
        }
    }

    #[test]
    fn test_serializes_as_code() {
        let info = CurrencyInfo::from(Currency::EUR);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["code"], "EUR");
        assert_eq!(json["displayName"], "Euro");
    }
}
