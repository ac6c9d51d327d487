//! Type-safe price representation using decimal arithmetic.
//!
//! Storefronts sell in the store's own currency. Formatting follows the
//! conventions merchants expect for each currency (symbol placement and the
//! number of minor units), and conversion rounds to the target currency's
//! minor units with banker's rounding.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an integer number of minor units (e.g., cents).
    ///
    /// For zero-decimal currencies the minor unit is the standard unit.
    #[must_use]
    pub fn from_minor_units(units: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(units, currency_code.minor_units()),
            currency_code,
        }
    }

    /// The amount rounded to the currency's minor units.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp_with_strategy(
            self.currency_code.minor_units(),
            RoundingStrategy::MidpointNearestEven,
        )
    }

    /// Format for display, e.g. `$19.99`, `€19.99`, `5000 FCFA`.
    #[must_use]
    pub fn format(&self) -> String {
        let amount = self.rounded();
        let digits = self.currency_code.minor_units() as usize;
        let number = format!("{:.digits$}", amount.abs());
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };

        match self.currency_code.symbol() {
            Symbol::Prefix(symbol) => format!("{sign}{symbol}{number}"),
            Symbol::Suffix(symbol) => format!("{sign}{number} {symbol}"),
        }
    }

    /// Convert into another currency using `rate` (units of `target` per
    /// unit of this price's currency).
    ///
    /// Returns `None` if the converted amount does not fit in a `Decimal`.
    #[must_use]
    pub fn convert(&self, rate: Decimal, target: CurrencyCode) -> Option<Self> {
        let amount = self.amount.checked_mul(rate)?;
        Some(Self {
            amount: amount
                .round_dp_with_strategy(target.minor_units(), RoundingStrategy::MidpointNearestEven),
            currency_code: target,
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Where a currency's symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Prefix(&'static str),
    Suffix(&'static str),
}

/// ISO 4217 currency codes supported by storefronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    /// Nigerian naira.
    NGN,
    /// Ghanaian cedi.
    GHS,
    /// West African CFA franc.
    XOF,
    /// Central African CFA franc.
    XAF,
}

impl CurrencyCode {
    /// Number of decimal places in the currency's minor unit.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::XOF | Self::XAF => 0,
            _ => 2,
        }
    }

    /// Display symbol and its placement.
    #[must_use]
    pub const fn symbol(self) -> Symbol {
        match self {
            Self::USD => Symbol::Prefix("$"),
            Self::CAD => Symbol::Prefix("CA$"),
            Self::EUR => Symbol::Prefix("€"),
            Self::GBP => Symbol::Prefix("£"),
            Self::NGN => Symbol::Prefix("₦"),
            Self::GHS => Symbol::Prefix("GH₵"),
            Self::XOF | Self::XAF => Symbol::Suffix("FCFA"),
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::NGN => "NGN",
            Self::GHS => "GHS",
            Self::XOF => "XOF",
            Self::XAF => "XAF",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned for an unsupported or malformed currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyParseError(pub String);

impl FromStr for CurrencyCode {
    type Err = CurrencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "NGN" => Ok(Self::NGN),
            "GHS" => Ok(Self::GHS),
            "XOF" => Ok(Self::XOF),
            "XAF" => Ok(Self::XAF),
            _ => Err(CurrencyParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_prefix_symbols() {
        assert_eq!(Price::new(dec("19.99"), CurrencyCode::USD).format(), "$19.99");
        assert_eq!(Price::new(dec("5"), CurrencyCode::EUR).format(), "€5.00");
        assert_eq!(Price::new(dec("1250.5"), CurrencyCode::NGN).format(), "₦1250.50");
        assert_eq!(Price::new(dec("24.5"), CurrencyCode::CAD).format(), "CA$24.50");
    }

    #[test]
    fn test_format_zero_decimal_suffix_currency() {
        assert_eq!(Price::new(dec("5000"), CurrencyCode::XOF).format(), "5000 FCFA");
        assert_eq!(Price::new(dec("4999.5"), CurrencyCode::XAF).format(), "5000 FCFA");
    }

    #[test]
    fn test_format_negative_amount() {
        assert_eq!(Price::new(dec("-3.10"), CurrencyCode::GBP).format(), "-£3.10");
    }

    #[test]
    fn test_from_minor_units() {
        assert_eq!(
            Price::from_minor_units(1999, CurrencyCode::USD).amount,
            dec("19.99")
        );
        assert_eq!(
            Price::from_minor_units(1999, CurrencyCode::XOF).amount,
            dec("1999")
        );
    }

    #[test]
    fn test_convert_rounds_to_target_minor_units() {
        let price = Price::new(dec("10.00"), CurrencyCode::EUR);
        let converted = price.convert(dec("655.957"), CurrencyCode::XOF).unwrap();
        assert_eq!(converted.amount, dec("6560"));
        assert_eq!(converted.currency_code, CurrencyCode::XOF);

        let back = converted.convert(dec("0.0015244"), CurrencyCode::EUR).unwrap();
        assert_eq!(back.amount, dec("10.00"));
    }

    #[test]
    fn test_convert_overflow_is_none() {
        let price = Price::new(Decimal::MAX, CurrencyCode::XOF);
        assert_eq!(price.convert(dec("700"), CurrencyCode::EUR), None);
        assert!(price.convert(Decimal::ONE, CurrencyCode::XAF).is_some());
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("xof".parse::<CurrencyCode>().unwrap(), CurrencyCode::XOF);
        assert_eq!(" usd ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("BTC".parse::<CurrencyCode>().is_err());
    }
}
