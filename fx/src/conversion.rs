//! Conversion results and the pure computations that build them.

use exchange_common::{Currency, ExchangeError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quote::QuoteSet;
use crate::rebase::rebase;

/// Display name carried by lines whose target is not usable.
pub const INVALID_CURRENCY: &str = "Invalid Currency";

/// One converted target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionLine {
    /// Target code as supplied.
    pub target_code: String,
    /// Target name, or [`INVALID_CURRENCY`].
    pub target_display_name: &'static str,
    /// Converted amount; absent for invalid targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_amount: Option<Decimal>,
}

impl ConversionLine {
    fn valid(currency: Currency, amount: Decimal) -> Self {
        Self {
            target_code: currency.code().to_string(),
            target_display_name: currency.display_name(),
            converted_amount: Some(amount),
        }
    }

    fn invalid(code: &str) -> Self {
        Self {
            target_code: code.to_string(),
            target_display_name: INVALID_CURRENCY,
            converted_amount: None,
        }
    }

    /// Whether the target could be converted.
    pub fn is_valid(&self) -> bool {
        self.converted_amount.is_some()
    }
}

/// Result of a rate lookup or conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub source_currency: Currency,
    pub source_display_name: &'static str,
    pub amount: Decimal,
    pub lines: Vec<ConversionLine>,
}

impl ConversionResult {
    fn new(source: Currency, amount: Decimal, lines: Vec<ConversionLine>) -> Self {
        Self {
            source_currency: source,
            source_display_name: source.display_name(),
            amount,
            lines,
        }
    }

    /// Find the line for a target code.
    pub fn line(&self, code: &str) -> Option<&ConversionLine> {
        self.lines.iter().find(|line| line.target_code == code)
    }
}

/// Request to convert an amount into several currencies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversionRequest {
    /// Source currency code.
    pub base: String,
    /// Amount in the source currency.
    pub amount: Decimal,
    /// Target codes, in the order results should come back.
    pub targets: Vec<String>,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new<T: Into<String>>(
        base: impl Into<String>,
        amount: Decimal,
        targets: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            base: base.into(),
            amount,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Rates of `target` (or of every other quoted currency) per one unit of `base`.
///
/// Without a target, lines are ordered by code and exclude `base` itself.
pub fn lookup(quotes: &QuoteSet, base: Currency, target: Option<Currency>) -> Result<ConversionResult> {
    let rebased = rebase(quotes, base)?;

    let lines = match target {
        Some(target) => {
            let rate = rebased
                .get(&target)
                .copied()
                .ok_or_else(|| ExchangeError::UnknownCurrency(target.code().to_string()))?;
            vec![ConversionLine::valid(target, rate)]
        }
        // BTreeMap iteration follows `Currency` order, which is code order.
        None => rebased
            .into_iter()
            .filter(|(currency, _)| *currency != base)
            .map(|(currency, rate)| ConversionLine::valid(currency, rate))
            .collect(),
    };

    Ok(ConversionResult::new(base, Decimal::ONE, lines))
}

/// Convert `amount` of `base` into each target, keeping the caller's order.
///
/// Targets that are unsupported or not quoted become [`INVALID_CURRENCY`]
/// lines; the call fails only when no target is usable. Rates are rounded when
/// rebased and the product is left unrounded.
pub fn convert(
    quotes: &QuoteSet,
    base: Currency,
    amount: Decimal,
    targets: &[String],
) -> Result<ConversionResult> {
    let rebased = rebase(quotes, base)?;

    let mut lines = Vec::with_capacity(targets.len());
    for code in targets {
        let rate = code
            .parse::<Currency>()
            .ok()
            .and_then(|currency| rebased.get(&currency).map(|rate| (currency, *rate)));

        let line = match rate {
            Some((currency, rate)) => {
                let converted = rate.checked_mul(amount).ok_or_else(|| {
                    ExchangeError::InvalidAmount(format!(
                        "{amount} {base} overflows when converted to {currency}"
                    ))
                })?;
                ConversionLine::valid(currency, converted)
            }
            None => ConversionLine::invalid(code),
        };
        lines.push(line);
    }

    if !lines.iter().any(ConversionLine::is_valid) {
        return Err(ExchangeError::NoValidTarget(targets.to_vec()));
    }

    Ok(ConversionResult::new(base, amount, lines))
}
