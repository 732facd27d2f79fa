//! Cross-rate rebasing.

use exchange_common::{div_half_down, Currency, ExchangeError, Result, RATE_DECIMAL_PLACES};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::quote::QuoteSet;

/// Re-express every quote in `quotes` against `new_base`.
///
/// Since all raw rates share one base, `rate(c, new_base)` is
/// `rates[c] / rates[new_base]`, rounded half-down to six places. The self
/// entry is kept and is exactly one.
pub fn rebase(quotes: &QuoteSet, new_base: Currency) -> Result<BTreeMap<Currency, Decimal>> {
    let base_rate = quotes
        .rate(new_base)
        .ok_or_else(|| ExchangeError::UnknownCurrency(new_base.code().to_string()))?;

    quotes
        .rates
        .iter()
        .map(|(&currency, &rate)| {
            div_half_down(rate, base_rate, RATE_DECIMAL_PLACES)
                .map(|rebased| (currency, rebased))
                .ok_or_else(|| {
                    ExchangeError::ProviderUnavailable(format!(
                        "rate for {currency} cannot be rebased to {new_base}"
                    ))
                })
        })
        .collect()
}

/// Rebased rate of a single currency.
pub fn cross_rate(quotes: &QuoteSet, base: Currency, target: Currency) -> Result<Decimal> {
    let base_rate = quotes
        .rate(base)
        .ok_or_else(|| ExchangeError::UnknownCurrency(base.code().to_string()))?;
    let target_rate = quotes
        .rate(target)
        .ok_or_else(|| ExchangeError::UnknownCurrency(target.code().to_string()))?;

    div_half_down(target_rate, base_rate, RATE_DECIMAL_PLACES).ok_or_else(|| {
        ExchangeError::ProviderUnavailable(format!(
            "rate for {target} cannot be rebased to {base}"
        ))
    })
}
