//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal, plus the parsing and formatting rules used by the
//! console's price and total fields. Amounts are written the Brazilian way:
//! `.` groups thousands and `,` separates the cents (`R$ 1.234,56`).
//!
//! Parsing and masking never panic. Malformed input yields `None` or a
//! best-effort string so that half-typed form fields stay usable.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Symbol as written by Brazilian users
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "US$",
            Currency::EUR => "€",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Parses a user-typed amount such as `"R$ 1.234,56"`
    pub fn parse(input: &str, currency: Currency) -> Result<Self, MoneyError> {
        parse_brl(input)
            .map(|amount| Self::new(amount, currency))
            .ok_or_else(|| MoneyError::InvalidAmount(input.to_string()))
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Sums amounts, refusing to mix currencies
    ///
    /// An empty input totals to zero in `currency`.
    pub fn total<I>(amounts: I, currency: Currency) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts.into_iter().try_fold(Money::zero(currency), |acc, next| {
            if next.currency != currency {
                return Err(MoneyError::CurrencyMismatch(currency.to_string(), next.currency.to_string()));
            }
            Ok(Money::new(acc.amount + next.amount, currency))
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_with_symbol(self.amount, self.currency.symbol()))
    }
}

/// Parses an amount written in Brazilian notation
///
/// Accepts an optional `R$` prefix, an optional leading `-`, `.` as the
/// thousands separator and a single `,` as the decimal separator. Returns
/// `None` for anything else, including empty input.
pub fn parse_brl(input: &str) -> Option<Decimal> {
    let mut rest = input.trim();
    let mut negative = false;

    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped.trim_start();
    }
    if let Some(stripped) = rest.strip_prefix("R$") {
        rest = stripped.trim_start();
    }
    if let Some(stripped) = rest.strip_prefix('-') {
        if negative {
            return None;
        }
        negative = true;
        rest = stripped.trim_start();
    }

    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let (integer, fraction) = match rest.split_once(',') {
        Some((integer, fraction)) => (integer, fraction),
        None => (rest, ""),
    };
    if fraction.contains(',') || fraction.contains('.') {
        return None;
    }

    let integer: String = integer.chars().filter(|c| *c != '.').collect();
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let integer = if integer.is_empty() { "0".to_string() } else { integer };
    let literal = if fraction.is_empty() {
        integer
    } else {
        format!("{}.{}", integer, fraction)
    };

    let value = Decimal::from_str(&literal).ok()?;
    Some(if negative { -value } else { value })
}

/// Formats an amount as Brazilian reais: `R$ 1.234,56`
pub fn format_brl(amount: Decimal) -> String {
    format_with_symbol(amount, Currency::BRL.symbol())
}

/// Masks a money field while the user types, treating the digits as cents
///
/// `"123456"` becomes `"1.234,56"` and `"5"` becomes `"0,05"`. Non-digit
/// characters are ignored; input without digits yields an empty string.
pub fn mask_money_input(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    let padded = format!("{:0>3}", digits);
    let (integer, cents) = padded.split_at(padded.len() - 2);
    let integer = integer.trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };

    format!("{},{}", group_thousands(integer), cents)
}

fn format_with_symbol(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (integer, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{}{} {},{}",
        if negative { "-" } else { "" },
        symbol,
        group_thousands(integer),
        cents
    )
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn formatted_amounts_parse_back(cents in -1_000_000_000i64..1_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            prop_assert_eq!(parse_brl(&format_brl(amount)), Some(amount));
        }

        #[test]
        fn money_mask_never_panics(input in ".*") {
            let masked = mask_money_input(&input);
            prop_assert!(masked.is_empty() || masked.contains(','));
        }
    }
}
