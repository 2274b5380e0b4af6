//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants. Check digits are computed here
//! independently of the validators under test.

use proptest::prelude::*;
use rust_decimal::Decimal;

fn digits_to_string(digits: &[u32]) -> String {
    digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect()
}

/// CPF check digit over `digits`, weights from `len + 1` down to 2
pub fn cpf_check_digit(digits: &[u32]) -> u32 {
    let len = digits.len() as u32;
    let sum: u32 = digits.iter().zip((2..=len + 1).rev()).map(|(d, w)| d * w).sum();
    let remainder = (sum * 10) % 11;
    if remainder >= 10 { 0 } else { remainder }
}

/// CNPJ check digit over `digits`, weights 2..=9 repeating from the right
pub fn cnpj_check_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip([2, 3, 4, 5, 6, 7, 8, 9].iter().cycle())
        .map(|(d, w)| d * w)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

fn not_repeated(digits: &Vec<u32>) -> bool {
    digits.iter().any(|d| *d != digits[0])
}

/// Strategy for generating valid CPF numbers (digits only)
pub fn valid_cpf_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..10, 9)
        .prop_filter("repeated digits", not_repeated)
        .prop_map(|mut digits| {
            let first = cpf_check_digit(&digits);
            digits.push(first);
            let second = cpf_check_digit(&digits);
            digits.push(second);
            digits_to_string(&digits)
        })
}

/// Strategy for generating valid CNPJ numbers (digits only)
pub fn valid_cnpj_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..10, 12)
        .prop_filter("repeated digits", not_repeated)
        .prop_map(|mut digits| {
            let first = cnpj_check_digit(&digits);
            digits.push(first);
            let second = cnpj_check_digit(&digits);
            digits.push(second);
            digits_to_string(&digits)
        })
}

/// Strategy for a valid CPF with its final digit replaced by a wrong one
pub fn corrupted_cpf_strategy() -> impl Strategy<Value = String> {
    (valid_cpf_strategy(), 1u32..10).prop_map(|(cpf, offset)| corrupt_last_digit(&cpf, offset))
}

/// Strategy for a valid CNPJ with its final digit replaced by a wrong one
pub fn corrupted_cnpj_strategy() -> impl Strategy<Value = String> {
    (valid_cnpj_strategy(), 1u32..10).prop_map(|(cnpj, offset)| corrupt_last_digit(&cnpj, offset))
}

fn corrupt_last_digit(document: &str, offset: u32) -> String {
    let mut digits: Vec<u32> = document.chars().filter_map(|c| c.to_digit(10)).collect();
    if let Some(last) = digits.last_mut() {
        *last = (*last + offset) % 10;
    }
    digits_to_string(&digits)
}

/// Strategy for arbitrary text mixing digits and punctuation
pub fn noisy_digits_strategy() -> impl Strategy<Value = String> {
    "[0-9 .\\-/()a-z]{0,24}"
}

/// Strategy for amounts in cents, positive or negative
pub fn cents_strategy() -> impl Strategy<Value = i64> {
    -100_000_000_000i64..100_000_000_000i64
}

/// Strategy for decimal amounts with two places
pub fn brl_amount_strategy() -> impl Strategy<Value = Decimal> {
    cents_strategy().prop_map(|cents| Decimal::new(cents, 2))
}
