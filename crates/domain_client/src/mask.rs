//! Progressive input masks
//!
//! A mask is a pattern where `#` is a digit slot and every other character is
//! a literal. Literals are emitted only when at least one more digit follows,
//! so partially typed input gets exactly the separators whose preceding group
//! is complete. Digits beyond the last slot are dropped.

use crate::document::normalize_digits;

const LANDLINE_MASK: &str = "(##) ####-####";
const MOBILE_MASK: &str = "(##) #####-####";
const ZIP_CODE_MASK: &str = "#####-###";

/// Applies `pattern` to the digits of `input`
pub fn apply_mask(input: &str, pattern: &str) -> String {
    let digits = normalize_digits(input);
    let mut remaining = digits.chars().peekable();
    let mut masked = String::with_capacity(pattern.len());

    for slot in pattern.chars() {
        if remaining.peek().is_none() {
            break;
        }
        if slot == '#' {
            if let Some(digit) = remaining.next() {
                masked.push(digit);
            }
        } else {
            masked.push(slot);
        }
    }

    masked
}

/// Formats a phone number with area code
///
/// Up to ten digits use the landline layout `(XX) XXXX-XXXX`; eleven digits
/// use the mobile layout `(XX) XXXXX-XXXX`.
pub fn format_phone(input: &str) -> String {
    if normalize_digits(input).len() <= 10 {
        apply_mask(input, LANDLINE_MASK)
    } else {
        apply_mask(input, MOBILE_MASK)
    }
}

/// Formats a postal code (CEP) as `XXXXX-XXX`
pub fn format_zip_code(input: &str) -> String {
    apply_mask(input, ZIP_CODE_MASK)
}
