//! Startup error tests

use std::error::Error as _;

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::ports::PortError;
use core_kernel::temporal::TemporalError;

#[test]
fn test_missing_setting_names_key() {
    let error = CoreError::missing_setting("API_REMOTE_BASE_URL");

    assert_eq!(error.setting_key(), Some("API_REMOTE_BASE_URL"));
    assert_eq!(error.to_string(), "Missing setting API_REMOTE_BASE_URL");
}

#[test]
fn test_invalid_setting_carries_reason() {
    let error = CoreError::invalid_setting("API_PORT", "not a number");

    assert_eq!(error.setting_key(), Some("API_PORT"));
    assert!(error.to_string().ends_with("not a number"));
}

#[test]
fn test_adapter_error_keeps_source() {
    let error = CoreError::adapter("remote-client-api", PortError::unreachable("TLS backend unavailable"));

    assert!(error.setting_key().is_none());
    assert!(error.to_string().contains("remote-client-api"));
    let source = error.source().expect("port error as source");
    assert!(source.to_string().contains("TLS backend unavailable"));
}

#[test]
fn test_money_error_is_transparent() {
    let core_error: CoreError = MoneyError::InvalidAmount("abc".to_string()).into();

    assert!(matches!(core_error, CoreError::Money(_)));
    assert_eq!(core_error.to_string(), "Invalid amount: abc");
}

#[test]
fn test_temporal_error_is_transparent() {
    let core_error: CoreError = TemporalError::OutOfRange.into();

    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert_eq!(core_error.to_string(), "Date out of supported range");
}
