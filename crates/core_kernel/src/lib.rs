//! Core Kernel - Foundational types shared by the client console crates
//!
//! This crate provides the building blocks used across the domain and API layers:
//! - Strongly-typed identifiers
//! - Money parsing and formatting in Brazilian notation
//! - Date ranges and bucketing for dashboard filters
//! - Port infrastructure (errors, health checks, operation metadata)

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError, parse_brl, format_brl, mask_money_input};
pub use temporal::{DateRange, DateRangePreset, Granularity, Timezone, TemporalError};
pub use identifiers::{ClientId, IdParseError, SessionId};
pub use error::CoreError;
pub use ports::{
    PortError, ErrorEnvelope, EnvelopeMessage, DomainPort, OperationMetadata,
    HealthCheckable, HealthReport, AdapterHealth, UNREACHABLE_MESSAGE,
};
