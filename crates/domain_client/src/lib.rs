//! Client Registry Domain
//!
//! This crate holds the client side of the console: Brazilian tax document
//! checks, the client record, and the four-step registration wizard that
//! collects a client and sends it to the system of record.
//!
//! # Tax Documents
//!
//! Individuals are registered with a CPF and companies with a CNPJ. Both are
//! validated with their modulo-11 check digits and formatted progressively
//! while typed:
//!
//! ```rust
//! use domain_client::document::{format_cpf, is_valid_cpf, is_valid_cnpj};
//!
//! assert!(is_valid_cpf("111.444.777-35"));
//! assert!(!is_valid_cpf("111.444.777-36"));
//! assert!(is_valid_cnpj("11222333000181"));
//! assert_eq!(format_cpf("1114447"), "111.444.7");
//! ```
//!
//! # Registration Wizard
//!
//! ```rust
//! use domain_client::{ClientRegistrationSession, BasicData, WizardStep};
//!
//! let mut session = ClientRegistrationSession::new();
//! session.set_basic_data(BasicData {
//!     full_name: "Maria da Silva".to_string(),
//!     tax_document: "111.444.777-35".to_string(),
//!     registry_id: "12.345.678-9".to_string(),
//!     ..Default::default()
//! }).unwrap();
//!
//! assert_eq!(session.advance().unwrap(), WizardStep::Address);
//! ```

pub mod document;
pub mod mask;
pub mod client;
pub mod address;
pub mod contact;
pub mod validation;
pub mod wizard;
pub mod error;
pub mod ports;
pub mod adapters;

pub use document::{
    DocumentKind, TaxDocument, normalize_digits,
    is_valid_cpf, is_valid_cnpj, format_cpf, format_cnpj,
};
pub use mask::{apply_mask, format_phone, format_zip_code};
pub use client::{PersonType, BasicData, ClientPayload, ClientRecord};
pub use address::{Address, AddressDraft};
pub use contact::{Contact, ContactKind};
pub use validation::{ClientValidator, FieldError, ValidationResult};
pub use wizard::{
    ClientRegistrationSession, WizardStep, WizardMode, WizardEvent,
    SubmissionReceipt, send_payload, CLIENT_LIST_LOCATION,
};
pub use error::{ClientError, SubmissionError};
pub use ports::{ClientPort, InMemoryClientPort};
pub use adapters::{RemoteClientApi, RemoteApiConfig};
