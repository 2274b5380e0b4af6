//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the client console. Document numbers
//! are real-format CPF/CNPJ values with correct check digits that are
//! commonly used as test vectors.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_client::{Address, AddressDraft, BasicData, Contact, ContactKind};
use rust_decimal_macros::dec;

/// Fixture for tax document test data
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// A valid CPF, digits only
    pub fn valid_cpf() -> &'static str {
        "11144477735"
    }

    /// The same CPF in display form
    pub fn formatted_cpf() -> &'static str {
        "111.444.777-35"
    }

    /// A second valid CPF
    pub fn other_valid_cpf() -> &'static str {
        "52998224725"
    }

    /// A CPF with a wrong last check digit
    pub fn invalid_cpf() -> &'static str {
        "11144477736"
    }

    /// A valid CNPJ, digits only
    pub fn valid_cnpj() -> &'static str {
        "11222333000181"
    }

    /// The same CNPJ in display form
    pub fn formatted_cnpj() -> &'static str {
        "11.222.333/0001-81"
    }

    /// A second valid CNPJ
    pub fn other_valid_cnpj() -> &'static str {
        "11444777000161"
    }

    /// A CNPJ with a wrong last check digit
    pub fn invalid_cnpj() -> &'static str {
        "11222333000182"
    }
}

/// Fixture for basic client data
pub struct ClientFixtures;

impl ClientFixtures {
    /// Reference "today" for date-sensitive validation
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Step 1 data for an individual
    pub fn individual() -> BasicData {
        BasicData {
            full_name: "Maria da Silva".to_string(),
            tax_document: DocumentFixtures::formatted_cpf().to_string(),
            registry_id: "12.345.678-9".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12),
            fantasy_name: None,
        }
    }

    /// Step 1 data for a company
    pub fn company() -> BasicData {
        BasicData {
            full_name: "Padaria Pão Quente Ltda".to_string(),
            tax_document: DocumentFixtures::formatted_cnpj().to_string(),
            registry_id: "110.042.490.114".to_string(),
            birthdate: None,
            fantasy_name: Some("Pão Quente".to_string()),
        }
    }

    /// A complete address
    pub fn address() -> Address {
        Address {
            street: "Avenida Paulista".to_string(),
            number: "1578".to_string(),
            neighborhood: "Bela Vista".to_string(),
            zip_code: "01310200".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            country: "Brasil".to_string(),
        }
    }

    /// The complete address as form input
    pub fn address_draft() -> AddressDraft {
        AddressDraft::from(&Self::address())
    }

    pub fn email() -> Contact {
        Contact {
            kind: ContactKind::Email,
            value: "maria@example.com".to_string(),
        }
    }

    pub fn phone() -> Contact {
        Contact {
            kind: ContactKind::Phone,
            value: "(11) 98765-4321".to_string(),
        }
    }
}

/// Fixture for money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// R$ 1.234,56
    pub fn brl_1234_56() -> Money {
        Money::new(dec!(1234.56), Currency::BRL)
    }

    pub fn brl_zero() -> Money {
        Money::zero(Currency::BRL)
    }
}
