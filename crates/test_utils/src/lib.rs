//! Shared test support for the client console crates
//!
//! `fixtures` holds known CPF/CNPJ vectors and sample clients, `builders`
//! assembles wizard data and sessions at any step, and `generators` has the
//! proptest strategies for documents and amounts. `ports` has client ports
//! that misbehave in ways the in-memory store cannot.

pub mod builders;
pub mod fixtures;
pub mod generators;
pub mod ports;

pub use builders::*;
pub use fixtures::*;
pub use generators::*;
pub use ports::*;
