//! Request and response bodies

pub mod documents;
pub mod wizard;
