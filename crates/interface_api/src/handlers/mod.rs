//! Request handlers

pub mod health;
pub mod documents;
pub mod wizard;
