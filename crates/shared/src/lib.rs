//! Post data model, form constraints and wire error types shared by the client crates.

pub mod domain;
pub mod error;
pub mod form;
