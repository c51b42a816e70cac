//! Credential model and issuance

mod issuer;
mod types;

pub use issuer::{truncate_key, Issuer, IssuerConfig};
pub use types::*;
