//! # credential-core
//!
//! Credential management core including:
//! - Consumer key/secret issuance with Argon2id secret hashing
//! - Pluggable persistence with a consumer-key uniqueness guarantee
//! - Hydration-on-demand credential handles
//! - Operator views that never re-expose secret material

pub mod credential;
pub mod crypto;
pub mod error;
pub mod presenter;
pub mod store;

pub use credential::{
    truncate_key, Credential, CredentialHandle, CredentialUpdate, IssuedCredential, Issuer,
    IssuerConfig, Permissions,
};
pub use crypto::RawSecret;
pub use error::{CredentialError, Result};
pub use presenter::{
    ActionTokenProvider, CredentialRow, Localizer, OwnerDirectory, Presenter,
};
pub use store::{CredentialStore, FileStore, ListFilter, MemoryStore};
