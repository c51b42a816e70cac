//! Secure memory handling with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw consumer secret - automatically zeroed when dropped
///
/// Minted only by the issuer at creation time; the store only ever sees
/// the Argon2id hash of this value. There is no owned accessor, so the
/// issuance response is the single place the plaintext can be read.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawSecret {
    value: String,
}

impl RawSecret {
    /// Wrap freshly generated secret material
    pub(crate) fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSecret")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
