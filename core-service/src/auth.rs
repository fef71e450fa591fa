//! Admin authentication collaborator
//!
//! The core never embeds credentials: verifying an admin passphrase is
//! delegated to whatever credential backend the host wires in (a config
//! file hash, an identity provider, an OS keyring). Without an injected
//! verifier the service denies admin access.

use async_trait::async_trait;

use crate::error::Result;

/// Credential verification seam for the admin surface.
///
/// # Example
///
/// ```ignore
/// use core_service::auth::AdminAuthenticator;
///
/// async fn gate(auth: &dyn AdminAuthenticator, passphrase: &str) -> core_service::Result<bool> {
///     auth.verify(passphrase).await
/// }
/// ```
#[async_trait]
pub trait AdminAuthenticator: Send + Sync {
    /// Check a passphrase against the host's credential backend.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend itself fails; a wrong
    /// passphrase is `Ok(false)`.
    async fn verify(&self, passphrase: &str) -> Result<bool>;
}
