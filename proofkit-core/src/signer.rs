use crate::error::ProofKitError;

/// Detached-signature oracle injected into the sign-then-post flows.
///
/// The chain logic never touches private key material; it hands the frozen
/// statement bytes to this trait and posts whatever comes back. Backed in
/// practice by a keyring, an HSM or an interactive passphrase prompt, so an
/// implementation may block for a long time. Nothing else in the workflow
/// holds shared state while it runs.
pub trait Signer: Send + Sync {
    /// Produces a detached signature over `payload` with the private key
    /// identified by `fingerprint`.
    ///
    /// # Errors
    /// Implementations should report failures as
    /// [`ProofKitError::Signing`].
    fn sign(&self, payload: &[u8], fingerprint: &str) -> Result<Vec<u8>, ProofKitError>;
}
