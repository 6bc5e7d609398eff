//! Converts a password and server-issued salt into the login authenticator.
//!
//! The password is stretched with scrypt, a 32-byte authenticator is sliced
//! out of the stretched output, and the value actually transmitted to the
//! service is `HMAC-SHA-512(key = authenticator, message = login session
//! nonce)`. Neither the password nor the raw authenticator ever goes on the
//! wire. All intermediate key material lives in [`Zeroizing`] buffers so it
//! is scrubbed on every exit path.

use hmac::{Hmac, Mac};
use scrypt::Params;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::ProofKitError;

// Cost parameters are a wire-adjacent contract: the server stores a hash of
// the value derived with exactly these settings.
const SCRYPT_LOG_N: u8 = 15; // N = 32768
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;
const STRETCH_LEN: usize = 224;
const AUTHENTICATOR_OFFSET: usize = 192;

/// Length of the authenticator sliced from the stretched output.
pub const AUTHENTICATOR_LEN: usize = 32;

type HmacSha512 = Hmac<Sha512>;

/// Stretches `password` with scrypt and slices out the 32-byte login
/// authenticator. Deterministic: identical inputs yield identical output.
///
/// The caller owns the password buffer and must scrub it after use; this
/// function keeps no copy.
///
/// # Errors
/// Returns [`ProofKitError::KeyDerivation`] if the stretching primitive
/// rejects its parameters.
pub fn derive_authenticator(
    password: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<[u8; AUTHENTICATOR_LEN]>, ProofKitError> {
    // `Params::new`'s `len` argument is unused by `scrypt::scrypt` (the actual
    // output length comes from the buffer passed in below); it only feeds the
    // unused `PasswordHasher` impl, but the constructor still validates it
    // against its own `10..=64` range, so we pass a dummy in-range value
    // rather than `STRETCH_LEN`.
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 64)
        .map_err(|err| ProofKitError::KeyDerivation(err.to_string()))?;

    let mut stretched = Zeroizing::new([0u8; STRETCH_LEN]);
    scrypt::scrypt(password, salt, &params, &mut *stretched)
        .map_err(|err| ProofKitError::KeyDerivation(err.to_string()))?;

    let mut authenticator = Zeroizing::new([0u8; AUTHENTICATOR_LEN]);
    authenticator.copy_from_slice(&stretched[AUTHENTICATOR_OFFSET..]);
    Ok(authenticator)
}

/// Computes the HMAC the login endpoint expects: the authenticator derived
/// from `password` and `salt`, keyed over the login session nonce.
///
/// # Errors
/// Propagates [`derive_authenticator`] failures.
pub fn login_hmac(
    password: &[u8],
    salt: &[u8],
    login_session: &[u8],
) -> Result<Zeroizing<Vec<u8>>, ProofKitError> {
    let authenticator = derive_authenticator(password, salt)?;
    let mut mac = HmacSha512::new_from_slice(&*authenticator)
        .map_err(|err| ProofKitError::KeyDerivation(err.to_string()))?;
    mac.update(login_session);
    Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
}
