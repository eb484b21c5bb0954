//! Opaque session tokens of the form `sleepos_<lookup>_<secret>`.
//!
//! The lookup part indexes the `sessions` table; the whole token is only
//! kept as an Argon2id hash.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};

const PREFIX: &str = "sleepos_";
const LOOKUP_LEN: usize = 8;
const SECRET_BYTES: usize = 16;

const HASH_MEMORY_KIB: u32 = 64 * 1024;
const HASH_PASSES: u32 = 1;
const HASH_LANES: u32 = 4;

/// A newly minted token. `raw` goes to the client and is not kept.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub raw: String,
    pub lookup: String,
    pub hash: String,
}

pub struct SessionTokens {
    argon2: Argon2<'static>,
}

impl Default for SessionTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTokens {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(HASH_MEMORY_KIB, HASH_PASSES, HASH_LANES, None)
            .expect("invalid argon2 params");
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn issue(&self) -> Result<IssuedToken> {
        let mut secret = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut secret);
        let lookup = uuid::Uuid::new_v4().simple().to_string()[..LOOKUP_LEN].to_string();
        let raw = format!("{PREFIX}{lookup}_{}", hex::encode(secret));

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("failed to hash session token: {e}")))?
            .to_string();

        Ok(IssuedToken { raw, lookup, hash })
    }

    /// Checks `raw` against a stored hash. A mismatch is `Ok(false)`; an
    /// unreadable hash is an error.
    pub fn verify(&self, raw: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| Error::Config(format!("stored session hash is invalid: {e}")))?;
        match self.argon2.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Config(format!("failed to verify session token: {e}"))),
        }
    }
}

/// Returns the lookup part of a well-formed token.
pub fn token_lookup(raw: &str) -> Result<&str> {
    let (lookup, secret) = raw
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.split_once('_'))
        .ok_or(Error::InvalidTokenFormat)?;

    let secret_ok =
        secret.len() == SECRET_BYTES * 2 && secret.bytes().all(|b| b.is_ascii_hexdigit());
    if lookup.len() != LOOKUP_LEN || !secret_ok {
        return Err(Error::InvalidTokenFormat);
    }
    Ok(lookup)
}
