//! Random secret sources.

use crate::error::{Result, TokenError};
use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes in a token secret.
pub const SECRET_LENGTH: usize = 64;

/// Provider of secret bytes for new tokens.
pub trait SecretSource: Send + Sync {
    /// Fill `buf` completely or fail.
    fn fill_secret(&self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSecretSource;

impl SecretSource for OsSecretSource {
    fn fill_secret(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| TokenError::SecretSource(e.to_string()))
    }
}

/// Deterministic source that repeats a fixed byte pattern.
///
/// Two tokens from the same source share a secret, so this is only compiled
/// for tests or with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct FixedSecretSource {
    pattern: Vec<u8>,
}

#[cfg(any(test, feature = "test-util"))]
impl FixedSecretSource {
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl SecretSource for FixedSecretSource {
    fn fill_secret(&self, buf: &mut [u8]) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(TokenError::SecretSource("empty secret pattern".to_string()));
        }
        for (byte, value) in buf.iter_mut().zip(self.pattern.iter().cycle()) {
            *byte = *value;
        }
        Ok(())
    }
}
