use crate::clock::{Clock, SystemClock};
use crate::config::TokenConfig;
use crate::error::{ConfigError, Result};
use crate::secret::{OsSecretSource, SecretSource};
use crate::token::Token;
use std::sync::Arc;
use tracing::trace;

/// Mints and decodes tokens with a shared secret source, clock and TTL.
#[derive(Clone)]
pub struct TokenIssuer {
    source: Arc<dyn SecretSource>,
    clock: Arc<dyn Clock>,
    ttl_seconds: Option<i64>,
}

impl TokenIssuer {
    /// OS randomness, wall clock, no expiry.
    pub fn new() -> Self {
        Self {
            source: Arc::new(OsSecretSource),
            clock: Arc::new(SystemClock),
            ttl_seconds: None,
        }
    }

    /// Create an issuer whose TTL comes from a validated config.
    pub fn from_config(config: &TokenConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ttl_seconds: config.ttl_seconds,
            ..Self::new()
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn SecretSource>) -> Self {
        self.source = source;
        self
    }

    /// Set the default TTL. Checked when a token is issued.
    pub fn with_ttl(mut self, ttl_seconds: Option<i64>) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn ttl_seconds(&self) -> Option<i64> {
        self.ttl_seconds
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Issue a token using the default TTL.
    pub fn issue(&self) -> Result<Token> {
        match self.ttl_seconds {
            Some(seconds) => self.issue_with_expiry(seconds),
            None => self.issue_without_expiry(),
        }
    }

    pub fn issue_without_expiry(&self) -> Result<Token> {
        trace!("issuing form token without expiry");
        Token::generate(self.source.as_ref(), self.clock())
    }

    pub fn issue_with_expiry(&self, seconds: i64) -> Result<Token> {
        trace!(ttl_seconds = seconds, "issuing form token");
        Token::generate_with_expiry(seconds, self.source.as_ref(), self.clock())
    }

    /// Decode a submitted token, bound to this issuer's clock.
    pub fn parse(&self, encoded: &str) -> Result<Token> {
        Token::parse_with_clock(encoded, self.clock())
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}
