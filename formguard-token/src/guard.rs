//! Submission guard.
//!
//! A [`TokenGuard`] holds the token embedded in the most recent form
//! rendering and checks tokens that come back with a submission.
//!
//! ```rust
//! use formguard_token::{TokenConfig, TokenGuard};
//!
//! let mut guard = TokenGuard::from_config(&TokenConfig::default()).unwrap();
//!
//! let rendered = guard.token().to_string();
//! assert!(guard.check_encoded(&rendered).is_ok());
//!
//! // After a successful submission the form gets a fresh token
//! guard.renew().unwrap();
//! assert!(guard.check_encoded(&rendered).is_err());
//! ```

use crate::config::TokenConfig;
use crate::error::{Result, TokenError};
use crate::issuer::TokenIssuer;
use crate::token::FormToken;
use std::collections::HashMap;
use tracing::debug;

pub struct TokenGuard {
    issuer: TokenIssuer,
    current: Box<dyn FormToken>,
    field_name: String,
}

impl TokenGuard {
    pub const DEFAULT_FIELD_NAME: &'static str = "form_token";

    /// Create a guard holding a freshly issued token.
    pub fn new(issuer: TokenIssuer) -> Result<Self> {
        let current = Box::new(issuer.issue()?);
        Ok(Self {
            issuer,
            current,
            field_name: Self::DEFAULT_FIELD_NAME.to_string(),
        })
    }

    /// Create a guard with TTL and field name taken from `config`.
    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        let issuer = TokenIssuer::from_config(config)?;
        Ok(Self::new(issuer)?.with_field_name(config.field_name.clone()))
    }

    /// Set the form field the token travels in.
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Token expected from the next submission.
    pub fn token(&self) -> &dyn FormToken {
        self.current.as_ref()
    }

    /// Replace the expected token with a freshly issued one.
    pub fn renew(&mut self) -> Result<&dyn FormToken> {
        self.current = Box::new(self.issuer.issue()?);
        Ok(self.token())
    }

    /// Install a caller-supplied token.
    pub fn replace(&mut self, token: impl FormToken + 'static) {
        self.current = Box::new(token);
    }

    pub fn is_valid(&self, submitted: &dyn FormToken) -> bool {
        self.current.equals(submitted)
    }

    pub fn has_expired(&self) -> bool {
        self.current.is_expired()
    }

    /// Accept `submitted` only if it matches and has not expired.
    pub fn check(&self, submitted: &dyn FormToken) -> Result<()> {
        if !self.is_valid(submitted) {
            debug!(field = %self.field_name, "rejecting submission: token mismatch");
            return Err(TokenError::TokenMismatch {
                expected: self.current.to_string(),
                actual: submitted.to_string(),
            });
        }

        if self.has_expired() {
            debug!(field = %self.field_name, "rejecting submission: token expired");
            return Err(TokenError::TokenExpired);
        }

        Ok(())
    }

    /// Decode and check a token string echoed back by the client.
    pub fn check_encoded(&self, encoded: &str) -> Result<()> {
        let submitted = self.issuer.parse(encoded).inspect_err(|_| {
            debug!(field = %self.field_name, "rejecting submission: malformed token");
        })?;
        self.check(&submitted)
    }

    /// Check the token carried in decoded form fields.
    pub fn check_form(&self, fields: &HashMap<String, String>) -> Result<()> {
        let encoded = fields
            .get(&self.field_name)
            .ok_or_else(|| self.missing())?;
        self.check_encoded(encoded)
    }

    /// Check the token carried in an `application/x-www-form-urlencoded` body.
    ///
    /// A body that is not UTF-8, or that repeats the token field, is malformed.
    pub fn check_form_body(&self, body: &[u8]) -> Result<()> {
        let body = std::str::from_utf8(body).map_err(|e| self.malformed(e))?;
        let fields = serde_urlencoded::from_str::<Vec<(String, String)>>(body)
            .map_err(|e| self.malformed(e))?;

        let mut values = fields
            .into_iter()
            .filter(|(key, _)| *key == self.field_name)
            .map(|(_, value)| value);

        let encoded = values.next().ok_or_else(|| self.missing())?;
        if values.next().is_some() {
            return Err(self.malformed(format!("repeated field '{}'", self.field_name)));
        }

        self.check_encoded(&encoded)
    }

    /// Hidden input element carrying the current token.
    pub fn hidden_input(&self) -> String {
        // Base64 output needs no HTML escaping; the field name might.
        format!(
            r#"<input type="hidden" name="{}" value="{}" />"#,
            escape_attribute(&self.field_name),
            self.current
        )
    }

    fn malformed(&self, reason: impl std::fmt::Display) -> TokenError {
        debug!(field = %self.field_name, %reason, "rejecting submission: malformed body");
        TokenError::MalformedForm(reason.to_string())
    }

    fn missing(&self) -> TokenError {
        debug!(field = %self.field_name, "rejecting submission: token missing");
        TokenError::MissingToken(self.field_name.clone())
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
