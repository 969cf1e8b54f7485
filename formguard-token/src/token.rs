use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TokenError};
use crate::secret::{OsSecretSource, SECRET_LENGTH, SecretSource};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Separator between secret and expiry in the raw payload.
///
/// `[` and `]` are outside the base64 alphabet, so a secret can never contain it.
pub const EXPIRY_DELIMITER: &str = "[expiry]";

/// Wire format of the expiry timestamp (UTC, whole seconds).
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Capabilities a form needs from its token.
///
/// `to_string()` (via `Display`) must produce the canonical encoding, since
/// the default `equals` compares encodings.
pub trait FormToken: fmt::Display + Send + Sync {
    /// Encoded-form comparison.
    fn equals(&self, other: &dyn FormToken) -> bool {
        self.to_string() == other.to_string()
    }

    /// Whether the token's deadline has passed.
    fn is_expired(&self) -> bool;
}

/// Anti-forgery token with an optional expiry
#[derive(Clone)]
pub struct Token {
    /// Base64 of the random secret bytes
    secret: String,

    /// Absolute deadline
    expiry: Option<DateTime<Utc>>,

    clock: Arc<dyn Clock>,
}

impl Token {
    /// Generate a token without expiry from the OS random source.
    pub fn new() -> Result<Self> {
        Self::generate(&OsSecretSource, Arc::new(SystemClock))
    }

    /// Generate a token that expires `seconds` from now.
    ///
    /// ```rust
    /// use formguard_token::{FormToken, Token};
    ///
    /// let token = Token::new_with_expiry(60).unwrap();
    /// assert!(!token.is_expired());
    ///
    /// let err = Token::new_with_expiry(0).unwrap_err();
    /// assert_eq!(err.seconds(), Some(0));
    /// ```
    pub fn new_with_expiry(seconds: i64) -> Result<Self> {
        Self::generate_with_expiry(seconds, &OsSecretSource, Arc::new(SystemClock))
    }

    /// Generate a token without expiry using explicit dependencies.
    pub fn generate(source: &dyn SecretSource, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut bytes = [0u8; SECRET_LENGTH];
        source.fill_secret(&mut bytes)?;

        Ok(Self {
            secret: STANDARD.encode(bytes),
            expiry: None,
            clock,
        })
    }

    /// Generate a token with expiry using explicit dependencies.
    ///
    /// Rejects `seconds < 1`, and deadlines that cannot be written in the
    /// four-digit-year wire format.
    pub fn generate_with_expiry(
        seconds: i64,
        source: &dyn SecretSource,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if seconds < 1 {
            return Err(TokenError::invalid_interval(seconds));
        }

        let expiry = TimeDelta::try_seconds(seconds)
            .and_then(|ttl| clock.now().checked_add_signed(ttl))
            .filter(|at| at.year() <= 9999)
            .ok_or_else(|| TokenError::invalid_interval(seconds))?;

        let mut token = Self::generate(source, clock)?;
        token.expiry = Some(expiry);
        Ok(token)
    }

    /// Decode a token, reading time from `clock` for expiry checks.
    pub fn parse_with_clock(encoded: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let invalid = || TokenError::invalid_string(encoded);

        let raw = STANDARD.decode(encoded).map_err(|_| invalid())?;
        let raw = String::from_utf8(raw).map_err(|_| invalid())?;

        let parts: Vec<&str> = raw.split(EXPIRY_DELIMITER).collect();
        let (secret, expiry) = match parts.as_slice() {
            [secret] => (*secret, None),
            [secret, timestamp] => {
                let at = NaiveDateTime::parse_from_str(timestamp, EXPIRY_FORMAT)
                    .map_err(|_| invalid())?;
                // chrono accepts unpadded fields and signed years; the wire form is fixed-width
                if at.format(EXPIRY_FORMAT).to_string() != *timestamp {
                    return Err(invalid());
                }
                (*secret, Some(at.and_utc()))
            }
            _ => return Err(invalid()),
        };

        if secret.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            secret: secret.to_string(),
            expiry,
            clock,
        })
    }

    /// Deadline, if the token has one.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Canonical encoding
    pub fn encode(&self) -> String {
        let raw = match self.expiry {
            Some(at) => format!(
                "{}{}{}",
                self.secret,
                EXPIRY_DELIMITER,
                at.format(EXPIRY_FORMAT)
            ),
            None => self.secret.clone(),
        };
        STANDARD.encode(raw)
    }
}

impl FormToken for Token {
    fn is_expired(&self) -> bool {
        match self.expiry {
            Some(at) => self.clock.now() > at,
            None => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("secret", &"[redacted]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for Token {}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_clock(s, Arc::new(SystemClock))
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}
