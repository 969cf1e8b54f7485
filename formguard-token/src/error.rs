use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid expiry interval: {seconds} seconds")]
    InvalidExpiryInterval { seconds: i64 },

    #[error("Invalid token string: {token_string}")]
    InvalidTokenString { token_string: String },

    #[error("Secret generation failed: {0}")]
    SecretSource(String),

    #[error("Form token mismatch")]
    TokenMismatch { expected: String, actual: String },

    #[error("Form token expired")]
    TokenExpired,

    #[error("Missing form token in field '{0}'")]
    MissingToken(String),

    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TokenError {
    pub(crate) fn invalid_interval(seconds: i64) -> Self {
        TokenError::InvalidExpiryInterval { seconds }
    }

    pub(crate) fn invalid_string(token_string: impl Into<String>) -> Self {
        TokenError::InvalidTokenString {
            token_string: token_string.into(),
        }
    }

    /// Rejected interval, if this is an `InvalidExpiryInterval`.
    pub fn seconds(&self) -> Option<i64> {
        match self {
            TokenError::InvalidExpiryInterval { seconds } => Some(*seconds),
            _ => None,
        }
    }

    /// Offending input, if this is an `InvalidTokenString`.
    pub fn token_string(&self) -> Option<&str> {
        match self {
            TokenError::InvalidTokenString { token_string } => Some(token_string),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let err = TokenError::invalid_interval(-5);
        assert_eq!(err.seconds(), Some(-5));
        assert_eq!(err.token_string(), None);
        assert_eq!(err.to_string(), "Invalid expiry interval: -5 seconds");

        let err = TokenError::invalid_string("bogus");
        assert_eq!(err.token_string(), Some("bogus"));
        assert_eq!(err.seconds(), None);
    }

    #[test]
    fn test_mismatch_message_hides_tokens() {
        let err = TokenError::TokenMismatch {
            expected: "abc".to_string(),
            actual: "def".to_string(),
        };
        assert!(!err.to_string().contains("abc"));
    }
}
