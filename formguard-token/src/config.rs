use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};

/// Environment variable prefix for token settings
pub const ENV_PREFIX: &str = "FORMGUARD_TOKEN_";

/// Form token configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Token time-to-live in seconds (`None` issues non-expiring tokens)
    #[serde(deserialize_with = "deserialize_ttl")]
    pub ttl_seconds: Option<i64>,

    /// Form field carrying the token
    pub field_name: String,
}

// `0` disables expiry; TOML has no null.
fn deserialize_ttl<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let ttl = Option::<i64>::deserialize(deserializer)?;
    Ok(ttl.filter(|&seconds| seconds != 0))
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: Some(3600), // 1 hour
            field_name: "form_token".to_string(),
        }
    }
}

impl TokenConfig {
    /// Set token TTL
    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Issue tokens without expiry
    pub fn without_expiry(mut self) -> Self {
        self.ttl_seconds = None;
        self
    }

    /// Set field name
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Parse from a TOML document. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use formguard_token::TokenConfig;
    ///
    /// let config = TokenConfig::from_toml_str("ttl_seconds = 600").unwrap();
    /// assert_eq!(config.ttl_seconds, Some(600));
    /// assert_eq!(config.field_name, "form_token");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `FORMGUARD_TOKEN_TTL` and `FORMGUARD_TOKEN_FIELD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build from `(key, value)` pairs shaped like the process environment.
    ///
    /// A TTL of `0` or `none` disables expiry.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();

            match name {
                "TTL" => {
                    config.ttl_seconds = if value == "0" || value.eq_ignore_ascii_case("none") {
                        None
                    } else {
                        Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                            key: key.as_ref().to_string(),
                            value: value.to_string(),
                        })?)
                    };
                }
                "FIELD" => config.field_name = value.to_string(),
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ttl) = self.ttl_seconds {
            if ttl < 1 {
                return Err(ConfigError::Validation(format!(
                    "ttl_seconds must be at least 1, got {}",
                    ttl
                )));
            }
        }

        if self.field_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "field_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
