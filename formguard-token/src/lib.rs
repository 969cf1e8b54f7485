//! # Formguard Tokens
//!
//! Anti-forgery tokens for HTML form submissions.
//!
//! ## Features
//!
//! - ✅ **High-entropy Secrets** - 64 bytes from the OS random source
//! - ✅ **Optional Expiry** - Absolute deadline encoded alongside the secret
//! - ✅ **Canonical Encoding** - One base64 string for rendering and parsing
//! - ✅ **Injectable Time and Randomness** - Deterministic tests without sleeping
//! - ✅ **Submission Guard** - Mismatch and expiry checks in one call
//!
//! ## Quick Start
//!
//! ```rust
//! use formguard_token::{FormToken, Token};
//!
//! // Mint a token when rendering the form
//! let token = Token::new_with_expiry(3600).unwrap();
//! let embedded = token.to_string();
//!
//! // Reconstruct what the client sent back
//! let submitted: Token = embedded.parse().unwrap();
//!
//! assert!(token.equals(&submitted));
//! assert!(!submitted.is_expired());
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! encoded := base64( secret_b64 )
//!          | base64( secret_b64 "[expiry]" "YYYY-MM-DD HH:MM:SS" )
//! ```
//!
//! Timestamps are UTC with one-second resolution. Two tokens are equal only
//! when their encodings are identical, so removing the expiry suffix from a
//! token never yields something that passes the equality check.
//!
//! ## Deterministic Expiry
//!
//! ```rust
//! use formguard_token::{FormToken, ManualClock, OsSecretSource, Token};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
//! let token = Token::generate_with_expiry(1, &OsSecretSource, clock.clone()).unwrap();
//!
//! assert!(!token.is_expired());
//! clock.advance(2);
//! assert!(token.is_expired());
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod issuer;
pub mod secret;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenConfig;
pub use error::{ConfigError, Result, TokenError};
pub use guard::TokenGuard;
pub use issuer::TokenIssuer;
pub use secret::{OsSecretSource, SECRET_LENGTH, SecretSource};
#[cfg(any(test, feature = "test-util"))]
pub use secret::FixedSecretSource;
pub use token::{EXPIRY_DELIMITER, EXPIRY_FORMAT, FormToken, Token};
