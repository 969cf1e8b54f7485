//! Integration tests for formguard-token

use base64::{Engine, engine::general_purpose::STANDARD};
use formguard_token::*;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_round_trip_preserves_equality() {
    let tokens = [
        Token::new().unwrap(),
        Token::new_with_expiry(1).unwrap(),
        Token::new_with_expiry(86_400).unwrap(),
    ];

    for token in &tokens {
        let decoded: Token = token.to_string().parse().unwrap();
        assert!(decoded.equals(token));
        assert_eq!(decoded.to_string(), token.to_string());
    }
}

#[test]
fn test_expiry_boundary_with_real_clock() {
    let token = Token::new_with_expiry(1).unwrap();
    let decoded: Token = token.to_string().parse().unwrap();

    assert!(!token.is_expired());
    assert!(!decoded.is_expired());

    std::thread::sleep(Duration::from_secs(2));

    assert!(token.is_expired());
    assert!(decoded.is_expired());
}

#[test]
fn test_invalid_interval() {
    assert!(matches!(
        Token::new_with_expiry(0),
        Err(TokenError::InvalidExpiryInterval { seconds: 0 })
    ));
    assert!(matches!(
        Token::new_with_expiry(-5),
        Err(TokenError::InvalidExpiryInterval { seconds: -5 })
    ));
    assert!(Token::new_with_expiry(5).is_ok());
}

#[test]
fn test_invalid_string() {
    let err = "not-valid-base64-!@#".parse::<Token>().unwrap_err();
    assert_eq!(err.token_string(), Some("not-valid-base64-!@#"));

    let valid = Token::new().unwrap().to_string();
    assert!(valid.parse::<Token>().is_ok());
}

#[test]
fn test_delimiter_in_payload_is_rejected() {
    let secret = Token::new().unwrap();
    let raw = String::from_utf8(STANDARD.decode(secret.to_string()).unwrap()).unwrap();

    let doubled = STANDARD.encode(format!(
        "{raw}{EXPIRY_DELIMITER}2030-01-01 00:00:00{EXPIRY_DELIMITER}2031-01-01 00:00:00"
    ));
    assert!(doubled.parse::<Token>().is_err());
}

#[test]
fn test_expiry_survives_round_trip() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let issuer = TokenIssuer::new().with_clock(clock.clone());

    let token = issuer.issue_with_expiry(120).unwrap();
    let decoded = issuer.parse(&token.to_string()).unwrap();

    assert!(decoded.equals(&token));
    assert_eq!(
        decoded.expiry().unwrap().timestamp(),
        token.expiry().unwrap().timestamp()
    );
}

#[test]
fn test_forged_expiry_does_not_match() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let issuer = TokenIssuer::new().with_clock(clock.clone()).with_ttl(Some(60));
    let mut guard = TokenGuard::new(issuer).unwrap();

    // Attacker keeps the secret but pushes the deadline out
    let raw = String::from_utf8(STANDARD.decode(guard.token().to_string()).unwrap()).unwrap();
    let (secret, _) = raw.split_once(EXPIRY_DELIMITER).unwrap();
    let extended = STANDARD.encode(format!("{secret}{EXPIRY_DELIMITER}9999-12-31 23:59:59"));
    let stripped = STANDARD.encode(secret);

    assert!(matches!(
        guard.check_encoded(&extended),
        Err(TokenError::TokenMismatch { .. })
    ));
    assert!(matches!(
        guard.check_encoded(&stripped),
        Err(TokenError::TokenMismatch { .. })
    ));

    guard.renew().unwrap();
    assert!(!guard.has_expired());
}

#[test]
fn test_failing_secret_source_propagates() {
    struct Unavailable;

    impl SecretSource for Unavailable {
        fn fill_secret(&self, _buf: &mut [u8]) -> formguard_token::Result<()> {
            Err(TokenError::SecretSource("entropy pool offline".to_string()))
        }
    }

    let issuer = TokenIssuer::new().with_source(Arc::new(Unavailable));
    assert!(matches!(issuer.issue(), Err(TokenError::SecretSource(_))));
    assert!(TokenGuard::new(issuer).is_err());
}

#[test]
fn test_injected_source_is_deterministic() {
    struct Constant;

    impl SecretSource for Constant {
        fn fill_secret(&self, buf: &mut [u8]) -> formguard_token::Result<()> {
            buf.fill(9);
            Ok(())
        }
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let a = Token::generate(&Constant, clock.clone()).unwrap();
    let b = Token::generate(&Constant, clock).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        STANDARD.decode(STANDARD.decode(a.to_string()).unwrap()).unwrap(),
        vec![9u8; SECRET_LENGTH]
    );
}
