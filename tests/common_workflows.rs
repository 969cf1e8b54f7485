//! Integration tests for common Formguard workflows.
//!
//! These tests follow a form from rendering to submission.

use formguard::prelude::*;
use formguard::ManualClock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Render / Submit
// =============================================================================

#[test]
fn test_render_then_submit() {
    let mut guard = TokenGuard::from_config(&TokenConfig::default()).unwrap();

    // Rendering embeds the token in a hidden field
    let html = guard.hidden_input();
    let embedded = guard.token().to_string();
    assert!(html.contains(&embedded));

    // The browser echoes it back
    let mut fields = HashMap::new();
    fields.insert("form_token".to_string(), embedded.clone());
    fields.insert("email".to_string(), "alice@example.com".to_string());
    assert!(guard.check_form(&fields).is_ok());

    // Successful submission renews the token; replaying the old one fails
    guard.renew().unwrap();
    assert!(matches!(
        guard.check_form(&fields),
        Err(TokenError::TokenMismatch { .. })
    ));
}

#[test]
fn test_stale_form_is_rejected() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let issuer = TokenIssuer::from_config(&TokenConfig::default().with_ttl(900))
        .unwrap()
        .with_clock(clock.clone());
    let guard = TokenGuard::new(issuer).unwrap();
    let embedded = guard.token().to_string();

    clock.advance(600);
    assert!(guard.check_encoded(&embedded).is_ok());

    clock.advance(301);
    assert!(matches!(
        guard.check_encoded(&embedded),
        Err(TokenError::TokenExpired)
    ));
}

#[test]
fn test_tampered_submission_is_rejected() {
    let guard = TokenGuard::from_config(&TokenConfig::default()).unwrap();

    let err = guard.check_encoded("definitely not base64!").unwrap_err();
    assert!(err.token_string().is_some());

    let err = guard.check_form_body(b"email=alice%40example.com").unwrap_err();
    assert!(matches!(err, TokenError::MissingToken(_)));
}

// =============================================================================
// JSON Projection
// =============================================================================

#[derive(Serialize, Deserialize)]
struct FormState {
    id: String,
    token: Token,
}

#[test]
fn test_form_state_json_round_trip() {
    let state = FormState {
        id: "contact".to_string(),
        token: Token::new_with_expiry(300).unwrap(),
    };

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["token"], serde_json::json!(state.token.to_string()));

    let restored: FormState = serde_json::from_value(json).unwrap();
    assert_eq!(restored.id, "contact");
    assert!(restored.token.equals(&state.token));
}
