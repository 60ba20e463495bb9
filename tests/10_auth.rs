mod common;

use anyhow::Result;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::Duration;
use serde_json::json;

use psych_client::config::AppConfig;
use psych_client::models::{LoginCredentials, RegisterData, Role};
use psych_client::navigation::{RecordingNavigator, Route};
use psych_client::{AppContext, ClientError, SessionState, TokenStore};

use common::{DOCTOR_EMAIL, DOCTOR_PASSWORD, OPAQUE_TOKEN_EMAIL};

#[tokio::test]
async fn doctor_login_lands_on_dashboard() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, navigator) = common::context_for(&stub)?;
    assert_eq!(ctx.session.state(), SessionState::Unauthenticated);

    let user = ctx
        .session
        .login(&LoginCredentials::new(DOCTOR_EMAIL, DOCTOR_PASSWORD))
        .await?;

    assert_eq!(user.role, Role::Doctor);
    assert_eq!(navigator.last(), Some(Route::Dashboard));

    let snapshot = ctx.session.snapshot();
    assert!(snapshot.is_authenticated);
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.token, ctx.api.current_token());
    assert!(ctx.session.user_view().is_doctor);

    Ok(())
}

#[tokio::test]
async fn login_token_is_sent_on_next_request() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, _) = common::context_for(&stub)?;

    let response = ctx
        .api
        .login(&LoginCredentials::new(DOCTOR_EMAIL, DOCTOR_PASSWORD))
        .await?;
    let token = response.data.map(|d| d.token).unwrap_or_default();
    assert_eq!(ctx.api.current_token().as_deref(), Some(token.as_str()));

    ctx.api.dashboard_stats().await?;

    let headers = stub.state.auth_headers.lock().unwrap().clone();
    assert_eq!(headers.last().cloned().flatten(), Some(format!("Bearer {}", token)));
    Ok(())
}

#[tokio::test]
async fn wrong_password_keeps_session_signed_out() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, _) = common::context_for(&stub)?;

    let err = ctx
        .session
        .login(&LoginCredentials::new(DOCTOR_EMAIL, "wrong-password"))
        .await
        .unwrap_err();

    assert_eq!(err, ClientError::Remote("Credenciales inválidas".to_string()));
    assert_eq!(ctx.session.state(), SessionState::Unauthenticated);
    assert!(ctx.api.current_token().is_none());
    Ok(())
}

#[tokio::test]
async fn register_without_user_payload_reads_claims() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, navigator) = common::context_for(&stub)?;

    let user = ctx
        .session
        .register(&RegisterData {
            email: "admin@test.com".to_string(),
            password: "secret99".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
        })
        .await?;

    assert_eq!(user.email, "admin@test.com");
    assert_eq!(user.role, Role::Admin);
    assert_eq!(navigator.last(), Some(Route::Dashboard));
    assert!(ctx.session.user_view().is_admin);
    Ok(())
}

#[tokio::test]
async fn register_surfaces_remote_message() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, navigator) = common::context_for(&stub)?;

    let err = ctx
        .session
        .register(&RegisterData {
            email: "taken@test.com".to_string(),
            password: "secret99".to_string(),
            name: "Taken".to_string(),
            role: Role::Doctor,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Email ya registrado");
    assert!(!ctx.session.is_authenticated());
    assert!(navigator.history().is_empty());
    Ok(())
}

#[tokio::test]
async fn refresh_replaces_stored_token() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, _) = common::context_for(&stub)?;
    ctx.session
        .login(&LoginCredentials::new(DOCTOR_EMAIL, DOCTOR_PASSWORD))
        .await?;
    let before = ctx.api.current_token();

    ctx.api.refresh_token().await?;

    let after = ctx.api.current_token();
    assert!(after.is_some());
    assert_ne!(before, after);
    Ok(())
}

#[tokio::test]
async fn persisted_token_hydrates_next_start() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let dir = std::env::temp_dir().join(format!("psych-client-it-{}", uuid::Uuid::new_v4()));
    let config = AppConfig::for_base_url(&stub.base_url);

    {
        let tokens = TokenStore::persistent(&dir, Duration::hours(24));
        let ctx = AppContext::with_tokens(&config, tokens, std::sync::Arc::new(RecordingNavigator::new()))?;
        ctx.session
            .login(&LoginCredentials::new(DOCTOR_EMAIL, DOCTOR_PASSWORD))
            .await?;
    }

    let tokens = TokenStore::persistent(&dir, Duration::hours(24));
    let ctx = AppContext::with_tokens(&config, tokens, std::sync::Arc::new(RecordingNavigator::new()))?;

    match ctx.session.state() {
        SessionState::Authenticated { user, .. } => assert_eq!(user.email, DOCTOR_EMAIL),
        other => panic!("expected authenticated session, got {:?}", other),
    }

    ctx.session.logout().await;
    assert!(TokenStore::persistent(&dir, Duration::hours(24)).get().is_none());

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}

#[tokio::test]
async fn stored_token_with_missing_claims_is_dropped() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let config = AppConfig::for_base_url(&stub.base_url);
    let tokens = TokenStore::in_memory();
    // Well-formed HS256 token, but no email claim.
    tokens.set(&common::sign_claims(&json!({"userId": "u1", "role": "doctor"})));

    let ctx = AppContext::with_tokens(&config, tokens.clone(), std::sync::Arc::new(RecordingNavigator::new()))?;

    assert_eq!(ctx.session.state(), SessionState::Unauthenticated);
    assert!(tokens.get().is_none());
    Ok(())
}

#[tokio::test]
async fn stored_token_hydrates_whatever_its_header() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let config = AppConfig::for_base_url(&stub.base_url);

    let header = URL_SAFE_NO_PAD.encode(br#"{"typ":"JWT"}"#);
    let payload = STANDARD.encode(br#"{"userId":"d1","email":"doctor@test.com","role":"doctor"}"#);
    let token = format!("{}.{}.unsigned", header, payload);

    let tokens = TokenStore::in_memory();
    tokens.set(&token);
    let ctx = AppContext::with_tokens(&config, tokens.clone(), std::sync::Arc::new(RecordingNavigator::new()))?;

    assert!(ctx.session.is_authenticated());
    assert_eq!(ctx.session.user().map(|u| u.email).as_deref(), Some(DOCTOR_EMAIL));
    assert_eq!(tokens.get(), Some(token));
    Ok(())
}

#[tokio::test]
async fn unreadable_sign_in_token_is_not_kept() -> Result<()> {
    let stub = common::spawn_stub().await?;
    let (ctx, navigator) = common::context_for(&stub)?;

    let err = ctx
        .session
        .register(&RegisterData {
            email: OPAQUE_TOKEN_EMAIL.to_string(),
            password: "secret99".to_string(),
            name: "Opaque".to_string(),
            role: Role::Doctor,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(ctx.session.state(), SessionState::Unauthenticated);
    assert!(ctx.tokens.get().is_none());
    assert!(!ctx.api.is_authenticated());
    assert!(navigator.history().is_empty());
    Ok(())
}
