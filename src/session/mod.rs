//! Session context: who is signed in, and the transitions between states.
//!
//! The session hydrates from the token store without a network call, follows
//! login/register/logout, and drops to unauthenticated whenever the HTTP
//! layer reports a 401.

pub mod claims;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

pub use claims::{decode_claims, user_from_token, ClaimsError, TokenClaims};

use crate::api::{ApiClient, ApiResponse};
use crate::error::{ClientError, ClientResult};
use crate::models::{AuthPayload, LoginCredentials, RegisterData, Role, User};
use crate::navigation::{Navigator, Route};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Initializing,
    Unauthenticated,
    Authenticated { user: User, token: String },
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub user: Option<User>,
    pub is_doctor: bool,
    pub is_admin: bool,
}

struct Inner {
    api: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
    pending: AtomicUsize,
}

impl Inner {
    fn set_state(&self, next: SessionState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = next;
    }

    fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Decrements the pending counter when an auth call finishes, however it ends.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// A session in `Initializing`, listening for 401s but not yet hydrated.
    pub fn new(api: Arc<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        let inner = Arc::new(Inner {
            api,
            navigator,
            state: RwLock::new(SessionState::Initializing),
            pending: AtomicUsize::new(0),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        inner.api.http().on_unauthorized(move || {
            if let Some(inner) = weak.upgrade() {
                tracing::info!("session ended by server");
                inner.set_state(SessionState::Unauthenticated);
            }
        });

        Self { inner }
    }

    /// Construct and hydrate in one step.
    pub fn start(api: Arc<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        let session = Self::new(api, navigator);
        session.hydrate();
        session
    }

    /// Recover the signed-in user from the stored token. A token whose claims
    /// cannot be read is discarded.
    pub fn hydrate(&self) -> SessionState {
        let tokens = self.inner.api.http().tokens();

        let next = match tokens.get() {
            None => SessionState::Unauthenticated,
            Some(token) => match user_from_token(&token) {
                Ok(user) => {
                    tracing::info!("restored session for {} ({})", user.email, user.role);
                    SessionState::Authenticated { user, token }
                }
                Err(e) => {
                    tracing::warn!("discarding stored token: {}", e);
                    tokens.clear();
                    SessionState::Unauthenticated
                }
            },
        };

        self.inner.set_state(next.clone());
        next
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state();
        let is_loading = self.is_loading_in(&state);
        match state {
            SessionState::Authenticated { user, token } => SessionSnapshot {
                user: Some(user),
                token: Some(token),
                is_loading,
                is_authenticated: true,
            },
            _ => SessionSnapshot {
                user: None,
                token: None,
                is_loading,
                is_authenticated: false,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_in(&self.inner.state())
    }

    fn is_loading_in(&self, state: &SessionState) -> bool {
        matches!(state, SessionState::Initializing) || self.inner.pending.load(Ordering::SeqCst) > 0
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.inner.state(), SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<User> {
        match self.inner.state() {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn user_view(&self) -> UserView {
        let user = self.user();
        let role = user.as_ref().map(|u| u.role);
        UserView {
            is_doctor: role == Some(Role::Doctor),
            is_admin: role == Some(Role::Admin),
            user,
        }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<User> {
        credentials.validate()?;

        let _pending = PendingGuard::enter(&self.inner.pending);
        let result = self.inner.api.login(credentials).await;
        self.finish_sign_in(result, "Error al iniciar sesión")
    }

    pub async fn register(&self, data: &RegisterData) -> ClientResult<User> {
        data.validate()?;

        let _pending = PendingGuard::enter(&self.inner.pending);
        let result = self.inner.api.register(data).await;
        self.finish_sign_in(result, "Error al registrarse")
    }

    fn finish_sign_in(
        &self,
        result: ClientResult<ApiResponse<AuthPayload>>,
        fallback: &str,
    ) -> ClientResult<User> {
        let signed_in = result
            .and_then(|response| response.into_result(fallback))
            .and_then(|payload| payload.ok_or_else(|| ClientError::remote(fallback)))
            .and_then(|payload| {
                let user = match payload.user {
                    Some(user) => user,
                    None => user_from_token(&payload.token).map_err(|e| ClientError::Decode(e.to_string()))?,
                };
                Ok((user, payload.token))
            });

        match signed_in {
            Ok((user, token)) => {
                tracing::info!("signed in as {} ({})", user.email, user.role);
                self.inner.set_state(SessionState::Authenticated {
                    user: user.clone(),
                    token,
                });
                self.inner.navigator.navigate(Route::Dashboard);
                Ok(user)
            }
            Err(e) => {
                tracing::debug!("sign-in failed: {}", e);
                // The client may already have stored a token it could not turn into a user.
                self.inner.api.http().tokens().clear();
                self.inner.set_state(SessionState::Unauthenticated);
                Err(e)
            }
        }
    }

    /// Always ends signed out, whatever the remote side says.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.logout().await {
            tracing::warn!("logout request failed: {}", e);
        }
        // The store may still hold the token if the call above failed early.
        self.inner.api.http().tokens().clear();

        tracing::info!("signed out");
        self.inner.set_state(SessionState::Unauthenticated);
        self.inner.navigator.navigate(Route::Login);
    }

    /// Sends the user to the login route once the session has settled
    /// unauthenticated. Returns whether the caller may proceed.
    pub fn require_auth(&self) -> bool {
        if self.is_loading() {
            return false;
        }
        let authenticated = self.is_authenticated();
        if !authenticated {
            self.inner.navigator.navigate(Route::Login);
        }
        authenticated
    }

    /// Like [`require_auth`](Self::require_auth), but also bounces users whose
    /// role is not listed to the dashboard.
    pub fn require_role(&self, roles: &[Role]) -> bool {
        if self.is_loading() {
            return false;
        }
        match self.user() {
            None => {
                self.inner.navigator.navigate(Route::Login);
                false
            }
            Some(user) if !roles.contains(&user.role) => {
                tracing::debug!("role {} not permitted here", user.role);
                self.inner.navigator.navigate(Route::Dashboard);
                false
            }
            Some(_) => true,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("state", &self.inner.state()).finish()
    }
}
