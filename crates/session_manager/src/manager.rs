//! Session Manager service

use std::sync::Arc;
use std::time::Duration;

use auth_core::{
    AuthUser, Config, LoginRequest, ProfilePatch, RefreshTokenRequest, RegisterRequest,
    SessionState, UserRecord,
};
use directory_client::AuthApi;
use log::{debug, error, info, warn};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::error::{Result, SessionError};
use crate::navigation::Navigator;
use crate::storage::{KeyValueStorage, SessionStore};

/// The one authoritative holder of authentication state.
///
/// Cheap to clone; all clones share the same state, storage, and refresh
/// timer. State is published as complete snapshots through a watch channel,
/// so subscribers always observe self-consistent values in the order they
/// were produced.
pub struct SessionManager<A, S, N> {
    inner: Arc<SessionManagerInner<A, S, N>>,
}

impl<A, S, N> Clone for SessionManager<A, S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionManagerInner<A, S, N> {
    api: A,
    store: SessionStore<S>,
    navigator: N,
    token_ttl_mins: u64,
    refresh_period: Duration,
    state_tx: watch::Sender<SessionState>,
    refresh_timer: Mutex<Option<JoinHandle<()>>>,
    // At most one refresh exchange in flight
    refresh_lock: Mutex<()>,
}

impl<A, S, N> SessionManager<A, S, N>
where
    A: AuthApi + 'static,
    S: KeyValueStorage + 'static,
    N: Navigator + 'static,
{
    /// Bootstrap: restore the persisted session if present and well-formed,
    /// otherwise start anonymous. Malformed persisted data never raises.
    pub async fn new(api: A, storage: S, navigator: N, config: &Config) -> Self {
        let store = SessionStore::new(storage);
        let restored = store.load_user().await;
        let initial = match &restored {
            Some(user) => SessionState::authenticated(user.clone()),
            None => SessionState::anonymous(),
        };
        let (state_tx, _) = watch::channel(initial);

        let manager = SessionManager {
            inner: Arc::new(SessionManagerInner {
                api,
                store,
                navigator,
                token_ttl_mins: config.token_ttl_mins,
                refresh_period: config.refresh_period(),
                state_tx,
                refresh_timer: Mutex::new(None),
                refresh_lock: Mutex::new(()),
            }),
        };

        if let Some(user) = restored {
            info!("restored persisted session for user {}", user.username);
            manager.start_refresh_timer().await;
        }
        manager
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    /// Stream of state snapshots for passive observers (views, guards).
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// The current session, if authenticated.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.state_tx.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state_tx.borrow().is_authenticated
    }

    /// Exchange credentials for a session. May be called from any state;
    /// on failure the prior authentication state is kept and the error is
    /// both recorded in the state and returned.
    pub async fn login(&self, mut credentials: LoginRequest) -> Result<AuthUser> {
        if credentials.expires_in_mins.is_none() {
            credentials.expires_in_mins = Some(self.inner.token_ttl_mins);
        }
        self.mark_loading();

        match self.inner.api.login(credentials).await {
            Ok(response) => {
                let user = AuthUser::from(response);
                if let Err(storage_error) = self.inner.store.store_user(&user).await {
                    self.record_failure(&storage_error);
                    return Err(storage_error);
                }
                self.set_state(SessionState::authenticated(user.clone()));
                self.start_refresh_timer().await;
                info!("login succeeded for user {}", user.username);
                Ok(user)
            }
            Err(api_error) => {
                warn!("login failed: {api_error}");
                let session_error = SessionError::from_auth_exchange(&api_error);
                self.record_failure(&session_error);
                Err(session_error)
            }
        }
    }

    /// Create an account in the directory. Does not change the current
    /// session; only toggles the loading/error fields.
    pub async fn register(&self, profile: RegisterRequest) -> Result<UserRecord> {
        self.mark_loading();

        match self.inner.api.register(profile).await {
            Ok(record) => {
                let mut state = self.state();
                state.is_loading = false;
                state.error = None;
                self.set_state(state);
                Ok(record)
            }
            Err(api_error) => {
                warn!("registration failed: {api_error}");
                let session_error = SessionError::from_auth_exchange(&api_error);
                self.record_failure(&session_error);
                Err(session_error)
            }
        }
    }

    /// Erase the persisted record, stop the refresh timer, reset the state,
    /// and signal navigation to the login view. Never fails; calling while
    /// already anonymous only repeats the navigation signal.
    pub async fn logout(&self) {
        if let Err(storage_error) = self.inner.store.clear().await {
            warn!("failed to clear persisted session: {storage_error}");
        }
        self.stop_refresh_timer().await;
        self.set_state(SessionState::anonymous());
        self.inner.navigator.to_login();
        debug!("session cleared");
    }

    /// Exchange the stored refresh token for a new token pair tied to the
    /// current session. Without a stored token this logs out immediately and
    /// makes no network call; an exchange failure also logs out.
    pub async fn refresh_token(&self) -> Result<AuthUser> {
        let _guard = self.inner.refresh_lock.lock().await;

        let Some(refresh_token) = self.inner.store.refresh_token().await else {
            self.logout().await;
            return Err(SessionError::NoRefreshToken);
        };
        let Some(current) = self.current_user() else {
            return Err(SessionError::NoCurrentUser);
        };

        let request = RefreshTokenRequest {
            refresh_token,
            expires_in_mins: Some(self.inner.token_ttl_mins),
        };
        match self.inner.api.refresh(request).await {
            Ok(response) => {
                let user = current.with_tokens(response.access_token, response.refresh_token);
                self.inner.store.store_user(&user).await?;

                let mut state = self.state();
                state.user = Some(user.clone());
                state.is_authenticated = true;
                state.is_loading = false;
                state.error = None;
                self.set_state(state);
                debug!("access token renewed");
                Ok(user)
            }
            Err(api_error) => {
                error!("token refresh failed: {api_error}");
                self.logout().await;
                Err(SessionError::SessionExpired)
            }
        }
    }

    /// Fetch the authenticated user's directory profile. A 401 invalidates
    /// the session.
    pub async fn current_user_profile(&self) -> Result<UserRecord> {
        let Some(current) = self.current_user() else {
            let session_error = SessionError::NotAuthenticated;
            self.record_failure(&session_error);
            return Err(session_error);
        };

        match self.inner.api.current_user(&current.access_token).await {
            Ok(record) => Ok(record),
            Err(api_error) if api_error.is_unauthorized() => {
                self.logout().await;
                Err(SessionError::SessionExpired)
            }
            Err(api_error) => {
                warn!("profile fetch failed: {api_error}");
                let session_error = SessionError::ProfileFetchFailed;
                self.record_failure(&session_error);
                Err(session_error)
            }
        }
    }

    /// Update the authenticated user's profile and merge the returned
    /// name/email/avatar fields into the session. Token fields are never
    /// touched by a profile update. A 401 invalidates the session.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<UserRecord> {
        let Some(current) = self.current_user() else {
            let session_error = SessionError::NotAuthenticated;
            self.record_failure(&session_error);
            return Err(session_error);
        };

        match self
            .inner
            .api
            .update_user(current.id, &patch, &current.access_token)
            .await
        {
            Ok(record) => {
                let mut user = current;
                user.merge_profile(&record);
                self.inner.store.store_user(&user).await?;

                let mut state = self.state();
                state.user = Some(user);
                state.is_loading = false;
                state.error = None;
                self.set_state(state);
                Ok(record)
            }
            Err(api_error) if api_error.is_unauthorized() => {
                self.logout().await;
                Err(SessionError::SessionExpired)
            }
            Err(api_error) => {
                warn!("profile update failed: {api_error}");
                let session_error = SessionError::ProfileUpdateFailed;
                self.record_failure(&session_error);
                Err(session_error)
            }
        }
    }

    /// Clear the recorded error, leaving every other field untouched.
    pub fn clear_error(&self) {
        let mut state = self.state();
        state.error = None;
        self.set_state(state);
    }

    fn set_state(&self, state: SessionState) {
        self.inner.state_tx.send_replace(state);
    }

    fn mark_loading(&self) {
        let mut state = self.state();
        state.is_loading = true;
        state.error = None;
        self.set_state(state);
    }

    fn record_failure(&self, session_error: &SessionError) {
        let mut state = self.state();
        state.is_loading = false;
        state.error = Some(session_error.to_string());
        self.set_state(state);
    }

    /// Start the silent-refresh timer, replacing any previous one. The task
    /// holds only a weak reference, so dropping the last manager clone ends
    /// it at the next tick; a tick failure has already performed logout,
    /// which aborts the task.
    async fn start_refresh_timer(&self) {
        self.stop_refresh_timer().await;

        let period = self.inner.refresh_period;
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            // First fire after one full period, not immediately
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                let manager = SessionManager { inner };
                match manager.refresh_token().await {
                    Ok(_) => info!("token refreshed successfully"),
                    Err(session_error) => {
                        error!("silent token refresh failed: {session_error}");
                        break;
                    }
                }
            }
        });

        *self.inner.refresh_timer.lock().await = Some(handle);
    }

    async fn stop_refresh_timer(&self) {
        if let Some(handle) = self.inner.refresh_timer.lock().await.take() {
            handle.abort();
        }
    }
}
