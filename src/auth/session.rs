//! Session management for BlockEx Trade API authentication.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::{Error, Result};

const LOGIN_PATH: &str = "oauth/token";
const LOGOUT_PATH: &str = "oauth/logout";

/// Exact body message the venue attaches to a 401 that means "this bearer
/// token is no longer accepted". A 401 with any other body is a generic
/// request failure and does not trigger re-authentication.
const AUTHORIZATION_DENIED: &str = "Authorization has been denied for this request.";

/// Immutable credential set for one trader on one venue deployment.
///
/// Supplied once at construction and never mutated. Use one credential set
/// per [`Session`].
pub struct Credentials {
    base_url: Url,
    client_id: String,
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Create a credential set.
    ///
    /// The base URL is validated and normalized to end with a trailing
    /// slash so that endpoint paths join onto it.
    pub fn new(
        api_base_url: impl AsRef<str>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let mut base_url = Url::parse(api_base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client_id: client_id.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        })
    }

    /// The API base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The partner API identifier, sent as `client_id` on login and as
    /// `apiID` on public endpoints.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The trader username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Resolve an endpoint path (optionally carrying a query string)
    /// against the base URL.
    pub(crate) fn endpoint(&self, path_and_query: &str) -> Result<Url> {
        Ok(self.base_url.join(path_and_query)?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Status code and parsed JSON body of one dispatched request.
///
/// A body that is not valid JSON parses to [`Value::Null`]; classification
/// and detail extraction then treat the response as carrying no detail.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code of the response
    pub status: StatusCode,
    /// Parsed response body
    pub body: Value,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether this response is the venue's authorization rejection:
    /// status exactly 401 with the exact denial message in the body.
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
            && self.body.get("message").and_then(Value::as_str) == Some(AUTHORIZATION_DENIED)
    }

    /// Human-readable detail extracted from the body: the `error` field,
    /// falling back to `message`, else an empty string. Used uniformly to
    /// build error text across all endpoints.
    pub fn error_message(&self) -> String {
        self.body
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("message").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    }
}

/// Authentication session and authorized-request protocol for the BlockEx
/// Trade API.
///
/// The session owns the trader credentials, the current access token and
/// its expiry estimate. It guarantees that every authorized call is
/// attempted with a token the venue currently accepts: it logs in lazily
/// when no token is held or the stored expiry has passed, and when the
/// venue rejects a token server-side it re-authenticates once and retries
/// the call exactly once.
///
/// # Thread safety
///
/// `Session` is cheap to clone and can be shared across tasks. The token
/// check/login/store sequence runs under an internal mutex, so concurrent
/// callers that find the session unauthenticated coalesce into a single
/// login round-trip and all observe the same stored token.
///
/// # Side effects
///
/// [`Session::execute_authorized`] may mutate session state (store a
/// freshly issued token) even for semantically read-only calls. This is
/// part of the contract, not incidental behavior.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: Credentials,
    http: reqwest::Client,
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    access_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an unauthenticated session with a default HTTP client.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_http_client(credentials, reqwest::Client::new())
    }

    /// Create an unauthenticated session dispatching through the given
    /// HTTP client. Timeouts and other transport behavior come from the
    /// client's own configuration.
    pub fn with_http_client(credentials: Credentials, http: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                credentials,
                http,
                state: Mutex::new(SessionState::default()),
            }),
        }
    }

    /// The credentials this session authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Whether an access token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.lock().await.access_token.is_some()
    }

    /// Whether the held token is absent or past its locally tracked
    /// expiry. The venue may additionally invalidate a token server-side
    /// before this estimate says so; the authorized-request path handles
    /// that case via the 401 signal.
    pub async fn is_expired(&self) -> bool {
        let state = self.inner.state.lock().await;
        token_is_stale(&state, Utc::now())
    }

    /// Expiry of the held token, if one is held.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().await.expires_at
    }

    /// Log in with the stored credentials and store the issued token.
    ///
    /// Returns the access token string. On failure the session state is
    /// left unchanged.
    pub async fn login(&self) -> Result<String> {
        let mut state = self.inner.state.lock().await;
        self.login_locked(&mut state).await
    }

    /// Log out and clear the held token.
    ///
    /// A no-op when no token is held: no request is sent. If the venue
    /// rejects the logout the token is preserved, so the caller's view of
    /// the authentication state stays consistent with the server's.
    pub async fn logout(&self) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        let Some(token) = state.access_token.as_ref() else {
            return Ok(());
        };

        let url = self.inner.credentials.endpoint(LOGOUT_PATH)?;
        let response = self
            .inner
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            state.access_token = None;
            state.expires_at = None;
            Ok(())
        } else {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            Err(Error::Logout(RawResponse { status, body }.error_message()))
        }
    }

    /// Execute one authorized call against the venue.
    ///
    /// `method` must be GET or POST; anything else fails with
    /// [`Error::InvalidInput`] before any network traffic. `url` is the
    /// absolute endpoint URL, already including any query string.
    ///
    /// The first attempt carries the current bearer token, logging in
    /// first when the token is absent or past its expiry. If the venue
    /// answers with its authorization rejection (401 plus the exact denial
    /// message), the session re-authenticates and retries exactly once;
    /// the second response is returned verbatim whatever its status. At
    /// most one re-authentication and one retry happen per call.
    ///
    /// Transport errors propagate unchanged at any step.
    pub async fn execute_authorized(&self, method: Method, url: Url) -> Result<RawResponse> {
        if method != Method::GET && method != Method::POST {
            return Err(Error::InvalidInput(format!(
                "unsupported HTTP method for authorized requests: {method}"
            )));
        }

        let bearer = self.current_or_new_token().await?;
        let response = self.dispatch(&method, url.clone(), &bearer).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        // The venue rejected the token server-side; the local expiry
        // estimate does not matter here.
        let bearer = self.replace_rejected_token(&bearer).await?;
        self.dispatch(&method, url, &bearer).await
    }

    /// The bearer value for the next request, logging in first when no
    /// token is held or the stored expiry has passed. Check and login run
    /// under the session mutex: concurrent callers needing authentication
    /// trigger at most one login round-trip.
    async fn current_or_new_token(&self) -> Result<String> {
        let mut state = self.inner.state.lock().await;
        if token_is_stale(&state, Utc::now()) {
            self.login_locked(&mut state).await?;
        }
        Ok(bearer_value(&state))
    }

    /// Called after the venue rejected `rejected` server-side. If another
    /// caller already stored a different token, reuse that one; otherwise
    /// log in again.
    async fn replace_rejected_token(&self, rejected: &str) -> Result<String> {
        let mut state = self.inner.state.lock().await;
        if bearer_value(&state) == rejected {
            self.login_locked(&mut state).await?;
        }
        Ok(bearer_value(&state))
    }

    async fn login_locked(&self, state: &mut SessionState) -> Result<String> {
        let token = self.request_access_token().await?;
        let issued_at = Utc::now();
        state.access_token = Some(SecretString::from(token.access_token.clone()));
        state.expires_at = Some(issued_at + Duration::seconds(token.expires_in));
        Ok(token.access_token)
    }

    async fn request_access_token(&self) -> Result<TokenResponse> {
        let url = self.inner.credentials.endpoint(LOGIN_PATH)?;
        let form = [
            ("grant_type", "password"),
            ("username", self.inner.credentials.username()),
            ("password", self.inner.credentials.password.expose_secret()),
            ("client_id", self.inner.credentials.client_id()),
        ];

        let response = self.inner.http.post(url).form(&form).send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let raw = RawResponse { status, body };
        if !raw.is_success() {
            return Err(Error::Authentication(raw.error_message()));
        }

        Ok(serde_json::from_value(raw.body)?)
    }

    async fn dispatch(&self, method: &Method, url: Url, bearer: &str) -> Result<RawResponse> {
        let response = self
            .inner
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
            .send()
            .await?;

        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok(RawResponse { status, body })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.inner.credentials)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Bearer value for the current state; empty when no token is held. The
/// protocol still attaches the header in that case as a fallback.
fn bearer_value(state: &SessionState) -> String {
    state
        .access_token
        .as_ref()
        .map(|t| t.expose_secret().to_string())
        .unwrap_or_default()
}

/// The proactive refresh trigger: no token held, or the locally tracked
/// expiry lies strictly before `now`. Independent of the reactive 401
/// trigger; either alone forces a re-login.
fn token_is_stale(state: &SessionState, now: DateTime<Utc>) -> bool {
    match (&state.access_token, state.expires_at) {
        (None, _) => true,
        (Some(_), Some(expires_at)) => expires_at < now,
        (Some(_), None) => true,
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}
