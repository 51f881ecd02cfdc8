use async_trait::async_trait;
use gloo_net::http::{Request, Response};

use crate::auth::error::AuthError;
use crate::auth::provider::{
    AuthChangeEvent, Identity, IdentityListener, IdentityProvider, ListenerRegistry, SignUpOutcome,
    Subscription,
};
use crate::config::SupabaseConfig;
use crate::supabase::storage::{storage_key, LocalStorage, SessionStorage, TabSync};
use crate::supabase::types::{ErrorBody, PasswordCredentials, Session, SignUpResponse};

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn network_error(err: gloo_net::Error) -> AuthError {
    log::error!("Auth request failed: {}", err);
    AuthError::network(err.to_string())
}

async fn read_error(response: Response) -> AuthError {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.into_auth_error(status),
        Err(_) => ErrorBody::default().into_auth_error(status),
    }
}

/// What a stored session value means to listeners in other tabs.
pub fn change_from_stored(value: Option<&str>) -> (AuthChangeEvent, Option<Identity>) {
    match value.and_then(|raw| serde_json::from_str::<Session>(raw).ok()) {
        Some(session) => (AuthChangeEvent::SignedIn, Some(session.user)),
        None => (AuthChangeEvent::SignedOut, None),
    }
}

/// Client for a Supabase project's auth endpoints (`/auth/v1`).
pub struct SupabaseAuth {
    config: SupabaseConfig,
    storage: Box<dyn SessionStorage>,
    storage_key: String,
    listeners: ListenerRegistry,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig, storage: Box<dyn SessionStorage>) -> Self {
        let storage_key = storage_key(&config.url);
        Self {
            config,
            storage,
            storage_key,
            listeners: ListenerRegistry::default(),
        }
    }

    pub fn in_browser(config: SupabaseConfig) -> Self {
        Self::new(config, Box::new(LocalStorage))
    }

    fn endpoint(&self, path: &str) -> Result<String, AuthError> {
        if !self.config.is_configured() {
            return Err(AuthError::unknown("Authentication is not configured."));
        }
        Ok(format!("{}/auth/v1/{}", self.config.url, path))
    }

    fn signup_endpoint(&self) -> Result<String, AuthError> {
        let url = self.endpoint("signup")?;
        Ok(match &self.config.email_redirect_to {
            Some(redirect) => format!("{}?redirect_to={}", url, urlencoding::encode(redirect)),
            None => url,
        })
    }

    fn anon_request(&self, request: Request) -> Request {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {}", self.config.anon_key))
    }

    fn user_request(&self, request: Request, session: &Session) -> Request {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {}", session.access_token))
    }

    /// The persisted session, unless it is missing, unreadable or expired.
    /// Sessions that cannot be used any more are removed.
    pub fn stored_session(&self, now: i64) -> Option<Session> {
        let raw = self.storage.get(&self.storage_key)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.is_expired(now) => Some(session),
            Ok(_) => {
                log::info!("Stored session has expired");
                self.storage.remove(&self.storage_key);
                None
            }
            Err(err) => {
                log::warn!("Discarding unreadable stored session: {}", err);
                self.storage.remove(&self.storage_key);
                None
            }
        }
    }

    fn adopt(&self, session: Session) -> Result<Identity, AuthError> {
        let session = session.stamped(now());
        let raw = serde_json::to_string(&session)
            .map_err(|err| AuthError::unknown(format!("Could not store session: {}", err)))?;
        self.storage.set(&self.storage_key, &raw);
        let identity = session.user;
        self.listeners.emit(AuthChangeEvent::SignedIn, Some(identity.clone()));
        Ok(identity)
    }

    fn forget(&self) {
        self.storage.remove(&self.storage_key);
        self.listeners.emit(AuthChangeEvent::SignedOut, None);
    }

    /// Relay sign-ins and sign-outs made in other tabs to our listeners. The
    /// relay stops when the returned guard is dropped.
    pub fn watch_other_tabs(&self) -> Option<TabSync> {
        let listeners = self.listeners.clone();
        TabSync::install(self.storage_key.clone(), move |value| {
            let (event, identity) = change_from_stored(value.as_deref());
            log::info!("Session changed in another tab: {:?}", event);
            listeners.emit(event, identity);
        })
    }
}

#[async_trait(?Send)]
impl IdentityProvider for SupabaseAuth {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.stored_session(now()) else {
            return Ok(None);
        };
        let response = self
            .user_request(Request::get(&self.endpoint("user")?), &session)
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            401 | 403 => {
                log::info!("Stored session was rejected by the auth server");
                self.storage.remove(&self.storage_key);
                Ok(None)
            }
            _ if response.ok() => response
                .json::<Identity>()
                .await
                .map(Some)
                .map_err(|err| AuthError::unknown(format!("Failed to parse user: {}", err))),
            _ => Err(read_error(response).await),
        }
    }

    fn on_identity_changed(&self, callback: IdentityListener) -> Subscription {
        self.listeners.subscribe(callback)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .anon_request(Request::post(&self.signup_endpoint()?))
            .json(&PasswordCredentials { email, password })
            .map_err(|err| AuthError::unknown(err.to_string()))?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            log::info!("Sign-up rejected with status {}", response.status());
            return Err(read_error(response).await);
        }
        match response.json::<SignUpResponse>().await {
            Ok(SignUpResponse::Session(session)) => self.adopt(session).map(SignUpOutcome::SignedIn),
            Ok(SignUpResponse::User(_)) => Ok(SignUpOutcome::ConfirmationSent),
            Err(err) => Err(AuthError::unknown(format!("Failed to parse sign-up response: {}", err))),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}?grant_type=password", self.endpoint("token")?);
        let response = self
            .anon_request(Request::post(&url))
            .json(&PasswordCredentials { email, password })
            .map_err(|err| AuthError::unknown(err.to_string()))?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            log::info!("Sign-in rejected with status {}", response.status());
            return Err(read_error(response).await);
        }
        let session = response
            .json::<Session>()
            .await
            .map_err(|err| AuthError::unknown(format!("Failed to parse session: {}", err)))?;
        self.adopt(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.stored_session(now()) else {
            self.forget();
            return Ok(());
        };
        let response = self
            .user_request(Request::post(&self.endpoint("logout")?), &session)
            .send()
            .await
            .map_err(network_error)?;

        match response.status() {
            // the session is already gone server-side
            401 | 403 | 404 => {}
            _ if response.ok() => {}
            _ => return Err(read_error(response).await),
        }
        self.forget();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supabase::storage::memory::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    const KEY: &str = "sb-abc-auth-token";

    fn config() -> SupabaseConfig {
        SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            email_redirect_to: Some("https://aivisapro.com".to_string()),
        }
    }

    fn session_json(expires_at: i64) -> String {
        format!(
            r#"{{"access_token":"jwt","expires_at":{expires_at},"user":{{"id":"u1","email":"a@b.com"}}}}"#
        )
    }

    fn client_with(stored: Option<String>) -> SupabaseAuth {
        let storage = MemoryStorage::default();
        if let Some(raw) = stored {
            storage.set(KEY, &raw);
        }
        SupabaseAuth::new(config(), Box::new(storage))
    }

    #[test]
    fn endpoints_follow_the_project_url() {
        let client = client_with(None);
        assert_eq!(client.endpoint("token").unwrap(), "https://abc.supabase.co/auth/v1/token");
        assert_eq!(
            client.signup_endpoint().unwrap(),
            "https://abc.supabase.co/auth/v1/signup?redirect_to=https%3A%2F%2Faivisapro.com"
        );
        assert_eq!(client.storage_key, KEY);
    }

    #[test]
    fn unconfigured_client_refuses_requests() {
        let client = SupabaseAuth::new(SupabaseConfig::default(), Box::new(MemoryStorage::default()));
        let err = client.endpoint("user").unwrap_err();
        assert_eq!(err.message, "Authentication is not configured.");
    }

    #[test]
    fn live_session_is_returned() {
        let client = client_with(Some(session_json(2_000)));
        let session = client.stored_session(1_000).expect("session should be usable");
        assert_eq!(session.user.email, "a@b.com");
    }

    #[test]
    fn expired_session_counts_as_signed_out_and_is_removed() {
        let client = client_with(Some(session_json(500)));
        assert_eq!(client.stored_session(1_000), None);
        assert_eq!(client.storage.get(KEY), None);
    }

    #[test]
    fn corrupt_session_is_removed() {
        let client = client_with(Some("{not json".to_string()));
        assert_eq!(client.stored_session(1_000), None);
        assert_eq!(client.storage.get(KEY), None);
    }

    #[test]
    fn adopting_a_session_persists_and_announces_it() {
        let client = client_with(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let seen = Rc::clone(&seen);
            client.on_identity_changed(Rc::new(move |event: AuthChangeEvent, identity: Option<Identity>| {
                seen.borrow_mut().push((event, identity.map(|i| i.email)));
            }))
        };

        let session: Session = serde_json::from_str(&session_json(i64::MAX)).unwrap();
        let identity = client.adopt(session).unwrap();
        assert_eq!(identity.email, "a@b.com");
        assert!(client.storage.get(KEY).is_some());

        client.forget();
        assert_eq!(client.storage.get(KEY), None);
        assert_eq!(
            *seen.borrow(),
            vec![
                (AuthChangeEvent::SignedIn, Some("a@b.com".to_string())),
                (AuthChangeEvent::SignedOut, None),
            ]
        );
    }

    #[test]
    fn stored_values_from_other_tabs() {
        let (event, identity) = change_from_stored(Some(&session_json(0)));
        assert_eq!(event, AuthChangeEvent::SignedIn);
        assert_eq!(identity.map(|i| i.email), Some("a@b.com".to_string()));

        assert_eq!(change_from_stored(None), (AuthChangeEvent::SignedOut, None));
        assert_eq!(change_from_stored(Some("garbage")), (AuthChangeEvent::SignedOut, None));
    }
}
