//! In-memory identity provider for unit tests.

use std::cell::RefCell;

use async_trait::async_trait;

use crate::auth::error::AuthError;
use crate::auth::provider::{
    AuthChangeEvent, Identity, IdentityListener, IdentityProvider, ListenerRegistry, SignUpOutcome,
    Subscription,
};

pub fn identity(email: &str) -> Identity {
    Identity {
        id: format!("id-{email}"),
        email: email.to_string(),
        email_confirmed_at: None,
        last_sign_in_at: None,
    }
}

#[derive(Default)]
pub struct MockProvider {
    listeners: ListenerRegistry,
    current: RefCell<Option<Result<Option<Identity>, AuthError>>>,
    sign_up_error: RefCell<Option<AuthError>>,
    sign_in_error: RefCell<Option<AuthError>>,
    sign_up_calls: RefCell<Vec<String>>,
    sign_in_calls: RefCell<Vec<String>>,
    sign_out_calls: RefCell<usize>,
}

impl MockProvider {
    pub fn with_current(current: Result<Option<Identity>, AuthError>) -> Self {
        let provider = Self::default();
        *provider.current.borrow_mut() = Some(current);
        provider
    }

    pub fn fail_next_sign_up(&self, err: AuthError) {
        *self.sign_up_error.borrow_mut() = Some(err);
    }

    pub fn fail_next_sign_in(&self, err: AuthError) {
        *self.sign_in_error.borrow_mut() = Some(err);
    }

    pub fn sign_up_calls(&self) -> Vec<String> {
        self.sign_up_calls.borrow().clone()
    }

    pub fn sign_in_calls(&self) -> Vec<String> {
        self.sign_in_calls.borrow().clone()
    }

    pub fn sign_out_calls(&self) -> usize {
        *self.sign_out_calls.borrow()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Push a change notification the way the hosted provider would.
    pub fn push(&self, event: AuthChangeEvent, identity: Option<Identity>) {
        self.listeners.emit(event, identity);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MockProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        self.current.borrow().clone().unwrap_or(Ok(None))
    }

    fn on_identity_changed(&self, callback: IdentityListener) -> Subscription {
        self.listeners.subscribe(callback)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        self.sign_up_calls.borrow_mut().push(email.to_string());
        match self.sign_up_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(SignUpOutcome::ConfirmationSent),
        }
    }

    async fn sign_in_with_password(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        self.sign_in_calls.borrow_mut().push(email.to_string());
        if let Some(err) = self.sign_in_error.borrow_mut().take() {
            return Err(err);
        }
        let signed_in = identity(email);
        self.listeners.emit(AuthChangeEvent::SignedIn, Some(signed_in.clone()));
        Ok(signed_in)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.sign_out_calls.borrow_mut() += 1;
        self.listeners.emit(AuthChangeEvent::SignedOut, None);
        Ok(())
    }
}
