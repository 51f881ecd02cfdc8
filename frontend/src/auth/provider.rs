//! The seam between the page and the hosted identity provider.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// A signed-in principal as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
}

/// What a successful sign-up produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// The provider sent a verification email; no session yet.
    ConfirmationSent,
    /// The project auto-confirms accounts and returned a live session.
    SignedIn(Identity),
}

pub type IdentityListener = Rc<dyn Fn(AuthChangeEvent, Option<Identity>)>;

#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn current_identity(&self) -> Result<Option<Identity>, AuthError>;

    /// Register `callback` for every identity change. The callback stays
    /// registered until the returned handle is dropped.
    fn on_identity_changed(&self, callback: IdentityListener) -> Subscription;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, IdentityListener)>,
}

/// Listener bookkeeping shared by provider implementations.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerRegistry {
    pub fn subscribe(&self, callback: IdentityListener) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, callback));
        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn emit(&self, event: AuthChangeEvent, identity: Option<Identity>) {
        // Snapshot first: a listener may drop its own subscription while running.
        let listeners: Vec<IdentityListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        log::debug!("Notifying {} listener(s) of {:?}", listeners.len(), event);
        for listener in listeners {
            listener(event, identity.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a registered identity listener. Dropping it unregisters the listener.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
