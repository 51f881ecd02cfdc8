//! Page-wide mirror of the provider's current identity.
//!
//! The observer is attached once per page view. It takes the provider's
//! answer to an initial "who is signed in" request and then follows change
//! notifications until it is detached.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::auth::provider::{AuthChangeEvent, Identity, IdentityProvider, Subscription};

struct Observed {
    identity: RefCell<Option<Identity>>,
    notified: Cell<bool>,
    detached: Cell<bool>,
    on_change: Box<dyn Fn(Option<Identity>)>,
}

impl Observed {
    fn publish(&self, identity: Option<Identity>) {
        *self.identity.borrow_mut() = identity.clone();
        (self.on_change)(identity);
    }

    fn apply_initial(&self, identity: Option<Identity>) {
        // A notification that already arrived is newer than this answer.
        if self.detached.get() || self.notified.get() {
            log::debug!("Discarding initial identity; a newer value is already known");
            return;
        }
        self.publish(identity);
    }

    fn apply_change(&self, identity: Option<Identity>) {
        if self.detached.get() {
            return;
        }
        self.notified.set(true);
        self.publish(identity);
    }
}

pub struct SessionObserver {
    observed: Rc<Observed>,
    subscription: RefCell<Option<Subscription>>,
}

impl SessionObserver {
    /// Register for identity changes. `on_change` receives every value the
    /// observer adopts, starting with the initial fetch.
    pub fn attach(provider: &dyn IdentityProvider, on_change: impl Fn(Option<Identity>) + 'static) -> Self {
        let observed = Rc::new(Observed {
            identity: RefCell::new(None),
            notified: Cell::new(false),
            detached: Cell::new(false),
            on_change: Box::new(on_change),
        });
        let subscription = {
            let observed = Rc::clone(&observed);
            provider.on_identity_changed(Rc::new(move |event: AuthChangeEvent, identity: Option<Identity>| {
                log::info!("Identity changed: {:?}", event);
                observed.apply_change(identity);
            }))
        };
        Self {
            observed,
            subscription: RefCell::new(Some(subscription)),
        }
    }

    /// Ask the provider who is signed in. A failure counts as signed out and
    /// is not retried.
    pub async fn load_initial(&self, provider: &dyn IdentityProvider) {
        let identity = match provider.current_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                log::warn!("Could not load the current identity, treating as signed out: {}", err);
                None
            }
        };
        self.observed.apply_initial(identity);
    }

    pub fn identity(&self) -> Option<Identity> {
        self.observed.identity.borrow().clone()
    }

    /// Stop following the provider. Late results are ignored from here on.
    pub fn detach(&self) {
        self.observed.detached.set(true);
        self.subscription.borrow_mut().take();
    }
}

impl Drop for SessionObserver {
    fn drop(&mut self) {
        self.detach();
    }
}
