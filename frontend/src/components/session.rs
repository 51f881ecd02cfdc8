//! Makes the observed session available to every component on the page.

use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::auth::provider::{Identity, IdentityProvider};
use crate::auth::session::SessionObserver;

/// Shared handle to the identity provider. Two handles are equal when they
/// point at the same provider.
#[derive(Clone)]
pub struct AuthHandle(Rc<dyn IdentityProvider>);

impl AuthHandle {
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self(provider)
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.0.as_ref()
    }
}

impl PartialEq for AuthHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub identity: Option<Identity>,
    pub auth: AuthHandle,
}

#[hook]
pub fn use_session() -> Option<SessionContext> {
    use_context::<SessionContext>()
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub auth: AuthHandle,
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let identity = use_state(|| None::<Identity>);

    {
        let identity = identity.clone();
        use_effect_with_deps(
            move |auth: &AuthHandle| {
                let observer = Rc::new(SessionObserver::attach(auth.provider(), move |value| {
                    identity.set(value)
                }));
                {
                    let observer = Rc::clone(&observer);
                    let auth = auth.clone();
                    spawn_local(async move {
                        observer.load_initial(auth.provider()).await;
                    });
                }
                move || observer.detach()
            },
            props.auth.clone(),
        );
    }

    let context = SessionContext {
        identity: (*identity).clone(),
        auth: props.auth.clone(),
    };

    html! {
        <ContextProvider<SessionContext> {context}>
            { for props.children.iter() }
        </ContextProvider<SessionContext>>
    }
}
