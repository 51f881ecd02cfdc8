use std::rc::Rc;

use log::{error, info, Level};
use web_sys::window;
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod auth {
    pub mod error;
    pub mod flow;
    pub mod provider;
    pub mod session;
    pub mod validation;
    #[cfg(test)]
    pub mod testing;
}
mod supabase {
    pub mod client;
    pub mod storage;
    pub mod types;
}
mod components {
    pub mod auth_modal;
    pub mod button;
    pub mod card;
    pub mod input;
    pub mod session;
}
mod pages {
    pub mod landing;
}

use components::session::{AuthHandle, SessionProvider};
use config::AppConfig;
use pages::landing::Landing;
use supabase::client::SupabaseAuth;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Landing /> }
        }
        Route::NotFound => {
            info!("Unknown route, redirecting home");
            html! { <Redirect<Route> to={Route::Home} /> }
        }
    }
}

fn load_config() -> AppConfig {
    let mut config = AppConfig::from_build_env().unwrap_or_else(|err| {
        error!("Configuration error, sign-in is disabled: {}", err);
        AppConfig::default()
    });
    config.supabase.email_redirect_to = window().and_then(|w| w.location().origin().ok());
    config
}

#[function_component]
fn App() -> Html {
    let config = use_state(load_config);
    let auth = {
        let supabase = config.supabase.clone();
        use_state(move || Rc::new(SupabaseAuth::in_browser(supabase)))
    };

    // Follow sign-ins and sign-outs made in other tabs
    {
        let auth = (*auth).clone();
        use_effect_with_deps(
            move |_| {
                let tab_sync = auth.watch_other_tabs();
                move || drop(tab_sync)
            },
            (),
        );
    }

    let handle = AuthHandle::new((*auth).clone());

    html! {
        <ContextProvider<AppConfig> context={(*config).clone()}>
            <SessionProvider auth={handle}>
                <BrowserRouter>
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            </SessionProvider>
        </ContextProvider<AppConfig>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };
    if let Err(err) = console_log::init_with_level(level) {
        web_sys::console::error_1(&format!("error initializing log: {}", err).into());
    }

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
