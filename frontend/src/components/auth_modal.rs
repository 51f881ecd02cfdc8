use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::auth::flow::{
    perform_submission, AuthFlow, AuthMode, FlowAction, Phase, SubmissionStatus, SubmitRequest,
    SubmitTicket,
};
use crate::auth::validation::MIN_PASSWORD_LEN;
use crate::components::button::{Button, ButtonSize};
use crate::components::input::Input;
use crate::components::session::use_session;

#[derive(Properties, PartialEq)]
pub struct AuthModalProps {
    pub flow: UseReducerHandle<AuthFlow>,
    /// Pause between a successful login and the page reload.
    pub reload_delay_ms: u32,
}

#[function_component(AuthModal)]
pub fn auth_modal(props: &AuthModalProps) -> Html {
    let flow = props.flow.clone();
    let session = use_session();
    let is_mounted = use_is_mounted();

    // Start the provider call for each new submission.
    {
        let dispatcher = flow.dispatcher();
        let auth = session.as_ref().map(|s| s.auth.clone());
        let is_mounted = is_mounted.clone();
        use_effect_with_deps(
            move |pending: &Option<SubmitRequest>| {
                if let Some(request) = pending.clone() {
                    match auth {
                        Some(auth) => spawn_local(async move {
                            let result = perform_submission(auth.provider(), &request).await;
                            if let Err(err) = &result {
                                log::warn!("Auth request failed ({:?}): {}", err.kind, err);
                            }
                            if is_mounted() {
                                dispatcher.dispatch(FlowAction::Complete {
                                    ticket: request.ticket,
                                    result,
                                });
                            }
                        }),
                        None => log::error!("AuthModal rendered outside of a SessionProvider"),
                    }
                }
                || ()
            },
            flow.pending_request(),
        );
    }

    // After a successful login, close and reload so the page picks up the new session.
    {
        let dispatcher = flow.dispatcher();
        let delay = props.reload_delay_ms;
        use_effect_with_deps(
            move |ticket: &Option<SubmitTicket>| {
                if let Some(ticket) = *ticket {
                    spawn_local(async move {
                        TimeoutFuture::new(delay).await;
                        if is_mounted() {
                            dispatcher.dispatch(FlowAction::FinishLogin(ticket));
                        }
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    });
                }
                || ()
            },
            flow.logged_in_ticket(),
        );
    }

    let Some(modal) = flow.modal() else {
        return html! {};
    };
    let phase = flow.phase();
    let editable = matches!(phase, Phase::Open(_));
    let submitting = matches!(phase, Phase::Submitting(_));

    let (title, subtitle, submit_label, toggle_label) = match modal.mode {
        AuthMode::Login => (
            "Welcome Back",
            "Sign in to continue your application",
            "Sign In",
            "Don't have an account? Sign up",
        ),
        AuthMode::Signup => (
            "Create Account",
            "Start your visa journey today",
            "Create Account",
            "Already have an account? Sign in",
        ),
    };

    let on_close = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(FlowAction::Close))
    };
    let on_toggle = {
        let flow = flow.clone();
        Callback::from(move |_: MouseEvent| flow.dispatch(FlowAction::ToggleMode))
    };
    let on_email = {
        let flow = flow.clone();
        Callback::from(move |email: String| flow.dispatch(FlowAction::EditEmail(email)))
    };
    let on_password = {
        let flow = flow.clone();
        Callback::from(move |password: String| flow.dispatch(FlowAction::EditPassword(password)))
    };
    let onsubmit = {
        let flow = flow.clone();
        let email = modal.form.email.clone();
        let password = modal.form.password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            flow.dispatch(FlowAction::Submit {
                email: email.clone(),
                password: password.clone(),
            });
        })
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="modal-header">
                    <div>
                        <h2>{ title }</h2>
                        <p>{ subtitle }</p>
                    </div>
                    <button class="modal-close" onclick={on_close} aria-label="Close">
                        {"✕"}
                    </button>
                </div>
                {
                    match &modal.status {
                        SubmissionStatus::Failed(failure) => html! {
                            <div class="notice notice-error">{ failure.to_string() }</div>
                        },
                        SubmissionStatus::Succeeded(message) => html! {
                            <div class="notice notice-success">{ *message }</div>
                        },
                        _ => html! {},
                    }
                }
                <form class="modal-form" {onsubmit}>
                    <Input
                        label="Email Address"
                        input_type="email"
                        value={modal.form.email.clone()}
                        placeholder="you@company.com"
                        required={true}
                        disabled={!editable}
                        oninput={on_email}
                    />
                    <Input
                        label="Password"
                        input_type="password"
                        value={modal.form.password.clone()}
                        placeholder="Enter your password"
                        required={true}
                        min_length={Some(MIN_PASSWORD_LEN as u32)}
                        disabled={!editable}
                        oninput={on_password}
                    />
                    <Button button_type="submit" size={ButtonSize::Lg} class="btn-block" disabled={!editable}>
                        { if submitting { "Processing..." } else { submit_label } }
                    </Button>
                </form>
                <div class="modal-footer">
                    <button class="link-button" onclick={on_toggle} disabled={submitting}>
                        { toggle_label }
                    </button>
                </div>
            </div>
        </div>
    }
}
