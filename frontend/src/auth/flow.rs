//! State of the login/signup modal and its single submission cycle.
//!
//! Every submission carries a ticket. Completions that come back for a form
//! that has since been closed or reopened are dropped.

use std::fmt;
use std::rc::Rc;

use yew::Reducible;

use crate::auth::error::{AuthError, FlowError, ValidationError};
use crate::auth::provider::IdentityProvider;
use crate::auth::validation::validate_credentials;

pub const SIGNUP_SENT_MESSAGE: &str = "Verification email sent. Please check your inbox.";
pub const LOGIN_SUCCESS_MESSAGE: &str = "Successfully authenticated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub email: String,
    pub password: String,
}

/// Why the last submission did not go through.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    Validation(ValidationError),
    Provider(AuthError),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Validation(err) => write!(f, "{err}"),
            Failure::Provider(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStatus {
    Idle,
    InProgress,
    Succeeded(&'static str),
    Failed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct OpenModal {
    pub mode: AuthMode,
    pub form: CredentialForm,
    pub status: SubmissionStatus,
    ticket: SubmitTicket,
}

impl OpenModal {
    pub fn ticket(&self) -> SubmitTicket {
        self.ticket
    }
}

/// Coarse view of the controller, one variant per state of the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open(AuthMode),
    Submitting(AuthMode),
    SignupSent,
    LoggedIn,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Closed => "closed",
            Phase::Open(_) => "open",
            Phase::Submitting(_) => "submitting",
            Phase::SignupSent => "showing the signup confirmation",
            Phase::LoggedIn => "logged in",
        }
    }
}

/// The provider call a submission needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub ticket: SubmitTicket,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRejected {
    Flow(FlowError),
    Invalid(ValidationError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthFlow {
    modal: Option<OpenModal>,
    next_ticket: u64,
}

impl AuthFlow {
    pub fn modal(&self) -> Option<&OpenModal> {
        self.modal.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn phase(&self) -> Phase {
        match &self.modal {
            None => Phase::Closed,
            Some(modal) => match (&modal.status, modal.mode) {
                (SubmissionStatus::InProgress, mode) => Phase::Submitting(mode),
                (SubmissionStatus::Succeeded(_), AuthMode::Signup) => Phase::SignupSent,
                (SubmissionStatus::Succeeded(_), AuthMode::Login) => Phase::LoggedIn,
                (_, mode) => Phase::Open(mode),
            },
        }
    }

    fn issue_ticket(&mut self) -> SubmitTicket {
        self.next_ticket += 1;
        SubmitTicket(self.next_ticket)
    }

    fn reject(&self, operation: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            operation,
            state: self.phase().name(),
        }
    }

    /// Open the modal in `mode` with an empty form. Any previous form is discarded.
    pub fn open(&mut self, mode: AuthMode) {
        let ticket = self.issue_ticket();
        self.modal = Some(OpenModal {
            mode,
            form: CredentialForm::default(),
            status: SubmissionStatus::Idle,
            ticket,
        });
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    /// Flip login/signup. Typed credentials are kept; any message is cleared.
    pub fn toggle_mode(&mut self) -> Result<(), FlowError> {
        match self.phase() {
            Phase::Closed | Phase::Submitting(_) => Err(self.reject("toggle mode")),
            _ => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.mode = modal.mode.toggled();
                    modal.status = SubmissionStatus::Idle;
                }
                Ok(())
            }
        }
    }

    fn editable_form(&mut self, operation: &'static str) -> Result<&mut CredentialForm, FlowError> {
        let refused = self.reject(operation);
        match (self.phase(), self.modal.as_mut()) {
            (Phase::Open(_), Some(modal)) => Ok(&mut modal.form),
            _ => Err(refused),
        }
    }

    pub fn set_email(&mut self, email: String) -> Result<(), FlowError> {
        self.editable_form("edit the email")?.email = email;
        Ok(())
    }

    pub fn set_password(&mut self, password: String) -> Result<(), FlowError> {
        self.editable_form("edit the password")?.password = password;
        Ok(())
    }

    /// Validate and start a submission. On a validation failure the modal stays
    /// open with the error shown and no provider call is made.
    pub fn submit(&mut self, email: String, password: String) -> Result<SubmitRequest, SubmitRejected> {
        let refused = self.reject("submit");
        if !matches!(self.phase(), Phase::Open(_)) {
            return Err(SubmitRejected::Flow(refused));
        }
        let ticket = self.issue_ticket();
        let Some(modal) = self.modal.as_mut() else {
            return Err(SubmitRejected::Flow(refused));
        };
        modal.form = CredentialForm { email, password };

        if let Err(invalid) = validate_credentials(&modal.form.email, &modal.form.password) {
            modal.status = SubmissionStatus::Failed(Failure::Validation(invalid));
            return Err(SubmitRejected::Invalid(invalid));
        }

        modal.status = SubmissionStatus::InProgress;
        modal.ticket = ticket;
        Ok(SubmitRequest {
            ticket,
            mode: modal.mode,
            email: modal.form.email.trim().to_string(),
            password: modal.form.password.clone(),
        })
    }

    /// The submission currently waiting on the provider, if any.
    pub fn pending_request(&self) -> Option<SubmitRequest> {
        let modal = self.modal.as_ref()?;
        (modal.status == SubmissionStatus::InProgress).then(|| SubmitRequest {
            ticket: modal.ticket,
            mode: modal.mode,
            email: modal.form.email.trim().to_string(),
            password: modal.form.password.clone(),
        })
    }

    /// Ticket of a login that succeeded and is waiting for its close-and-reload.
    pub fn logged_in_ticket(&self) -> Option<SubmitTicket> {
        match self.phase() {
            Phase::LoggedIn => self.modal.as_ref().map(OpenModal::ticket),
            _ => None,
        }
    }

    /// Apply a provider result. Returns `false` when the result belongs to a
    /// form that is no longer live and was dropped.
    pub fn complete(&mut self, ticket: SubmitTicket, result: Result<(), AuthError>) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        if modal.ticket != ticket || modal.status != SubmissionStatus::InProgress {
            return false;
        }
        modal.status = match result {
            Ok(()) => SubmissionStatus::Succeeded(match modal.mode {
                AuthMode::Signup => SIGNUP_SENT_MESSAGE,
                AuthMode::Login => LOGIN_SUCCESS_MESSAGE,
            }),
            Err(err) => SubmissionStatus::Failed(Failure::Provider(err)),
        };
        true
    }

    /// Close the modal after a successful login, unless it was already
    /// closed or reopened in the meantime.
    pub fn finish_login(&mut self, ticket: SubmitTicket) -> bool {
        match &self.modal {
            Some(modal) if modal.ticket == ticket => {
                self.modal = None;
                true
            }
            _ => false,
        }
    }
}

/// Run the provider call for `request`.
pub async fn perform_submission(
    provider: &dyn IdentityProvider,
    request: &SubmitRequest,
) -> Result<(), AuthError> {
    match request.mode {
        AuthMode::Signup => {
            log::info!("Signing up {}", request.email);
            provider.sign_up(&request.email, &request.password).await.map(|_| ())
        }
        AuthMode::Login => {
            log::info!("Signing in {}", request.email);
            provider
                .sign_in_with_password(&request.email, &request.password)
                .await
                .map(|_| ())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    Open(AuthMode),
    Close,
    ToggleMode,
    EditEmail(String),
    EditPassword(String),
    Submit { email: String, password: String },
    Complete { ticket: SubmitTicket, result: Result<(), AuthError> },
    FinishLogin(SubmitTicket),
}

impl Reducible for AuthFlow {
    type Action = FlowAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let outcome = match action {
            FlowAction::Open(mode) => {
                next.open(mode);
                Ok(())
            }
            FlowAction::Close => {
                next.close();
                Ok(())
            }
            FlowAction::ToggleMode => next.toggle_mode(),
            FlowAction::EditEmail(email) => next.set_email(email),
            FlowAction::EditPassword(password) => next.set_password(password),
            FlowAction::Submit { email, password } => match next.submit(email, password) {
                Ok(_) | Err(SubmitRejected::Invalid(_)) => Ok(()),
                Err(SubmitRejected::Flow(err)) => Err(err),
            },
            FlowAction::Complete { ticket, result } => {
                if !next.complete(ticket, result) {
                    log::debug!("Dropping result of a submission whose form is gone");
                    return self;
                }
                Ok(())
            }
            FlowAction::FinishLogin(ticket) => {
                if !next.finish_login(ticket) {
                    return self;
                }
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Rc::new(next),
            Err(err) => {
                log::warn!("Ignoring auth modal action: {}", err);
                self
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::AuthErrorKind;
    use crate::auth::testing::MockProvider;
    use futures::executor::block_on;

    fn submitted(flow: &mut AuthFlow, email: &str, password: &str) -> SubmitRequest {
        flow.submit(email.to_string(), password.to_string())
            .expect("submission should start")
    }

    #[test]
    fn signup_success_shows_verification_and_stays_open() {
        let provider = MockProvider::default();
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Signup);

        let request = submitted(&mut flow, "a@b.com", "abcdef");
        assert_eq!(flow.phase(), Phase::Submitting(AuthMode::Signup));

        let result = block_on(perform_submission(&provider, &request));
        assert!(flow.complete(request.ticket, result));

        assert_eq!(flow.phase(), Phase::SignupSent);
        assert!(flow.is_open());
        let modal = flow.modal().unwrap();
        assert_eq!(modal.status, SubmissionStatus::Succeeded(SIGNUP_SENT_MESSAGE));
        assert_eq!(SIGNUP_SENT_MESSAGE, "Verification email sent. Please check your inbox.");
        assert_eq!(provider.sign_up_calls(), vec!["a@b.com".to_string()]);
        assert!(provider.sign_in_calls().is_empty());
        assert_eq!(flow.logged_in_ticket(), None);
    }

    #[test]
    fn login_success_then_finish_closes_the_modal() {
        let provider = MockProvider::default();
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);

        let request = submitted(&mut flow, "a@b.com", "abcdef");
        let result = block_on(perform_submission(&provider, &request));
        assert!(flow.complete(request.ticket, result));

        assert_eq!(flow.phase(), Phase::LoggedIn);
        assert_eq!(
            flow.modal().unwrap().status,
            SubmissionStatus::Succeeded(LOGIN_SUCCESS_MESSAGE)
        );
        let ticket = flow.logged_in_ticket().expect("login should wait for its reload");
        assert_eq!(ticket, request.ticket);

        assert!(flow.finish_login(ticket));
        assert_eq!(flow.phase(), Phase::Closed);
        assert_eq!(provider.sign_in_calls(), vec!["a@b.com".to_string()]);
    }

    #[test]
    fn provider_error_returns_to_open_with_inputs_preserved() {
        let provider = MockProvider::default();
        provider.fail_next_sign_in(AuthError::new(
            AuthErrorKind::InvalidCredentials,
            "Invalid login credentials",
        ));
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);

        let request = submitted(&mut flow, "a@b.com", "wrongpass");
        let result = block_on(perform_submission(&provider, &request));
        assert!(flow.complete(request.ticket, result));

        assert_eq!(flow.phase(), Phase::Open(AuthMode::Login));
        let modal = flow.modal().unwrap();
        assert_eq!(modal.form.email, "a@b.com");
        assert_eq!(modal.form.password, "wrongpass");
        match &modal.status {
            SubmissionStatus::Failed(failure @ Failure::Provider(err)) => {
                assert_eq!(err.kind, AuthErrorKind::InvalidCredentials);
                assert_eq!(failure.to_string(), "Invalid login credentials");
            }
            other => panic!("unexpected status {other:?}"),
        }

        // the form can be submitted again by hand
        assert!(flow.submit("a@b.com".into(), "rightpass".into()).is_ok());
    }

    #[test]
    fn duplicate_signup_is_reported_with_its_kind() {
        let provider = MockProvider::default();
        provider.fail_next_sign_up(AuthError::new(
            AuthErrorKind::DuplicateAccount,
            "User already registered",
        ));
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Signup);
        let request = submitted(&mut flow, "taken@b.com", "abcdef");
        let result = block_on(perform_submission(&provider, &request));
        flow.complete(request.ticket, result);

        assert!(matches!(
            &flow.modal().unwrap().status,
            SubmissionStatus::Failed(Failure::Provider(AuthError { kind: AuthErrorKind::DuplicateAccount, .. }))
        ));
    }

    #[test]
    fn short_password_is_rejected_before_the_provider() {
        let provider = MockProvider::default();
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);

        let rejected = flow.submit("a@b.com".into(), "short".into());
        assert_eq!(
            rejected,
            Err(SubmitRejected::Invalid(ValidationError::PasswordTooShort { min: 6 }))
        );
        assert_eq!(flow.phase(), Phase::Open(AuthMode::Login));
        assert_eq!(flow.pending_request(), None);
        assert_eq!(flow.modal().unwrap().form.password, "short");
        assert_eq!(
            flow.modal().unwrap().status.clone(),
            SubmissionStatus::Failed(Failure::Validation(ValidationError::PasswordTooShort { min: 6 }))
        );
        assert!(provider.sign_in_calls().is_empty());
    }

    #[test]
    fn toggle_clears_messages_and_keeps_credentials() {
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);
        flow.set_email("a@b.com".into()).unwrap();
        flow.set_password("abc".into()).unwrap();
        let _ = flow.submit("a@b.com".into(), "abc".into());
        assert!(matches!(flow.modal().unwrap().status, SubmissionStatus::Failed(_)));

        flow.toggle_mode().unwrap();
        let modal = flow.modal().unwrap();
        assert_eq!(modal.mode, AuthMode::Signup);
        assert_eq!(modal.status, SubmissionStatus::Idle);
        assert_eq!(modal.form.email, "a@b.com");
        assert_eq!(modal.form.password, "abc");
    }

    #[test]
    fn toggle_after_signup_sent_moves_to_login() {
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Signup);
        let request = submitted(&mut flow, "a@b.com", "abcdef");
        flow.complete(request.ticket, Ok(()));
        assert_eq!(flow.phase(), Phase::SignupSent);

        flow.toggle_mode().unwrap();
        assert_eq!(flow.phase(), Phase::Open(AuthMode::Login));
    }

    #[test]
    fn toggle_and_submit_are_refused_while_submitting() {
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Signup);
        submitted(&mut flow, "a@b.com", "abcdef");

        assert!(flow.toggle_mode().is_err());
        assert!(matches!(
            flow.submit("a@b.com".into(), "abcdef".into()),
            Err(SubmitRejected::Flow(_))
        ));
        assert!(flow.set_email("other@b.com".into()).is_err());
        assert_eq!(flow.phase(), Phase::Submitting(AuthMode::Signup));
    }

    #[test]
    fn operations_on_a_closed_modal_are_refused() {
        let mut flow = AuthFlow::default();
        assert!(flow.toggle_mode().is_err());
        assert!(flow.set_email("a@b.com".into()).is_err());
        let err = flow.submit("a@b.com".into(), "abcdef".into()).unwrap_err();
        assert_eq!(
            err,
            SubmitRejected::Flow(FlowError::InvalidTransition {
                operation: "submit",
                state: "closed"
            })
        );
    }

    #[test]
    fn reopening_always_starts_with_empty_fields() {
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);
        flow.set_email("a@b.com".into()).unwrap();
        flow.set_password("abcdef".into()).unwrap();
        flow.close();
        flow.open(AuthMode::Login);
        assert_eq!(flow.modal().unwrap().form, CredentialForm::default());

        // also after a failed attempt
        let request = submitted(&mut flow, "a@b.com", "abcdef");
        flow.complete(request.ticket, Err(AuthError::network("Failed to fetch")));
        flow.close();
        flow.open(AuthMode::Signup);
        let modal = flow.modal().unwrap();
        assert_eq!(modal.form, CredentialForm::default());
        assert_eq!(modal.status, SubmissionStatus::Idle);
    }

    #[test]
    fn result_for_a_closed_modal_is_discarded() {
        let mut flow = AuthFlow::default();
        flow.open(AuthMode::Login);
        let request = submitted(&mut flow, "a@b.com", "abcdef");
        flow.close();

        assert!(!flow.complete(request.ticket, Ok(())));
        assert_eq!(flow.phase(), Phase::Closed);

        // a fresh modal is not touched by the old completion either
        flow.open(AuthMode::Login);
        assert!(!flow.complete(request.ticket, Ok(())));
        assert!(!flow.finish_login(request.ticket));
        assert_eq!(flow.phase(), Phase::Open(AuthMode::Login));
    }

    #[test]
    fn reducer_ignores_invalid_actions() {
        let flow = Rc::new(AuthFlow::default());
        let same = Rc::clone(&flow).reduce(FlowAction::ToggleMode);
        assert!(Rc::ptr_eq(&flow, &same));

        let opened = flow.reduce(FlowAction::Open(AuthMode::Signup));
        let submitting = opened.reduce(FlowAction::Submit {
            email: "a@b.com".into(),
            password: "abcdef".into(),
        });
        let request = submitting.pending_request().expect("request should be pending");
        assert_eq!(request.mode, AuthMode::Signup);

        let done = submitting.reduce(FlowAction::Complete {
            ticket: request.ticket,
            result: Ok(()),
        });
        assert_eq!(done.phase(), Phase::SignupSent);
        assert_eq!(done.pending_request(), None);
    }
}
