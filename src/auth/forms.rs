use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate;
use crate::api::{self, ApiClient, CallOptions};
use crate::errors::ClientError;
use crate::notify::NotificationService;
use crate::render::{RenderTarget, Slot};
use crate::stats::Role;

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterForm {
    /// Client-side checks, run before anything goes over the wire.
    pub fn validate(&self) -> Result<(), String> {
        let check = validate::validate_all_present(&[
            &self.username,
            &self.email,
            &self.password,
            &self.password_confirm,
        ])
        .or_else(|| validate::validate_new_password(&self.password, &self.password_confirm))
        .or_else(|| validate::validate_username(&self.username))
        .or_else(|| validate::validate_email(&self.email));
        match check {
            Some(msg) => Err(msg),
            None => Ok(()),
        }
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success { redirect_url: String },
    /// The server said no; `message` is what the user was shown.
    Rejected { message: String },
    /// Caught on the client; nothing was sent.
    Invalid { message: String },
}

#[derive(Clone, Copy)]
enum FormKind {
    Login,
    Register,
}

impl FormKind {
    fn path(self) -> &'static str {
        match self {
            FormKind::Login => api::LOGIN_SUBMIT,
            FormKind::Register => api::REGISTER_SUBMIT,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            FormKind::Login => "Login successful! Redirecting...",
            FormKind::Register => "Registration successful! Redirecting...",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            FormKind::Login => "Login failed",
            FormKind::Register => "Registration failed",
        }
    }

    fn transport_message(self) -> &'static str {
        match self {
            FormKind::Login => "An error occurred during login",
            FormKind::Register => "An error occurred during registration",
        }
    }
}

/// Submits the login and registration forms and reports the outcome to the user.
pub struct AuthForms {
    api: ApiClient,
    notifier: NotificationService,
    target: Arc<dyn RenderTarget>,
}

impl AuthForms {
    pub fn new(api: ApiClient, notifier: NotificationService, target: Arc<dyn RenderTarget>) -> Self {
        Self { api, notifier, target }
    }

    pub async fn login(&self, form: &LoginForm) -> AuthOutcome {
        let body = serde_json::json!({
            "username": form.username,
            "password": form.password,
        });
        self.submit(FormKind::Login, body).await
    }

    pub async fn register(&self, form: &RegisterForm) -> AuthOutcome {
        if let Err(message) = form.validate() {
            self.show_error(&message);
            return AuthOutcome::Invalid { message };
        }
        match serde_json::to_value(form) {
            Ok(body) => self.submit(FormKind::Register, body).await,
            Err(e) => {
                log::error!("Registration error: {e}");
                let message = FormKind::Register.transport_message().to_string();
                self.show_error(&message);
                AuthOutcome::Rejected { message }
            }
        }
    }

    async fn submit(&self, kind: FormKind, body: Value) -> AuthOutcome {
        let reply = match self.api.call_site(kind.path(), CallOptions::post(body)).await {
            Ok(value) => Ok(value),
            // The backend answers rejections with a JSON body and a 4xx status.
            Err(ClientError::Request { body: Some(value), .. }) => Ok(value),
            Err(e) => Err(e),
        };

        let outcome = match reply.map(serde_json::from_value::<SubmitResponse>) {
            Ok(Ok(r)) if r.success => AuthOutcome::Success {
                redirect_url: r
                    .redirect_url
                    .unwrap_or_else(|| Role::Student.dashboard_path().to_string()),
            },
            Ok(Ok(r)) => AuthOutcome::Rejected {
                message: r
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| kind.failure_message().to_string()),
            },
            Ok(Err(e)) => {
                log::error!("Unreadable {} response: {e}", kind.path());
                AuthOutcome::Rejected { message: kind.failure_message().to_string() }
            }
            Err(e) => {
                log::error!("{} error: {e}", kind.path());
                AuthOutcome::Rejected { message: kind.transport_message().to_string() }
            }
        };

        match &outcome {
            AuthOutcome::Success { .. } => self.notifier.success(kind.success_message()),
            AuthOutcome::Rejected { message } | AuthOutcome::Invalid { message } => {
                self.show_error(message)
            }
        }
        outcome
    }

    /// Inline error region if the view has one, otherwise a notification.
    fn show_error(&self, message: &str) {
        if self.target.has_slot(Slot::FormError) {
            self.target.show_error(Slot::FormError, message);
        } else {
            self.notifier.error(message);
        }
    }
}
