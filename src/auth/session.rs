use serde::Deserialize;
use serde_json::Value;

use crate::api::{self, ApiClient};
use crate::errors::Result;
use crate::stats::Role;

pub const LOGIN_PAGE: &str = "/login/";

/// The authenticated identity, as reported by `/auth/me/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
    pub role: Role,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    is_staff: bool,
}

impl Session {
    pub fn from_me(value: Value) -> Option<Session> {
        let me: MeResponse = match serde_json::from_value(value) {
            Ok(me) => me,
            Err(e) => {
                log::warn!("Unreadable /auth/me/ payload: {e}");
                return None;
            }
        };
        let role = match (me.is_staff, me.role.as_deref()) {
            (true, _) => Role::Admin,
            (false, Some(label)) if !label.trim().is_empty() => Role::parse(label),
            (false, _) => Role::Student,
        };
        Some(Session { username: me.username, role })
    }

    pub fn role_of(session: Option<&Session>) -> Role {
        session.map(|s| s.role).unwrap_or(Role::Guest)
    }
}

/// Ask the backend who we are. Any failure means "not authenticated".
pub async fn load_session(api: &ApiClient) -> Option<Session> {
    match api.get(api::AUTH_ME).await {
        Ok(me) => Session::from_me(me),
        Err(e) => {
            log::info!("User not authenticated ({e})");
            None
        }
    }
}

/// End the session. Returns the page to go to afterwards.
pub async fn logout(api: &ApiClient) -> Result<&'static str> {
    let options = api::CallOptions {
        method: reqwest::Method::POST,
        ..Default::default()
    };
    api.call(api::AUTH_LOGOUT, options)
        .await
        .inspect_err(|e| log::error!("Logout error: {e}"))?;
    Ok(LOGIN_PAGE)
}
