use std::fmt;

use serde_json::Value;

use crate::api::{self, ApiClient, envelope};
use crate::errors::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Executive,
    Admin,
    Guest,
}

impl Role {
    /// Backend role labels vary in case ("Admin", "student"). Unknown labels are students.
    pub fn parse(label: &str) -> Role {
        match label.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "executive" => Role::Executive,
            "guest" | "" => Role::Guest,
            _ => Role::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Executive => "executive",
            Role::Admin => "admin",
            Role::Guest => "guest",
        }
    }

    pub fn stats_endpoint(&self) -> Option<&'static str> {
        match self {
            Role::Student => Some(api::STUDENT_STATS),
            Role::Executive => Some(api::EXECUTIVE_STATS),
            Role::Admin => Some(api::ADMIN_STATS),
            Role::Guest => None,
        }
    }

    /// Counter keys shown on this role's dashboard, in display order.
    pub fn stat_keys(&self) -> &'static [&'static str] {
        match self {
            Role::Student => &["registered_tutorials", "downloaded_resources", "feedback_submitted"],
            Role::Executive => &["my_posts", "my_resources", "my_tutorials", "total_registrations"],
            Role::Admin => &["total_users", "active_tutorials", "monthly_feedback", "total_downloads"],
            Role::Guest => &[],
        }
    }

    pub fn refresh_error_message(&self) -> &'static str {
        match self {
            Role::Student => "Error refreshing dashboard stats",
            Role::Executive => "Error refreshing executive stats",
            Role::Admin => "Error refreshing admin stats",
            Role::Guest => "Error refreshing stats",
        }
    }

    /// Landing page the backend redirects this role to after login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin-dashboard/",
            Role::Executive => "/executive-dashboard/",
            Role::Student | Role::Guest => "/student-dashboard/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCounter {
    pub key: &'static str,
    pub value: i64,
}

/// The complete set of counters for one role. Always holds every key of the role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub role: Role,
    pub counters: Vec<StatCounter>,
}

impl StatsSnapshot {
    pub fn zeroed(role: Role) -> Self {
        Self {
            role,
            counters: role
                .stat_keys()
                .iter()
                .map(|key| StatCounter { key: *key, value: 0 })
                .collect(),
        }
    }

    /// Map a stats response onto the role's counters. Missing or non-numeric fields read as 0.
    pub fn from_response(role: Role, response: &Value) -> Self {
        let fields = envelope::stats_object(response);
        let counters = role
            .stat_keys()
            .iter()
            .map(|key| {
                let value = fields.and_then(|f| f.get(*key)).and_then(count_value);
                if value.is_none() {
                    log::debug!("{role} stats: '{key}' missing, defaulting to 0");
                }
                StatCounter { key: *key, value: value.unwrap_or(0) }
            })
            .collect();
        Self { role, counters }
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.counters.iter().find(|c| c.key == key).map(|c| c.value)
    }

    pub fn values(&self) -> Vec<i64> {
        self.counters.iter().map(|c| c.value).collect()
    }
}

fn count_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Fetches the dashboard counters for a role.
#[derive(Clone)]
pub struct RoleStatsLoader {
    api: ApiClient,
}

impl RoleStatsLoader {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn load_stats(&self, role: Role) -> Result<StatsSnapshot> {
        let endpoint = role.stats_endpoint().ok_or(ClientError::NoDashboard(role))?;
        match self.api.get(endpoint).await {
            Ok(response) => Ok(StatsSnapshot::from_response(role, &response)),
            Err(e) => {
                log::error!("Error loading {role} stats: {e}");
                Err(e)
            }
        }
    }
}
