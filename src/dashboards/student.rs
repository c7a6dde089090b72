use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Dashboard, DashboardContext, init_stats};
use crate::api;
use crate::errors::Result;
use crate::render::shapes::{POSTS_VIEW, TUTORIALS_VIEW};
use crate::stats::Role;

pub struct StudentDashboard {
    ctx: DashboardContext,
}

impl StudentDashboard {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub async fn load_tutorials(&self) -> bool {
        self.ctx.refresh_list(api::TUTORIALS, &TUTORIALS_VIEW).await
    }

    pub async fn load_posts(&self) -> bool {
        self.ctx.refresh_list(api::POSTS, &POSTS_VIEW).await
    }

    /// Register for a tutorial, then refresh the counters.
    pub async fn register_for_tutorial(&self, tutorial_id: &str) -> Result<()> {
        let body = json!({ "tutorial": id_value(tutorial_id) });
        match self.ctx.api.post(api::TUTORIAL_REGISTRATIONS, body).await {
            Ok(_) => {
                self.ctx.notifier.success("Successfully registered for tutorial!");
                self.ctx.refresh_stats(Role::Student).await;
                Ok(())
            }
            Err(e) => {
                log::error!("Error registering for tutorial {tutorial_id}: {e}");
                self.ctx.notifier.error("Failed to register for tutorial");
                Err(e)
            }
        }
    }
}

/// Numeric ids go over the wire as numbers, anything else as a string.
pub(crate) fn id_value(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

#[async_trait]
impl Dashboard for StudentDashboard {
    fn role(&self) -> Role {
        Role::Student
    }

    async fn init(&self) {
        init_stats(&self.ctx, Role::Student).await;
        self.load_tutorials().await;
        self.load_posts().await;
    }
}
