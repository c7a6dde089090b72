use async_trait::async_trait;

use super::{Dashboard, DashboardContext, init_stats};
use crate::api;
use crate::render::shapes::RECENT_ACTIVITY_VIEW;
use crate::stats::Role;

pub struct AdminDashboard {
    ctx: DashboardContext,
}

impl AdminDashboard {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub async fn load_recent_activity(&self) -> bool {
        self.ctx
            .refresh_list(api::ADMIN_ACTIVITY, &RECENT_ACTIVITY_VIEW)
            .await
    }
}

#[async_trait]
impl Dashboard for AdminDashboard {
    fn role(&self) -> Role {
        Role::Admin
    }

    async fn init(&self) {
        init_stats(&self.ctx, Role::Admin).await;
        self.load_recent_activity().await;
    }
}
