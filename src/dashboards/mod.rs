//! Per-role dashboard controllers.

pub mod admin;
pub mod executive;
pub mod student;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{self, ApiClient};
use crate::notify::NotificationService;
use crate::render::{ListView, RenderTarget, RenderedList};
use crate::stats::{Role, RoleStatsLoader, StatsSnapshot};

pub use admin::AdminDashboard;
pub use executive::ExecutiveDashboard;
pub use student::StudentDashboard;

/// Shared collaborators handed to every dashboard.
#[derive(Clone)]
pub struct DashboardContext {
    pub api: ApiClient,
    pub notifier: NotificationService,
    pub target: Arc<dyn RenderTarget>,
}

impl DashboardContext {
    pub fn new(api: ApiClient, notifier: NotificationService, target: Arc<dyn RenderTarget>) -> Self {
        Self { api, notifier, target }
    }

    pub fn stats_loader(&self) -> RoleStatsLoader {
        RoleStatsLoader::new(self.api.clone())
    }

    /// Load and render counters. Failures leave whatever is on screen.
    pub async fn refresh_stats(&self, role: Role) -> Option<StatsSnapshot> {
        match self.stats_loader().load_stats(role).await {
            Ok(snapshot) => {
                self.target.render_stats(&snapshot);
                Some(snapshot)
            }
            Err(_) => None,
        }
    }

    /// Fetch a list endpoint and render it into the view's slot.
    ///
    /// On failure, views that replace their region on error show the error text there when the
    /// target has the slot. Every other failure leaves prior rows and raises a notification.
    pub async fn refresh_list(&self, endpoint: &str, view: &ListView) -> bool {
        match self.api.get(endpoint).await {
            Ok(response) => {
                let records = api::records_from(response);
                self.target
                    .render_list(view.slot, RenderedList::from_records(&records, view));
                true
            }
            Err(e) => {
                log::error!("Error loading {endpoint}: {e}");
                if view.replace_on_error && self.target.has_slot(view.slot) {
                    self.target.show_error(view.slot, view.load_error);
                } else {
                    self.notifier.error(view.load_error);
                }
                false
            }
        }
    }
}

#[async_trait]
pub trait Dashboard: Send + Sync {
    fn role(&self) -> Role;

    /// Initial page load: counters first, then every list.
    async fn init(&self);
}

/// Initial counter load: a failure shows zeros rather than nothing.
pub(crate) async fn init_stats(ctx: &DashboardContext, role: Role) {
    if ctx.refresh_stats(role).await.is_none() {
        ctx.target.render_stats(&StatsSnapshot::zeroed(role));
    }
}
