use std::sync::Arc;

use crate::api::{ApiClient, HttpTransport};
use crate::auth::{self, AuthForms, Session};
use crate::config::Config;
use crate::dashboards::{
    AdminDashboard, Dashboard, DashboardContext, ExecutiveDashboard, StudentDashboard,
};
use crate::errors::Result;
use crate::notify::{NotificationRegion, NotificationService};
use crate::polling::PollingController;
use crate::render::RenderTarget;
use crate::stats::{Role, RoleStatsLoader};

/// Application root. Builds the API client and notification service once and
/// hands them to every view controller.
#[derive(Clone)]
pub struct Portal {
    config: Config,
    ctx: DashboardContext,
}

impl Portal {
    pub fn new(
        config: Config,
        api: ApiClient,
        notifier: NotificationService,
        target: Arc<dyn RenderTarget>,
    ) -> Self {
        Self {
            config,
            ctx: DashboardContext::new(api, notifier, target),
        }
    }

    /// Wire up the real HTTP transport from config.
    pub fn connect(
        config: Config,
        region: NotificationRegion,
        target: Arc<dyn RenderTarget>,
    ) -> Result<(Self, HttpTransport)> {
        let transport = HttpTransport::new(&config.site_url, config.request_timeout)?;
        let api = ApiClient::from_config(Arc::new(transport.clone()), &config);
        let notifier = NotificationService::new(Some(region), config.notification_duration);
        Ok((Self::new(config, api, notifier, target), transport))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.ctx.api
    }

    pub fn notifier(&self) -> &NotificationService {
        &self.ctx.notifier
    }

    pub async fn session(&self) -> Option<Session> {
        auth::load_session(&self.ctx.api).await
    }

    pub async fn logout(&self) -> Result<&'static str> {
        auth::logout(&self.ctx.api).await
    }

    pub fn auth_forms(&self) -> AuthForms {
        AuthForms::new(
            self.ctx.api.clone(),
            self.ctx.notifier.clone(),
            self.ctx.target.clone(),
        )
    }

    pub fn student(&self) -> StudentDashboard {
        StudentDashboard::new(self.ctx.clone())
    }

    pub fn executive(&self) -> ExecutiveDashboard {
        ExecutiveDashboard::new(self.ctx.clone())
    }

    pub fn admin(&self) -> AdminDashboard {
        AdminDashboard::new(self.ctx.clone())
    }

    /// The dashboard for a role. Guests have none.
    pub fn dashboard_for(&self, role: Role) -> Option<Box<dyn Dashboard>> {
        match role {
            Role::Student => Some(Box::new(self.student())),
            Role::Executive => Some(Box::new(self.executive())),
            Role::Admin => Some(Box::new(self.admin())),
            Role::Guest => None,
        }
    }

    pub fn poller(&self) -> PollingController {
        PollingController::new(
            RoleStatsLoader::new(self.ctx.api.clone()),
            self.ctx.notifier.clone(),
            self.ctx.target.clone(),
        )
    }
}
