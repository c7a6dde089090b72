use std::sync::Arc;

use mgsa_portal::Portal;
use mgsa_portal::auth::{AuthOutcome, LoginForm};
use mgsa_portal::config::Config;
use mgsa_portal::notify::NotificationRegion;
use mgsa_portal::render::{RenderTarget, RenderedList, Slot, SlotBoard};
use mgsa_portal::stats::StatsSnapshot;

/// Keeps the latest slot contents and logs every update.
struct LoggingTarget {
    board: SlotBoard,
}

impl RenderTarget for LoggingTarget {
    fn render_stats(&self, snapshot: &StatsSnapshot) {
        let line = snapshot
            .counters
            .iter()
            .map(|c| format!("{}={}", c.key, c.value))
            .collect::<Vec<_>>()
            .join(" ");
        log::info!("[{} stats] {line}", snapshot.role);
        self.board.render_stats(snapshot);
    }

    fn render_list(&self, slot: Slot, list: RenderedList) {
        match &list {
            RenderedList::Empty { placeholder } => log::info!("[{slot:?}] {placeholder}"),
            RenderedList::Items(items) => {
                log::info!("[{slot:?}] {} item(s)", items.len());
                for item in items {
                    log::info!("  #{} {}", item.id, item.title);
                }
            }
        }
        self.board.render_list(slot, list);
    }

    fn show_error(&self, slot: Slot, message: &str) {
        log::warn!("[{slot:?}] {message}");
        self.board.show_error(slot, message);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    log::info!("Using portal at {}", config.api_root());

    let target = Arc::new(LoggingTarget { board: SlotBoard::new() });
    let (portal, _transport) = Portal::connect(config.clone(), NotificationRegion::new(), target)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    if let (Some(username), Some(password)) = (config.username.clone(), config.password.clone()) {
        let outcome = portal.auth_forms().login(&LoginForm { username, password }).await;
        if let AuthOutcome::Rejected { message } | AuthOutcome::Invalid { message } = outcome {
            log::error!("Login failed: {message}");
            return Ok(());
        }
    }

    let Some(session) = portal.session().await else {
        log::warn!("Not authenticated, set PORTAL_USERNAME and PORTAL_PASSWORD");
        return Ok(());
    };
    log::info!(
        "Signed in as {} ({})",
        session.username.as_deref().unwrap_or("unknown"),
        session.role
    );

    let Some(dashboard) = portal.dashboard_for(session.role) else {
        log::warn!("No dashboard for role {}", session.role);
        return Ok(());
    };
    dashboard.init().await;

    let poller = portal.poller();
    poller.start(session.role, config.poll_interval);

    tokio::signal::ctrl_c().await?;
    poller.stop();

    if let Err(e) = portal.logout().await {
        log::warn!("Logout failed: {e}");
    }
    Ok(())
}
