use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

use crate::notify::NotificationService;
use crate::render::RenderTarget;
use crate::stats::{Role, RoleStatsLoader};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(crate::config::DEFAULT_POLL_INTERVAL_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Running(Role),
}

struct ActivePoll {
    role: Role,
    stop_tx: oneshot::Sender<()>,
}

#[derive(Default)]
struct PollState {
    active: Option<ActivePoll>,
    /// Bumped on every start and stop. A tick only applies its result if its generation is current.
    generation: u64,
}

/// Periodically refreshes one role's stats into a render target.
///
/// At most one timer runs per controller. Stopping cancels the next tick only;
/// a load already in flight completes, but its result is dropped.
pub struct PollingController {
    loader: RoleStatsLoader,
    notifier: NotificationService,
    target: Arc<dyn RenderTarget>,
    state: Arc<Mutex<PollState>>,
}

impl PollingController {
    pub fn new(
        loader: RoleStatsLoader,
        notifier: NotificationService,
        target: Arc<dyn RenderTarget>,
    ) -> Self {
        Self {
            loader,
            notifier,
            target,
            state: Arc::new(Mutex::new(PollState::default())),
        }
    }

    pub fn phase(&self) -> PollPhase {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &state.active {
            Some(active) => PollPhase::Running(active.role),
            None => PollPhase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() != PollPhase::Idle
    }

    /// Load immediately, then every `interval`.
    ///
    /// Returns false and does nothing if already running, if `interval` is zero, or if there is
    /// no async runtime to drive the timer.
    pub fn start(&self, role: Role, interval: Duration) -> bool {
        if interval.is_zero() {
            log::warn!("Refusing to poll {role} stats with a zero interval");
            return false;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, not polling {role} stats");
            return false;
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(active) = &state.active {
            log::debug!("Polling already running for {}, ignoring start({role})", active.role);
            return false;
        }

        state.generation += 1;
        let generation = state.generation;
        let (stop_tx, mut stop_rx) = oneshot::channel();
        state.active = Some(ActivePoll { role, stop_tx });
        drop(state);

        log::info!("Polling {role} stats every {}ms", interval.as_millis());
        let tick = Tick {
            role,
            generation,
            loader: self.loader.clone(),
            notifier: self.notifier.clone(),
            target: self.target.clone(),
            state: self.state.clone(),
        };

        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                tick.run().await;
            }
            log::debug!("Polling loop for {role} exited");
        });
        true
    }

    pub fn start_default(&self, role: Role) -> bool {
        self.start(role, DEFAULT_INTERVAL)
    }

    /// Cancel the pending timer. Safe to call when idle.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.generation += 1;
        if let Some(active) = state.active.take() {
            log::info!("Stopped polling {} stats", active.role);
            // The loop may already be gone; nothing to do then.
            let _ = active.stop_tx.send(());
        }
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Tick {
    role: Role,
    generation: u64,
    loader: RoleStatsLoader,
    notifier: NotificationService,
    target: Arc<dyn RenderTarget>,
    state: Arc<Mutex<PollState>>,
}

impl Tick {
    async fn run(&self) {
        let result = self.loader.load_stats(self.role).await;

        if !self.is_current() {
            log::debug!("Discarding {} stats from a stopped poll", self.role);
            return;
        }

        match result {
            Ok(snapshot) => self.target.render_stats(&snapshot),
            Err(e) => {
                log::warn!("{} stats refresh failed: {e}", self.role);
                self.notifier.error(self.role.refresh_error_message());
            }
        }
    }

    fn is_current(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.active.is_some() && state.generation == self.generation
    }
}
