use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// The single region notifications are mounted into. Shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct NotificationRegion {
    items: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications currently on screen, oldest first.
    pub fn visible(&self) -> Vec<Notification> {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, message: &str) -> bool {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|n| n.message == message)
    }

    fn insert(&self, notification: Notification) {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
    }

    fn remove(&self, id: u64) {
        self.items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|n| n.id != id);
    }
}

/// Shows transient messages. Each notification removes itself after the display duration.
#[derive(Debug, Clone)]
pub struct NotificationService {
    region: Option<NotificationRegion>,
    display_for: Duration,
    next_id: Arc<AtomicU64>,
}

impl NotificationService {
    pub fn new(region: Option<NotificationRegion>, display_for: Duration) -> Self {
        Self {
            region,
            display_for,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// A service with nowhere to mount; every call only logs.
    pub fn detached() -> Self {
        Self::new(None, Duration::from_millis(crate::config::DEFAULT_NOTIFY_MS))
    }

    pub fn region(&self) -> Option<&NotificationRegion> {
        self.region.as_ref()
    }

    pub fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => log::error!("[notify] {message}"),
            _ => log::info!("[notify:{severity}] {message}"),
        }

        let Some(region) = &self.region else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, dropping notification '{message}'");
            return;
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let expires_at = Instant::now() + self.display_for;
        region.insert(Notification {
            id,
            message: message.to_string(),
            severity,
            expires_at,
        });

        let region = region.clone();
        runtime.spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            region.remove(id);
        });
    }

    pub fn info(&self, message: &str) {
        self.notify(message, Severity::Info);
    }

    pub fn success(&self, message: &str) {
        self.notify(message, Severity::Success);
    }

    pub fn error(&self, message: &str) {
        self.notify(message, Severity::Error);
    }
}
