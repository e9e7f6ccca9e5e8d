//! Global notification side channel
//!
//! One notification is shown at a time. `show` replaces whatever is visible,
//! hides it again after its duration and clears the message once the exit
//! animation has had time to run.

use fintrack_config::NotificationConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::NotificationType;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

/// Currently displayed notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: Option<String>,
    pub kind: NotificationType,
    pub is_visible: bool,
    pub duration: Duration,
}

impl Notification {
    fn empty(duration: Duration) -> Self {
        Self {
            message: None,
            kind: NotificationType::Info,
            is_visible: false,
            duration,
        }
    }
}

struct NotifierInner {
    state: watch::Sender<Notification>,
    timer: Mutex<Option<JoinHandle<()>>>,
    default_duration: Duration,
    exit_animation: Duration,
}

impl NotifierInner {
    fn cancel_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }

    fn hide(&self) {
        self.state.send_modify(|n| n.is_visible = false);
    }

    fn clear(&self) {
        let duration = self.default_duration;
        self.state.send_modify(|n| *n = Notification::empty(duration));
    }
}

/// Handle to the notification channel; clones share the same state
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, EXIT_ANIMATION)
    }
}

impl Notifier {
    pub fn new(default_duration: Duration, exit_animation: Duration) -> Self {
        let (state, _) = watch::channel(Notification::empty(default_duration));
        Self {
            inner: Arc::new(NotifierInner {
                state,
                timer: Mutex::new(None),
                default_duration,
                exit_animation,
            }),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(
            Duration::from_millis(config.duration_ms),
            Duration::from_millis(config.exit_animation_ms),
        )
    }

    /// Display `message`; `duration` overrides the default display time
    ///
    /// Auto-dismiss needs a Tokio runtime. Without one the notification stays
    /// visible until `hide` or `clear` is called.
    pub fn show(&self, message: impl Into<String>, kind: NotificationType, duration: Option<Duration>) {
        let message = message.into();
        match kind {
            NotificationType::Error => log::error!(target: "fintrack::notification", "{}", message),
            NotificationType::Warning => log::warn!(target: "fintrack::notification", "{}", message),
            _ => log::info!(target: "fintrack::notification", "[{}] {}", kind, message),
        }

        self.inner.cancel_timer();
        self.inner.state.send_modify(|n| {
            n.message = Some(message);
            n.kind = kind;
            n.is_visible = true;
            if let Some(duration) = duration {
                n.duration = duration;
            }
        });
        let visible_for = self.inner.state.borrow().duration;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!(target: "fintrack::notification", "No runtime, auto-dismiss disabled");
            return;
        };

        let inner = Arc::clone(&self.inner);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(visible_for).await;
            inner.hide();
            tokio::time::sleep(inner.exit_animation).await;
            inner.clear();
        });
        *self.inner.timer.lock() = Some(timer);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Success, None);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Error, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Info, None);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, NotificationType::Warning, None);
    }

    /// Start the exit animation now
    pub fn hide(&self) {
        self.inner.cancel_timer();
        self.inner.hide();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let inner = Arc::clone(&self.inner);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(inner.exit_animation).await;
            inner.clear();
        });
        *self.inner.timer.lock() = Some(timer);
    }

    /// Drop the message and restore the default duration
    pub fn clear(&self) {
        self.inner.cancel_timer();
        self.inner.clear();
    }

    pub fn current(&self) -> Notification {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Notification> {
        self.inner.state.subscribe()
    }
}
