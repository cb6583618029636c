//! Ephemeral, stacking toast notifications.
//!
//! Every toast gets its own expiry; several may be visible at once and no
//! de-duplication or throttling is applied. Until the overlay container has
//! been created, [`Toaster::show`] falls back to a blocking alert.

use std::time::{Duration, Instant};

/// Default time a toast stays on screen.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Visual severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Whether this renders with the error colour scheme.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

/// A notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

impl Toast {
    /// Create a toast with an explicit severity.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

/// A toast currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveToast {
    pub id: u64,
    pub toast: Toast,
    pub expires_at: Instant,
}

/// The overlay container holding visible toasts.
#[derive(Debug, Default)]
pub struct ToastOverlay {
    active: Vec<ActiveToast>,
    next_id: u64,
}

impl ToastOverlay {
    /// Append a toast expiring `duration` after `now`. Returns its id.
    pub fn push(&mut self, toast: Toast, now: Instant, duration: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(ActiveToast {
            id,
            toast,
            expires_at: now + duration,
        });
        id
    }

    /// Remove and return every toast whose expiry is at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<ActiveToast> {
        let (expired, live): (Vec<_>, Vec<_>) =
            self.active.drain(..).partition(|t| t.expires_at <= now);
        self.active = live;
        expired
    }

    /// Toasts currently visible, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[ActiveToast] {
        &self.active
    }
}

/// How a toast reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Added to the overlay with this id.
    Shown(u64),
    /// No overlay exists; the front-end must raise a blocking alert.
    Alert(String),
}

/// Toast entry point for a page.
#[derive(Debug)]
pub struct Toaster {
    overlay: Option<ToastOverlay>,
    duration: Duration,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl Toaster {
    /// Create a toaster with no overlay yet.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            overlay: None,
            duration,
        }
    }

    /// Create the overlay container if it does not exist. Idempotent.
    pub fn ensure_overlay(&mut self) -> &mut ToastOverlay {
        self.overlay.get_or_insert_with(ToastOverlay::default)
    }

    /// Whether the overlay has been created.
    #[must_use]
    pub const fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Show a toast, falling back to an alert when there is no overlay.
    pub fn show(&mut self, toast: Toast, now: Instant) -> Delivery {
        let duration = self.duration;
        match self.overlay.as_mut() {
            Some(overlay) => Delivery::Shown(overlay.push(toast, now, duration)),
            None => {
                tracing::debug!(
                    message = %toast.message,
                    "Toast overlay missing, falling back to alert"
                );
                Delivery::Alert(toast.message)
            }
        }
    }

    /// Expire toasts whose timers have elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<ActiveToast> {
        self.overlay
            .as_mut()
            .map(|o| o.expire(now))
            .unwrap_or_default()
    }

    /// Toasts currently visible.
    #[must_use]
    pub fn visible(&self) -> &[ActiveToast] {
        match &self.overlay {
            Some(overlay) => overlay.visible(),
            None => &[],
        }
    }
}
