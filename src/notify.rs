//! Notifications and Decision Gates
//!
//! The seams between flows and whatever surface shows messages to the user:
//! flash toasts in the browser, stderr lines in the terminal.

use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;

use crate::config::NotificationConfig;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    /// CSS class used by the flash container (`flash success`, `flash error`, ...)
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }
}

/// Where a flash message came from; decides how long it stays on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashOrigin {
    /// Rendered by the server with the page
    Page,
    /// Created by a controller at runtime
    Runtime,
}

/// How long a flash lives before it fades, and how long the fade takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTiming {
    pub visible_for: Duration,
    pub fade: Duration,
}

impl FlashTiming {
    pub fn for_origin(origin: FlashOrigin, config: &NotificationConfig) -> Self {
        let visible_ms = match origin {
            FlashOrigin::Page => config.page_flash_ms,
            FlashOrigin::Runtime => config.toast_ms,
        };
        Self {
            visible_for: Duration::from_millis(visible_ms),
            fade: Duration::from_millis(config.fade_ms),
        }
    }
}

/// Sink for user-facing messages
pub trait Notifier {
    fn notify(&self, level: NotificationLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Yes/no decision asked of the user before a destructive or saving action
#[async_trait(?Send)]
pub trait DecisionGate {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Callback the timer invokes after a session is saved, typically a dashboard refresh
pub type CompletionHook = Rc<dyn Fn()>;

/// Gate with a fixed answer, for `--yes` style flags and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedGate(pub bool);

#[async_trait(?Send)]
impl DecisionGate for FixedGate {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "Auto-answered confirmation");
        self.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_timing_by_origin() {
        let config = NotificationConfig::default();

        let page = FlashTiming::for_origin(FlashOrigin::Page, &config);
        assert_eq!(page.visible_for, Duration::from_secs(5));

        let runtime = FlashTiming::for_origin(FlashOrigin::Runtime, &config);
        assert_eq!(runtime.visible_for, Duration::from_secs(3));
        assert_eq!(runtime.fade, Duration::from_millis(300));
    }

    #[test]
    fn test_css_class() {
        assert_eq!(NotificationLevel::Error.css_class(), "error");
    }
}
