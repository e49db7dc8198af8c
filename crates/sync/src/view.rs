//! Derived view-state and the error notification latch.

use scanstock_core::Cartridge;
use serde::Serialize;

use crate::session::SessionPhase;

/// Read-only record the presentation layer renders from.
///
/// `busy` is true iff the lookup or the adjustment is loading; `has_error` is
/// true iff either currently carries an error. `notification_visible` follows
/// the [`ErrorNotice`] latch and may be false while `has_error` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub scan: Option<String>,
    pub entity: Option<Cartridge>,
    pub busy: bool,
    pub has_error: bool,
    pub notification_visible: bool,
    pub amount: String,
    pub phase: SessionPhase,
}

/// Edge-triggered visibility of the connectivity notification.
///
/// Opens when the error level goes from clear to set, closes when it clears,
/// and can be dismissed in between without touching the error itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorNotice {
    visible: bool,
    had_error: bool,
}

impl ErrorNotice {
    /// Feed the current error level. Returns `true` if the notice just opened.
    pub fn observe(&mut self, has_error: bool) -> bool {
        let opened = has_error && !self.had_error;
        if opened {
            self.visible = true;
        } else if !has_error {
            self.visible = false;
        }
        self.had_error = has_error;
        opened
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Text of the connectivity notification. Every remote failure is reported
/// the same way, naming the configured endpoint.
pub fn notification_message(endpoint: &str) -> String {
    format!("Error: no connection to server {endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_only_on_rising_edge() {
        let mut notice = ErrorNotice::default();
        assert!(notice.observe(true));
        assert!(notice.is_visible());

        notice.dismiss();
        assert!(!notice.observe(true));
        assert!(!notice.is_visible());

        assert!(!notice.observe(false));
        assert!(notice.observe(true));
        assert!(notice.is_visible());
    }

    #[test]
    fn clearing_the_error_hides_the_notice() {
        let mut notice = ErrorNotice::default();
        notice.observe(true);
        notice.observe(false);
        assert!(!notice.is_visible());
    }

    #[test]
    fn message_names_endpoint() {
        assert_eq!(
            notification_message("http://10.0.0.5:4000/graphql"),
            "Error: no connection to server http://10.0.0.5:4000/graphql"
        );
    }
}
