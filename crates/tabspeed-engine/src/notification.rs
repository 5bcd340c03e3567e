use std::sync::Arc;

use tracing::info;

use crate::{
    deps::{Browser, NotificationSink},
    dispatch::Response,
};

/// Sends indicator messages and backdrop updates to the renderer.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    hide_indicator: bool,
}

impl NotificationDispatcher {
    /// Create a dispatcher in front of `sink`.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            hide_indicator: false,
        }
    }

    /// Suppress indicator messages. Backdrop updates are unaffected.
    pub fn set_hide_indicator(&mut self, hide: bool) {
        self.hide_indicator = hide;
    }

    /// Show a regular indicator message.
    pub fn show(&self, text: &str) {
        // Log every notification, shown or not.
        info!(text = %text, hidden = self.hide_indicator, "notification_display");
        if !self.hide_indicator {
            self.sink.show(text);
        }
    }

    /// Show a small indicator message.
    pub fn show_small(&self, text: &str) {
        info!(text = %text, hidden = self.hide_indicator, small = true, "notification_display");
        if !self.hide_indicator {
            self.sink.show_small(text);
        }
    }

    /// Apply a backdrop filter.
    pub fn show_backdrop(&self, filter: &str) {
        self.sink.show_backdrop(filter);
    }

    /// Remove the backdrop filter.
    pub fn hide_backdrop(&self) {
        self.sink.hide_backdrop();
    }

    /// Carry out a handler [`Response`].
    pub fn handle_response(&self, response: Response, browser: &dyn Browser) {
        match response {
            Response::Ok => {}
            Response::Show(text) => self.show(&text),
            Response::ShowSmall(text) => self.show_small(&text),
            Response::OpenTab(url) => {
                info!(url = %url, "open_tab");
                browser.request_create_tab(&url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockBrowser, MockSink, SinkCall};

    #[test]
    fn hide_indicator_keeps_backdrop() {
        let sink = Arc::new(MockSink::default());
        let browser = MockBrowser::new(1);
        let mut n = NotificationDispatcher::new(sink.clone());
        n.set_hide_indicator(true);
        n.handle_response(Response::Show("1.50".into()), &browser);
        n.handle_response(Response::ShowSmall("+10s".into()), &browser);
        n.show_backdrop("invert(1)");
        n.hide_backdrop();
        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::ShowBackdrop("invert(1)".into()),
                SinkCall::HideBackdrop
            ]
        );
    }

    #[test]
    fn open_tab_goes_to_browser() {
        let sink = Arc::new(MockSink::default());
        let browser = MockBrowser::new(1);
        let n = NotificationDispatcher::new(sink.clone());
        n.handle_response(Response::OpenTab("https://example.com".into()), &browser);
        n.handle_response(Response::Ok, &browser);
        assert!(sink.calls().is_empty());
        assert_eq!(browser.opened(), vec!["https://example.com".to_string()]);
    }
}
