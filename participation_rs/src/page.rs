//! Host page surface: the content container, page navigation and the shared
//! disconnect handler.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

/// Freshly created container element holding rendered markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Div {
    inner_html: String,
}

impl Div {
    pub fn with_inner_html(html: impl Into<String>) -> Self {
        Self {
            inner_html: html.into(),
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Markup of the container including its own tag.
    pub fn outer_html(&self) -> String {
        format!("<div>{}</div>", self.inner_html)
    }
}

/// Page-navigation framework of the hosting application.
pub trait PageHost: Send + Sync {
    /// Show a guidance/info message next to the page content.
    fn show_message(&self, message: &str);
    /// Hide the page's loading indicator.
    fn hide_loader(&self);
    /// Replace the current page content with `div`.
    fn flip_to_other_div(&self, div: Div);
}

/// Shared handler for failed loads; owns any reconnect/retry UI.
pub trait DisconnectHandler: Send + Sync {
    /// `payload` is the full server response when one was received.
    fn handle_disconnect(&self, err: &str, payload: Option<&Value>, context: &str, description: &str);
}

/// Everything a [`ChannelPage`] was asked to do, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Message(String),
    LoaderHidden,
    Flipped(Div),
    Disconnected {
        err: String,
        payload: Option<Value>,
        context: String,
        description: String,
    },
}

impl PageEvent {
    /// A flip or a disconnect ends a load.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageEvent::Flipped(_) | PageEvent::Disconnected { .. })
    }
}

/// Page host and disconnect handler that forwards every call as a
/// [`PageEvent`] over an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelPage {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl ChannelPage {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: PageEvent) {
        if self.tx.send(event).is_err() {
            debug!("page event dropped, receiver closed");
        }
    }
}

impl PageHost for ChannelPage {
    fn show_message(&self, message: &str) {
        self.emit(PageEvent::Message(message.to_string()));
    }

    fn hide_loader(&self) {
        self.emit(PageEvent::LoaderHidden);
    }

    fn flip_to_other_div(&self, div: Div) {
        self.emit(PageEvent::Flipped(div));
    }
}

impl DisconnectHandler for ChannelPage {
    fn handle_disconnect(&self, err: &str, payload: Option<&Value>, context: &str, description: &str) {
        self.emit(PageEvent::Disconnected {
            err: err.to_string(),
            payload: payload.cloned(),
            context: context.to_string(),
            description: description.to_string(),
        });
    }
}
