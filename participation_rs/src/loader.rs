//! Forum participation page loader.
//!
//! `load()` is the page's only entry point. It shows the guidance text,
//! issues one request and returns; the response is handled by whichever
//! continuation the transport fires. There is no fencing between loads: if
//! two are in flight, the last response to arrive wins the page swap.

use std::sync::Arc;

use participation_report::types::error_text;
use participation_report::{ParticipationReport, TextLookup, make_html_from_json};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::page::{DisconnectHandler, Div, PageHost};
use crate::session::{SessionStatus, forum_participation_url};
use crate::transport::{HandleAs, Transport, TransportError, XhrArgs};

/// Description handed to the disconnect handler for every failed load.
pub const LOAD_DESCRIPTION: &str = "Loading forum participation data";

/// Text key of the guidance message shown when the page loads.
pub const GUIDANCE_KEY: &str = "forum_participationGuidance";

/// Services the loader reaches through the host application.
#[derive(Clone)]
pub struct Collaborators {
    pub session: Arc<dyn SessionStatus>,
    pub text: Arc<dyn TextLookup>,
    pub transport: Arc<dyn Transport>,
    pub disconnect: Arc<dyn DisconnectHandler>,
    pub page: Arc<dyn PageHost>,
}

/// The forum participation page.
///
/// Cloning is cheap; each pending request holds its own clone inside the
/// continuations.
#[derive(Clone)]
pub struct ForumParticipation {
    services: Collaborators,
}

impl ForumParticipation {
    pub fn new(services: Collaborators) -> Self {
        Self { services }
    }

    /// Fetch the report and swap it into the page once it arrives.
    pub fn load(&self) {
        let guidance = self.services.text.get(GUIDANCE_KEY);
        self.services.page.show_message(&guidance);

        let url = forum_participation_url(self.services.session.as_ref());
        info!(%url, "loading forum participation");

        let on_load = self.clone();
        let on_error = self.clone();
        self.services.transport.send_xhr(XhrArgs {
            url,
            handle_as: HandleAs::Json,
            load: Box::new(move |json| on_load.load_handler(json)),
            error: Box::new(move |err| on_error.error_handler(err)),
        });
    }

    fn load_handler(&self, json: Value) {
        if let Some(err) = server_error(&json) {
            warn!(%err, "server reported an error");
            self.disconnect(&err, Some(&json));
            return;
        }

        let report = match ParticipationReport::from_value(&json) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "unexpected payload shape");
                self.disconnect(&e.to_string(), Some(&json));
                return;
            }
        };

        let html = make_html_from_json(&report, self.services.text.as_ref());
        debug!(bytes = html.len(), "rendered forum participation");
        let div = Div::with_inner_html(html);
        self.services.page.hide_loader();
        self.services.page.flip_to_other_div(div);
    }

    // No response body exists here, so no payload is passed on.
    fn error_handler(&self, err: TransportError) {
        self.disconnect(&err.to_string(), None);
    }

    fn disconnect(&self, err: &str, payload: Option<&Value>) {
        self.services
            .disconnect
            .handle_disconnect(err, payload, "", LOAD_DESCRIPTION);
    }
}

/// Error text of a payload whose `err` field is set to something truthy.
fn server_error(json: &Value) -> Option<String> {
    json.get("err").and_then(error_text)
}
