//! # forum_participation
//!
//! Loader for the Survey Tool "Forum Participation" page.
//!
//! `load()` asks the server for the participation payload, renders it as an
//! HTML fragment and swaps it into the host page. Everything the page needs
//! from its surroundings goes through small collaborator traits:
//!
//! - [`SessionStatus`] - current session id
//! - [`TextLookup`] - localized strings
//! - [`Transport`] - asynchronous GET with load/error continuations
//! - [`DisconnectHandler`] - shared error/reconnect UI
//! - [`PageHost`] - guidance message, loading indicator, content swap
//!
//! ## Usage as Library
//!
//! ```rust,no_run
//! use forum_participation::{ResolvedParams, fetch_participation_page};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let params = ResolvedParams::new("https://st.example.org/cldr-apps/")
//!         .with_session("0123abcd");
//!     let div = fetch_participation_page(&params).await?;
//!     println!("{}", div.outer_html());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, info};

// ─────────────────────────────────────────────────────────────────────────────
// Public modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod config;
pub mod loader;
pub mod page;
pub mod session;
pub mod transport;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports for convenience
// ─────────────────────────────────────────────────────────────────────────────

pub use config::{CliOptions, FileConfig, ResolvedParams, load_config, resolve_params};
pub use loader::{Collaborators, ForumParticipation, LOAD_DESCRIPTION};
pub use page::{ChannelPage, DisconnectHandler, Div, PageEvent, PageHost};
pub use participation_report::{
    Column, ParticipationReport, TextCatalog, TextLookup, make_html_from_json,
};
pub use session::{FixedSession, SessionStatus, forum_participation_url};
pub use transport::{HandleAs, HttpTransport, Transport, TransportError, XhrArgs};

// ─────────────────────────────────────────────────────────────────────────────
// Library entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Run one `load()` against the live server and wait for the page swap.
///
/// Wires the shipped collaborators together: a fixed session, the text
/// catalog from `params`, an [`HttpTransport`] and a [`ChannelPage`] acting as
/// both page host and disconnect handler. Returns the container that would
/// have been flipped in, or an error carrying the disconnect description.
pub async fn fetch_participation_page(params: &ResolvedParams) -> Result<Div> {
    let (page, mut events) = ChannelPage::new();
    let page = Arc::new(page);

    let loader = ForumParticipation::new(Collaborators {
        session: Arc::new(FixedSession::new(params.session.clone())),
        text: Arc::new(params.text_catalog()),
        transport: Arc::new(HttpTransport::new(&params.base_url, params.request_timeout)?),
        disconnect: page.clone(),
        page,
    });
    loader.load();
    // Only the pending request keeps the channel open from here on.
    drop(loader);

    while let Some(event) = events.recv().await {
        match event {
            PageEvent::Message(message) => info!(%message, "guidance"),
            PageEvent::LoaderHidden => debug!("loader hidden"),
            PageEvent::Flipped(div) => return Ok(div),
            PageEvent::Disconnected {
                err, description, ..
            } => bail!("{description}: {err}"),
        }
    }
    bail!("page closed before the forum participation report arrived")
}

// ─────────────────────────────────────────────────────────────────────────────
// Version info
// ─────────────────────────────────────────────────────────────────────────────

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
