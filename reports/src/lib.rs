//! # participation-report
//!
//! Data model and HTML fragment renderer for the Survey Tool
//! "Forum Participation" page.
//!
//! The server answers `SurveyAjax?what=forum_participation` with a small JSON
//! document: an optional organization name plus a column-indexed table of
//! per-locale forum counts. This crate turns that document into a
//! self-contained HTML fragment that a host page can drop into a container.
//!
//! ## Quick Start
//!
//! ```rust
//! use participation_report::{make_html_from_json, ParticipationReport, TextCatalog};
//! use serde_json::json;
//!
//! let report = ParticipationReport::from_value(&json!({
//!     "org": "ACME",
//!     "rows": {
//!         "header": {"LOC": 0, "FORUM_TOTAL": 1, "FORUM_ORG": 2,
//!                    "FORUM_REQUEST": 3, "FORUM_DISCUSS": 4, "FORUM_ACT": 5},
//!         "data": [["fr", 12, 3, 1, 7, 1]]
//!     }
//! }))
//! .unwrap();
//!
//! let html = make_html_from_json(&report, &TextCatalog::default());
//! assert!(html.contains("<h4>Organization: ACME</h4>"));
//! assert!(html.contains("<td>fr</td>"));
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - the report payload and the fixed display columns
//! - [`text`] - localized text lookup used for headings
//! - [`html`] - fragment rendering
//!
//! Rendering is plain string assembly. Values from the payload are inserted
//! verbatim; the server is the trust boundary for the organization name and
//! cell contents.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod html;
pub mod text;
pub mod types;

pub use html::{CSV_FILE_NAME, CsvDownload, TABLE_ID, cell_text, make_html_from_json};
pub use text::{TextCatalog, TextLookup};
pub use types::{Column, ParticipationReport, ReportError, ReportRows};
