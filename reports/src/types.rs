//! Report payload types.
//!
//! The server sends the table as a column-name → index mapping plus raw rows,
//! so the order of values inside a row is whatever the server chose. Display
//! order is fixed by [`Column::ALL`] and every cell is looked up through the
//! header mapping.
//!
//! # Example
//!
//! ```rust
//! use participation_report::types::{Column, ParticipationReport};
//! use serde_json::json;
//!
//! let report = ParticipationReport::from_value(&json!({
//!     "rows": {
//!         "header": {"LOC": 1, "FORUM_TOTAL": 0},
//!         "data": [[5, "de"]]
//!     }
//! }))
//! .unwrap();
//!
//! let rows = report.rows.as_ref().unwrap();
//! let first = &rows.data.as_ref().unwrap()[0];
//! assert_eq!(rows.cell(first, Column::Loc), Some(&json!("de")));
//! assert_eq!(rows.cell(first, Column::ForumAct), None);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while reading a report payload.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The JSON did not have the report shape (wrong field types).
    #[error("malformed forum participation payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One column of the participation table, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Locale id
    Loc,
    /// All forum posts in the locale
    ForumTotal,
    /// Posts by members of the viewer's organization
    ForumOrg,
    /// Posts of type "request"
    ForumRequest,
    /// Posts of type "discuss"
    ForumDiscuss,
    /// Posts needing action
    ForumAct,
}

impl Column {
    /// Every column in the order the table shows them.
    pub const ALL: [Column; 6] = [
        Column::Loc,
        Column::ForumTotal,
        Column::ForumOrg,
        Column::ForumRequest,
        Column::ForumDiscuss,
        Column::ForumAct,
    ];

    /// Name used as key in the payload's `rows.header` mapping.
    pub fn key(self) -> &'static str {
        match self {
            Column::Loc => "LOC",
            Column::ForumTotal => "FORUM_TOTAL",
            Column::ForumOrg => "FORUM_ORG",
            Column::ForumRequest => "FORUM_REQUEST",
            Column::ForumDiscuss => "FORUM_DISCUSS",
            Column::ForumAct => "FORUM_ACT",
        }
    }

    /// Text key of the localized column title.
    pub fn title_key(self) -> &'static str {
        match self {
            Column::Loc => "recentLoc",
            Column::ForumTotal => "forum_participation_TOTAL",
            Column::ForumOrg => "forum_participation_ORG",
            Column::ForumRequest => "forum_participation_REQUEST",
            Column::ForumDiscuss => "forum_participation_DISCUSS",
            Column::ForumAct => "forum_participation_ACT",
        }
    }
}

/// Forum participation payload as sent by `SurveyAjax`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipationReport {
    /// Server-side failure. Usually a message string; any value is accepted
    /// and only a truthy one counts as an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
    /// Organization the counts were computed for, normally a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Value>,
    /// Column-indexed table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<ReportRows>,
}

/// Table part of the payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRows {
    /// Column name → position inside each row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<BTreeMap<String, usize>>,
    /// Raw rows, one value per position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Vec<Value>>>,
}

impl ParticipationReport {
    /// Read a report out of an already-parsed JSON document.
    pub fn from_value(value: &Value) -> Result<Self, ReportError> {
        Ok(Self::deserialize(value)?)
    }

    /// Parse a report from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Server error message, if `err` is set to something truthy.
    pub fn error_message(&self) -> Option<String> {
        self.err.as_ref().and_then(error_text)
    }

    /// Organization value, if present and truthy.
    pub fn organization(&self) -> Option<&Value> {
        self.org.as_ref().filter(|org| is_truthy(org))
    }

    /// Header mapping and rows, only when both are present.
    pub fn table(&self) -> Option<(&BTreeMap<String, usize>, &[Vec<Value>])> {
        let rows = self.rows.as_ref()?;
        Some((rows.header.as_ref()?, rows.data.as_deref()?))
    }
}

impl ReportRows {
    fn column_index(&self, column: Column) -> Option<usize> {
        self.header.as_ref()?.get(column.key()).copied()
    }

    /// Value of `column` in `row`, or `None` when the header lacks the
    /// column or the row is too short.
    pub fn cell<'a>(&self, row: &'a [Value], column: Column) -> Option<&'a Value> {
        row.get(self.column_index(column)?)
    }
}

/// Script truthiness: `null`, `false`, `0` and `""` are falsy, everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Message carried by an `err` value: strings verbatim, other truthy values
/// as their JSON text, nothing for falsy ones.
pub fn error_text(err: &Value) -> Option<String> {
    match err {
        _ if !is_truthy(err) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
