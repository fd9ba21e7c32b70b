//! Localized text lookup.
//!
//! The host application owns localization. [`TextLookup`] is the seam the
//! renderer and the page loader read through; [`TextCatalog`] is the English
//! fallback shipped with the crate, with per-key overrides.

use std::collections::HashMap;

/// Maps a text key to display text.
pub trait TextLookup: Send + Sync {
    /// Display text for `key`.
    fn get(&self, key: &str) -> String;
}

/// Built-in English strings used by the forum participation page.
const DEFAULT_TEXTS: &[(&str, &str)] = &[
    (
        "forum_participationGuidance",
        "This shows the number of forum posts per locale, by everyone and by your organization. \
         Requests and discussions still open are counted separately; \"Act\" counts posts that need your attention.",
    ),
    ("recentLoc", "Locale"),
    ("forum_participation_TOTAL", "Total Posts"),
    ("forum_participation_ORG", "Org Posts"),
    ("forum_participation_REQUEST", "Open Requests"),
    ("forum_participation_DISCUSS", "Open Discussions"),
    ("forum_participation_ACT", "Needing Action"),
];

/// Text table with built-in defaults and caller overrides.
///
/// Unknown keys come back unchanged, so a missing translation shows up as its
/// key instead of an empty cell.
#[derive(Clone, Debug)]
pub struct TextCatalog {
    entries: HashMap<String, String>,
}

impl Default for TextCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TEXTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl TextCatalog {
    /// Catalog with no entries at all; every lookup returns its key.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Replace or add a single entry.
    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }

    /// Apply a batch of overrides on top of the current entries.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

impl TextLookup for TextCatalog {
    fn get(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
