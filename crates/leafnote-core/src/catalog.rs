//! Sticker catalog and built-in emoji palette.
//!
//! Sticker annotations store only a [`StickerId`]. Display metadata is looked
//! up through a [`StickerCatalog`] at render time so catalogs can be swapped
//! or extended without migrating stored annotations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a sticker in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(pub String);

impl StickerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StickerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Display metadata for a sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerInfo {
    /// Text shown on the badge.
    pub label: String,
    /// Badge fill color (CSS color string).
    pub background_color: String,
    /// Label color (CSS color string).
    pub text_color: String,
}

impl StickerInfo {
    pub fn new(label: &str, background_color: &str, text_color: &str) -> Self {
        Self {
            label: label.to_string(),
            background_color: background_color.to_string(),
            text_color: text_color.to_string(),
        }
    }

    /// Neutral badge used when a sticker id is not in the catalog.
    pub fn fallback(id: &StickerId) -> Self {
        Self::new(id.as_str(), FALLBACK_BACKGROUND, FALLBACK_TEXT)
    }
}

/// Background of the badge drawn for unknown sticker ids.
pub const FALLBACK_BACKGROUND: &str = "#e5e7eb";
/// Label color of the badge drawn for unknown sticker ids.
pub const FALLBACK_TEXT: &str = "#374151";

/// Read-only lookup from sticker id to display metadata.
pub trait StickerCatalog {
    /// Metadata for `id`, if the catalog knows it.
    fn lookup(&self, id: &StickerId) -> Option<&StickerInfo>;

    /// All ids in display order.
    fn ids(&self) -> Vec<StickerId>;

    /// Metadata for `id`, or the neutral fallback badge.
    fn resolve(&self, id: &StickerId) -> StickerInfo {
        self.lookup(id)
            .cloned()
            .unwrap_or_else(|| StickerInfo::fallback(id))
    }

    fn contains(&self, id: &StickerId) -> bool {
        self.lookup(id).is_some()
    }
}

// (id, label, background, text)
const BUILTIN_STICKERS: &[(&str, &str, &str, &str)] = &[
    ("star", "Star", "#fef3c7", "#b45309"),
    ("great-job", "Great job!", "#dcfce7", "#15803d"),
    ("excellent", "Excellent", "#dbeafe", "#1d4ed8"),
    ("well-done", "Well done", "#ede9fe", "#6d28d9"),
    ("check", "Checked", "#d1fae5", "#047857"),
    ("question", "Question?", "#fee2e2", "#b91c1c"),
    ("important", "Important", "#ffedd5", "#c2410c"),
    ("review", "Review", "#e0f2fe", "#0369a1"),
    ("idea", "Idea", "#fef9c3", "#a16207"),
    ("heart", "Love it", "#fce7f3", "#be185d"),
];

/// The sticker table shipped with the engine.
#[derive(Debug, Clone)]
pub struct BuiltinStickers {
    order: Vec<StickerId>,
    entries: HashMap<StickerId, StickerInfo>,
}

impl BuiltinStickers {
    pub fn new() -> Self {
        Self::from_entries(
            BUILTIN_STICKERS
                .iter()
                .map(|(id, label, bg, fg)| (StickerId::new(*id), StickerInfo::new(label, bg, fg))),
        )
    }

    /// Build a catalog from arbitrary entries, keeping their order.
    ///
    /// Later duplicates replace earlier metadata but keep the first position.
    pub fn from_entries(entries: impl IntoIterator<Item = (StickerId, StickerInfo)>) -> Self {
        let mut order = Vec::new();
        let mut map = HashMap::new();
        for (id, info) in entries {
            if map.insert(id.clone(), info).is_none() {
                order.push(id);
            }
        }
        Self {
            order,
            entries: map,
        }
    }

    /// Add or replace one sticker.
    pub fn insert(&mut self, id: StickerId, info: StickerInfo) {
        if self.entries.insert(id.clone(), info).is_none() {
            self.order.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for BuiltinStickers {
    fn default() -> Self {
        Self::new()
    }
}

impl StickerCatalog for BuiltinStickers {
    fn lookup(&self, id: &StickerId) -> Option<&StickerInfo> {
        self.entries.get(id)
    }

    fn ids(&self) -> Vec<StickerId> {
        self.order.clone()
    }
}

/// Emoji offered by the picker, in display order.
pub const DEFAULT_EMOJIS: &[&str] = &[
    "👍", "👏", "⭐", "❤️", "😀", "😮", "🤔", "❓", "❗", "✅", "❌", "💡", "🔥", "🎉", "📌", "✏️",
];
