//! Reply formatting.
//!
//! Assistant replies are unstructured text with markdown-ish habits (headings,
//! "Label:" lines, numbered lists). [`format_message`] classifies every input
//! line on its own and returns one [`FormattedLine`] per line, in order, so a
//! renderer can style them without parsing markdown.
//!
//! # Usage
//!
//! ```
//! use wlga_core::format::{format_message, LineKind};
//!
//! let lines = format_message("# Title\n\nSome text");
//! assert_eq!(lines.len(), 3);
//! assert_eq!(lines[0].kind(), LineKind::Heading);
//! assert_eq!(lines[0].text(), "Title");
//! ```

mod rules;

use serde::{Deserialize, Serialize};

pub use rules::{Bullet, RULES, Rule, match_bullet};

/// Maximum heading depth recognised (`######`).
pub const MAX_HEADING_LEVEL: usize = 6;

/// The classification tag of a formatted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineKind {
    Heading,
    Labeled,
    ShoutLabeled,
    BulletLabeled,
    BulletPlain,
    Plain,
    Blank,
}

/// One display record derived from one input line.
///
/// Records are never persisted; they are recomputed from the message text
/// whenever it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FormattedLine {
    /// `#`-prefixed heading. `level` is the number of leading `#` (1-6).
    Heading { level: u8, text: String },
    /// Short line ending with a colon, rendered bold.
    Labeled { text: String },
    /// Short all-caps line, rendered bold and underlined.
    ShoutLabeled { text: String },
    /// Bullet whose content is itself a short label; marker and content bold.
    #[serde(rename_all = "camelCase")]
    BulletLabeled { marker: String, content: String },
    /// Bullet with emphasized marker and plain content.
    ///
    /// `marker` is `None` when the marker could not be separated from the
    /// content, in which case `content` is the whole trimmed line.
    #[serde(rename_all = "camelCase")]
    BulletPlain {
        marker: Option<String>,
        content: String,
    },
    /// Any other non-empty line.
    Plain { text: String },
    /// Empty or whitespace-only line.
    Blank,
}

impl FormattedLine {
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Heading { .. } => LineKind::Heading,
            Self::Labeled { .. } => LineKind::Labeled,
            Self::ShoutLabeled { .. } => LineKind::ShoutLabeled,
            Self::BulletLabeled { .. } => LineKind::BulletLabeled,
            Self::BulletPlain { .. } => LineKind::BulletPlain,
            Self::Plain { .. } => LineKind::Plain,
            Self::Blank => LineKind::Blank,
        }
    }

    /// Returns the text to display for this line.
    ///
    /// Bullets join marker and content with a single space.
    pub fn text(&self) -> String {
        match self {
            Self::Heading { text, .. }
            | Self::Labeled { text }
            | Self::ShoutLabeled { text }
            | Self::Plain { text } => text.clone(),
            Self::BulletLabeled { marker, content } => format!("{} {}", marker, content),
            Self::BulletPlain {
                marker: Some(marker),
                content,
            } => format!("{} {}", marker, content),
            Self::BulletPlain {
                marker: None,
                content,
            } => content.clone(),
            Self::Blank => String::new(),
        }
    }
}

/// Formats raw reply text into one [`FormattedLine`] per input line.
///
/// Total and pure: every input, including the empty string, yields at least
/// one record, and the same input always yields the same output.
pub fn format_message(text: &str) -> Vec<FormattedLine> {
    text.split('\n').map(format_line).collect()
}

/// Classifies a single line with the first matching rule of [`RULES`].
pub fn format_line(line: &str) -> FormattedLine {
    let trimmed = line.trim();
    RULES
        .iter()
        .find_map(|(_, rule)| rule(trimmed))
        .unwrap_or(FormattedLine::Blank)
}
