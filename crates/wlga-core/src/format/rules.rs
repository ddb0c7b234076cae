//! Line classification rules.
//!
//! Each rule looks at one trimmed line and either claims it or passes.
//! [`RULES`] lists them in precedence order; the first rule that returns
//! `Some` wins.

use super::{FormattedLine, MAX_HEADING_LEVEL};

/// A classification rule over a trimmed line.
pub type Rule = fn(&str) -> Option<FormattedLine>;

/// All rules in precedence order. Lines no rule claims are blank.
pub const RULES: &[(&str, Rule)] = &[
    ("heading", heading),
    ("labeled", labeled),
    ("shout_labeled", shout_labeled),
    ("bullet", bullet),
    ("plain", plain),
];

/// Labels and shout lines must be strictly longer than this...
const LABEL_MIN_EXCLUSIVE: usize = 3;
/// ...and strictly shorter than this.
const LABEL_MAX_EXCLUSIVE: usize = 50;
/// Bullet content shorter than this and ending with `:` is a bullet label.
const BULLET_LABEL_MAX_EXCLUSIVE: usize = 40;

/// A bullet or numbering marker split from the rest of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet<'a> {
    /// `"1."`, `"•"`, `"*"` or `"-"`.
    pub marker: &'a str,
    /// Everything after the marker and the whitespace following it.
    pub content: &'a str,
}

/// Matches a leading marker (`digits.`, `•`, `*`, `-`) followed by
/// whitespace and an ASCII uppercase letter.
pub fn match_bullet(line: &str) -> Option<Bullet<'_>> {
    let marker_len = if line.starts_with(|c: char| c.is_ascii_digit()) {
        let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if line[digits..].starts_with('.') {
            digits + 1
        } else {
            return None;
        }
    } else {
        let first = line.chars().next()?;
        if matches!(first, '•' | '*' | '-') {
            first.len_utf8()
        } else {
            return None;
        }
    };

    let (marker, rest) = line.split_at(marker_len);
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let content = rest.trim_start();
    if !content.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }

    Some(Bullet { marker, content })
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn within_label_bounds(line: &str) -> bool {
    let len = char_len(line);
    len > LABEL_MIN_EXCLUSIVE && len < LABEL_MAX_EXCLUSIVE
}

fn heading(line: &str) -> Option<FormattedLine> {
    let level = line.len() - line.trim_start_matches('#').len();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(FormattedLine::Heading {
        level: level as u8,
        text: rest.trim_start().to_string(),
    })
}

fn labeled(line: &str) -> Option<FormattedLine> {
    // Numbered and bulleted labels keep their marker
    let is_label = line.ends_with(':')
        && within_label_bounds(line)
        && !line.contains("http")
        && match_bullet(line).is_none();

    is_label.then(|| FormattedLine::Labeled {
        text: line.to_string(),
    })
}

fn is_shout_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '_'
}

fn shout_labeled(line: &str) -> Option<FormattedLine> {
    let is_shout = line == line.to_uppercase()
        && within_label_bounds(line)
        && line.chars().all(is_shout_char)
        && !line.contains("HTTP");

    is_shout.then(|| FormattedLine::ShoutLabeled {
        text: line.to_string(),
    })
}

fn bullet(line: &str) -> Option<FormattedLine> {
    let Bullet { marker, content } = match_bullet(line)?;

    if content.is_empty() {
        return Some(FormattedLine::BulletPlain {
            marker: None,
            content: line.to_string(),
        });
    }

    if content.ends_with(':') && char_len(content) < BULLET_LABEL_MAX_EXCLUSIVE {
        Some(FormattedLine::BulletLabeled {
            marker: marker.to_string(),
            content: content.to_string(),
        })
    } else {
        Some(FormattedLine::BulletPlain {
            marker: Some(marker.to_string()),
            content: content.to_string(),
        })
    }
}

fn plain(line: &str) -> Option<FormattedLine> {
    (!line.is_empty()).then(|| FormattedLine::Plain {
        text: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> Rule {
        RULES
            .iter()
            .find(|(rule_name, _)| *rule_name == name)
            .map(|(_, rule)| *rule)
            .unwrap()
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["heading", "labeled", "shout_labeled", "bullet", "plain"]
        );
    }

    #[test]
    fn test_match_bullet_markers() {
        assert_eq!(
            match_bullet("10. Tenth"),
            Some(Bullet {
                marker: "10.",
                content: "Tenth"
            })
        );
        assert_eq!(match_bullet("• Dot").map(|b| b.marker), Some("•"));
        assert_eq!(match_bullet("* Star").map(|b| b.marker), Some("*"));
        assert_eq!(match_bullet("-\tTab").map(|b| b.content), Some("Tab"));
        assert_eq!(match_bullet("10 Ten"), None);
        assert_eq!(match_bullet("+ Plus"), None);
        assert_eq!(match_bullet(""), None);
    }

    #[test]
    fn test_marker_without_whitespace_is_plain() {
        for line in ["-Tight item", "1.Introduction here", "•Dot", "*Star"] {
            assert_eq!(match_bullet(line), None, "{line}");
            assert_eq!(
                super::super::format_line(line).kind(),
                super::super::LineKind::Plain,
                "{line}"
            );
        }
    }

    #[test]
    fn test_each_rule_in_isolation() {
        assert!(rule("heading")("## Two").is_some());
        assert!(rule("heading")("No heading").is_none());

        assert!(rule("labeled")("Summary:").is_some());
        assert!(rule("labeled")("1. Numbered:").is_none());

        assert!(rule("shout_labeled")("TOP PRIORITY").is_some());
        assert!(rule("shout_labeled")("Top priority").is_none());

        assert!(rule("bullet")("- Item").is_some());
        assert!(rule("bullet")("Item").is_none());

        assert!(rule("plain")("x").is_some());
        assert!(rule("plain")("").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        // A shout line ending in a colon is claimed by the label rule first
        assert_eq!(
            super::super::format_line("SAFETY TIPS:"),
            FormattedLine::Labeled {
                text: "SAFETY TIPS:".to_string()
            }
        );
        // An all-caps dash bullet is claimed by the shout rule before the bullet rule
        assert_eq!(
            super::super::format_line("- ITEM ONE").kind(),
            super::super::LineKind::ShoutLabeled
        );
    }
}
