//! Terminal rendering of chat messages.

use colored::{ColoredString, Colorize};
use wlga_core::format::{FormattedLine, format_message};
use wlga_core::samples::welcome_samples;
use wlga_core::session::Message;

pub const ASSISTANT_NAME: &str = "WLGA AI Assistant";
pub const DISCLAIMER: &str =
    "WLGA AI Assistant can make mistakes. Consider checking important information.";

const INDENT: &str = "  ";

/// Levels 1 and 2 stand out; deeper levels are only bold.
fn heading(level: u8, text: &str) -> ColoredString {
    match level {
        1 => text.bright_white().bold().underline(),
        2 => text.bright_white().bold(),
        _ => text.bold(),
    }
}

/// Renders one formatted line with terminal styling.
pub fn render_line(line: &FormattedLine) -> String {
    match line {
        FormattedLine::Heading { level, text } => heading(*level, text).to_string(),
        FormattedLine::Labeled { text } => text.bold().to_string(),
        FormattedLine::ShoutLabeled { text } => text.bold().underline().to_string(),
        FormattedLine::BulletLabeled { marker, content } => {
            format!("{} {}", marker.bold(), content.bold())
        }
        FormattedLine::BulletPlain {
            marker: Some(marker),
            content,
        } => format!("{} {}", marker.bold(), content),
        FormattedLine::BulletPlain {
            marker: None,
            content,
        } => content.clone(),
        FormattedLine::Plain { text } => text.clone(),
        FormattedLine::Blank => String::new(),
    }
}

/// Renders a message as a header line followed by its formatted body.
pub fn render_message(message: &Message) -> Vec<String> {
    let header = if message.is_user() {
        "You".bright_green().bold().to_string()
    } else {
        ASSISTANT_NAME.bright_magenta().bold().to_string()
    };

    let mut lines = vec![header];
    lines.extend(format_message(&message.text).iter().map(|line| {
        let rendered = render_line(line);
        if rendered.is_empty() {
            rendered
        } else {
            format!("{}{}", INDENT, rendered)
        }
    }));
    lines
}

/// The empty-conversation screen: title, intro and numbered sample questions.
pub fn welcome_screen() -> Vec<String> {
    let mut lines = vec![
        format!("Welcome to {}", ASSISTANT_NAME)
            .bright_magenta()
            .bold()
            .to_string(),
        "Your intelligent companion for LPG industry insights and expertise.".to_string(),
        "Enter a number to ask one of the questions below, or type your own question."
            .bright_black()
            .to_string(),
        String::new(),
    ];
    lines.extend(
        welcome_samples()
            .iter()
            .enumerate()
            .map(|(index, question)| format!("{:>4}. {}", index + 1, question)),
    );
    lines.push(String::new());
    lines.push(
        "Type /random to ask a random question."
            .bright_black()
            .to_string(),
    );
    lines
}
