//! Identity questions answered locally.

/// Lower-case fragments that mark a question about the assistant itself.
pub const IDENTITY_PATTERNS: &[&str] = &[
    "who are you",
    "what are you",
    "who r u",
    "what r u",
    "tell me about yourself",
    "introduce yourself",
    "what is your name",
    "whats your name",
];

/// The canned answer to identity questions.
pub const IDENTITY_REPLY: &str = "I'm WLGA AI Assistant, your intelligent companion powered by advanced language models. I'm here to help you with information, automation, and support - all crafted by the WLGA team. I can assist with a wide range of topics and tasks. What would you like to know or discuss?";

/// Returns true if the trimmed, lower-cased input contains any identity pattern.
pub fn is_identity_query(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    IDENTITY_PATTERNS
        .iter()
        .any(|pattern| normalized.contains(pattern))
}
