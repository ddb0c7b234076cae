//! Sample questions offered on the empty-conversation screen.

use rand::Rng;
use rand::seq::SliceRandom;

/// How many samples the welcome screen lists.
pub const WELCOME_SAMPLE_COUNT: usize = 12;

pub const SAMPLE_QUESTIONS: &[&str] = &[
    "Can you tell me about the renewable LPG project in Chile? Sounds interesting!",
    "I'm setting up a commercial kitchen - what should I know about using LPG safely?",
    "How does LPG work with fuel cells? Is it a good alternative energy source?",
    "What's happening with LPG adoption in Africa? Any success stories?",
    "Can LPG be used in emergency situations or disaster relief?",
    "How can LPG help in refugee camps and emergency situations?",
    "What are the benefits of using LPG in humanitarian aid?",
    "How does LPG compare to other fuels in disaster relief operations?",
    "What challenges do humanitarian organizations face when using LPG?",
    "Can LPG be used for cooking in refugee settlements?",
    "What safety measures are needed for LPG in humanitarian settings?",
    "What's the plan for expanding LPG use across Africa?",
    "Which African countries are leading in LPG adoption?",
    "What are the main barriers to LPG growth in Africa?",
    "How can LPG help improve energy access in rural Africa?",
    "What infrastructure is needed for LPG distribution in Africa?",
    "Are there any success stories of LPG projects in Africa?",
    "What are the prospects for LPG as marine fuel?",
    "How is the renewable LPG project in Chile performing?",
    "What are the latest LPG market statistics and trends?",
    "What best practices exist for LPG in institutional kitchens?",
    "How can LPG be used in fuel cell technology?",
];

/// The samples shown on the welcome screen.
pub fn welcome_samples() -> &'static [&'static str] {
    &SAMPLE_QUESTIONS[..WELCOME_SAMPLE_COUNT.min(SAMPLE_QUESTIONS.len())]
}

/// Looks up a welcome sample by its 1-based position on screen.
pub fn welcome_sample(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| welcome_samples().get(index))
        .copied()
}

/// Picks a question uniformly from the full list.
pub fn random_sample<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SAMPLE_QUESTIONS.choose(rng).copied().unwrap_or(SAMPLE_QUESTIONS[0])
}
