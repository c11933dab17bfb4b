//! Conversational Structure Analysis.
//!
//! Detects the round-table dialogue shape of a transcript and measures how
//! much of it is made of open questions and synthesis statements.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Minimum number of "Speaker: utterance" lines for a round table
const ROUND_TABLE_MIN_LINES: usize = 3;
/// Open questions needed for a facilitated retrospective shape
const FACILITATED_MIN_QUESTIONS: usize = 3;
/// Synthesis statements needed for a facilitated retrospective shape
const FACILITATED_MIN_SYNTHESES: usize = 1;

// NOTE: expect() is acceptable here per STANDARDS.md: static patterns.
static SPEAKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[[\d:.,]+\]\s*)?\p{L}[\p{L}\p{N}._' -]{0,40}:\s*\S")
        .expect("Invalid regex: speaker line")
});

static OPEN_QUESTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(qu'est-ce qui|qu'est-ce que|qu'avons-nous|comment pourrions-nous|comment pourrait-on|que pensez-vous|qu'en pensez-vous|comment vous sentez-vous|comment avez-vous vécu|what went|how might we|how could we|how do you feel|what do you think)",
    )
    .expect("Invalid regex: open questions")
});

static SYNTHESIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(pour résumer|en résumé|pour conclure|en conclusion|si je résume|on retient|to summarize|in summary|to wrap up|let's wrap up)",
    )
    .expect("Invalid regex: synthesis statements")
});

/// Dialogue shape of a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationalStructure {
    pub has_round_table_structure: bool,
    pub open_questions_count: usize,
    pub synthesis_count: usize,
    pub likes_facilitated_retro: bool,
}

/// Count non-blank lines shaped like "Speaker: utterance"
pub fn speaker_lines(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| SPEAKER_LINE.is_match(line))
        .count()
}

/// Analyze the conversational structure of a transcript
pub fn analyze(text: &str) -> ConversationalStructure {
    let open_questions_count = OPEN_QUESTIONS.find_iter(text).count();
    let synthesis_count = SYNTHESIS.find_iter(text).count();

    let structure = ConversationalStructure {
        has_round_table_structure: speaker_lines(text) >= ROUND_TABLE_MIN_LINES,
        open_questions_count,
        synthesis_count,
        likes_facilitated_retro: open_questions_count >= FACILITATED_MIN_QUESTIONS
            && synthesis_count >= FACILITATED_MIN_SYNTHESES,
    };
    debug!(?structure, "conversational structure");
    structure
}
