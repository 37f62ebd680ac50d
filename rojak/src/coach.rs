//! Pronunciation coaching
//!
//! Compares what the speech recognizer heard against the phrase the learner
//! was asked to say. Both strings are normalized first so casing, punctuation
//! and spacing never cost points.

use serde::Serialize;

/// Minimum score counted as a successful attempt
pub const PASS_SCORE: u8 = 85;

pub const PASS_MESSAGE: &str = "✅ Good pronunciation!";
pub const RETRY_MESSAGE: &str = "❌ Try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachReport {
    pub target: String,
    pub user_input: String,
    /// Similarity of the normalized strings, 0–100
    pub overall_score: u8,
    pub success: bool,
    pub message: String,
}

/// Lowercase, hyphens to spaces, strip punctuation, collapse whitespace
pub fn normalize_for_scoring(text: &str) -> String {
    text.to_lowercase()
        .replace('-', " ")
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indel ratio of two already normalized strings, `200 * lcs / (len_a + len_b)`
///
/// Truncated, never rounded: 84.6 is still a miss.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    (200 * lcs_len(&a, &b) / total) as u8
}

/// Length of the longest common subsequence, two rolling rows
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Score an attempt against its target phrase
///
/// The report echoes both inputs trimmed.
pub fn score(target: &str, user_input: &str) -> CoachReport {
    let (target, user_input) = (target.trim(), user_input.trim());
    let overall_score = similarity(
        &normalize_for_scoring(target),
        &normalize_for_scoring(user_input),
    );
    let success = overall_score >= PASS_SCORE;

    CoachReport {
        target: target.to_string(),
        user_input: user_input.to_string(),
        overall_score,
        success,
        message: if success { PASS_MESSAGE } else { RETRY_MESSAGE }.to_string(),
    }
}
