//! Per-keyword match strength.

use crate::rules::Keyword;

pub const BASE_MATCH_SCORE: f64 = 0.1;
pub const EXACT_MATCH_BONUS: f64 = 0.3;
pub const WORD_BOUNDARY_BONUS: f64 = 0.15;
/// Bonus for a keyword at position 0, shrinking linearly towards the end.
pub const MAX_POSITION_BONUS: f64 = 0.1;
pub const LONG_KEYWORD_BONUS: f64 = 0.1;
pub const MEDIUM_KEYWORD_BONUS: f64 = 0.05;
pub const MAX_MATCH_SCORE: f64 = 0.4;

/// Outcome of testing one keyword against one description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordMatch {
    pub is_match: bool,
    /// In `[0, MAX_MATCH_SCORE]`; zero when there is no match.
    pub score: f64,
}

impl KeywordMatch {
    pub const MISS: KeywordMatch = KeywordMatch {
        is_match: false,
        score: 0.0,
    };
}

/// Score `keyword` against an already trimmed, lowercased description.
///
/// Positions and lengths are counted in characters.
pub fn score_keyword(description: &str, keyword: &Keyword) -> KeywordMatch {
    let Some(byte_pos) = description.find(keyword.as_str()) else {
        return KeywordMatch::MISS;
    };

    let mut score = BASE_MATCH_SCORE;

    if description == keyword.as_str() {
        score += EXACT_MATCH_BONUS;
    }

    if keyword.matches_whole_word(description) {
        score += WORD_BOUNDARY_BONUS;
    }

    // Non-empty: it contains a non-empty keyword.
    let length = description.chars().count() as f64;
    let position = description[..byte_pos].chars().count() as f64;
    score += MAX_POSITION_BONUS * (1.0 - position / length);

    score += length_bonus(keyword.char_len());

    KeywordMatch {
        is_match: true,
        score: score.min(MAX_MATCH_SCORE),
    }
}

fn length_bonus(len: usize) -> f64 {
    if len > 8 {
        LONG_KEYWORD_BONUS
    } else if len > 5 {
        MEDIUM_KEYWORD_BONUS
    } else {
        0.0
    }
}
