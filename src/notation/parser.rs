//! The Utterance Parser (§4.C): turns a free-form lowercased utterance
//! into canonical move notation, tolerating homophone mishears from
//! speech-to-text.
//!
//! The teacher declares `regex` in its dependency table without
//! exercising it in any retrieved source; this module is where that
//! declared-but-unused dependency finally earns its keep, scanning
//! the utterance for keyword occurrences the way the original
//! firmware's `understand()` scans for `strstr` hits.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{CastleSide, PieceKind, Promotion};

/// Result of recognising an utterance: the canonical move/castle
/// string (`None` if nothing was understood), and any promotion
/// target mentioned alongside a pawn move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUtterance {
    pub canonical: Option<String>,
    pub promotion: Option<Promotion>,
}

const PIECE_WORDS: &[(&str, PieceKind)] = &[
    ("pawn", PieceKind::Pawn),
    ("pond", PieceKind::Pawn),
    ("pine", PieceKind::Pawn),
    ("pain", PieceKind::Pawn),
    ("paun", PieceKind::Pawn),
    ("night", PieceKind::Knight),
    ("horse", PieceKind::Knight),
    ("bishop", PieceKind::Bishop),
    ("rook", PieceKind::Rook),
    ("queen", PieceKind::Queen),
    ("king", PieceKind::King),
];

/// File homophones, in `a..h` order; the first letter of each word is
/// its file letter, which is what the Executor and Rule Engine expect
/// in canonical notation.
const FILE_WORDS: &[&str] = &[
    "apple", "banana", "cash", "donut", "eggplant", "falafel", "garlic", "hazelnut",
];

const RANK_WORDS: &[(&str, u8)] = &[
    ("won", 0),
    ("one", 0),
    ("1", 0),
    ("too", 1),
    ("two", 1),
    ("to", 1),
    ("2", 1),
    ("three", 2),
    ("3", 2),
    ("for", 3),
    ("four", 3),
    ("4", 3),
    ("five", 4),
    ("5", 4),
    ("stick", 5),
    ("six", 5),
    ("6", 5),
    ("seven", 6),
    ("7", 6),
    ("ate", 7),
    ("eight", 7),
    ("8", 7),
];

fn alternation(words: &[&str]) -> String {
    words.join("|")
}

static PIECE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<&str> = PIECE_WORDS.iter().map(|&(w, _)| w).collect();
    Regex::new(&alternation(&words)).expect("static piece pattern")
});

static FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&alternation(FILE_WORDS)).expect("static file pattern"));

static RANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<&str> = RANK_WORDS.iter().map(|&(w, _)| w).collect();
    Regex::new(&alternation(&words)).expect("static rank pattern")
});

fn piece_kind_for(word: &str) -> PieceKind {
    PIECE_WORDS
        .iter()
        .find(|&&(w, _)| w == word)
        .map(|&(_, k)| k)
        .expect("word came from PIECE_RE, must be in PIECE_WORDS")
}

fn rank_value_for(word: &str) -> u8 {
    RANK_WORDS
        .iter()
        .find(|&&(w, _)| w == word)
        .map(|&(_, v)| v)
        .expect("word came from RANK_RE, must be in RANK_WORDS")
}

fn file_value_for(word: &str) -> u8 {
    FILE_WORDS
        .iter()
        .position(|&w| w == word)
        .expect("word came from FILE_RE, must be in FILE_WORDS") as u8
}

/// Recognise `utterance` (already or not yet lowercased — this
/// function lowercases internally) per §4.C.
pub fn parse_utterance(utterance: &str) -> ParsedUtterance {
    let input = utterance.to_ascii_lowercase();

    let Some(piece_match) = PIECE_RE.find(&input) else {
        return ParsedUtterance::default();
    };
    let piece_word = piece_match.as_str();
    let piece_kind = piece_kind_for(piece_word);

    if input.contains("castle") {
        let canonical = if piece_word.starts_with("queen") {
            Some("o-o-o".to_string())
        } else if piece_word.starts_with("king") {
            Some("o-o".to_string())
        } else {
            None
        };
        return ParsedUtterance {
            canonical,
            promotion: None,
        };
    }

    let file_hits: Vec<u8> = FILE_RE
        .find_iter(&input)
        .take(2)
        .map(|m| file_value_for(m.as_str()))
        .collect();
    let rank_hits: Vec<u8> = RANK_RE
        .find_iter(&input)
        .take(2)
        .map(|m| rank_value_for(m.as_str()))
        .collect();

    if file_hits.is_empty() || rank_hits.is_empty() {
        return ParsedUtterance::default();
    }

    let letter = if piece_word == "horse" {
        'n'
    } else {
        piece_kind.canonical_letter()
    };
    let src_file = if file_hits.len() > 1 {
        (b'a' + file_hits[0]) as char
    } else {
        '$'
    };
    let src_rank = if rank_hits.len() > 1 {
        (b'1' + rank_hits[0]) as char
    } else {
        '$'
    };
    let dst_file = (b'a' + *file_hits.last().unwrap()) as char;
    let dst_rank = (b'1' + *rank_hits.last().unwrap()) as char;

    let canonical = format!("{letter}{src_file}{src_rank}{dst_file}{dst_rank}");

    let promotion = (piece_kind == PieceKind::Pawn)
        .then(|| {
            if input.contains("queen") {
                Some(Promotion::Queen)
            } else if input.contains("rook") {
                Some(Promotion::Rook)
            } else if input.contains("bishop") {
                Some(Promotion::Bishop)
            } else if input.contains("night") || input.contains("horse") {
                Some(Promotion::Knight)
            } else {
                None
            }
        })
        .flatten();

    ParsedUtterance {
        canonical: Some(canonical),
        promotion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_pawn_move_from_homophones() {
        // Deliberately avoids "to" as a filler word — the original
        // firmware's comment warns against it, since "to" is itself
        // a rank-two homophone.
        let parsed = parse_utterance("move the pawn from eggplant too eggplant for");
        assert_eq!(parsed.canonical.as_deref(), Some("pe2e4"));
    }

    #[test]
    fn recognises_single_file_and_rank_as_destination_only() {
        let parsed = parse_utterance("knight move falafel three");
        assert_eq!(parsed.canonical.as_deref(), Some("n$$f3"));
    }

    #[test]
    fn recognises_castling() {
        assert_eq!(
            parse_utterance("castle king side please").canonical.as_deref(),
            Some("o-o")
        );
        assert_eq!(
            parse_utterance("i'd like to castle queenside").canonical.as_deref(),
            Some("o-o-o")
        );
    }

    #[test]
    fn latches_promotion_target_only_for_pawns() {
        let parsed = parse_utterance("pawn donut seven donut ate promote queen");
        assert_eq!(parsed.promotion, Some(Promotion::Queen));

        let parsed = parse_utterance("rook apple won apple ate");
        assert_eq!(parsed.promotion, None);
    }

    #[test]
    fn unrecognised_utterance_returns_empty() {
        let parsed = parse_utterance("the weather is nice today");
        assert_eq!(parsed.canonical, None);
    }
}
