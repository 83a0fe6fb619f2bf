//! Canonical move notation (§6): the 5-character wire format produced
//! by the Utterance Parser and consumed by the Rule Engine / Move
//! Executor, plus the `o-o` / `o-o-o` castling tokens.

pub mod parser;

use std::fmt::{self, Display};

use chumsky::{Parser, prelude::*};

use crate::model::{CastleSide, PieceKind};

/// A parsed move, still unresolved against any particular position:
/// either a regular move (possibly with `$` wildcards in the source
/// squares) or a castling token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveToken {
    Regular(RegularMove),
    Castle(CastleSide),
}

/// The five fields of a canonical regular move: `piece file rank file
/// rank`. `src_file`/`src_rank` are `None` when the corresponding
/// character was `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularMove {
    pub kind: PieceKind,
    pub src_file: Option<u8>,
    pub src_rank: Option<u8>,
    pub dst_file: u8,
    pub dst_rank: u8,
}

impl Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveToken::Castle(CastleSide::Kingside) => f.write_str("o-o"),
            MoveToken::Castle(CastleSide::Queenside) => f.write_str("o-o-o"),
            MoveToken::Regular(m) => m.fmt(f),
        }
    }
}

impl Display for RegularMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_char = |file: Option<u8>| match file {
            Some(v) => (b'a' + v) as char,
            None => '$',
        };
        let rank_char = |rank: Option<u8>| match rank {
            Some(v) => (b'1' + v) as char,
            None => '$',
        };
        write!(
            f,
            "{}{}{}{}{}",
            self.kind.canonical_letter(),
            file_char(self.src_file),
            rank_char(self.src_rank),
            (b'a' + self.dst_file) as char,
            (b'1' + self.dst_rank) as char,
        )
    }
}

fn file_or_wildcard<'s>() -> impl Parser<'s, &'s str, Option<u8>> {
    one_of("abcdefgh$").map(|c: char| if c == '$' { None } else { Some(c as u8 - b'a') })
}

fn rank_or_wildcard<'s>() -> impl Parser<'s, &'s str, Option<u8>> {
    one_of("12345678$").map(|c: char| if c == '$' { None } else { Some(c as u8 - b'1') })
}

fn piece_letter<'s>() -> impl Parser<'s, &'s str, PieceKind> {
    one_of("pnbrqk").map(|c| PieceKind::from_canonical_letter(c).expect("one_of restricted to valid letters"))
}

fn regular_parser<'s>() -> impl Parser<'s, &'s str, RegularMove> {
    group((
        piece_letter(),
        file_or_wildcard(),
        rank_or_wildcard(),
        one_of("abcdefgh").map(|c: char| c as u8 - b'a'),
        one_of("12345678").map(|c: char| c as u8 - b'1'),
    ))
    .map_group(|kind, src_file, src_rank, dst_file, dst_rank| RegularMove {
        kind,
        src_file,
        src_rank,
        dst_file,
        dst_rank,
    })
}

fn castle_parser<'s>() -> impl Parser<'s, &'s str, CastleSide> {
    choice((
        just("o-o-o").to(CastleSide::Queenside),
        just("o-o").to(CastleSide::Kingside),
    ))
}

fn token_parser<'s>() -> impl Parser<'s, &'s str, MoveToken> {
    choice((
        castle_parser().map(MoveToken::Castle),
        regular_parser().map(MoveToken::Regular),
    ))
    .then_ignore(end())
}

/// Syntactic validation of a canonical string (§4.H: "validate
/// canonical form (length >= 5, piece letter in {p,n,b,r,q,k}, ranks
/// in {a..h,$}, files in {1..8,$})"). Returns `None` if the string is
/// not well-formed; this says nothing about whether the move is legal
/// in any particular position.
pub fn parse_canonical(s: &str) -> Option<MoveToken> {
    token_parser().parse(s).into_result().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_regular_move_with_wildcards() {
        let token = parse_canonical("p$$e4").unwrap();
        assert_eq!(
            token,
            MoveToken::Regular(RegularMove {
                kind: PieceKind::Pawn,
                src_file: None,
                src_rank: None,
                dst_file: 4,
                dst_rank: 3,
            })
        );
    }

    #[test]
    fn parses_fully_specified_move() {
        let token = parse_canonical("ne1f3").unwrap();
        assert_eq!(
            token,
            MoveToken::Regular(RegularMove {
                kind: PieceKind::Knight,
                src_file: Some(4),
                src_rank: Some(0),
                dst_file: 5,
                dst_rank: 2,
            })
        );
    }

    #[test]
    fn distinguishes_castling_tokens() {
        assert_eq!(
            parse_canonical("o-o-o").unwrap(),
            MoveToken::Castle(CastleSide::Queenside)
        );
        assert_eq!(parse_canonical("o-o").unwrap(), MoveToken::Castle(CastleSide::Kingside));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_canonical("").is_none());
        assert!(parse_canonical("zzzzz").is_none());
        assert!(parse_canonical("pe4e4e4").is_none());
    }

    #[test]
    fn round_trips_through_display() {
        let token = MoveToken::Regular(RegularMove {
            kind: PieceKind::Queen,
            src_file: None,
            src_rank: Some(3),
            dst_file: 7,
            dst_rank: 7,
        });
        assert_eq!(parse_canonical(&token.to_string()).unwrap(), token);
    }
}
