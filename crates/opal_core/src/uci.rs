//! Long-algebraic move text, e.g. `e2e4`, `e7e8q`, `e1g1` for castling.

use crate::board::Board;
use crate::movegen::generate_moves;
use crate::types::{Move, PieceKind, coord_to_sq, sq_to_coord};

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::new();
    s.push_str(&sq_to_coord(mv.from_sq()));
    s.push_str(&sq_to_coord(mv.to_sq()));
    if let Some(p) = mv.promotion {
        // Output always uses the standard letters.
        let ch = match p {
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            _ => 'q',
        };
        s.push(ch);
    }
    s
}

/// Parse move text and match it against the legal move list, so the
/// special-move flags (castle, en passant, double push) come out correct.
///
/// Promotion letters: `q`, `r`, `b`, and `k` for knight are accepted, as
/// is the standard `n`.
pub fn parse_move(board: &mut Board, txt: &str) -> Option<Move> {
    if txt.len() < 4 {
        return None;
    }
    let from = coord_to_sq(&txt[0..2])?;
    let to = coord_to_sq(&txt[2..4])?;
    let promo = if txt.len() >= 5 {
        match txt.as_bytes()[4] as char {
            'q' | 'Q' => Some(PieceKind::Queen),
            'r' | 'R' => Some(PieceKind::Rook),
            'b' | 'B' => Some(PieceKind::Bishop),
            'k' | 'K' | 'n' | 'N' => Some(PieceKind::Knight),
            _ => return None,
        }
    } else {
        None
    };

    let (legals, _) = generate_moves(board);
    legals
        .into_iter()
        .find(|m| m.from_sq() == from && m.to_sq() == to && m.promotion == promo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoveFlag;

    #[test]
    fn test_move_to_uci() {
        let mv = Move::new(12, 28, PieceKind::Pawn);
        assert_eq!(move_to_uci(mv), "e2e4");

        let mut promo = Move::new(48, 56, PieceKind::Pawn);
        promo.promotion = Some(PieceKind::Knight);
        assert_eq!(move_to_uci(promo), "a7a8n");
    }

    #[test]
    fn test_parse_move_recovers_flags() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = parse_move(&mut board, "e1g1").unwrap();
        assert_eq!(mv.flag, MoveFlag::CastleKingside);

        let mut board = Board::startpos();
        let mv = parse_move(&mut board, "e2e4").unwrap();
        assert_eq!(mv.flag, MoveFlag::DoublePush);

        let mut board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = parse_move(&mut board, "e5d6").unwrap();
        assert_eq!(mv.flag, MoveFlag::EnPassant);
    }

    #[test]
    fn test_parse_move_promotion_letters() {
        let fen = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1";

        let mut board = Board::from_fen(fen).unwrap();
        let mv = parse_move(&mut board, "a7a8q").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Queen));

        // 'k' means knight on input.
        let mv = parse_move(&mut board, "a7a8k").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        let mv = parse_move(&mut board, "a7a8n").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));

        // A bare push to the last rank matches no legal move.
        assert!(parse_move(&mut board, "a7a8").is_none());
    }

    #[test]
    fn test_parse_move_rejects_garbage() {
        let mut board = Board::startpos();
        assert!(parse_move(&mut board, "").is_none());
        assert!(parse_move(&mut board, "e2").is_none());
        assert!(parse_move(&mut board, "e2e5").is_none()); // not legal
        assert!(parse_move(&mut board, "z9z9").is_none());
        assert!(parse_move(&mut board, "e7e8x").is_none());
    }
}
