use super::*;
use crate::types::{Color, PieceKind};

#[test]
fn test_zobrist_keys_unique() {
    // Verify that piece keys are unique (no collisions in small sample)
    let mut seen = std::collections::HashSet::new();

    for color in 0..2 {
        for piece in 0..6 {
            for sq in 0..64 {
                let key = ZOBRIST.pieces[color][piece][sq];
                assert!(seen.insert(key), "Duplicate Zobrist key found");
            }
        }
    }

    // Check side to move
    assert!(
        seen.insert(ZOBRIST.side_to_move),
        "Side to move key collision"
    );

    // Check castling combinations
    for i in 0..16 {
        assert!(seen.insert(ZOBRIST.castling[i]), "Castling key collision");
    }

    // Check en passant files 1-8
    for i in 1..9 {
        assert!(
            seen.insert(ZOBRIST.en_passant[i]),
            "En passant key collision"
        );
    }
}

#[test]
fn test_no_ep_hashes_to_zero() {
    // XOR-ing the "no en passant" slot must be a no-op.
    assert_eq!(ZOBRIST.ep_key(0), 0);
    assert_ne!(ZOBRIST.ep_key(1), 0);
}

#[test]
fn test_zobrist_piece_key() {
    let piece = Piece {
        color: Color::White,
        kind: PieceKind::Pawn,
    };
    let key1 = ZOBRIST.piece_key(piece, 0);
    let key2 = ZOBRIST.piece_key(piece, 1);
    assert_ne!(key1, key2);
}
