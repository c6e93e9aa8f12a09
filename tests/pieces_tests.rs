//! Pieces tests - catalog shapes and rotation

use tetrecs::core::pieces::{get_pattern, rotate, rotate_reversed};
use tetrecs::core::{create_piece, CoreError, Piece};
use tetrecs::types::{PieceKind, ALL_PIECES, PIECE_COUNT};

// ============== Catalog ==============

#[test]
fn test_catalog_block_counts() {
    let expected = [
        (PieceKind::Line, 3),
        (PieceKind::C, 5),
        (PieceKind::Plus, 5),
        (PieceKind::Dot, 1),
        (PieceKind::Square, 4),
        (PieceKind::L, 4),
        (PieceKind::J, 4),
        (PieceKind::S, 4),
        (PieceKind::Z, 4),
        (PieceKind::T, 4),
        (PieceKind::X, 5),
        (PieceKind::Corner, 3),
        (PieceKind::InverseCorner, 3),
        (PieceKind::Double, 2),
        (PieceKind::Triple, 3),
    ];
    assert_eq!(expected.len(), PIECE_COUNT);
    for (kind, blocks) in expected {
        assert_eq!(Piece::new(kind).blocks().len(), blocks, "{:?}", kind);
    }
}

#[test]
fn test_create_piece_by_index() {
    for (i, kind) in ALL_PIECES.iter().enumerate() {
        let piece = create_piece(i).unwrap();
        assert_eq!(piece.kind(), *kind);
        assert_eq!(piece.color(), i as u8 + 1);
    }
    assert_eq!(create_piece(15), Err(CoreError::InvalidPieceIndex(15)));
}

#[test]
fn test_colors_are_distinct_and_nonzero() {
    let mut seen = [false; PIECE_COUNT + 1];
    for kind in ALL_PIECES {
        let color = kind.color() as usize;
        assert!(color > 0);
        assert!(!seen[color], "duplicate color {}", color);
        seen[color] = true;
        assert_eq!(PieceKind::from_color(kind.color()), Some(kind));
    }
}

// ============== Rotation ==============

#[test]
fn test_symmetric_pieces_ignore_rotation() {
    for kind in [PieceKind::Dot, PieceKind::Plus, PieceKind::X] {
        let p = get_pattern(kind);
        assert_eq!(rotate(&p, 1), p, "{:?}", kind);
    }
}

#[test]
fn test_line_turns_vertical() {
    let mut line = Piece::new(PieceKind::Line);
    line.rotate(1);
    assert_eq!(*line.pattern(), get_pattern(PieceKind::Triple));
}

#[test]
fn test_four_turns_identity() {
    for kind in ALL_PIECES {
        let mut piece = Piece::new(kind);
        let original = piece;
        for _ in 0..4 {
            piece.rotate(1);
        }
        assert_eq!(piece, original);
        piece.rotate_reversed(2);
        assert_eq!(*piece.pattern(), rotate(&get_pattern(kind), 2));
    }
}

#[test]
fn test_counter_clockwise_is_three_clockwise() {
    for kind in ALL_PIECES {
        let p = get_pattern(kind);
        assert_eq!(rotate_reversed(&p, 1), rotate(&p, 3));
    }
}
