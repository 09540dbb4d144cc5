use super::*;
use crate::error::BoardError;

#[test]
fn test_player_opponent() {
    assert_eq!(Player::Black.opponent(), Player::White);
    assert_eq!(Player::White.opponent(), Player::Black);
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(), 7 * 15 + 7);
    assert_eq!(pos.to_index(), 112);

    let pos2 = Pos::from_index(112);
    assert_eq!(pos2, CENTER);
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(14, 14));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, -1));
    assert!(!Pos::is_valid(15, 0));
    assert!(!Pos::is_valid(0, 15));
    assert_eq!(Pos::try_new(3, 15), None);
    assert_eq!(Pos::try_new(3, 14), Some(Pos::new(3, 14)));
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 15);
    assert_eq!(TOTAL_CELLS, 225);
}

#[test]
fn test_pos_corner_indices() {
    assert_eq!(Pos::new(0, 0).to_index(), 0);
    assert_eq!(Pos::new(0, 14).to_index(), 14);
    assert_eq!(Pos::new(14, 0).to_index(), 210);
    assert_eq!(Pos::new(14, 14).to_index(), 224);
}

#[test]
fn test_pos_display() {
    assert_eq!(CENTER.to_string(), "H8");
    assert_eq!(Pos::new(0, 0).to_string(), "A1");
}

#[test]
fn test_place_stone_is_persistent() {
    let board = Board::new();
    let mv = Move::new(CENTER, Player::Black, 1);
    let next = board.place_stone(&mv).unwrap();

    assert_eq!(next.get_stone(CENTER), Some(Player::Black));
    assert_eq!(next.move_count(), 1);
    // Original untouched
    assert_eq!(board.get_stone(CENTER), None);
    assert!(board.is_empty(CENTER));
    assert_eq!(board.move_count(), 0);
}

#[test]
fn test_place_stone_every_cell_both_colors() {
    let board = Board::new();
    for idx in 0..TOTAL_CELLS {
        let pos = Pos::from_index(idx);
        for player in [Player::Black, Player::White] {
            let next = board.place(pos, player).unwrap();
            assert_eq!(next.get_stone(pos), Some(player));
        }
    }
    assert!(board.is_board_empty());
}

#[test]
fn test_place_on_occupied_fails() {
    let board = Board::new().place(CENTER, Player::Black).unwrap();
    assert_eq!(
        board.place(CENTER, Player::White),
        Err(BoardError::Occupied(CENTER))
    );
    // No overwrite happened
    assert_eq!(board.get_stone(CENTER), Some(Player::Black));
}

#[test]
fn test_place_out_of_range_fails() {
    let board = Board::new();
    let bad = Pos { row: 15, col: 3 };
    assert!(matches!(
        board.place(bad, Player::Black),
        Err(BoardError::OutOfBounds { row: 15, col: 3 })
    ));
    assert_eq!(board.get_stone(bad), None);
    assert!(!board.is_empty(bad));
}

#[test]
fn test_is_full() {
    let mut board = Board::new();
    for idx in 0..TOTAL_CELLS {
        assert!(!board.is_full());
        let player = if idx % 2 == 0 { Player::Black } else { Player::White };
        board = board.place(Pos::from_index(idx), player).unwrap();
    }
    assert!(board.is_full());
    assert_eq!(board.move_count(), TOTAL_CELLS);
}

#[test]
fn test_stones_iteration() {
    let board = Board::new()
        .place(Pos::new(0, 0), Player::Black)
        .and_then(|b| b.place(Pos::new(14, 14), Player::Black))
        .and_then(|b| b.place(CENTER, Player::White))
        .unwrap();

    let black: Vec<Pos> = board.stones(Player::Black).iter_ones().collect();
    assert_eq!(black, vec![Pos::new(0, 0), Pos::new(14, 14)]);
    assert_eq!(board.occupied().count(), 3);
    assert_eq!(board.next_color(), Player::White);
}

#[test]
fn test_display_marks_stones() {
    let board = Board::new()
        .place(CENTER, Player::Black)
        .and_then(|b| b.place(Pos::new(7, 8), Player::White))
        .unwrap();
    let text = board.to_string();
    assert!(text.contains(". X O ."));
    assert_eq!(text.lines().count(), BOARD_SIZE + 1);
}

#[test]
fn test_pos_parse_notation() {
    assert_eq!(Pos::parse("H8"), Some(CENTER));
    assert_eq!(Pos::parse(" a1 "), Some(Pos::new(0, 0)));
    assert_eq!(Pos::parse("O15"), Some(Pos::new(14, 14)));
    assert_eq!(Pos::parse("P1"), None);
    assert_eq!(Pos::parse("A16"), None);
    assert_eq!(Pos::parse("A0"), None);
    assert_eq!(Pos::parse("8H"), None);
    assert_eq!(Pos::parse(""), None);
    assert_eq!(Pos::parse(&CENTER.to_string()), Some(CENTER));
}
