use super::*;
use crate::rules::{completes_region, is_legal, legal_actions};

fn tile(owner: usize, shape: usize) -> Tile {
    Tile::new(Player::from_index(owner).unwrap(), Shape::from_index(shape).unwrap())
}

fn assert_supply_invariant(position: &Position) {
    for player in [Player::First, Player::Second] {
        for shape in Shape::ALL {
            let on_board = position.board().pieces(player, shape).count() as u8;
            assert_eq!(position.supply(player, shape) + on_board, COPIES_PER_SHAPE);
        }
    }
    assert_eq!(position.board().tile_count(), position.depth() as u32);
    assert_eq!(position.player(), Player::to_move_at(position.depth()));
}

#[test]
fn test_new_position() {
    let position = Position::new();
    assert_eq!(position.depth(), 0);
    assert_eq!(position.player(), Player::First);
    assert_eq!(position.board().tile_count(), 0);
    assert_supply_invariant(&position);
}

#[test]
fn test_pos_quadrant() {
    assert_eq!(Pos::new(0, 0).quadrant(), 0);
    assert_eq!(Pos::new(1, 3).quadrant(), 1);
    assert_eq!(Pos::new(2, 1).quadrant(), 2);
    assert_eq!(Pos::new(3, 2).quadrant(), 3);
}

#[test]
fn test_pos_index_round_trip() {
    for idx in 0..TOTAL_CELLS {
        assert_eq!(Pos::from_index(idx).to_index(), idx);
    }
}

#[test]
fn test_shape_numbers() {
    for shape in Shape::ALL {
        assert_eq!(Shape::from_number(shape.number()), Some(shape));
    }
    assert_eq!(Shape::from_number(0), None);
    assert_eq!(Shape::from_number(5), None);
}

#[test]
fn test_apply_undo_every_first_move() {
    let mut position = Position::new();
    let start = position.clone();
    for action in Action::all() {
        position.apply(action);
        assert_eq!(position.depth(), 1);
        assert_eq!(position.player(), Player::Second);
        assert_eq!(position.board().get(action.pos), Some(Tile::new(Player::First, action.shape)));
        assert_eq!(position.supply(Player::First, action.shape), 1);
        assert_supply_invariant(&position);
        position.undo(action);
        assert_eq!(position, start);
    }
}

#[test]
fn test_apply_undo_deep_line() {
    let mut position = Position::new();
    let start = position.clone();
    let mut history = Vec::new();
    let mut snapshots = vec![position.clone()];

    // Always take the first legal move until the game ends
    loop {
        let Some(&action) = legal_actions(&position).first() else {
            break;
        };
        position.apply(action);
        history.push(action);
        snapshots.push(position.clone());
        assert_supply_invariant(&position);
        if completes_region(&position, action) {
            break;
        }
    }
    assert!(history.len() >= 4);

    while let Some(action) = history.pop() {
        snapshots.pop();
        position.undo(action);
        assert_eq!(Some(&position), snapshots.last());
    }
    assert_eq!(position, start);
}

#[test]
fn test_guard_undoes_on_drop() {
    let mut position = Position::new();
    let action = Action::new(Pos::new(1, 2), Shape::Cone);
    {
        let mut child = position.play(action);
        assert_eq!(child.action(), action);
        assert_eq!(child.player(), Player::Second);
        let reply = Action::new(Pos::new(3, 3), Shape::Cube);
        let grandchild = child.play(reply);
        assert_eq!(grandchild.depth(), 2);
    }
    assert_eq!(position, Position::new());
}

#[test]
fn test_nested_guards_unwind_in_order() {
    fn descend<N: Playable>(node: &mut N, line: &[Action]) -> u8 {
        match line.split_first() {
            None => node.position().depth(),
            Some((&action, rest)) => descend(&mut node.play(action), rest),
        }
    }

    let line: Vec<Action> = "000 011 300 311".split_whitespace().map(|m| m.parse().unwrap()).collect();
    let mut position = Position::new();
    assert_eq!(descend(&mut position, &line), 4);
    assert_eq!(position, Position::new());
}

#[test]
fn test_guard_undoes_on_early_return() {
    fn first_illegal_reply(position: &mut Position, action: Action) -> Result<(), Action> {
        let child = position.play(action);
        for reply in Action::all() {
            if !is_legal(&child, reply) {
                return Err(reply);
            }
        }
        Ok(())
    }

    let mut position = Position::new();
    let blocked = first_illegal_reply(&mut position, Action::new(Pos::new(0, 0), Shape::Cube));
    // The occupied cell itself is the first illegal reply
    assert_eq!(blocked, Err(Action::new(Pos::new(0, 0), Shape::Cube)));
    assert_eq!(position, Position::new());
}

#[test]
fn test_from_tiles_matches_played_line() {
    let line = [
        Action::new(Pos::new(0, 0), Shape::Cube),
        Action::new(Pos::new(0, 1), Shape::Cylinder),
        Action::new(Pos::new(0, 2), Shape::Cone),
    ];
    let mut played = Position::new();
    for action in line {
        played.apply(action);
    }

    let built = Position::from_tiles(&[
        (Pos::new(0, 0), tile(0, 0)),
        (Pos::new(0, 1), tile(1, 1)),
        (Pos::new(0, 2), tile(0, 2)),
    ])
    .unwrap();
    assert_eq!(built, played);
    assert_eq!(built.player(), Player::Second);
}

#[test]
fn test_from_tiles_rejects_duplicate_cell() {
    let err = Position::from_tiles(&[(Pos::new(2, 2), tile(0, 0)), (Pos::new(2, 2), tile(1, 1))]).unwrap_err();
    assert_eq!(err, PositionError::DuplicateCell { row: 2, col: 2 });
}

#[test]
fn test_from_tiles_rejects_supply_overflow() {
    let err = Position::from_tiles(&[
        (Pos::new(0, 0), tile(1, 3)),
        (Pos::new(1, 1), tile(1, 3)),
        (Pos::new(2, 2), tile(1, 3)),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        PositionError::SupplyExceeded {
            player: Player::Second,
            shape: Shape::Sphere
        }
    );
}

#[test]
fn test_from_tiles_rejects_unbalanced_counts() {
    let err = Position::from_tiles(&[(Pos::new(0, 0), tile(1, 0))]).unwrap_err();
    assert_eq!(err, PositionError::Unbalanced { first: 0, second: 1 });

    let err = Position::from_tiles(&[(Pos::new(0, 0), tile(0, 0)), (Pos::new(3, 3), tile(0, 1))]).unwrap_err();
    assert_eq!(err, PositionError::Unbalanced { first: 2, second: 0 });
}

#[test]
fn test_board_display() {
    let position = Position::from_tiles(&[(Pos::new(0, 0), tile(0, 2)), (Pos::new(3, 1), tile(1, 0))]).unwrap();
    let text = position.board().to_string();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows, vec![" 2 . . .", " . . . .", " . . . .", " .*0 . ."]);
}

#[test]
fn test_board_tiles_iterates_in_index_order() {
    let position = Position::from_tiles(&[(Pos::new(3, 3), tile(0, 1)), (Pos::new(0, 1), tile(1, 2))]).unwrap();
    let tiles: Vec<(Pos, Tile)> = position.board().tiles().collect();
    assert_eq!(tiles, vec![(Pos::new(0, 1), tile(1, 2)), (Pos::new(3, 3), tile(0, 1))]);
}
