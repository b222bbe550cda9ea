//! Integration tests for the turn controller: placement, rotation, delivery
//! and the two reference scenarios.

use parcelbots::{
    BoardLayout, CellColor, Controller, Direction, GameConfig, GameEvent, GamePhase, InputEvent,
    ParcelResult, Position, RejectionKind, Strategy, TurnController,
};

/// 4x4 board: shelf at a2 with its loading spot at a1, target 3 at d4.
fn corner_layout() -> BoardLayout {
    BoardLayout::new(
        &["awww", "rwww", "wwww", "wwwy"],
        vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 3],
        ],
    )
}

fn open_layout(size: usize) -> BoardLayout {
    let row = "w".repeat(size);
    let rows: Vec<&str> = (0..size).map(|_| row.as_str()).collect();
    BoardLayout::without_targets(&rows)
}

fn set_shelf(controller: &mut TurnController<Vec<GameEvent>>, shelf: Position, number: u8) -> ParcelResult<()> {
    let board = &mut controller.state_mut().board;
    board.take_package(shelf);
    board.place_package(shelf, number)?;
    board.reveal_package(shelf);
    Ok(())
}

#[test]
fn test_placement_counts_and_rotation() -> ParcelResult<()> {
    let config = GameConfig {
        num_players: 3,
        robots_per_player: 2,
        ..GameConfig::new()
    };
    let mut controller = TurnController::with_sink(config, open_layout(5), Vec::new())?;
    let total = 6;

    for placed in 0..total {
        assert_eq!(controller.phase(), GamePhase::Placing);
        let before = controller.state().board.occupied_count();
        let current = controller.state().current_player;
        let Some(pos) = controller.state_mut().random_placement() else {
            panic!("open board has free cells");
        };

        assert!(controller.handle_input(InputEvent::PlaceAt(pos)));
        assert_eq!(controller.state().board.occupied_count(), before + 1);

        if placed + 1 < total {
            assert_eq!(controller.state().current_player, (current + 1) % 3);
        }
    }

    assert_eq!(controller.phase(), GamePhase::Playing);
    assert_eq!(
        controller
            .sink()
            .iter()
            .filter(|event| **event == GameEvent::PlacingFinished)
            .count(),
        1
    );
    Ok(())
}

#[test]
fn test_rejected_placement_changes_nothing() -> ParcelResult<()> {
    let mut controller = TurnController::with_sink(GameConfig::for_testing(2), corner_layout(), Vec::new())?;

    // shelf, loading spot and target cells are not white
    for cell in [Position::new(0, 1), Position::new(0, 0), Position::new(3, 3), Position::new(4, 0)] {
        assert!(!controller.handle_input(InputEvent::PlaceAt(cell)));
    }
    assert_eq!(controller.state().board.occupied_count(), 0);
    assert_eq!(controller.state().current_player, 0);
    assert!(controller.sink().iter().all(|event| matches!(
        event,
        GameEvent::Rejected { kind: RejectionKind::IllegalPlacement, .. }
    )));
    Ok(())
}

#[test]
fn test_rotation_returns_to_first_player() -> ParcelResult<()> {
    let mut controller = TurnController::with_sink(GameConfig::for_testing(3), open_layout(4), Vec::new())?;
    for x in 0..3 {
        controller.handle_input(InputEvent::PlaceAt(Position::new(x, 0)));
    }
    assert_eq!(controller.phase(), GamePhase::Playing);

    for round in 0..3 {
        for player in 0..3 {
            assert_eq!(controller.state().current_player, player);
            // players spend a different number of moves before passing
            for _ in 0..(player + round) % 3 {
                let direction = if round % 2 == 0 { Direction::Down } else { Direction::Up };
                controller.handle_input(InputEvent::MoveDirection(direction));
            }
            controller.handle_input(InputEvent::SwitchPlayer);
        }
        assert_eq!(controller.state().current_player, 0);
    }
    Ok(())
}

#[test]
fn test_spent_budget_rotates_turn() -> ParcelResult<()> {
    let config = GameConfig {
        move_limit_per_turn: 3,
        ..GameConfig::for_testing(2)
    };
    let mut controller = TurnController::with_sink(config, open_layout(4), Vec::new())?;
    controller.handle_input(InputEvent::PlaceAt(Position::new(0, 0)));
    controller.handle_input(InputEvent::PlaceAt(Position::new(3, 3)));

    for direction in [Direction::Right, Direction::Down, Direction::Right] {
        assert_eq!(controller.state().current_player, 0);
        assert!(controller.handle_input(InputEvent::MoveDirection(direction)));
    }
    assert_eq!(controller.state().current_player, 1);
    assert_eq!(controller.state().players[0].remaining_moves, 3);
    Ok(())
}

#[test]
fn test_manual_pickup_and_delivery() -> ParcelResult<()> {
    let config = GameConfig {
        delivery_reward: 3,
        placement_colors: vec![CellColor::White, CellColor::Pickup],
        ..GameConfig::for_testing(1)
    };
    let mut controller = TurnController::with_sink(config, corner_layout(), Vec::new())?;
    set_shelf(&mut controller, Position::new(0, 1), 3)?;
    controller.handle_input(InputEvent::PlaceAt(Position::new(0, 0)));

    // a robot placed on the loading spot is loaded as soon as play starts
    assert_eq!(controller.state().players[0].robots[0].held_number(), Some(3));
    assert!(controller
        .sink()
        .iter()
        .any(|event| matches!(event, GameEvent::PackagePickedUp { number: 3, .. })));
    assert_eq!(controller.state().players[0].remaining_moves, 10);

    for direction in [
        Direction::Right,
        Direction::Down,
        Direction::Down,
        Direction::Down,
        Direction::Right,
        Direction::Right,
    ] {
        assert!(controller.handle_input(InputEvent::MoveDirection(direction)));
    }

    let state = controller.state();
    assert_eq!(state.players[0].score, 3);
    assert!(!state.players[0].robots[0].has_package());
    assert!(controller.sink().contains(&GameEvent::TurnEnded {
        player: 0,
        next_player: 0,
        unused_moves: 4,
    }));
    Ok(())
}

#[test]
fn test_auto_player_scenario() -> ParcelResult<()> {
    let config = GameConfig {
        controllers: vec![Controller::Auto(Strategy::GreedyNearest)],
        placement_colors: vec![CellColor::White, CellColor::Pickup],
        ..GameConfig::for_testing(1)
    };
    let mut controller = TurnController::with_sink(config, corner_layout(), Vec::new())?;
    set_shelf(&mut controller, Position::new(0, 1), 3)?;
    controller.state_mut().place_robot(Position::new(0, 0))?;
    assert_eq!(controller.state().players[0].robots[0].held_number(), Some(3));

    assert!(controller.step());

    let events = controller.sink();
    let steps = events
        .iter()
        .filter(|event| matches!(event, GameEvent::RobotMoved { .. }))
        .count();
    assert_eq!(steps, 6);
    assert!(events.iter().any(|event| matches!(
        event,
        GameEvent::PackageDelivered { number: 3, position, score: 1, .. } if *position == Position::new(3, 3)
    )));
    assert!(events.contains(&GameEvent::TurnEnded {
        player: 0,
        next_player: 0,
        unused_moves: 4,
    }));
    assert!(!events.iter().any(|event| matches!(event, GameEvent::Stalemate { .. })));

    // the forfeited moves are not carried into the next turn
    assert_eq!(controller.state().players[0].remaining_moves, 10);
    Ok(())
}

#[test]
fn test_script_scenario() -> ParcelResult<()> {
    let mut controller = TurnController::with_sink(GameConfig::for_testing(2), open_layout(8), Vec::new())?;
    controller.run_script(["GAMER 1", "PUT BOT a1", "GAMER 2", "PUT BOT b1", "MOVE a1-b1", "END"]);

    let events = controller.sink();
    assert!(matches!(
        events.as_slice(),
        [
            GameEvent::PlayerSwitched { player: 0 },
            GameEvent::RobotPlaced { .. },
            GameEvent::PlayerSwitched { player: 1 },
            GameEvent::RobotPlaced { .. },
            GameEvent::PlacingFinished,
            GameEvent::Rejected { kind: RejectionKind::IllegalMove, .. },
            GameEvent::GameEnded,
        ]
    ));

    let state = controller.state();
    assert_eq!(state.players[0].robots[0].position, Position::new(0, 0));
    assert_eq!(state.players[1].robots[0].position, Position::new(1, 0));
    assert_eq!(state.phase, GamePhase::Ended);
    Ok(())
}

#[test]
fn test_win_score_ends_game() -> ParcelResult<()> {
    let config = GameConfig {
        win_score: Some(1),
        controllers: vec![Controller::Auto(Strategy::GreedyNearest)],
        placement_colors: vec![CellColor::White, CellColor::Pickup],
        ..GameConfig::for_testing(1)
    };
    let mut controller = TurnController::with_sink(config, corner_layout(), Vec::new())?;
    set_shelf(&mut controller, Position::new(0, 1), 3)?;
    controller.state_mut().place_robot(Position::new(0, 0))?;

    controller.run_automated(Some(10));

    assert!(!controller.is_running());
    assert!(controller.sink().contains(&GameEvent::GameWon { player: 0, score: 1 }));
    assert!(!controller.step());
    Ok(())
}

#[test]
fn test_reset_mid_game_rebuilds_everything() -> ParcelResult<()> {
    let mut controller = TurnController::with_sink(GameConfig::for_testing(2), BoardLayout::standard(), Vec::new())?;
    controller.handle_input(InputEvent::PlaceAt(Position::new(1, 0)));
    controller.handle_input(InputEvent::PlaceAt(Position::new(2, 0)));
    controller.handle_input(InputEvent::MoveDirection(Direction::Down));

    assert!(controller.handle_input(InputEvent::Reset));
    let state = controller.state();
    assert_eq!(state.phase, GamePhase::Placing);
    assert_eq!(state.current_player, 0);
    assert_eq!(state.turn_number, 0);
    assert_eq!(state.board.occupied_count(), 0);
    assert_eq!(state.board.available_packages().len(), 4);
    assert!(state
        .board
        .available_packages()
        .iter()
        .all(|package| !package.is_visible()));
    assert!(state.players.iter().all(|player| player.score == 0 && player.robots.is_empty()));
    Ok(())
}

#[test]
fn test_huge_reward_keeps_automated_game_running() -> ParcelResult<()> {
    let config = GameConfig {
        delivery_reward: u32::MAX,
        ..GameConfig::new().with_all_automated()
    };
    let mut controller = TurnController::with_sink(config, BoardLayout::standard(), Vec::new())?;

    controller.run_automated(Some(200));

    assert!(controller.state().players.iter().all(|player| {
        player.score == 0 || player.score == u32::MAX
    }));
    Ok(())
}

#[test]
fn test_endless_automated_game_stops_at_default_limit() -> ParcelResult<()> {
    let config = GameConfig::new().with_all_automated();
    assert_eq!(config.win_score, None);
    let mut controller = TurnController::new(config, BoardLayout::standard())?;

    let limit = controller.config().auto_turn_limit(None);
    controller.run_automated(limit);

    assert!(controller.is_running());
    assert_eq!(Some(controller.state().turn_number), limit);
    Ok(())
}
