//! Integration tests for loading configuration and board files from disk.

use parcelbots::{
    BoardLayout, CellColor, Controller, GameConfig, GamePhase, ParcelError, ParcelResult, Position,
    Strategy, TurnController,
};
use std::fs;

#[test]
fn test_config_file_round_trip() -> ParcelResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");
    fs::write(
        &path,
        r#"{
            "num_players": 3,
            "robots_per_player": 1,
            "move_limit_per_turn": 6,
            "win_score": 4,
            "controllers": ["human", {"auto": "greedy_nearest"}],
            "traversable_colors": ["white", "pickup", "yellow"],
            "seed": 9
        }"#,
    )?;

    let config = GameConfig::from_json_file(&path)?;
    assert_eq!(config.num_players, 3);
    assert_eq!(config.move_limit_per_turn, 6);
    assert_eq!(config.win_score, Some(4));
    assert_eq!(config.controller_for(1), Controller::Auto(Strategy::GreedyNearest));
    assert_eq!(config.controller_for(2), Controller::Human);
    assert!(!config.movement_rules().allows(CellColor::Green));
    assert_eq!(config.placement_colors, vec![CellColor::White]);
    Ok(())
}

#[test]
fn test_invalid_config_file_is_rejected() -> ParcelResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "num_players": 9 }"#)?;

    assert!(matches!(
        GameConfig::from_json_file(&path),
        Err(ParcelError::InvalidConfig(_))
    ));
    assert!(matches!(
        GameConfig::from_json_file(dir.path().join("missing.json")),
        Err(ParcelError::Io(_))
    ));
    Ok(())
}

#[test]
fn test_board_file_builds_game() -> ParcelResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("board.json");
    fs::write(
        &path,
        r#"{
            "colors": ["awy", "rww", "wwg"],
            "targets": [[0, 0, 2], [0, 0, 0], [0, 0, 0]]
        }"#,
    )?;

    let layout = BoardLayout::from_json_file(&path)?;
    let controller = TurnController::new(GameConfig::for_testing(1), layout)?;
    let state = controller.state();
    assert_eq!(state.phase, GamePhase::Placing);
    assert_eq!(state.board.size(), 3);
    assert_eq!(state.board.target_cell(2), Some(Position::new(2, 0)));
    assert!(state.board.package_at(Position::new(0, 1)).is_some());
    Ok(())
}

#[test]
fn test_malformed_board_file_is_a_load_error() -> ParcelResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("board.json");
    fs::write(&path, r#"{ "colors": ["wq", "ww"], "targets": [[0, 0], [0, 0]] }"#)?;

    let layout = BoardLayout::from_json_file(&path)?;
    assert!(matches!(
        TurnController::new(GameConfig::new(), layout),
        Err(ParcelError::Load(_))
    ));
    Ok(())
}
