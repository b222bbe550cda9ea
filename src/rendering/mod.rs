//! # Rendering Module
//!
//! Read-only snapshots of the game and the renderers that draw them.
//!
//! Renderers only ever see a [`GameSnapshot`]; they cannot reach back into
//! the game state.

pub mod display;

pub use display::*;

use crate::game::{
    CellColor, GamePhase, GameState, PackageState, Position, RobotId,
};
use crate::ParcelResult;
use serde::Serialize;

/// A package as players see it. Hidden packages keep their number secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackageView {
    /// Number, or None while hidden
    pub number: Option<u8>,
    pub state: PackageState,
}

/// One board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub position: Position,
    pub color: CellColor,
    /// Package number delivered here
    pub target: Option<u8>,
    /// Package resting on the cell
    pub package: Option<PackageView>,
    /// Robot standing on the cell
    pub robot: Option<RobotId>,
}

/// One robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RobotView {
    pub id: RobotId,
    pub position: Position,
    /// Number of the carried package
    pub held_package: Option<u8>,
    pub finished_turn: bool,
}

/// One player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub index: usize,
    pub score: u32,
    pub remaining_moves: u32,
    pub automated: bool,
}

/// Everything a renderer may show, copied out of the game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Side length of the board
    pub size: usize,
    /// Cells, row by row
    pub cells: Vec<Vec<CellView>>,
    pub robots: Vec<RobotView>,
    pub players: Vec<PlayerView>,
    pub phase: GamePhase,
    pub current_player: usize,
    pub selected_robot: usize,
    pub turn_number: u64,
}

impl GameSnapshot {
    /// Copies the visible parts of a game state.
    pub fn from_state(state: &GameState) -> Self {
        let cells = state
            .board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| CellView {
                        position: cell.position,
                        color: cell.color,
                        target: cell.target,
                        package: cell.package.map(|package| PackageView {
                            number: package.is_visible().then_some(package.number),
                            state: package.state,
                        }),
                        robot: state.board.occupant(cell.position),
                    })
                    .collect()
            })
            .collect();

        let robots = state
            .robots()
            .map(|robot| RobotView {
                id: robot.id,
                position: robot.position,
                held_package: robot.held_number(),
                finished_turn: robot.finished_turn,
            })
            .collect();

        let players = state
            .players
            .iter()
            .map(|player| PlayerView {
                index: player.index,
                score: player.score,
                remaining_moves: player.remaining_moves,
                automated: player.is_automated(),
            })
            .collect();

        Self {
            size: state.board.size(),
            cells,
            robots,
            players,
            phase: state.phase,
            current_player: state.current_player,
            selected_robot: state.selected_robot,
            turn_number: state.turn_number,
        }
    }

    /// Gets a cell view.
    pub fn cell(&self, pos: Position) -> Option<&CellView> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.cells.get(pos.y as usize)?.get(pos.x as usize)
    }
}

impl GameState {
    /// Takes a read-only snapshot for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_state(self)
    }
}

/// Something that can draw a snapshot.
pub trait Renderer {
    /// Draws one snapshot.
    fn render(&mut self, snapshot: &GameSnapshot) -> ParcelResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BoardLayout, GameConfig};

    #[test]
    fn test_snapshot_hides_numbers_until_revealed() {
        let mut state = GameState::new_game(&GameConfig::for_testing(1), &BoardLayout::standard(), 3).unwrap();
        let shelf = Position::new(2, 2);

        let snapshot = state.snapshot();
        let package = snapshot.cell(shelf).unwrap().package.unwrap();
        assert_eq!(package.number, None);
        assert_eq!(package.state, PackageState::Hidden);

        state.place_robot(Position::new(1, 1)).unwrap();
        let snapshot = state.snapshot();
        let package = snapshot.cell(shelf).unwrap().package.unwrap();
        assert!(package.number.is_some());
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(
            snapshot.cell(Position::new(1, 1)).unwrap().robot,
            Some(RobotId::new(0, 0))
        );
        assert_eq!(snapshot.robots.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new_game(&GameConfig::new(), &BoardLayout::standard(), 3).unwrap();
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["size"], 8);
        assert_eq!(json["phase"], "placing");
        assert_eq!(json["players"].as_array().unwrap().len(), 2);
        assert!(json["cells"][2][2]["package"]["number"].is_null());
    }
}
