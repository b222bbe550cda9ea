//! # Pathfinder
//!
//! Breadth-first search over the board for automated robots, and the move
//! validity rule shared with manual movement.

use crate::game::{Board, CellColor, Direction, Position};
use log::debug;
use pathfinding::prelude::bfs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which cell colors robots may stand on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRules {
    /// Colors a robot may move onto
    pub traversable: HashSet<CellColor>,
}

impl MovementRules {
    /// Creates rules allowing exactly the given colors.
    pub fn new(colors: impl IntoIterator<Item = CellColor>) -> Self {
        Self {
            traversable: colors.into_iter().collect(),
        }
    }

    /// Checks if robots may stand on `color`.
    pub fn allows(&self, color: CellColor) -> bool {
        self.traversable.contains(&color)
    }
}

impl Default for MovementRules {
    fn default() -> Self {
        Self::new([
            CellColor::White,
            CellColor::Pickup,
            CellColor::Green,
            CellColor::Yellow,
        ])
    }
}

/// One move of a path: the direction taken and the cell reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub direction: Direction,
    pub position: Position,
}

/// Breadth-first pathfinder over a board snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder<'a> {
    board: &'a Board,
    rules: &'a MovementRules,
}

impl<'a> Pathfinder<'a> {
    /// Creates a pathfinder for `board` under `rules`.
    pub fn new(board: &'a Board, rules: &'a MovementRules) -> Self {
        Self { board, rules }
    }

    /// Checks if a robot carrying `held` may step onto `pos`.
    ///
    /// The cell must be on the board, free of robots, of a traversable color,
    /// and if it is a target cell it must be the target of the carried package.
    pub fn is_valid_move(&self, held: Option<u8>, pos: Position) -> bool {
        let Some(cell) = self.board.cell(pos) else {
            debug!("Cell at {} is out of bounds", pos);
            return false;
        };
        if self.board.is_occupied(pos) {
            debug!("Cell at {} is occupied by another robot", pos);
            return false;
        }
        if let Some(target) = cell.target {
            if held != Some(target) {
                debug!("Cell at {} is the target for another package", pos);
                return false;
            }
        }
        if !self.rules.allows(cell.color) {
            debug!("Cell at {} has color {:?}", pos, cell.color);
            return false;
        }
        true
    }

    /// Finds a shortest path from `start` to `goal` for a robot carrying `held`.
    ///
    /// Neighbours are explored up, down, left, right, so ties between equally
    /// short paths always resolve the same way. The returned steps start with
    /// the first move and end on `goal`; an empty path means the robot is
    /// already there. Returns None when `goal` cannot be reached.
    pub fn find_path(&self, start: Position, goal: Position, held: Option<u8>) -> Option<Vec<PathStep>> {
        debug!("Searching path from {} to {}", start, goal);

        let nodes = bfs(
            &start,
            |&pos: &Position| {
                Direction::all()
                    .into_iter()
                    .map(move |direction| pos.step(direction))
                    .filter(|&next| self.is_valid_move(held, next))
                    .collect::<Vec<_>>()
            },
            |&pos| pos == goal,
        );

        let Some(nodes) = nodes else {
            debug!("No path found from {} to {}", start, goal);
            return None;
        };

        let steps = nodes
            .windows(2)
            .filter_map(|pair| {
                Direction::from_delta(pair[1] - pair[0]).map(|direction| PathStep {
                    direction,
                    position: pair[1],
                })
            })
            .collect();
        Some(steps)
    }
}
