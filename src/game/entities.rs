//! # Entity Module
//!
//! Robots, packages and players, with the movement, pickup and drop-off rules
//! that act on a single entity.

use crate::config::{MAX_PACKAGE_NUMBER, MIN_PACKAGE_NUMBER};
use crate::game::{Board, Direction, Position};
use crate::utils::{MovementRules, Pathfinder};
use crate::ParcelResult;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageState {
    /// On a shelf, not yet revealed to players
    Hidden,
    /// On a shelf and shown on the board
    Visible,
    /// Carried by a robot
    Held,
    /// Dropped on its target cell
    Delivered,
}

/// A numbered package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package number, matched against target cells
    pub number: u8,
    /// Shelf the package was created on
    pub position: Position,
    /// Current lifecycle state
    pub state: PackageState,
}

impl Package {
    /// Creates a hidden package.
    pub fn new(number: u8, position: Position) -> Self {
        Self {
            number,
            position,
            state: PackageState::Hidden,
        }
    }

    /// Shows a hidden package. Other states are left alone.
    pub fn reveal(&mut self) {
        if self.state == PackageState::Hidden {
            self.state = PackageState::Visible;
        }
    }

    /// Marks the package as carried.
    pub fn pick_up(&mut self) {
        self.state = PackageState::Held;
    }

    /// Marks the package as delivered.
    pub fn drop_off(&mut self) {
        self.state = PackageState::Delivered;
    }

    /// Checks if the package still rests on its shelf.
    pub fn is_available(&self) -> bool {
        matches!(self.state, PackageState::Hidden | PackageState::Visible)
    }

    /// Checks if players can see the package.
    pub fn is_visible(&self) -> bool {
        self.state != PackageState::Hidden
    }
}

/// Identifies a robot by its owner and its place in the owner's robot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotId {
    /// Index of the owning player
    pub player: usize,
    /// Index within the owner's robots
    pub index: usize,
}

impl RobotId {
    /// Creates a robot id.
    pub fn new(player: usize, index: usize) -> Self {
        Self { player, index }
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot {} of player {}", self.index + 1, self.player + 1)
    }
}

/// A package swap performed by a robot at a shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    /// The package now carried by the robot
    pub picked: Package,
    /// The package that took its place on the shelf
    pub replacement: Package,
}

/// A robot standing on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    /// Who owns the robot and which one it is
    pub id: RobotId,
    /// Current position
    pub position: Position,
    /// Package being carried
    pub package: Option<Package>,
    /// Steps taken during the current turn
    pub moves_this_turn: u32,
    /// Set once the robot has delivered this turn; it may not move again
    pub finished_turn: bool,
}

impl Robot {
    /// Creates a robot carrying nothing.
    pub fn new(id: RobotId, position: Position) -> Self {
        Self {
            id,
            position,
            package: None,
            moves_this_turn: 0,
            finished_turn: false,
        }
    }

    /// Checks if the robot carries a package.
    pub fn has_package(&self) -> bool {
        self.package.is_some()
    }

    /// Number of the carried package, if any.
    pub fn held_number(&self) -> Option<u8> {
        self.package.map(|package| package.number)
    }

    /// Moves one step in `direction`.
    ///
    /// Returns false without changing anything when the destination is not a
    /// valid move. On success the board's occupancy is updated before the
    /// robot's own position.
    pub fn step(&mut self, direction: Direction, board: &mut Board, rules: &MovementRules) -> bool {
        let destination = self.position.step(direction);
        if !Pathfinder::new(board, rules).is_valid_move(self.held_number(), destination) {
            return false;
        }

        board.move_occupancy(self.position, destination, self.id);
        self.position = destination;
        self.moves_this_turn += 1;
        true
    }

    /// Loads the package from the shelf below the robot's pickup cell.
    ///
    /// Only allowed while carrying nothing. A replacement package with a random
    /// number is put on the emptied shelf and shown straight away.
    pub fn pick_package<R: Rng>(
        &mut self,
        board: &mut Board,
        rng: &mut R,
    ) -> ParcelResult<Option<Pickup>> {
        if self.has_package() {
            return Ok(None);
        }
        let Some(shelf) = board.pickup_source(self.position) else {
            return Ok(None);
        };
        let Some(mut picked) = board.take_package(shelf) else {
            return Ok(None);
        };

        picked.pick_up();
        self.package = Some(picked);

        let number = rng.gen_range(MIN_PACKAGE_NUMBER..=MAX_PACKAGE_NUMBER);
        let mut replacement = board.place_package(shelf, number)?;
        board.reveal_package(shelf);
        replacement.reveal();

        info!(
            "{} picked up package {} at {}",
            self.id, picked.number, self.position
        );
        Ok(Some(Pickup {
            picked,
            replacement,
        }))
    }

    /// Drops the carried package if the robot stands on its target cell.
    ///
    /// Returns the delivered package, or None when nothing changed.
    pub fn drop_package(&mut self, board: &mut Board) -> Option<Package> {
        let number = self.held_number()?;
        if !board
            .cell(self.position)
            .is_some_and(|cell| cell.is_target_for(number))
        {
            return None;
        }

        let mut delivered = self.package.take()?;
        delivered.drop_off();
        board.take_package(self.position);
        info!(
            "{} dropped package {} at {}",
            self.id, delivered.number, self.position
        );
        Some(delivered)
    }
}

/// Strategy used by an automated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Fetch the Manhattan-nearest package, then deliver it
    #[default]
    GreedyNearest,
}

/// Who decides a player's actions. Fixed when the game is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Driven by input events or script commands
    #[default]
    Human,
    /// Driven by the automated player
    Auto(Strategy),
}

impl Controller {
    /// Checks if this controller is automated.
    pub fn is_automated(&self) -> bool {
        matches!(self, Controller::Auto(_))
    }
}

/// A player: their robots, score and remaining moves this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Zero-based player index
    pub index: usize,
    /// Who drives this player
    pub controller: Controller,
    /// Robots owned by this player, in placement order
    pub robots: Vec<Robot>,
    /// Points scored so far
    pub score: u32,
    /// Moves left in the current turn
    pub remaining_moves: u32,
}

impl Player {
    /// Creates a player with no robots.
    pub fn new(index: usize, controller: Controller, move_budget: u32) -> Self {
        Self {
            index,
            controller,
            robots: Vec::new(),
            score: 0,
            remaining_moves: move_budget,
        }
    }

    /// Adds a robot at `position` and returns its id.
    pub fn add_robot(&mut self, position: Position) -> RobotId {
        let id = RobotId::new(self.index, self.robots.len());
        self.robots.push(Robot::new(id, position));
        id
    }

    /// Finds the index of the robot standing on `position`.
    pub fn robot_at(&self, position: Position) -> Option<usize> {
        self.robots.iter().position(|robot| robot.position == position)
    }

    /// Moves one of this player's robots, spending one move from the budget.
    pub fn move_robot(
        &mut self,
        index: usize,
        direction: Direction,
        board: &mut Board,
        rules: &MovementRules,
    ) -> bool {
        if self.remaining_moves == 0 {
            return false;
        }
        let Some(robot) = self.robots.get_mut(index) else {
            return false;
        };
        if robot.finished_turn || !robot.step(direction, board, rules) {
            return false;
        }
        self.remaining_moves -= 1;
        true
    }

    /// Adds points to the score. The score stops at `u32::MAX`.
    pub fn increase_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        info!("Player {} score is now {}", self.index + 1, self.score);
    }

    /// Restores the move budget and clears per-turn robot state.
    pub fn reset_moves(&mut self, move_budget: u32) {
        self.remaining_moves = move_budget;
        for robot in &mut self.robots {
            robot.moves_this_turn = 0;
            robot.finished_turn = false;
        }
    }

    /// Checks if every robot has finished for the turn.
    pub fn all_robots_finished(&self) -> bool {
        !self.robots.is_empty() && self.robots.iter().all(|robot| robot.finished_turn)
    }

    /// Checks if this player is automated.
    pub fn is_automated(&self) -> bool {
        self.controller.is_automated()
    }
}
