//! # Game Configuration
//!
//! Player counts, move budgets, scoring and the color rules for movement and
//! placement. Loadable from JSON; every field has a default.

use crate::config::*;
use crate::game::{CellColor, Controller};
use crate::utils::MovementRules;
use crate::{ParcelError, ParcelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (1 to 4)
    pub num_players: usize,
    /// Robots each player places
    pub robots_per_player: usize,
    /// Moves a player may spend per turn, shared across their robots
    pub move_limit_per_turn: u32,
    /// Points for one delivered package
    pub delivery_reward: u32,
    /// Score that ends the game, if any
    pub win_score: Option<u32>,
    /// Controller per player; players without an entry are human
    pub controllers: Vec<Controller>,
    /// Colors robots may move onto
    pub traversable_colors: Vec<CellColor>,
    /// Colors robots may be placed on
    pub placement_colors: Vec<CellColor>,
    /// Seed for package numbers and automated placement
    pub seed: u64,
}

impl GameConfig {
    /// Creates the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::GameConfig;
    ///
    /// let config = GameConfig::new();
    /// assert_eq!(config.num_players, 2);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            num_players: DEFAULT_NUM_PLAYERS,
            robots_per_player: DEFAULT_ROBOTS_PER_PLAYER,
            move_limit_per_turn: DEFAULT_MOVE_LIMIT_PER_TURN,
            delivery_reward: DEFAULT_DELIVERY_REWARD,
            win_score: None,
            controllers: Vec::new(),
            traversable_colors: vec![
                CellColor::White,
                CellColor::Pickup,
                CellColor::Green,
                CellColor::Yellow,
            ],
            placement_colors: vec![CellColor::White],
            seed: DEFAULT_SEED,
        }
    }

    /// Creates a small single-robot configuration for tests.
    pub fn for_testing(num_players: usize) -> Self {
        Self {
            num_players,
            robots_per_player: 1,
            ..Self::new()
        }
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> ParcelResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ParcelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> ParcelResult<()> {
        if !(1..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ParcelError::InvalidConfig(format!(
                "num_players must be between 1 and {}, got {}",
                MAX_PLAYERS, self.num_players
            )));
        }
        if self.robots_per_player == 0 {
            return Err(ParcelError::InvalidConfig(
                "robots_per_player must be at least 1".to_string(),
            ));
        }
        if self.move_limit_per_turn == 0 {
            return Err(ParcelError::InvalidConfig(
                "move_limit_per_turn must be at least 1".to_string(),
            ));
        }
        if self.controllers.len() > self.num_players {
            return Err(ParcelError::InvalidConfig(format!(
                "{} controllers given for {} players",
                self.controllers.len(),
                self.num_players
            )));
        }
        if self.placement_colors.is_empty() {
            return Err(ParcelError::InvalidConfig(
                "placement_colors must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the controller for a player.
    pub fn controller_for(&self, player: usize) -> Controller {
        self.controllers.get(player).copied().unwrap_or_default()
    }

    /// Makes every player automated.
    pub fn with_all_automated(mut self) -> Self {
        self.controllers = vec![Controller::Auto(Default::default()); self.num_players];
        self
    }

    /// Total robots placed before play starts.
    pub fn total_robots(&self) -> usize {
        self.num_players * self.robots_per_player
    }

    /// Movement rules derived from the traversable colors.
    pub fn movement_rules(&self) -> MovementRules {
        MovementRules::new(self.traversable_colors.iter().copied())
    }

    /// Checks if robots may be placed on `color`.
    pub fn allows_placement_on(&self, color: CellColor) -> bool {
        self.placement_colors.contains(&color)
    }

    /// Turn limit for a fully automated run.
    ///
    /// An explicit limit wins. Without one, a game that has no winning score
    /// never ends by itself, so it is capped at `DEFAULT_AUTO_TURN_LIMIT`.
    pub fn auto_turn_limit(&self, requested: Option<u64>) -> Option<u64> {
        requested.or_else(|| self.win_score.is_none().then_some(DEFAULT_AUTO_TURN_LIMIT))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
