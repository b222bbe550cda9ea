//! # Parcelbots
//!
//! A turn-based board game where players place robots on a grid and then take
//! turns moving them to pick up numbered packages and deliver them to the
//! matching target cells.
//!
//! ## Architecture Overview
//!
//! The crate is the game core only. Drawing, asset handling and device input
//! belong to an outer driver that talks to the core through a few narrow types:
//!
//! - **Board**: the cell grid, per-color indexes and the occupancy map
//! - **Entities**: robots, packages and players with their pickup/drop rules
//! - **Pathfinder**: breadth-first search over the grid for automated players
//! - **Turn Controller**: the placing/playing state machine and turn rotation
//! - **AutoPlayer**: greedy nearest-package strategy for automated players
//!
//! Drivers feed decoded [`InputEvent`]s or [`ScriptCommand`]s into the
//! [`TurnController`], observe [`GameEvent`]s through an [`EventSink`], and
//! draw from the read-only [`GameSnapshot`].

pub mod game;
pub mod input;
pub mod rendering;
pub mod utils;

pub use game::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Parcelbots game engine.
#[derive(thiserror::Error, Debug)]
pub enum ParcelError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Board input is malformed
    #[error("Failed to load board: {0}")]
    Load(String),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A scripted command line does not match the grammar
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// A move breaks the movement rules
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// A placement breaks the placement rules
    #[error("Illegal placement: {0}")]
    IllegalPlacement(String),

    /// The pathfinder cannot reach the target
    #[error("No path found from {from} to {to}")]
    NoPathFound { from: Position, to: Position },

    /// Nothing left on the board for an automated robot to fetch
    #[error("No packages available")]
    NoPackagesAvailable,

    /// The request does not fit the current game state
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

impl ParcelError {
    /// Classifies a recoverable error for reporting, or `None` for errors
    /// that can only happen while setting a game up.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            ParcelError::InvalidCommand(_) => Some(RejectionKind::InvalidCommand),
            ParcelError::IllegalMove(_) => Some(RejectionKind::IllegalMove),
            ParcelError::IllegalPlacement(_) => Some(RejectionKind::IllegalPlacement),
            ParcelError::NoPathFound { .. } => Some(RejectionKind::NoPathFound),
            ParcelError::NoPackagesAvailable => Some(RejectionKind::NoPackagesAvailable),
            ParcelError::InvalidState(_) => Some(RejectionKind::InvalidState),
            ParcelError::Io(_)
            | ParcelError::Serde(_)
            | ParcelError::Load(_)
            | ParcelError::InvalidConfig(_) => None,
        }
    }
}

/// Result type used throughout the Parcelbots codebase.
pub type ParcelResult<T> = Result<T, ParcelError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default number of players
    pub const DEFAULT_NUM_PLAYERS: usize = 2;

    /// Maximum number of players a board supports
    pub const MAX_PLAYERS: usize = 4;

    /// Default robots per player
    pub const DEFAULT_ROBOTS_PER_PLAYER: usize = 2;

    /// Default move budget per player turn
    pub const DEFAULT_MOVE_LIMIT_PER_TURN: u32 = 10;

    /// Default points for one delivered package
    pub const DEFAULT_DELIVERY_REWARD: u32 = 1;

    /// Smallest package number
    pub const MIN_PACKAGE_NUMBER: u8 = 1;

    /// Largest package number
    pub const MAX_PACKAGE_NUMBER: u8 = 9;

    /// Default random seed
    pub const DEFAULT_SEED: u64 = 42;

    /// Turn cap for automated runs that have no other way to stop
    pub const DEFAULT_AUTO_TURN_LIMIT: u64 = 1000;
}
