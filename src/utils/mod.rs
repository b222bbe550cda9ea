//! # Utilities Module
//!
//! Pathfinding and movement rules shared by manual and automated play.

pub mod pathfinder;

pub use pathfinder::*;
