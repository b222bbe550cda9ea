//! # Automated Player
//!
//! Plays a whole turn for a player whose controller is automated.
//!
//! The move budget is split evenly across the player's robots, with the
//! remainder going to the first robot. Each robot then greedily walks toward
//! its current goal one step at a time, re-planning after every step:
//! the target cell of the package it carries, or the loading spot above the
//! nearest available package.

use crate::game::{GameEvent, GamePhase, GameState, Position, Robot, Strategy};
use crate::{ParcelError, ParcelResult};
use log::{debug, info};

/// Result of one automated turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoTurn {
    /// Whether any robot took a step
    pub moved: bool,
    /// Events produced during the turn, including rejections
    pub events: Vec<GameEvent>,
}

/// Automated player that drives every robot of the current player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoPlayer {
    /// How goals are chosen
    pub strategy: Strategy,
}

impl AutoPlayer {
    /// Creates an automated player.
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Splits a move budget across `robots` robots.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::AutoPlayer;
    ///
    /// assert_eq!(AutoPlayer::split_budget(10, 3), vec![4, 3, 3]);
    /// assert_eq!(AutoPlayer::split_budget(1, 2), vec![1, 0]);
    /// ```
    pub fn split_budget(budget: u32, robots: usize) -> Vec<u32> {
        if robots == 0 {
            return Vec::new();
        }
        let count = robots as u32;
        let base = budget / count;
        let extra = budget % count;
        (0..robots)
            .map(|index| if index == 0 { base + extra } else { base })
            .collect()
    }

    /// Plays the current player's turn. The turn itself is not ended; the
    /// caller rotates to the next player.
    pub fn play_turn(&self, state: &mut GameState) -> ParcelResult<AutoTurn> {
        if state.phase != GamePhase::Playing {
            return Err(ParcelError::InvalidState(
                "automated turns are only played during the playing phase".to_string(),
            ));
        }

        let player = state.current_player;
        let shares = Self::split_budget(state.current().remaining_moves, state.current().robots.len());
        let mut turn = AutoTurn::default();

        for (index, share) in shares.into_iter().enumerate() {
            if state.phase != GamePhase::Playing {
                break;
            }
            debug!("Player {} robot {} gets {} moves", player + 1, index + 1, share);
            self.drive_robot(state, index, share, &mut turn);
        }

        info!(
            "Player {} finished automated turn (moved: {})",
            player + 1,
            turn.moved
        );
        Ok(turn)
    }

    fn drive_robot(&self, state: &mut GameState, index: usize, share: u32, turn: &mut AutoTurn) {
        let mut remaining = share;
        while remaining > 0 && state.phase == GamePhase::Playing {
            let robot = &state.current().robots[index];
            if robot.finished_turn {
                break;
            }

            let goal = match self.choose_goal(state, robot) {
                Ok(goal) => goal,
                Err(err) => {
                    turn.events.push(GameEvent::rejection(&err));
                    break;
                }
            };
            let from = robot.position;
            let Some(path) = state.pathfinder().find_path(from, goal, robot.held_number()) else {
                turn.events
                    .push(GameEvent::rejection(&ParcelError::NoPathFound { from, to: goal }));
                break;
            };
            let Some(step) = path.first() else {
                debug!("{} is already at {}", robot.id, goal);
                break;
            };

            match state.apply_step(index, step.direction) {
                Ok(events) => {
                    turn.events.extend(events);
                    turn.moved = true;
                    remaining -= 1;
                }
                Err(err) => {
                    turn.events.push(GameEvent::rejection(&err));
                    break;
                }
            }
        }
    }

    /// Picks where a robot should head next.
    pub fn choose_goal(&self, state: &GameState, robot: &Robot) -> ParcelResult<Position> {
        match self.strategy {
            Strategy::GreedyNearest => Self::greedy_goal(state, robot),
        }
    }

    fn greedy_goal(state: &GameState, robot: &Robot) -> ParcelResult<Position> {
        if let Some(number) = robot.held_number() {
            return state.board.target_cell(number).ok_or_else(|| {
                ParcelError::InvalidState(format!("no target cell for package {}", number))
            });
        }

        // Ties go to the package first in grid order.
        let nearest = state
            .board
            .available_packages()
            .into_iter()
            .min_by_key(|package| {
                (
                    robot.position.manhattan_distance(package.position),
                    package.position.y,
                    package.position.x,
                )
            })
            .ok_or(ParcelError::NoPackagesAvailable)?;

        Ok(nearest.position.step(crate::game::Direction::Up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BoardLayout, GameConfig, RejectionKind};

    fn unplaced_game(layout: &BoardLayout) -> GameState {
        let config = GameConfig {
            placement_colors: vec![
                crate::game::CellColor::White,
                crate::game::CellColor::Pickup,
            ],
            ..GameConfig::for_testing(1).with_all_automated()
        };
        GameState::new_game(&config, layout, 11).unwrap()
    }

    fn single_robot_game(layout: &BoardLayout, start: Position) -> GameState {
        let mut state = unplaced_game(layout);
        state.place_robot(start).unwrap();
        state
    }

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

    fn set_shelf(state: &mut GameState, shelf: Position, number: u8) {
        state.board.take_package(shelf);
        state.board.place_package(shelf, number).unwrap();
        state.board.reveal_package(shelf);
    }

    #[test]
    fn test_split_budget() {
        assert_eq!(AutoPlayer::split_budget(10, 1), vec![10]);
        assert_eq!(AutoPlayer::split_budget(10, 2), vec![5, 5]);
        assert_eq!(AutoPlayer::split_budget(7, 4), vec![4, 1, 1, 1]);
        assert!(AutoPlayer::split_budget(5, 0).is_empty());
    }

    #[test]
    fn test_loaded_robot_delivers_within_budget() {
        let mut state = unplaced_game(&corner_layout());
        set_shelf(&mut state, Position::new(0, 1), 3);
        state.place_robot(Position::new(0, 0)).unwrap();
        assert_eq!(state.players[0].robots[0].held_number(), Some(3));

        let turn = AutoPlayer::default().play_turn(&mut state).unwrap();
        assert!(turn.moved);

        let steps = turn
            .events
            .iter()
            .filter(|event| matches!(event, GameEvent::RobotMoved { .. }))
            .count();
        assert_eq!(steps, 6);
        assert!(!turn
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::PackagePickedUp { .. })));
        assert!(turn
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::PackageDelivered { number: 3, .. })));
        assert_eq!(state.players[0].score, 1);
        assert_eq!(state.players[0].remaining_moves, 4);
    }

    #[test]
    fn test_walks_to_loading_spot() {
        let mut state = single_robot_game(&corner_layout(), Position::new(2, 0));
        set_shelf(&mut state, Position::new(0, 1), 5);

        let robot = state.players[0].robots[0].clone();
        let goal = AutoPlayer::default().choose_goal(&state, &robot).unwrap();
        assert_eq!(goal, Position::new(0, 0));

        let turn = AutoPlayer::default().play_turn(&mut state).unwrap();
        assert!(turn
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::PackagePickedUp { number: 5, .. })));
        // package 5 has no target on this board
        assert!(turn.events.iter().any(|event| matches!(
            event,
            GameEvent::Rejected { kind: RejectionKind::InvalidState, .. }
        )));
    }

    #[test]
    fn test_no_packages_reported() {
        let mut state = single_robot_game(&corner_layout(), Position::new(2, 2));
        state.board.take_package(Position::new(0, 1));

        let turn = AutoPlayer::default().play_turn(&mut state).unwrap();
        assert!(!turn.moved);
        assert_eq!(
            turn.events,
            vec![GameEvent::rejection(&ParcelError::NoPackagesAvailable)]
        );
    }

    #[test]
    fn test_unreachable_goal_reported() {
        let walled = BoardLayout::new(
            &["awbw", "rwbw", "bbbw", "wwww"],
            vec![vec![0; 4], vec![0; 4], vec![0; 4], vec![0; 4]],
        );
        let mut state = single_robot_game(&walled, Position::new(3, 3));

        let turn = AutoPlayer::default().play_turn(&mut state).unwrap();
        assert!(!turn.moved);
        assert!(matches!(
            turn.events.as_slice(),
            [GameEvent::Rejected { kind: RejectionKind::NoPathFound, .. }]
        ));
    }

    #[test]
    fn test_nearest_package_tie_prefers_grid_order() {
        let layout = BoardLayout::without_targets(&["awwwa", "rwwwr", "wwwww", "wwwww", "wwwww"]);
        let state = single_robot_game(&layout, Position::new(2, 2));
        let robot = &state.players[0].robots[0];

        let goal = AutoPlayer::default().choose_goal(&state, robot).unwrap();
        assert_eq!(goal, Position::new(0, 0));
    }

    #[test]
    fn test_rejects_outside_playing_phase() {
        let config = GameConfig::for_testing(1);
        let mut state = GameState::new_game(&config, &corner_layout(), 1).unwrap();
        assert!(matches!(
            AutoPlayer::default().play_turn(&mut state),
            Err(ParcelError::InvalidState(_))
        ));
    }
}
