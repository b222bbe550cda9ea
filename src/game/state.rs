//! # Game State Module
//!
//! All mutable data of one game and the rule primitives that change it.
//!
//! `GameState` holds the board, the players and the phase machine
//! (`Placing` → `Playing` → `Ended`). Every primitive either succeeds and
//! returns the events it caused, or fails with a [`ParcelError`] and leaves
//! the state untouched. Turning failures into reports is the job of the
//! [`TurnController`](crate::TurnController).

use crate::config::{MAX_PACKAGE_NUMBER, MIN_PACKAGE_NUMBER};
use crate::game::{
    Board, BoardLayout, CellColor, Direction, GameConfig, GameEvent, Player, Position, Robot,
    RobotId,
};
use crate::utils::{MovementRules, Pathfinder};
use crate::{ParcelError, ParcelResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Players take turns putting robots on the board
    Placing,
    /// Players take turns moving robots
    Playing,
    /// Terminal
    Ended,
}

/// Central game state: board, players and turn bookkeeping.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Configuration the game was built from
    pub config: GameConfig,
    /// The board, including occupancy and resting packages
    pub board: Board,
    /// Players in turn order
    pub players: Vec<Player>,
    /// Current phase
    pub phase: GamePhase,
    /// Index of the player whose turn it is
    pub current_player: usize,
    /// Robot of the current player driven by manual moves
    pub selected_robot: usize,
    /// Robots placed so far
    pub robots_placed: usize,
    /// Completed turns since play started
    pub turn_number: u64,
    /// Seed this game was built with
    pub rng_seed: u64,
    rules: MovementRules,
    rng: StdRng,
}

impl GameState {
    /// Builds a fresh game: a new board from `layout`, players from `config`,
    /// and one hidden package on every red cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{BoardLayout, GameConfig, GamePhase, GameState};
    ///
    /// let state = GameState::new_game(&GameConfig::new(), &BoardLayout::standard(), 7).unwrap();
    /// assert_eq!(state.phase, GamePhase::Placing);
    /// assert_eq!(state.players.len(), 2);
    /// assert_eq!(state.board.available_packages().len(), 4);
    /// ```
    pub fn new_game(config: &GameConfig, layout: &BoardLayout, seed: u64) -> ParcelResult<Self> {
        config.validate()?;
        let board = layout.build()?;

        let players = (0..config.num_players)
            .map(|index| {
                Player::new(
                    index,
                    config.controller_for(index),
                    config.move_limit_per_turn,
                )
            })
            .collect();

        let mut state = Self {
            config: config.clone(),
            board,
            players,
            phase: GamePhase::Placing,
            current_player: 0,
            selected_robot: 0,
            robots_placed: 0,
            turn_number: 0,
            rng_seed: seed,
            rules: config.movement_rules(),
            rng: StdRng::seed_from_u64(seed),
        };
        state.place_initial_packages()?;
        Ok(state)
    }

    fn place_initial_packages(&mut self) -> ParcelResult<()> {
        let shelves: Vec<Position> = self
            .board
            .cells_by_color(CellColor::Red)
            .iter()
            .map(|cell| cell.position)
            .collect();
        for shelf in shelves {
            let number = self.rng.gen_range(MIN_PACKAGE_NUMBER..=MAX_PACKAGE_NUMBER);
            self.board.place_package(shelf, number)?;
        }
        Ok(())
    }

    /// Draws a seed for the game that replaces this one.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Movement rules in force for this game.
    pub fn movement_rules(&self) -> &MovementRules {
        &self.rules
    }

    /// Pathfinder over the current board.
    pub fn pathfinder(&self) -> Pathfinder<'_> {
        Pathfinder::new(&self.board, &self.rules)
    }

    /// The player whose turn it is.
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// Gets a robot by id.
    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.players.get(id.player)?.robots.get(id.index)
    }

    /// Iterates over every robot on the board.
    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.players.iter().flat_map(|player| player.robots.iter())
    }

    /// Checks if the player whose turn it is is automated.
    pub fn is_current_automated(&self) -> bool {
        self.current().is_automated()
    }

    fn require_phase(&self, phase: GamePhase) -> ParcelResult<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(ParcelError::InvalidState(format!(
                "expected {:?} phase but the game is {:?}",
                phase, self.phase
            )))
        }
    }

    fn check_placement(&self, pos: Position) -> ParcelResult<()> {
        let cell = self
            .board
            .cell(pos)
            .ok_or_else(|| ParcelError::IllegalPlacement(format!("{} is off the board", pos)))?;
        if self.board.is_occupied(pos) {
            return Err(ParcelError::IllegalPlacement(format!("{} is occupied", pos)));
        }
        if !self.config.allows_placement_on(cell.color) {
            return Err(ParcelError::IllegalPlacement(format!(
                "robots cannot be placed on {:?} cells like {}",
                cell.color, pos
            )));
        }
        if self.current().robots.len() >= self.config.robots_per_player {
            return Err(ParcelError::IllegalPlacement(format!(
                "player {} has already placed all robots",
                self.current_player + 1
            )));
        }
        Ok(())
    }

    /// Places a robot for the current player.
    ///
    /// On success the turn passes to the next player; once every robot is
    /// placed the game switches to `Playing` and all packages are revealed.
    pub fn place_robot(&mut self, pos: Position) -> ParcelResult<Vec<GameEvent>> {
        self.require_phase(GamePhase::Placing)?;
        self.check_placement(pos)?;

        let robot = self.players[self.current_player].add_robot(pos);
        self.board.set_occupied(pos, robot);
        self.robots_placed += 1;
        info!("Player {} placed robot at {}", self.current_player + 1, pos);

        let mut events = vec![GameEvent::RobotPlaced {
            robot,
            position: pos,
        }];

        if self.robots_placed >= self.config.total_robots() {
            events.extend(self.start_playing());
        } else {
            self.current_player = (self.current_player + 1) % self.players.len();
        }
        Ok(events)
    }

    fn start_playing(&mut self) -> Vec<GameEvent> {
        info!("Placing phase ended, all players have placed their robots");
        self.phase = GamePhase::Playing;
        self.current_player = 0;
        self.selected_robot = 0;
        self.board.reveal_packages();
        let budget = self.config.move_limit_per_turn;
        for player in &mut self.players {
            player.reset_moves(budget);
        }
        let mut events = vec![GameEvent::PlacingFinished];
        events.extend(self.load_waiting_robots());
        events
    }

    /// Picks a random free cell the current player may place a robot on.
    pub fn random_placement(&mut self) -> Option<Position> {
        let candidates: Vec<Position> = self
            .board
            .cells()
            .filter(|cell| self.config.allows_placement_on(cell.color))
            .map(|cell| cell.position)
            .filter(|&pos| !self.board.is_occupied(pos))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Makes `player` the active player without ending anyone's turn.
    pub fn set_current_player(&mut self, player: usize) -> ParcelResult<Vec<GameEvent>> {
        if player >= self.players.len() {
            return Err(ParcelError::InvalidState(format!(
                "there is no player {}",
                player + 1
            )));
        }
        self.current_player = player;
        self.selected_robot = 0;
        let mut events = vec![GameEvent::PlayerSwitched { player }];
        if self.phase == GamePhase::Playing {
            events.extend(self.load_waiting_robots());
        }
        Ok(events)
    }

    /// Chooses which of the current player's robots manual moves drive.
    pub fn select_robot(&mut self, index: usize) -> ParcelResult<Vec<GameEvent>> {
        self.require_phase(GamePhase::Playing)?;
        let robot = self
            .current()
            .robots
            .get(index)
            .map(|robot| robot.id)
            .ok_or_else(|| {
                ParcelError::InvalidState(format!(
                    "player {} has no robot {}",
                    self.current_player + 1,
                    index + 1
                ))
            })?;
        self.selected_robot = index;
        Ok(vec![GameEvent::RobotSelected { robot }])
    }

    /// Moves one of the current player's robots one step.
    ///
    /// Delivery and pickup are resolved on arrival. The turn passes to the
    /// next player once the move budget is spent or every robot has finished.
    pub fn move_robot(&mut self, index: usize, direction: Direction) -> ParcelResult<Vec<GameEvent>> {
        self.require_phase(GamePhase::Playing)?;
        let player = self.current();
        let robot = player.robots.get(index).ok_or_else(|| {
            ParcelError::IllegalMove(format!(
                "player {} has no robot {}",
                self.current_player + 1,
                index + 1
            ))
        })?;
        if robot.finished_turn {
            return Err(ParcelError::IllegalMove(format!(
                "{} already delivered this turn",
                robot.id
            )));
        }
        if player.remaining_moves == 0 {
            return Err(ParcelError::IllegalMove(format!(
                "player {} has no moves left",
                self.current_player + 1
            )));
        }

        let mut events = self.apply_step(index, direction)?;
        if self.phase == GamePhase::Playing {
            let player = self.current();
            if player.remaining_moves == 0 || player.all_robots_finished() {
                events.extend(self.end_turn());
            }
        }
        Ok(events)
    }

    /// Takes one step with a robot of the current player and resolves what
    /// happens on arrival. Does not rotate the turn.
    pub(crate) fn apply_step(&mut self, index: usize, direction: Direction) -> ParcelResult<Vec<GameEvent>> {
        let player = &mut self.players[self.current_player];
        let robot = player
            .robots
            .get(index)
            .ok_or_else(|| ParcelError::IllegalMove(format!("no robot {}", index + 1)))?;
        let id = robot.id;
        let from = robot.position;
        let to = from.step(direction);

        if !player.move_robot(index, direction, &mut self.board, &self.rules) {
            return Err(ParcelError::IllegalMove(format!(
                "{} cannot move {} from {} to {}",
                id, direction, from, to
            )));
        }
        debug!("{} moved {} to {}", id, direction, to);

        let mut events = vec![GameEvent::RobotMoved {
            robot: id,
            direction,
            from,
            to,
        }];
        events.extend(self.resolve_arrival(index)?);
        Ok(events)
    }

    /// Delivers the carried package if the robot stands on its target,
    /// otherwise loads a package if the robot stands at a shelf.
    fn resolve_arrival(&mut self, index: usize) -> ParcelResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        let reward = self.config.delivery_reward;
        let player = &mut self.players[self.current_player];
        let robot = &mut player.robots[index];

        if let Some(delivered) = robot.drop_package(&mut self.board) {
            robot.finished_turn = true;
            let id = robot.id;
            let position = robot.position;
            player.increase_score(reward);
            events.push(GameEvent::PackageDelivered {
                robot: id,
                number: delivered.number,
                position,
                score: player.score,
            });

            if let Some(win_score) = self.config.win_score {
                if player.score >= win_score {
                    info!("Player {} reached the winning score", player.index + 1);
                    events.push(GameEvent::GameWon {
                        player: player.index,
                        score: player.score,
                    });
                    events.push(GameEvent::GameEnded);
                    self.phase = GamePhase::Ended;
                }
            }
            return Ok(events);
        }

        if let Some(pickup) = robot.pick_package(&mut self.board, &mut self.rng)? {
            events.push(GameEvent::PackagePickedUp {
                robot: robot.id,
                number: pickup.picked.number,
                shelf: pickup.picked.position,
            });
            events.push(GameEvent::PackageSpawned {
                number: pickup.replacement.number,
                position: pickup.replacement.position,
            });
        }
        Ok(events)
    }

    /// Loads a package for a robot already standing at a shelf. Costs no move.
    fn pickup_in_place(&mut self, index: usize) -> ParcelResult<Vec<GameEvent>> {
        self.require_phase(GamePhase::Playing)?;
        let robot = self.players[self.current_player]
            .robots
            .get(index)
            .ok_or_else(|| ParcelError::InvalidState(format!("no robot {}", index + 1)))?;
        if robot.has_package() || robot.finished_turn {
            return Ok(Vec::new());
        }
        self.resolve_arrival(index)
    }

    /// Gives every robot of the current player that waits at a stocked shelf
    /// its package. Runs whenever a player becomes active during play.
    fn load_waiting_robots(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for index in 0..self.current().robots.len() {
            match self.pickup_in_place(index) {
                Ok(loaded) => events.extend(loaded),
                Err(err) => {
                    warn!("Player {} robot {} could not load: {}", self.current_player + 1, index + 1, err);
                    events.push(GameEvent::rejection(&err));
                }
            }
        }
        events
    }

    /// Ends the current player's turn. Unspent moves are forfeited and the
    /// next player in round-robin order gets a full budget.
    pub fn end_turn(&mut self) -> Vec<GameEvent> {
        let budget = self.config.move_limit_per_turn;
        let player = &mut self.players[self.current_player];
        let unused_moves = player.remaining_moves;
        player.reset_moves(budget);

        let previous = self.current_player;
        self.current_player = (self.current_player + 1) % self.players.len();
        self.selected_robot = 0;
        self.turn_number += 1;
        info!("Switched to player {}", self.current_player + 1);

        let mut events = vec![GameEvent::TurnEnded {
            player: previous,
            next_player: self.current_player,
            unused_moves,
        }];
        if self.phase == GamePhase::Playing {
            events.extend(self.load_waiting_robots());
        }
        events
    }

    /// Ends the game.
    pub fn end_game(&mut self) -> Vec<GameEvent> {
        if self.phase == GamePhase::Ended {
            return Vec::new();
        }
        self.phase = GamePhase::Ended;
        info!("Game ended");
        vec![GameEvent::GameEnded]
    }

    /// Checks if the game has ended.
    pub fn is_game_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }
}
