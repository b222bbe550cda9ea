//! # Turn Controller
//!
//! The single entry point front ends talk to.
//!
//! `TurnController` owns the current [`GameState`], the configuration and
//! board layout it was built from, and the [`EventSink`] that hears about
//! everything that happens. It routes decoded input events and script
//! commands to the rule primitives, lets automated players act, and turns
//! every recoverable error into a `Rejected` event instead of returning it.
//! Nothing here ever ends the process.

use crate::game::{
    AutoPlayer, BoardLayout, Controller, Direction, EventSink, GameConfig, GameEvent, GamePhase,
    GameState, LogSink, Position,
};
use crate::input::{InputEvent, ScriptCommand};
use crate::rendering::GameSnapshot;
use crate::{ParcelError, ParcelResult};
use log::{debug, info};

/// Drives one game from placement to the end, across resets.
pub struct TurnController<S: EventSink = LogSink> {
    config: GameConfig,
    layout: BoardLayout,
    state: GameState,
    sink: S,
}

impl TurnController<LogSink> {
    /// Creates a controller that reports events through the `log` facade.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{BoardLayout, GameConfig, GamePhase, TurnController};
    ///
    /// let controller = TurnController::new(GameConfig::new(), BoardLayout::standard()).unwrap();
    /// assert_eq!(controller.phase(), GamePhase::Placing);
    /// ```
    pub fn new(config: GameConfig, layout: BoardLayout) -> ParcelResult<Self> {
        Self::with_sink(config, layout, LogSink)
    }
}

impl<S: EventSink> TurnController<S> {
    /// Creates a controller reporting to `sink`. The first game is seeded
    /// with `config.seed`.
    ///
    /// Fails only when the configuration or the board layout is invalid.
    pub fn with_sink(config: GameConfig, layout: BoardLayout, sink: S) -> ParcelResult<Self> {
        let state = GameState::new_game(&config, &layout, config.seed)?;
        info!(
            "New game: {} players, {} robots each, {}x{} board",
            config.num_players,
            config.robots_per_player,
            state.board.size(),
            state.board.size()
        );
        Ok(Self {
            config,
            layout,
            state,
            sink,
        })
    }

    /// Configuration every new game is built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Board layout every new game is built from.
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the current game state, for setting up scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Event sink receiving every reported event.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Gives back the event sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Checks if the game has not ended yet.
    pub fn is_running(&self) -> bool {
        self.state.phase != GamePhase::Ended
    }

    /// Read-only view for renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            self.sink.record(event);
        }
    }

    fn reject(&mut self, error: &ParcelError) {
        self.sink.record(&GameEvent::rejection(error));
    }

    /// Publishes the events of a successful request or reports its failure.
    /// Returns whether the request was accepted.
    fn report(&mut self, result: ParcelResult<Vec<GameEvent>>) -> bool {
        match result {
            Ok(events) => {
                self.publish(&events);
                true
            }
            Err(err) => {
                self.reject(&err);
                false
            }
        }
    }

    fn require_human_turn(&self) -> ParcelResult<()> {
        if self.state.is_current_automated() {
            return Err(ParcelError::InvalidState(format!(
                "player {} is automated",
                self.state.current_player + 1
            )));
        }
        Ok(())
    }

    /// Handles one decoded input event. Returns whether it was accepted.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        debug!("Handling input {:?}", input);
        match input {
            InputEvent::PlaceAt(pos) => {
                let result = self
                    .require_human_turn()
                    .and_then(|_| self.state.place_robot(pos));
                self.report(result)
            }
            InputEvent::MoveDirection(direction) => {
                let selected = self.state.selected_robot;
                let result = self
                    .require_human_turn()
                    .and_then(|_| self.state.move_robot(selected, direction));
                self.report(result)
            }
            InputEvent::SelectRobot(index) => {
                let result = self
                    .require_human_turn()
                    .and_then(|_| self.state.select_robot(index));
                self.report(result)
            }
            InputEvent::SwitchPlayer => {
                let result = self.require_human_turn().and_then(|_| self.switch_player());
                self.report(result)
            }
            InputEvent::Reset => self.reset(),
            InputEvent::Quit => {
                let events = self.state.end_game();
                self.publish(&events);
                true
            }
        }
    }

    fn switch_player(&mut self) -> ParcelResult<Vec<GameEvent>> {
        if self.state.phase != GamePhase::Playing {
            return Err(ParcelError::InvalidState(
                "turns can only be ended while playing".to_string(),
            ));
        }
        Ok(self.state.end_turn())
    }

    /// Throws the current game away and starts a fresh one from the stored
    /// configuration and layout.
    ///
    /// The new state is built completely before it replaces the old one, so
    /// a failed reset leaves the running game untouched.
    pub fn reset(&mut self) -> bool {
        let seed = self.state.next_seed();
        match GameState::new_game(&self.config, &self.layout, seed) {
            Ok(state) => {
                self.state = state;
                info!("Game reset with seed {}", seed);
                self.sink.record(&GameEvent::GameReset { seed });
                true
            }
            Err(err) => {
                self.reject(&err);
                false
            }
        }
    }

    /// Lets the current player act if they are automated: one placement
    /// during `Placing`, a whole turn during `Playing`.
    ///
    /// Returns false when there was nothing for an automated player to do.
    pub fn step(&mut self) -> bool {
        if !self.state.is_current_automated() {
            return false;
        }
        match self.state.phase {
            GamePhase::Placing => self.auto_place(),
            GamePhase::Playing => self.play_auto_turn(),
            GamePhase::Ended => false,
        }
    }

    /// Calls [`step`](Self::step) until a human is up, the game ends, or
    /// `max_turns` turns have been played. Returns the number of steps taken.
    pub fn run_automated(&mut self, max_turns: Option<u64>) -> usize {
        let mut steps = 0;
        while self.is_running() {
            if max_turns.is_some_and(|limit| self.state.turn_number >= limit) {
                info!("Turn limit reached");
                break;
            }
            if !self.step() {
                break;
            }
            steps += 1;
        }
        steps
    }

    fn auto_place(&mut self) -> bool {
        let result = match self.state.random_placement() {
            Some(pos) => self.state.place_robot(pos),
            None => Err(ParcelError::IllegalPlacement(
                "no free cell to place a robot on".to_string(),
            )),
        };
        self.report(result)
    }

    fn play_auto_turn(&mut self) -> bool {
        let player = self.state.current_player;
        let Controller::Auto(strategy) = self.state.current().controller else {
            return false;
        };

        match AutoPlayer::new(strategy).play_turn(&mut self.state) {
            Ok(turn) => {
                self.publish(&turn.events);
                if !turn.moved {
                    self.sink.record(&GameEvent::Stalemate { player });
                }
                if self.state.phase == GamePhase::Playing {
                    let events = self.state.end_turn();
                    self.publish(&events);
                }
                true
            }
            Err(err) => {
                self.reject(&err);
                false
            }
        }
    }

    /// Runs script lines in order. Blank lines are skipped, malformed lines
    /// are reported and skipped, and lines after the game ends are ignored.
    pub fn run_script<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            if !self.is_running() {
                debug!("Game over, ignoring the rest of the script");
                break;
            }
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            match ScriptCommand::parse(line) {
                Ok(command) => {
                    self.execute_command(&command);
                }
                Err(err) => self.reject(&err),
            }
        }
    }

    /// Executes one script command. Controllers are not consulted: scripts
    /// drive whichever player is active. Returns whether it was accepted.
    pub fn execute_command(&mut self, command: &ScriptCommand) -> bool {
        debug!("Executing script command {}", command);
        match command {
            ScriptCommand::Gamer(player) => {
                let result = if *player < self.state.players.len() {
                    self.state.set_current_player(*player)
                } else {
                    Err(ParcelError::InvalidCommand(format!(
                        "there is no player {}",
                        player + 1
                    )))
                };
                self.report(result)
            }
            ScriptCommand::PutBot(pos) => {
                let result = self.state.place_robot(*pos);
                self.report(result)
            }
            ScriptCommand::Move(cells) => self.execute_move_chain(cells),
            ScriptCommand::End => {
                let events = self.state.end_game();
                self.publish(&events);
                true
            }
        }
    }

    /// Walks the active player's robot on the first cell through the rest.
    /// Stops at the first rejected step or when the turn passes on.
    fn execute_move_chain(&mut self, cells: &[Position]) -> bool {
        if self.state.phase != GamePhase::Playing {
            self.reject(&ParcelError::IllegalMove(
                "robots cannot move until every robot is placed".to_string(),
            ));
            return false;
        }
        let Some((&start, rest)) = cells.split_first() else {
            return false;
        };
        let Some(index) = self.state.current().robot_at(start) else {
            let err = ParcelError::IllegalMove(format!(
                "player {} has no robot at {}",
                self.state.current_player + 1,
                start
            ));
            self.reject(&err);
            return false;
        };

        let turn = self.state.turn_number;
        let mut at = start;
        for &next in rest {
            if self.state.turn_number != turn || self.state.phase != GamePhase::Playing {
                debug!("Turn is over, dropping the rest of the move chain");
                break;
            }
            let Some(direction) = Direction::from_delta(next - at) else {
                self.reject(&ParcelError::IllegalMove(format!(
                    "{} is not next to {}",
                    next, at
                )));
                return false;
            };
            let result = self.state.move_robot(index, direction);
            if !self.report(result) {
                return false;
            }
            at = next;
        }
        true
    }
}
