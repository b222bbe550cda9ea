//! # Text Display
//!
//! Plain-text renderer for terminals and logs.
//!
//! Each cell is two characters wide. Robots show as `R` and their player
//! number, packages as `#` and their number (`#?` while hidden), empty target
//! cells as `T` and the number they accept. Other cells show their color
//! code, with white floor drawn as `.`.

use crate::game::{CellColor, GameEvent, GamePhase};
use crate::rendering::{CellView, GameSnapshot, Renderer};
use crate::{EventSink, ParcelResult};
use std::io::{self, Write};

/// Renders snapshots as text and keeps a short log of recent events.
pub struct TextRenderer<W: Write> {
    out: W,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Messages shown under the board
    pub shown_messages: usize,
}

impl TextRenderer<io::Stdout> {
    /// Creates a renderer that writes to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to `out`.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{BoardLayout, GameConfig, GameState, Renderer, TextRenderer};
    ///
    /// let state = GameState::new_game(&GameConfig::new(), &BoardLayout::standard(), 1).unwrap();
    /// let mut renderer = TextRenderer::new(Vec::new());
    /// renderer.render(&state.snapshot()).unwrap();
    /// let text = String::from_utf8(renderer.into_inner()).unwrap();
    /// assert!(text.contains("Placing"));
    /// ```
    pub fn new(out: W) -> Self {
        Self {
            out,
            messages: Vec::new(),
            max_messages: 100,
            shown_messages: 3,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Adds a message to the log.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Formats a snapshot without writing it.
    pub fn draw(&self, snapshot: &GameSnapshot) -> String {
        let mut lines = Vec::with_capacity(snapshot.size + 8);
        lines.push(Self::status_line(snapshot));

        let header: String = (0..snapshot.size)
            .map(|x| format!("  {}", column_letter(x)))
            .collect();
        lines.push(format!("   {}", header));
        for (y, row) in snapshot.cells.iter().enumerate() {
            let cells: String = row.iter().map(|cell| format!(" {}", cell_glyph(cell))).collect();
            lines.push(format!("{:>2} {}", y + 1, cells));
        }

        for player in &snapshot.players {
            let marker = if player.index == snapshot.current_player { ">" } else { " " };
            let kind = if player.automated { "auto" } else { "human" };
            lines.push(format!(
                "{} Player {} ({}): {} points",
                marker,
                player.index + 1,
                kind,
                player.score
            ));
        }
        for robot in &snapshot.robots {
            if let Some(number) = robot.held_package {
                lines.push(format!("  {} carries package {}", robot.id, number));
            }
        }

        let start = self.messages.len().saturating_sub(self.shown_messages);
        lines.extend(self.messages[start..].iter().map(|message| format!("  | {}", message)));

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn status_line(snapshot: &GameSnapshot) -> String {
        match snapshot.phase {
            GamePhase::Placing => format!(
                "Placing | player {} to place a robot",
                snapshot.current_player + 1
            ),
            GamePhase::Playing => {
                let moves = snapshot
                    .players
                    .get(snapshot.current_player)
                    .map(|player| player.remaining_moves)
                    .unwrap_or_default();
                format!(
                    "Turn {} | Playing | player {} has {} moves, robot {} selected",
                    snapshot.turn_number + 1,
                    snapshot.current_player + 1,
                    moves,
                    snapshot.selected_robot + 1
                )
            }
            GamePhase::Ended => "Game over".to_string(),
        }
    }
}

fn column_letter(x: usize) -> char {
    (b'a' + (x % 26) as u8) as char
}

fn cell_glyph(cell: &CellView) -> String {
    if let Some(robot) = cell.robot {
        return format!("R{}", robot.player + 1);
    }
    if let Some(package) = cell.package {
        return match package.number {
            Some(number) => format!("#{}", number),
            None => "#?".to_string(),
        };
    }
    if let Some(target) = cell.target {
        return format!("T{}", target);
    }
    match cell.color {
        CellColor::White => " .".to_string(),
        color => format!(" {}", color.code()),
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &GameSnapshot) -> ParcelResult<()> {
        let text = self.draw(snapshot);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> EventSink for TextRenderer<W> {
    fn record(&mut self, event: &GameEvent) {
        self.add_message(event.to_string());
    }
}
