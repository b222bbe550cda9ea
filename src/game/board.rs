//! # Board Module
//!
//! The cell grid, its per-color indexes, and the occupancy map.
//!
//! Cells are stored row-major and addressed by [`Position`]; neighbours are
//! found by coordinate arithmetic, so cells never hold references to each
//! other. The occupancy map is the single source of truth for which cells
//! hold a robot.

use crate::config::{MAX_PACKAGE_NUMBER, MIN_PACKAGE_NUMBER};
use crate::game::{Package, Position, RobotId};
use crate::{ParcelError, ParcelResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Color of a board cell. Colors decide where robots may stand and where
/// packages live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellColor {
    /// Ordinary floor
    White,
    /// Package shelf, one package per cell
    Red,
    /// Loading spot directly above a shelf
    Pickup,
    /// Decorative floor
    Green,
    /// Floor that usually carries delivery targets
    Yellow,
    /// Obstacle
    Blue,
}

impl CellColor {
    /// Decodes a single-character color code.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::CellColor;
    ///
    /// assert_eq!(CellColor::from_code('r'), Some(CellColor::Red));
    /// assert_eq!(CellColor::from_code('?'), None);
    /// ```
    pub fn from_code(code: char) -> Option<CellColor> {
        match code.to_ascii_lowercase() {
            'w' => Some(CellColor::White),
            'r' => Some(CellColor::Red),
            'a' => Some(CellColor::Pickup),
            'g' => Some(CellColor::Green),
            'y' => Some(CellColor::Yellow),
            'b' => Some(CellColor::Blue),
            _ => None,
        }
    }

    /// Returns the single-character code for this color.
    pub fn code(self) -> char {
        match self {
            CellColor::White => 'w',
            CellColor::Red => 'r',
            CellColor::Pickup => 'a',
            CellColor::Green => 'g',
            CellColor::Yellow => 'y',
            CellColor::Blue => 'b',
        }
    }

    /// Returns every color.
    pub fn all() -> [CellColor; 6] {
        [
            CellColor::White,
            CellColor::Red,
            CellColor::Pickup,
            CellColor::Green,
            CellColor::Yellow,
            CellColor::Blue,
        ]
    }
}

/// A single square of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Where this cell sits on the board
    pub position: Position,
    /// Color of the cell
    pub color: CellColor,
    /// Package number delivered here, if this is a target cell
    pub target: Option<u8>,
    /// Package resting on this cell
    pub package: Option<Package>,
}

impl Cell {
    /// Creates an empty cell.
    pub fn new(position: Position, color: CellColor, target: Option<u8>) -> Self {
        Self {
            position,
            color,
            target,
            package: None,
        }
    }

    /// Checks if packages numbered `number` are delivered here.
    pub fn is_target_for(&self, number: u8) -> bool {
        self.target == Some(number)
    }

    /// Returns the resting package if it can still be picked up.
    pub fn available_package(&self) -> Option<&Package> {
        self.package.as_ref().filter(|package| package.is_available())
    }
}

/// The game board: an N×N cell matrix plus occupancy bookkeeping.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Vec<Cell>>,
    color_index: HashMap<CellColor, Vec<Position>>,
    occupancy: HashMap<Position, RobotId>,
}

impl Board {
    /// Builds a board from two equal-shaped, square grids.
    ///
    /// `colors` holds color codes and `targets` holds target package numbers
    /// with `0` meaning "no target". Both are row-major.
    ///
    /// # Examples
    ///
    /// ```
    /// use parcelbots::{Board, CellColor, Position};
    ///
    /// let colors = vec![vec!['w', 'r'], vec!['a', 'y']];
    /// let targets = vec![vec![0, 0], vec![0, 4]];
    /// let board = Board::load(&colors, &targets).unwrap();
    /// assert_eq!(board.size(), 2);
    /// assert_eq!(board.target_cell(4), Some(Position::new(1, 1)));
    /// assert_eq!(board.cells_by_color(CellColor::Red).len(), 1);
    /// ```
    pub fn load(colors: &[Vec<char>], targets: &[Vec<u8>]) -> ParcelResult<Self> {
        let size = colors.len();
        if size == 0 {
            return Err(ParcelError::Load("board has no rows".to_string()));
        }
        if targets.len() != size {
            return Err(ParcelError::Load(format!(
                "color grid has {} rows but target grid has {}",
                size,
                targets.len()
            )));
        }

        let mut cells = Vec::with_capacity(size);
        let mut seen_targets = HashSet::new();

        for (y, (color_row, target_row)) in colors.iter().zip(targets).enumerate() {
            if color_row.len() != size || target_row.len() != size {
                return Err(ParcelError::Load(format!(
                    "row {} must have {} cells (colors: {}, targets: {})",
                    y + 1,
                    size,
                    color_row.len(),
                    target_row.len()
                )));
            }

            let mut row = Vec::with_capacity(size);
            for (x, (&code, &target)) in color_row.iter().zip(target_row).enumerate() {
                let position = Position::new(x as i32, y as i32);
                let color = CellColor::from_code(code).ok_or_else(|| {
                    ParcelError::Load(format!("unknown color code '{}' at {}", code, position))
                })?;

                let target = match target {
                    0 => None,
                    n if (MIN_PACKAGE_NUMBER..=MAX_PACKAGE_NUMBER).contains(&n) => {
                        if !seen_targets.insert(n) {
                            return Err(ParcelError::Load(format!(
                                "target {} appears more than once",
                                n
                            )));
                        }
                        Some(n)
                    }
                    n => {
                        return Err(ParcelError::Load(format!(
                            "target {} at {} is out of range",
                            n, position
                        )))
                    }
                };

                row.push(Cell::new(position, color, target));
            }
            cells.push(row);
        }

        let mut color_index: HashMap<CellColor, Vec<Position>> = HashMap::new();
        for cell in cells.iter().flatten() {
            color_index.entry(cell.color).or_default().push(cell.position);
        }

        Ok(Self {
            size,
            cells,
            color_index,
            occupancy: HashMap::new(),
        })
    }

    /// Returns the side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks if a position lies on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// Gets the cell at a position.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.cells[pos.y as usize][pos.x as usize])
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&mut self.cells[pos.y as usize][pos.x as usize])
    }

    /// Iterates over all cells in grid order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Returns all cells of a given color, in grid order.
    pub fn cells_by_color(&self, color: CellColor) -> Vec<&Cell> {
        self.color_index
            .get(&color)
            .map(|positions| positions.iter().filter_map(|&pos| self.cell(pos)).collect())
            .unwrap_or_default()
    }

    /// Finds the cell where packages numbered `number` are delivered.
    pub fn target_cell(&self, number: u8) -> Option<Position> {
        self.cells()
            .find(|cell| cell.is_target_for(number))
            .map(|cell| cell.position)
    }

    /// Checks if a robot stands on a position.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupancy.contains_key(&pos)
    }

    /// Gets the robot standing on a position.
    pub fn occupant(&self, pos: Position) -> Option<RobotId> {
        self.occupancy.get(&pos).copied()
    }

    /// Records a robot standing on a position.
    pub fn set_occupied(&mut self, pos: Position, robot: RobotId) {
        self.occupancy.insert(pos, robot);
    }

    /// Moves a robot's occupancy entry from `old` to `new`.
    pub fn move_occupancy(&mut self, old: Position, new: Position, robot: RobotId) {
        if self.occupancy.get(&old) == Some(&robot) {
            self.occupancy.remove(&old);
        }
        self.occupancy.insert(new, robot);
    }

    /// Returns how many positions are occupied.
    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Creates a new hidden package numbered `number` at `pos`.
    ///
    /// Fails if the position is off the board, already holds a package, or
    /// the number is outside the package range.
    pub fn place_package(&mut self, pos: Position, number: u8) -> ParcelResult<Package> {
        if !(MIN_PACKAGE_NUMBER..=MAX_PACKAGE_NUMBER).contains(&number) {
            return Err(ParcelError::InvalidState(format!(
                "package number {} is out of range",
                number
            )));
        }
        let cell = self
            .cell_mut(pos)
            .ok_or_else(|| ParcelError::InvalidState(format!("{} is off the board", pos)))?;
        if cell.package.is_some() {
            return Err(ParcelError::InvalidState(format!(
                "{} already holds a package",
                pos
            )));
        }

        let package = Package::new(number, pos);
        cell.package = Some(package);
        Ok(package)
    }

    /// Removes and returns the package resting at `pos`.
    pub fn take_package(&mut self, pos: Position) -> Option<Package> {
        self.cell_mut(pos).and_then(|cell| cell.package.take())
    }

    /// Gets the package resting at `pos`.
    pub fn package_at(&self, pos: Position) -> Option<&Package> {
        self.cell(pos).and_then(|cell| cell.package.as_ref())
    }

    /// Returns every package that can still be picked up, in grid order.
    pub fn available_packages(&self) -> Vec<Package> {
        self.cells()
            .filter_map(|cell| cell.available_package().copied())
            .collect()
    }

    /// Makes the package resting at `pos` visible.
    pub fn reveal_package(&mut self, pos: Position) {
        if let Some(package) = self.cell_mut(pos).and_then(|cell| cell.package.as_mut()) {
            package.reveal();
        }
    }

    /// Makes every resting package visible.
    pub fn reveal_packages(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if let Some(package) = cell.package.as_mut() {
                package.reveal();
            }
        }
    }

    /// Finds the shelf a robot standing at `pos` could load from.
    ///
    /// A robot loads from the red cell directly below a pickup cell, and only
    /// when that shelf holds an available package.
    pub fn pickup_source(&self, pos: Position) -> Option<Position> {
        let cell = self.cell(pos)?;
        if cell.color != CellColor::Pickup {
            return None;
        }
        let below = pos.step(crate::game::Direction::Down);
        let shelf = self.cell(below)?;
        if shelf.color == CellColor::Red && shelf.available_package().is_some() {
            Some(below)
        } else {
            None
        }
    }
}

/// Decoded board input: one string of color codes per row plus a matching
/// grid of target numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Rows of single-character color codes
    pub colors: Vec<String>,
    /// Rows of target package numbers, `0` for none
    pub targets: Vec<Vec<u8>>,
}

impl BoardLayout {
    /// Creates a layout from row strings and target rows.
    pub fn new(colors: &[&str], targets: Vec<Vec<u8>>) -> Self {
        Self {
            colors: colors.iter().map(|row| row.to_string()).collect(),
            targets,
        }
    }

    /// Creates a layout with no target cells.
    pub fn without_targets(colors: &[&str]) -> Self {
        let targets = colors
            .iter()
            .map(|row| vec![0; row.chars().count()])
            .collect();
        Self::new(colors, targets)
    }

    /// The built-in 8×8 board: four shelves with loading spots above them,
    /// nine delivery targets on the yellow border cells.
    pub fn standard() -> Self {
        Self::new(
            &[
                "ywwwwwwy", "wwawwaww", "wwrbbrww", "ywwwwwwy", "ywwggwwy", "wwawwaww",
                "wwrbbrww", "ywwywwwy",
            ],
            vec![
                vec![1, 0, 0, 0, 0, 0, 0, 2],
                vec![0; 8],
                vec![0; 8],
                vec![3, 0, 0, 0, 0, 0, 0, 4],
                vec![5, 0, 0, 0, 0, 0, 0, 6],
                vec![0; 8],
                vec![0; 8],
                vec![7, 0, 0, 9, 0, 0, 0, 8],
            ],
        )
    }

    /// Loads a layout from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ParcelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds the board described by this layout.
    pub fn build(&self) -> ParcelResult<Board> {
        let colors: Vec<Vec<char>> = self.colors.iter().map(|row| row.chars().collect()).collect();
        Board::load(&colors, &self.targets)
    }
}
