#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values. Systems query
//! immutable state and respond exclusively with new commands.
//!
//! Grids use doubled coordinates: logical cells live at odd column and odd row
//! indices, while even indices hold the walls or doorways between them. A move
//! always spans two grid units and is decided by the tile at its midpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Number of grid units spanned by a single logical move.
pub const STEP_SPAN: u32 = 2;

/// Maximum number of steps an enemy may take during one enemy turn.
pub const MAX_STEPS_PER_TURN: u32 = 1;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Converts a logical cell index into its doubled grid coordinate.
    #[must_use]
    pub const fn from_logical(column: u32, row: u32) -> Self {
        Self::new(column * 2 + 1, row * 2 + 1)
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Reports whether the coordinate addresses a logical cell.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        self.column % 2 == 1 && self.row % 2 == 1
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Manhattan distance measured in logical moves rather than grid units.
    #[must_use]
    pub fn logical_distance(self, other: CellCoord) -> u32 {
        self.manhattan_distance(other) / STEP_SPAN
    }

    /// Shifts the coordinate `distance` units in `direction`.
    ///
    /// Returns `None` when the shift would leave the unsigned coordinate space.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: u32) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(distance)
                .map(|row| Self::new(self.column, row)),
            Direction::South => self
                .row
                .checked_add(distance)
                .map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(distance)
                .map(|column| Self::new(column, self.row)),
            Direction::East => self
                .column
                .checked_add(distance)
                .map(|column| Self::new(column, self.row)),
        }
    }

    /// Cell halfway between two coordinates, rounding toward the origin.
    #[must_use]
    pub fn midpoint(self, other: CellCoord) -> CellCoord {
        Self::new(
            (self.column + other.column) / 2,
            (self.row + other.row) / 2,
        )
    }

    /// Direction of a single logical move from `self` to `other`, if any.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        Direction::SEARCH_ORDER
            .into_iter()
            .find(|direction| self.offset(*direction, STEP_SPAN) == Some(other))
    }
}

/// Cardinal movement directions available to characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which neighbours are expanded by searches and random walks.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Axis along which the direction travels.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::Vertical,
            Direction::East | Direction::West => Axis::Horizontal,
        }
    }
}

/// Movement axis used when ordering greedy approaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Column changes.
    Horizontal,
    /// Row changes.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Move submitted by the explorer for a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveIntent {
    /// Attempts a single logical move in the provided direction.
    Step(Direction),
    /// Stays in place for the round.
    Wait,
}

/// Content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Open ground.
    Floor,
    /// Impassable wall or closed doorway.
    Wall,
    /// Exit cell; always sits on the border.
    Goal,
    /// Pressure plate that toggles the gate when stepped on.
    Key,
    /// Doorway that blocks movement while closed.
    Gate,
    /// Hazard that captures the explorer.
    Trap,
}

/// Rectangular tile grid addressed with doubled coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid of the provided dimensions filled with a single tile.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile: Tile) -> Self {
        let len = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![tile; len],
        }
    }

    /// Builds a grid from row-major tile rows.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, Vec::len);
        if row_count < 3 || column_count < 3 {
            return Err(GridError::TooSmall {
                columns: column_count,
                rows: row_count,
            });
        }

        let mut tiles = Vec::with_capacity(row_count * column_count);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != column_count {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected: column_count,
                    found: row.len(),
                });
            }
            tiles.extend(row);
        }

        if row_count % 2 == 0 || column_count % 2 == 0 {
            return Err(GridError::EvenDimensions {
                columns: column_count,
                rows: row_count,
            });
        }

        let columns = u32::try_from(column_count).map_err(|_| GridError::TooLarge)?;
        let rows = u32::try_from(row_count).map_err(|_| GridError::TooLarge)?;
        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells stored by the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid stores no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major storage index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let index = u64::from(cell.row()) * u64::from(self.columns) + u64::from(cell.column());
        usize::try_from(index).ok()
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.tiles.len() || self.columns == 0 {
            return None;
        }
        let columns = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % columns).ok()?;
        let row = u32::try_from(index / columns).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Tile stored at the cell, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index_of(cell).map(|index| self.tiles[index])
    }

    /// Replaces the tile at `cell`. Out-of-range cells are ignored.
    pub fn set_tile(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index_of(cell) {
            self.tiles[index] = tile;
        }
    }

    /// First cell in row-major order holding the provided tile.
    #[must_use]
    pub fn find(&self, tile: Tile) -> Option<CellCoord> {
        self.cells_of(tile).next()
    }

    /// All cells holding the provided tile, in row-major order.
    pub fn cells_of(&self, tile: Tile) -> impl Iterator<Item = CellCoord> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| **candidate == tile)
            .filter_map(move |(index, _)| self.cell_at(index))
    }

    /// Logical cells of the grid in row-major order.
    pub fn logical_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (1..self.rows).step_by(2).flat_map(move |row| {
            (1..self.columns)
                .step_by(2)
                .map(move |column| CellCoord::new(column, row))
        })
    }

    /// Tiles of the grid grouped by row.
    pub fn tile_rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.tiles.chunks(width)
    }

    /// Reports whether the cell lies on the outer ring of the grid.
    #[must_use]
    pub const fn is_border(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && (cell.column() == 0
                || cell.row() == 0
                || cell.column() + 1 == self.columns
                || cell.row() + 1 == self.rows)
    }

    /// Reports whether a character may stand on the cell.
    #[must_use]
    pub fn is_standable(&self, cell: CellCoord) -> bool {
        cell.is_logical() && matches!(self.tile(cell), Some(tile) if tile != Tile::Wall)
    }

    /// Reports whether the cell is orthogonally adjacent to a goal tile.
    #[must_use]
    pub fn is_goal_adjacent(&self, cell: CellCoord) -> bool {
        Direction::SEARCH_ORDER.into_iter().any(|direction| {
            cell.offset(direction, 1)
                .and_then(|neighbor| self.tile(neighbor))
                == Some(Tile::Goal)
        })
    }

    /// Logical cells from which the goal can be reached.
    #[must_use]
    pub fn goal_approaches(&self) -> Vec<CellCoord> {
        self.logical_cells()
            .filter(|cell| self.is_goal_adjacent(*cell))
            .collect()
    }

    /// Decides whether a single logical move from `from` to `to` is allowed.
    ///
    /// A move must span exactly one logical step, land inside the grid and pass
    /// through a doorway that is neither a wall nor a closed gate. The tile at
    /// the destination itself is not consulted.
    #[must_use]
    pub fn is_legal_move(&self, gate: &GateState, from: CellCoord, to: CellCoord) -> bool {
        if from.direction_to(to).is_none() || !self.contains(from) || !self.contains(to) {
            return false;
        }
        match self.tile(from.midpoint(to)) {
            None | Some(Tile::Wall) => false,
            Some(Tile::Gate) => !gate.is_closed(),
            Some(_) => true,
        }
    }

    /// Destination of a move in `direction`, provided the move is legal.
    #[must_use]
    pub fn step_target(
        &self,
        gate: &GateState,
        from: CellCoord,
        direction: Direction,
    ) -> Option<CellCoord> {
        from.offset(direction, STEP_SPAN)
            .filter(|to| self.is_legal_move(gate, from, *to))
    }
}

/// Errors raised while constructing a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid must span at least three rows and three columns.
    #[error("grid must be at least 3x3, got {columns}x{rows}")]
    TooSmall {
        /// Number of columns supplied.
        columns: usize,
        /// Number of rows supplied.
        rows: usize,
    },
    /// Every row must have the same width as the first.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Doubled coordinates need an odd number of rows and columns.
    #[error("grid dimensions must be odd, got {columns}x{rows}")]
    EvenDimensions {
        /// Number of columns supplied.
        columns: usize,
        /// Number of rows supplied.
        rows: usize,
    },
    /// Dimensions exceed the addressable coordinate range.
    #[error("grid dimensions exceed the coordinate range")]
    TooLarge,
}

/// Open or closed state of the maze gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateState {
    cell: Option<CellCoord>,
    closed: bool,
}

impl GateState {
    /// Creates a gate state for the provided gate cell.
    #[must_use]
    pub const fn new(cell: Option<CellCoord>, closed: bool) -> Self {
        Self { cell, closed }
    }

    /// Gate state for a freshly loaded grid: closed when a gate exists.
    #[must_use]
    pub fn for_grid(grid: &Grid) -> Self {
        let cell = grid.find(Tile::Gate);
        Self::new(cell, cell.is_some())
    }

    /// A gate state that never blocks movement.
    #[must_use]
    pub const fn open() -> Self {
        Self::new(None, false)
    }

    /// Location of the gate, if the level has one.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    /// Reports whether the gate currently blocks movement.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Forces the gate into the provided state.
    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Flips the gate and returns whether it is now closed.
    pub fn toggle(&mut self) -> bool {
        self.closed = !self.closed;
        self.closed
    }
}

/// Enemy variants distinguished by turn rhythm and greedy axis preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Moves twice per round and prefers horizontal approaches.
    ChaseWhite,
    /// Moves twice per round and prefers vertical approaches.
    ChaseRed,
    /// Moves once per round and prefers horizontal approaches.
    GuardWhite,
    /// Moves once per round and prefers vertical approaches.
    GuardRed,
}

impl EnemyKind {
    /// Order in which rosters take their first move of a round.
    pub const PRIORITY: [EnemyKind; 4] = [
        EnemyKind::ChaseWhite,
        EnemyKind::ChaseRed,
        EnemyKind::GuardWhite,
        EnemyKind::GuardRed,
    ];

    /// Rosters that take a second move each round, in order.
    pub const CHASERS: [EnemyKind; 2] = [EnemyKind::ChaseWhite, EnemyKind::ChaseRed];

    /// Reports whether the kind moves twice per round.
    #[must_use]
    pub const fn is_chase(self) -> bool {
        matches!(self, EnemyKind::ChaseWhite | EnemyKind::ChaseRed)
    }

    /// Axis tried first by the greedy policy.
    #[must_use]
    pub const fn primary_axis(self) -> Axis {
        match self {
            EnemyKind::ChaseWhite | EnemyKind::GuardWhite => Axis::Horizontal,
            EnemyKind::ChaseRed | EnemyKind::GuardRed => Axis::Vertical,
        }
    }

    /// Dominance rank used when enemies share a cell; lower wins.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            EnemyKind::ChaseWhite => 0,
            EnemyKind::ChaseRed => 1,
            EnemyKind::GuardWhite => 2,
            EnemyKind::GuardRed => 3,
        }
    }

    /// Two-letter code used by text layouts.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            EnemyKind::ChaseWhite => "MW",
            EnemyKind::ChaseRed => "MR",
            EnemyKind::GuardWhite => "SW",
            EnemyKind::GuardRed => "SR",
        }
    }

    /// Parses a two-letter layout code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|kind| kind.code() == code)
    }
}

/// Decision policy shared by every enemy in a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Axis-preferring greedy approach.
    #[default]
    Greedy,
    /// Shortest-path pursuit.
    Pursuit,
    /// Guards the goal, pursuing only when the explorer is close.
    ZoneDefense,
}

impl Difficulty {
    /// Maps the numeric levels 1, 2 and 3 onto policies.
    #[must_use]
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Greedy),
            2 => Some(Difficulty::Pursuit),
            3 => Some(Difficulty::ZoneDefense),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an enemy when a level loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Outcome of the game after a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    /// The game continues.
    #[default]
    Playing,
    /// The explorer reached the goal.
    Win,
    /// The explorer was captured.
    Lose,
}

/// Requested enemy position within an [`AgentPlacement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyPlacement {
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Logical cell the enemy starts on.
    pub cell: CellCoord,
}

/// Starting positions for every character of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPlacement {
    /// Explorer start cell, if one was provided.
    pub explorer: Option<CellCoord>,
    /// Enemy start cells in roster order.
    pub enemies: Vec<EnemyPlacement>,
}

/// Per-enemy slot captured by a [`RoundSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemySlot {
    /// Cell the enemy occupied.
    pub cell: CellCoord,
    /// Whether the enemy was still part of the game.
    pub active: bool,
}

/// Full character and gate state captured before a round resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Explorer position.
    pub explorer: CellCoord,
    /// Whether the gate was closed.
    pub gate_closed: bool,
    /// Game status at capture time.
    pub status: RoundStatus,
    /// Number of rounds concluded at capture time.
    pub round: u64,
    /// Enemy slots indexed by identifier.
    pub enemies: Vec<EnemySlot>,
}

/// Read-only description of an active enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Policy driving the enemy.
    pub difficulty: Difficulty,
    /// Current cell.
    pub cell: CellCoord,
    /// Steps already taken during the current enemy turn.
    pub step_count: u32,
    /// Blocked greedy attempts accumulated this turn.
    pub failed_attempts: u32,
}

/// Immutable collection of enemy snapshots ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Builds a view from unordered snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterates over the captured snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshots belonging to a single roster, in identifier order.
    pub fn of_kind(&self, kind: EnemyKind) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.kind == kind)
    }

    /// Number of active enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view and returns the owned snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Corrections applied while validating a level placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementIssue {
    /// No explorer was provided; the fallback cell was used.
    MissingExplorer {
        /// Cell the explorer was placed on.
        fallback: CellCoord,
    },
    /// The requested explorer cell was unusable.
    ExplorerRelocated {
        /// Cell requested by the placement.
        requested: CellCoord,
        /// Cell the explorer was placed on.
        fallback: CellCoord,
    },
    /// An enemy sat on an unusable cell and was dropped.
    EnemyDiscarded {
        /// Variant of the discarded enemy.
        kind: EnemyKind,
        /// Cell requested by the placement.
        cell: CellCoord,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the level with a new grid and starting placement.
    LoadLevel {
        /// Tile layout of the level.
        grid: Grid,
        /// Starting character positions.
        placement: AgentPlacement,
        /// Policy assigned to every enemy.
        difficulty: Difficulty,
    },
    /// Pushes the current state onto the undo history.
    RecordSnapshot,
    /// Moves the explorer one logical step if the move is legal.
    MoveExplorer {
        /// Direction of travel.
        direction: Direction,
    },
    /// Flips the gate between open and closed.
    ToggleGate,
    /// Resets an enemy's per-turn counters.
    BeginEnemyTurn {
        /// Enemy starting its turn.
        enemy: EnemyId,
    },
    /// Moves an enemy to an adjacent logical cell.
    StepEnemy {
        /// Enemy attempting to move.
        enemy: EnemyId,
        /// Destination cell.
        to: CellCoord,
    },
    /// Records blocked greedy attempts for an enemy.
    RecordStall {
        /// Enemy that was blocked.
        enemy: EnemyId,
        /// Number of blocked attempts.
        attempts: u32,
    },
    /// Removes an enemy absorbed by another on the same cell.
    RemoveEnemy {
        /// Enemy leaving the game.
        enemy: EnemyId,
        /// Enemy that absorbed it.
        absorbed_by: EnemyId,
    },
    /// Closes the current round with the provided status.
    ConcludeRound {
        /// Status reached at the end of the round.
        status: RoundStatus,
    },
    /// Restores the most recent snapshot.
    Undo,
    /// Restores the state captured when the level loaded.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a new level is active.
    LevelLoaded {
        /// Number of enemies accepted into the level.
        enemies: usize,
        /// Whether the gate starts closed.
        gate_closed: bool,
    },
    /// Reports a fallback applied while loading a level.
    PlacementFallback {
        /// Correction that was applied.
        issue: PlacementIssue,
    },
    /// Confirms that a snapshot was pushed.
    SnapshotRecorded {
        /// History depth after the push.
        depth: usize,
    },
    /// Confirms that the explorer moved.
    ExplorerMoved {
        /// Cell left.
        from: CellCoord,
        /// Cell entered.
        to: CellCoord,
    },
    /// Reports that an explorer move was refused.
    ExplorerBlocked {
        /// Requested direction.
        direction: Direction,
    },
    /// Announces a gate flip.
    GateToggled {
        /// Whether the gate is now closed.
        closed: bool,
    },
    /// Confirms that an enemy moved.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Cell left.
        from: CellCoord,
        /// Cell entered.
        to: CellCoord,
    },
    /// Reports that an enemy step was refused.
    EnemyStepRejected {
        /// Enemy that attempted the step.
        enemy: EnemyId,
        /// Requested destination.
        to: CellCoord,
    },
    /// Confirms that an enemy was absorbed.
    EnemyRemoved {
        /// Enemy that left the game.
        enemy: EnemyId,
        /// Variant of the removed enemy.
        kind: EnemyKind,
        /// Enemy that absorbed it.
        absorbed_by: EnemyId,
    },
    /// Announces the end of a round.
    RoundConcluded {
        /// One-based index of the concluded round.
        round: u64,
        /// Status reached.
        status: RoundStatus,
    },
    /// Confirms that a snapshot was restored.
    StateRestored {
        /// History depth after the restore.
        depth: usize,
    },
    /// Reports that undo was requested with an empty history.
    UndoIgnored,
    /// Confirms that the level returned to its initial state.
    LevelReset,
}
