#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation for Maze Chase.
//!
//! A level is produced in three stages. [`MazeGenerator`] carves a random
//! spanning tree over the logical cells, relaxes a share of the remaining
//! walls according to the requested density and marks the goal. Characters
//! are then placed by [`place_characters`], and the pair is accepted only when
//! the configured [`SolvabilityCheck`] passes. [`create_valid_level`] repeats
//! the process until a level is accepted or the attempt budget runs out.

mod placement;
mod solvability;

pub use placement::{enemy_count_for, place_characters};
pub use solvability::{is_solvable, is_solvable_by_simulation};

use log::{debug, info};
use maze_chase_core::{AgentPlacement, CellCoord, Difficulty, Direction, Grid, Tile};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Largest supported maze size, in logical cells per side.
pub const MAX_MAZE_SIZE: u32 = 128;

/// Border cell that holds the exit of every generated maze.
pub const GOAL_CELL: CellCoord = CellCoord::new(0, 1);

/// Errors reported while generating a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The requested size is zero or too large.
    #[error("maze size must be between 1 and {max}, got {size}")]
    InvalidSize {
        /// Requested size.
        size: u32,
        /// Largest accepted size.
        max: u32,
    },
    /// The requested density lies outside 0..=100.
    #[error("wall density must be between 0 and 100, got {density}")]
    InvalidDensity {
        /// Requested density.
        density: u32,
    },
    /// No solvable level was found within the attempt budget.
    #[error("no solvable level found after {attempts} placement attempts")]
    GenerationFailed {
        /// Placement attempts consumed.
        attempts: u32,
    },
}

/// Acceptance test applied to every candidate level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolvabilityCheck {
    /// The goal must be reachable from the explorer with the gate open.
    #[default]
    Geometric,
    /// The explorer must win a simulated game by walking shortest paths.
    Simulated {
        /// Rounds allowed before the simulation gives up.
        max_rounds: u32,
        /// Policy assigned to the simulated enemies.
        difficulty: Difficulty,
    },
}

/// Tunables for level generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    /// Minimum logical distance between the explorer and any enemy.
    pub safe_distance: u32,
    /// Placement attempts made for each carved structure.
    pub placements_per_structure: u32,
    /// Draws allowed when positioning enemies.
    pub enemy_placement_attempts: u32,
    /// Draws allowed when positioning the explorer.
    pub explorer_draws: u32,
    /// Total placement attempts before generation fails.
    pub max_attempts: u32,
    /// Acceptance test for candidate levels.
    pub check: SolvabilityCheck,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            safe_distance: 3,
            placements_per_structure: 10,
            enemy_placement_attempts: 100,
            explorer_draws: 1000,
            max_attempts: 5000,
            check: SolvabilityCheck::Geometric,
        }
    }
}

/// Level accepted by [`create_valid_level`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    /// Carved maze.
    pub grid: Grid,
    /// Starting positions.
    pub placement: AgentPlacement,
    /// Placement attempts consumed, the accepted one included.
    pub attempts: u32,
}

/// Carves mazes of a fixed size and wall density.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeGenerator {
    size: u32,
    density: u32,
}

impl MazeGenerator {
    /// Validates the parameters and creates a generator.
    pub fn new(size: u32, density: u32) -> Result<Self, GenerationError> {
        if size == 0 || size > MAX_MAZE_SIZE {
            return Err(GenerationError::InvalidSize {
                size,
                max: MAX_MAZE_SIZE,
            });
        }
        if density > 100 {
            return Err(GenerationError::InvalidDensity { density });
        }
        Ok(Self { size, density })
    }

    /// Logical cells per side.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Percentage of relaxable walls that stay closed.
    #[must_use]
    pub const fn density(&self) -> u32 {
        self.density
    }

    /// Side length of the doubled grid.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.size * 2 + 1
    }

    /// Produces a complete maze with the goal marked.
    pub fn generate<R>(&self, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let mut grid = self.carve(rng);
        let opened = self.relax(&mut grid, rng);
        grid.set_tile(GOAL_CELL, Tile::Goal);
        debug!(
            "carved {}x{} maze, relaxed {opened} walls",
            self.size, self.size
        );
        grid
    }

    /// Carves a random spanning tree over the logical cells.
    ///
    /// Every logical cell is reachable from every other, and there is exactly
    /// one simple path between any two of them.
    pub fn carve<R>(&self, rng: &mut R) -> Grid
    where
        R: Rng + ?Sized,
    {
        let side = self.side();
        let mut grid = Grid::filled(side, side, Tile::Wall);
        for row in 0..self.size {
            for column in 0..self.size {
                grid.set_tile(CellCoord::from_logical(column, row), Tile::Floor);
            }
        }

        let mut visited = vec![false; grid.len()];
        let start = CellCoord::from_logical(0, 0);
        let mut stack = vec![start];
        if let Some(index) = grid.index_of(start) {
            visited[index] = true;
        }

        while let Some(&cell) = stack.last() {
            let unvisited: Vec<Direction> = Direction::SEARCH_ORDER
                .into_iter()
                .filter(|direction| {
                    cell.offset(*direction, 2)
                        .and_then(|next| grid.index_of(next))
                        .map_or(false, |index| !visited[index])
                })
                .collect();

            let Some(&direction) = unvisited.choose(rng) else {
                let _ = stack.pop();
                continue;
            };
            let (Some(doorway), Some(next)) = (cell.offset(direction, 1), cell.offset(direction, 2))
            else {
                let _ = stack.pop();
                continue;
            };
            grid.set_tile(doorway, Tile::Floor);
            if let Some(index) = grid.index_of(next) {
                visited[index] = true;
            }
            stack.push(next);
        }

        grid
    }

    /// Opens a density-dependent share of the interior walls that separate
    /// two floor cells, returning how many were opened.
    pub fn relax<R>(&self, grid: &mut Grid, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut candidates = relaxable_walls(grid);
        let keep = f64::from(self.density) / 100.0;
        let open_count = ((1.0 - keep) * candidates.len() as f64).round() as usize;
        let open_count = open_count.min(candidates.len());

        candidates.shuffle(rng);
        for cell in candidates.into_iter().take(open_count) {
            grid.set_tile(cell, Tile::Floor);
        }
        open_count
    }
}

/// Interior walls flanked by floor on at least one axis.
#[must_use]
pub fn relaxable_walls(grid: &Grid) -> Vec<CellCoord> {
    let is_floor = |column: u32, row: u32| grid.tile(CellCoord::new(column, row)) == Some(Tile::Floor);
    let mut candidates = Vec::new();
    for row in 1..grid.rows().saturating_sub(1) {
        for column in 1..grid.columns().saturating_sub(1) {
            if grid.tile(CellCoord::new(column, row)) != Some(Tile::Wall) {
                continue;
            }
            let horizontal = is_floor(column - 1, row) && is_floor(column + 1, row);
            let vertical = is_floor(column, row - 1) && is_floor(column, row + 1);
            if horizontal || vertical {
                candidates.push(CellCoord::new(column, row));
            }
        }
    }
    candidates
}

/// Generates a solvable level from a seed.
pub fn create_valid_level(
    size: u32,
    density: u32,
    seed: u64,
    tuning: &GenerationTuning,
) -> Result<GeneratedLevel, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    create_valid_level_with(size, density, tuning, &mut rng)
}

/// Generates a solvable level drawing randomness from `rng`.
///
/// Fresh structures are carved until one accepts a placement. Each structure
/// gets `placements_per_structure` tries and the whole search stops after
/// `max_attempts` placements with [`GenerationError::GenerationFailed`].
pub fn create_valid_level_with<R>(
    size: u32,
    density: u32,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Result<GeneratedLevel, GenerationError>
where
    R: Rng + ?Sized,
{
    let generator = MazeGenerator::new(size, density)?;
    let enemy_count = enemy_count_for(size);
    let per_structure = tuning.placements_per_structure.max(1);
    let mut attempts = 0;

    while attempts < tuning.max_attempts {
        let grid = generator.generate(rng);
        for _ in 0..per_structure {
            if attempts >= tuning.max_attempts {
                break;
            }
            attempts += 1;

            let Some(placement) = place_characters(&grid, enemy_count, tuning, rng) else {
                continue;
            };
            if accepts(&grid, &placement, tuning.check, rng) {
                info!("accepted {size}x{size} level after {attempts} attempts");
                return Ok(GeneratedLevel {
                    grid,
                    placement,
                    attempts,
                });
            }
        }
    }

    Err(GenerationError::GenerationFailed { attempts })
}

fn accepts<R>(grid: &Grid, placement: &AgentPlacement, check: SolvabilityCheck, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    match check {
        SolvabilityCheck::Geometric => is_solvable(grid, placement),
        SolvabilityCheck::Simulated {
            max_rounds,
            difficulty,
        } => {
            is_solvable(grid, placement)
                && is_solvable_by_simulation(grid, placement, max_rounds, difficulty, rng.gen())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_parameters() {
        assert_eq!(
            MazeGenerator::new(0, 50),
            Err(GenerationError::InvalidSize {
                size: 0,
                max: MAX_MAZE_SIZE
            })
        );
        assert_eq!(
            MazeGenerator::new(4, 101),
            Err(GenerationError::InvalidDensity { density: 101 })
        );
        assert!(MazeGenerator::new(MAX_MAZE_SIZE, 100).is_ok());
    }

    #[test]
    fn relaxable_walls_skip_border_and_isolated_posts() {
        let mut grid = Grid::filled(5, 5, Tile::Wall);
        for cell in [(1, 1), (3, 1), (1, 3), (3, 3)] {
            grid.set_tile(CellCoord::new(cell.0, cell.1), Tile::Floor);
        }
        let walls = relaxable_walls(&grid);

        assert_eq!(
            walls,
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(3, 2),
                CellCoord::new(2, 3),
            ]
        );
    }
}
