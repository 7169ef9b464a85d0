#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy decision policies.
//!
//! The system is pure: it reads the grid, the gate and an enemy snapshot and
//! proposes the next cell for that enemy. Applying the move is left to the
//! caller through the world's command surface.

use std::cmp::Ordering;

use log::trace;
use maze_chase_core::{Axis, CellCoord, Difficulty, Direction, EnemySnapshot, GateState, Grid, Tile};
use maze_chase_world::navigation;
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

/// Doubled-coordinate distance at which zone defenders start chasing.
pub const DEFAULT_PURSUIT_RADIUS: u32 = 6;

/// Tunables for the enemy policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Manhattan distance, in grid units, within which a zone defender pursues.
    pub pursuit_radius: u32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            pursuit_radius: DEFAULT_PURSUIT_RADIUS,
        }
    }
}

/// Move proposed for a single enemy turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    /// Cell to step onto, or `None` to stay put.
    pub next: Option<CellCoord>,
    /// Greedy approaches that were blocked before a move was found.
    pub failed_attempts: u32,
}

impl Decision {
    fn stay() -> Self {
        Self::default()
    }

    fn step(to: CellCoord) -> Self {
        Self {
            next: Some(to),
            failed_attempts: 0,
        }
    }
}

/// Pure system that decides where enemies move.
#[derive(Clone, Debug, Default)]
pub struct Pursuit {
    config: PursuitConfig,
}

impl Pursuit {
    /// Creates a policy engine with the provided tunables.
    #[must_use]
    pub fn new(config: PursuitConfig) -> Self {
        Self { config }
    }

    /// Tunables in effect.
    #[must_use]
    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    /// Proposes the next cell for `enemy` given the explorer position.
    ///
    /// An enemy already standing on the explorer does not move. Only the
    /// zone-defense patrol consumes randomness.
    pub fn decide<R>(
        &self,
        grid: &Grid,
        gate: &GateState,
        enemy: &EnemySnapshot,
        explorer: CellCoord,
        rng: &mut R,
    ) -> Decision
    where
        R: Rng + ?Sized,
    {
        if enemy.cell == explorer {
            return Decision::stay();
        }

        let decision = match enemy.difficulty {
            Difficulty::Greedy => {
                greedy_step(grid, gate, enemy.cell, enemy.kind.primary_axis(), explorer)
            }
            Difficulty::Pursuit => pursue(grid, gate, enemy.cell, explorer),
            Difficulty::ZoneDefense => self.defend_zone(grid, gate, enemy.cell, explorer, rng),
        };
        trace!(
            "enemy {:?} ({:?}) at {:?} -> {:?}",
            enemy.id,
            enemy.kind,
            enemy.cell,
            decision.next
        );
        decision
    }

    fn defend_zone<R>(
        &self,
        grid: &Grid,
        gate: &GateState,
        from: CellCoord,
        explorer: CellCoord,
        rng: &mut R,
    ) -> Decision
    where
        R: Rng + ?Sized,
    {
        let Some(guard) = guard_cell(grid) else {
            return pursue(grid, gate, from, explorer);
        };
        if from.manhattan_distance(explorer) <= self.config.pursuit_radius {
            return pursue(grid, gate, from, explorer);
        }

        let next = navigation::next_step_toward(grid, gate, from, guard);
        if next != from {
            return Decision::step(next);
        }

        let options: Vec<CellCoord> = navigation::legal_neighbors(grid, gate, from).collect();
        match options.choose(rng) {
            Some(&to) => Decision::step(to),
            None => Decision::stay(),
        }
    }
}

/// Cell a zone defender returns to: the logical cell beside the goal.
///
/// Neighbours of the goal are scanned below, above, right, then left, and the
/// first standable logical cell wins.
#[must_use]
pub fn guard_cell(grid: &Grid) -> Option<CellCoord> {
    let goal = grid.find(Tile::Goal)?;
    [
        Direction::South,
        Direction::North,
        Direction::East,
        Direction::West,
    ]
    .into_iter()
    .filter_map(|direction| goal.offset(direction, 1))
    .find(|cell| grid.is_standable(*cell))
}

fn greedy_step(
    grid: &Grid,
    gate: &GateState,
    from: CellCoord,
    primary: Axis,
    explorer: CellCoord,
) -> Decision {
    let mut failed_attempts = 0;
    for axis in [primary, primary.other()] {
        let Some(direction) = approach_along(axis, from, explorer) else {
            continue;
        };
        match grid.step_target(gate, from, direction) {
            Some(to) => {
                return Decision {
                    next: Some(to),
                    failed_attempts,
                }
            }
            None => failed_attempts += 1,
        }
    }
    Decision {
        next: None,
        failed_attempts,
    }
}

fn approach_along(axis: Axis, from: CellCoord, target: CellCoord) -> Option<Direction> {
    let (here, there, forward, backward) = match axis {
        Axis::Horizontal => (
            from.column(),
            target.column(),
            Direction::East,
            Direction::West,
        ),
        Axis::Vertical => (from.row(), target.row(), Direction::South, Direction::North),
    };
    match there.cmp(&here) {
        Ordering::Greater => Some(forward),
        Ordering::Less => Some(backward),
        Ordering::Equal => None,
    }
}

fn pursue(grid: &Grid, gate: &GateState, from: CellCoord, explorer: CellCoord) -> Decision {
    let next = navigation::next_step_toward(grid, gate, from, explorer);
    if next == from {
        Decision::stay()
    } else {
        Decision::step(next)
    }
}
