//! Random character placement on freshly carved mazes.

use maze_chase_core::{AgentPlacement, CellCoord, EnemyKind, EnemyPlacement, Grid};
use rand::{seq::SliceRandom, Rng};

use crate::GenerationTuning;

const SINGLE_ENEMY_WEIGHTS: [(EnemyKind, u32); 2] =
    [(EnemyKind::ChaseWhite, 70), (EnemyKind::ChaseRed, 30)];

const CROWD_WEIGHTS: [(EnemyKind, u32); 4] = [
    (EnemyKind::ChaseWhite, 40),
    (EnemyKind::ChaseRed, 30),
    (EnemyKind::GuardWhite, 20),
    (EnemyKind::GuardRed, 10),
];

/// Number of enemies placed on a maze of the provided size.
#[must_use]
pub fn enemy_count_for(size: u32) -> usize {
    match size {
        0..=7 => 1,
        8 | 9 => 2,
        _ => 3,
    }
}

/// Draws an explorer and up to `enemy_count` enemies.
///
/// The explorer lands more than `size / 2` logical moves from the cell beside
/// the goal. Enemies keep at least `tuning.safe_distance` logical moves from
/// the explorer and never share a cell with another character. Returns `None`
/// when no explorer cell was found within `tuning.explorer_draws` draws; the
/// enemy list may come back short when the attempt budget runs out.
pub fn place_characters<R>(
    grid: &Grid,
    enemy_count: usize,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Option<AgentPlacement>
where
    R: Rng + ?Sized,
{
    let mut free: Vec<CellCoord> = grid
        .logical_cells()
        .filter(|cell| grid.is_standable(*cell))
        .collect();
    let anchor = grid
        .goal_approaches()
        .first()
        .copied()
        .unwrap_or_else(|| CellCoord::from_logical(0, 0));
    let size = grid.columns() / 2;

    let mut explorer = None;
    for _ in 0..tuning.explorer_draws {
        let Some(&cell) = free.choose(rng) else {
            break;
        };
        if cell.logical_distance(anchor) > size / 2 {
            explorer = Some(cell);
            break;
        }
    }
    let explorer = explorer?;
    free.retain(|cell| *cell != explorer);

    let table: &[(EnemyKind, u32)] = if enemy_count == 1 {
        &SINGLE_ENEMY_WEIGHTS
    } else {
        &CROWD_WEIGHTS
    };

    let mut enemies = Vec::with_capacity(enemy_count);
    let mut attempts = 0;
    while enemies.len() < enemy_count && attempts < tuning.enemy_placement_attempts {
        attempts += 1;
        if free.is_empty() {
            break;
        }
        let index = rng.gen_range(0..free.len());
        if free[index].logical_distance(explorer) < tuning.safe_distance {
            continue;
        }
        let cell = free.remove(index);
        let kind = table
            .choose_weighted(rng, |entry| entry.1)
            .map_or(EnemyKind::ChaseWhite, |entry| entry.0);
        enemies.push(EnemyPlacement { kind, cell });
    }

    Some(AgentPlacement {
        explorer: Some(explorer),
        enemies,
    })
}
