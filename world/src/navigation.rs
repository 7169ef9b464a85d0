//! Breadth-first path search over the doubled-coordinate grid.
//!
//! Every search expands neighbours in [`Direction::SEARCH_ORDER`] and consults
//! [`Grid::is_legal_move`] for each edge, so walls, closed gates and the grid
//! boundary are honoured exactly as they are for character movement.

use std::collections::VecDeque;

use maze_chase_core::{CellCoord, Direction, GateState, Grid};

/// First cell on a shortest path from `start` to `target`.
///
/// Returns `start` when the target is unreachable or already occupied by the
/// caller. Ties between equally short paths are broken by expansion order.
#[must_use]
pub fn next_step_toward(
    grid: &Grid,
    gate: &GateState,
    start: CellCoord,
    target: CellCoord,
) -> CellCoord {
    if start == target {
        return start;
    }
    shortest_path(grid, gate, start, target)
        .and_then(|path| path.get(1).copied())
        .unwrap_or(start)
}

/// Reports whether `target` can be reached from `start`.
#[must_use]
pub fn is_reachable(grid: &Grid, gate: &GateState, start: CellCoord, target: CellCoord) -> bool {
    shortest_path(grid, gate, start, target).is_some()
}

/// Shortest path from `start` to `target`, both endpoints included.
#[must_use]
pub fn shortest_path(
    grid: &Grid,
    gate: &GateState,
    start: CellCoord,
    target: CellCoord,
) -> Option<Vec<CellCoord>> {
    let start_index = grid.index_of(start)?;
    let _ = grid.index_of(target)?;

    let mut came_from: Vec<Option<CellCoord>> = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    visited[start_index] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell == target {
            return Some(reconstruct(grid, &came_from, start, target));
        }

        for neighbor in legal_neighbors(grid, gate, cell) {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };
            if visited[neighbor_index] {
                continue;
            }
            visited[neighbor_index] = true;
            came_from[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct(
    grid: &Grid,
    came_from: &[Option<CellCoord>],
    start: CellCoord,
    target: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![target];
    let mut cursor = target;
    while cursor != start {
        let Some(previous) = grid
            .index_of(cursor)
            .and_then(|index| came_from.get(index).copied().flatten())
        else {
            break;
        };
        path.push(previous);
        cursor = previous;
    }
    path.reverse();
    path
}

/// Cells reachable from `cell` in one legal move, in search order.
pub fn legal_neighbors(
    grid: &Grid,
    gate: &GateState,
    cell: CellCoord,
) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    for (slot, direction) in candidates.iter_mut().zip(Direction::SEARCH_ORDER) {
        *slot = grid.step_target(gate, cell, direction);
    }
    candidates.into_iter().flatten()
}

/// Dense move-distance field seeded from a set of source cells.
///
/// Distances count logical moves. Cells the search never reaches, including
/// every wall and doorway cell, report `None`.
#[derive(Clone, Debug, Default)]
pub struct NavigationField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl NavigationField {
    /// Rebuilds the field with a breadth-first search from `sources`.
    pub fn rebuild(&mut self, grid: &Grid, gate: &GateState, sources: &[CellCoord]) {
        self.width = grid.columns();
        self.height = grid.rows();
        if self.distances.len() != grid.len() {
            self.distances = vec![u32::MAX; grid.len()];
        } else {
            self.distances.fill(u32::MAX);
        }

        let mut queue = VecDeque::new();
        for &source in sources {
            if !source.is_logical() {
                continue;
            }
            let Some(index) = grid.index_of(source) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            queue.push_back(source);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = grid.index_of(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in legal_neighbors(grid, gate, cell) {
                let Some(neighbor_index) = grid.index_of(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Width of the field in grid cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in grid cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Move distance from the nearest source, if the cell was reached.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let index = u64::from(cell.row()) * u64::from(self.width) + u64::from(cell.column());
        let index = usize::try_from(index).ok()?;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Number of cells the search reached, sources included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }

    /// Neighbour of `cell` that lies one move closer to a source.
    ///
    /// Returns `None` at a source or when the cell is unreachable.
    #[must_use]
    pub fn descend(&self, grid: &Grid, gate: &GateState, cell: CellCoord) -> Option<Direction> {
        let current = self.distance(cell)?;
        if current == 0 {
            return None;
        }
        Direction::SEARCH_ORDER.into_iter().find(|direction| {
            grid.step_target(gate, cell, *direction)
                .and_then(|next| self.distance(next))
                .map_or(false, |distance| distance < current)
        })
    }
}
