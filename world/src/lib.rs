#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

pub mod navigation;

use log::{debug, warn};
use maze_chase_core::{
    AgentPlacement, CellCoord, Command, Difficulty, EnemyId, EnemyKind, EnemySlot, Event,
    GateState, Grid, PlacementIssue, RoundSnapshot, RoundStatus, Tile, MAX_STEPS_PER_TURN,
    WELCOME_BANNER,
};

const PLACEHOLDER_SIDE: u32 = 3;
const PLACEHOLDER_CELL: CellCoord = CellCoord::new(1, 1);

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    gate: GateState,
    explorer: CellCoord,
    enemies: Vec<Enemy>,
    history: Vec<RoundSnapshot>,
    initial: RoundSnapshot,
    status: RoundStatus,
    round_index: u64,
}

impl World {
    /// Creates a world holding a single open cell and no enemies.
    ///
    /// Adapters replace the placeholder level with [`Command::LoadLevel`].
    #[must_use]
    pub fn new() -> Self {
        let mut grid = Grid::filled(PLACEHOLDER_SIDE, PLACEHOLDER_SIDE, Tile::Wall);
        grid.set_tile(PLACEHOLDER_CELL, Tile::Floor);
        let mut world = Self {
            banner: WELCOME_BANNER,
            gate: GateState::for_grid(&grid),
            grid,
            explorer: PLACEHOLDER_CELL,
            enemies: Vec::new(),
            history: Vec::new(),
            initial: RoundSnapshot {
                explorer: PLACEHOLDER_CELL,
                gate_closed: false,
                status: RoundStatus::Playing,
                round: 0,
                enemies: Vec::new(),
            },
            status: RoundStatus::Playing,
            round_index: 0,
        };
        world.initial = world.capture();
        world
    }

    fn capture(&self) -> RoundSnapshot {
        RoundSnapshot {
            explorer: self.explorer,
            gate_closed: self.gate.is_closed(),
            status: self.status,
            round: self.round_index,
            enemies: self
                .enemies
                .iter()
                .map(|enemy| EnemySlot {
                    cell: enemy.cell,
                    active: enemy.active,
                })
                .collect(),
        }
    }

    fn restore(&mut self, snapshot: &RoundSnapshot) {
        self.explorer = snapshot.explorer;
        self.gate.set_closed(snapshot.gate_closed);
        self.status = snapshot.status;
        self.round_index = snapshot.round;
        for (enemy, slot) in self.enemies.iter_mut().zip(&snapshot.enemies) {
            enemy.cell = slot.cell;
            enemy.active = slot.active;
            enemy.clear_turn();
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        let index = usize::try_from(enemy.get()).ok()?;
        self.enemies.get_mut(index).filter(|enemy| enemy.active)
    }

    fn load_level(
        &mut self,
        grid: Grid,
        placement: AgentPlacement,
        difficulty: Difficulty,
        out_events: &mut Vec<Event>,
    ) {
        let fallback = fallback_cell(&grid);
        let mut issues = Vec::new();

        let explorer = match placement.explorer {
            Some(cell) if grid.is_standable(cell) => cell,
            Some(requested) => {
                issues.push(PlacementIssue::ExplorerRelocated {
                    requested,
                    fallback,
                });
                fallback
            }
            None => {
                issues.push(PlacementIssue::MissingExplorer { fallback });
                fallback
            }
        };

        let mut enemies: Vec<Enemy> = Vec::with_capacity(placement.enemies.len());
        for requested in placement.enemies {
            if !grid.is_standable(requested.cell) {
                issues.push(PlacementIssue::EnemyDiscarded {
                    kind: requested.kind,
                    cell: requested.cell,
                });
                continue;
            }
            let Ok(id) = u32::try_from(enemies.len()) else {
                break;
            };
            enemies.push(Enemy::new(
                EnemyId::new(id),
                requested.kind,
                difficulty,
                requested.cell,
            ));
        }

        self.gate = GateState::for_grid(&grid);
        self.grid = grid;
        self.explorer = explorer;
        self.enemies = enemies;
        self.history.clear();
        self.status = RoundStatus::Playing;
        self.round_index = 0;
        self.initial = self.capture();

        for issue in issues {
            warn!("level placement corrected: {issue:?}");
            out_events.push(Event::PlacementFallback { issue });
        }
        debug!(
            "level loaded with {} enemies, gate closed: {}",
            self.enemies.len(),
            self.gate.is_closed()
        );
        out_events.push(Event::LevelLoaded {
            enemies: self.enemies.len(),
            gate_closed: self.gate.is_closed(),
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel {
            grid,
            placement,
            difficulty,
        } => world.load_level(grid, placement, difficulty, out_events),
        Command::RecordSnapshot => {
            let snapshot = world.capture();
            world.history.push(snapshot);
            out_events.push(Event::SnapshotRecorded {
                depth: world.history.len(),
            });
        }
        Command::MoveExplorer { direction } => {
            let from = world.explorer;
            match world.grid.step_target(&world.gate, from, direction) {
                Some(to) => {
                    world.explorer = to;
                    out_events.push(Event::ExplorerMoved { from, to });
                }
                None => out_events.push(Event::ExplorerBlocked { direction }),
            }
        }
        Command::ToggleGate => {
            let closed = world.gate.toggle();
            out_events.push(Event::GateToggled { closed });
        }
        Command::BeginEnemyTurn { enemy } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.clear_turn();
            }
        }
        Command::StepEnemy { enemy: id, to } => {
            let grid = &world.grid;
            let gate = &world.gate;
            let Some(enemy) = world
                .enemies
                .iter_mut()
                .find(|enemy| enemy.id == id && enemy.active)
            else {
                out_events.push(Event::EnemyStepRejected { enemy: id, to });
                return;
            };
            if enemy.step_count >= MAX_STEPS_PER_TURN || !grid.is_legal_move(gate, enemy.cell, to)
            {
                out_events.push(Event::EnemyStepRejected { enemy: id, to });
                return;
            }
            let from = enemy.cell;
            enemy.cell = to;
            enemy.step_count += 1;
            out_events.push(Event::EnemyMoved {
                enemy: id,
                from,
                to,
            });
        }
        Command::RecordStall { enemy, attempts } => {
            if let Some(enemy) = world.enemy_mut(enemy) {
                enemy.failed_attempts = enemy.failed_attempts.saturating_add(attempts);
            }
        }
        Command::RemoveEnemy { enemy, absorbed_by } => {
            if let Some(removed) = world.enemy_mut(enemy) {
                removed.active = false;
                out_events.push(Event::EnemyRemoved {
                    enemy,
                    kind: removed.kind,
                    absorbed_by,
                });
            }
        }
        Command::ConcludeRound { status } => {
            world.status = status;
            world.round_index = world.round_index.saturating_add(1);
            out_events.push(Event::RoundConcluded {
                round: world.round_index,
                status,
            });
        }
        Command::Undo => match world.history.pop() {
            Some(snapshot) => {
                world.restore(&snapshot);
                out_events.push(Event::StateRestored {
                    depth: world.history.len(),
                });
            }
            None => out_events.push(Event::UndoIgnored),
        },
        Command::Reset => {
            let initial = world.initial.clone();
            world.restore(&initial);
            world.history.clear();
            out_events.push(Event::LevelReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_chase_core::{
        CellCoord, EnemyId, EnemySnapshot, EnemyView, GateState, Grid, RoundSnapshot, RoundStatus,
        Tile,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the active grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current gate state.
    #[must_use]
    pub fn gate(world: &World) -> &GateState {
        &world.gate
    }

    /// Cell occupied by the explorer.
    #[must_use]
    pub fn explorer(world: &World) -> CellCoord {
        world.explorer
    }

    /// Status reached by the most recent round.
    #[must_use]
    pub fn status(world: &World) -> RoundStatus {
        world.status
    }

    /// Number of rounds concluded since the level loaded.
    #[must_use]
    pub fn round_index(world: &World) -> u64 {
        world.round_index
    }

    /// Number of snapshots available to undo.
    #[must_use]
    pub fn history_depth(world: &World) -> usize {
        world.history.len()
    }

    /// Captures the current character and gate state.
    #[must_use]
    pub fn snapshot(world: &World) -> RoundSnapshot {
        world.capture()
    }

    /// Captures a read-only view of the active enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.active)
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Snapshot of a single active enemy.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        let index = usize::try_from(enemy.get()).ok()?;
        world
            .enemies
            .get(index)
            .filter(|enemy| enemy.active)
            .map(|enemy| enemy.snapshot())
    }

    /// Reports whether the explorer stands on a trap or shares a cell with an enemy.
    #[must_use]
    pub fn is_explorer_captured(world: &World) -> bool {
        world.grid.tile(world.explorer) == Some(Tile::Trap)
            || world
                .enemies
                .iter()
                .any(|enemy| enemy.active && enemy.cell == world.explorer)
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    difficulty: Difficulty,
    cell: CellCoord,
    step_count: u32,
    failed_attempts: u32,
    active: bool,
}

impl Enemy {
    fn new(id: EnemyId, kind: EnemyKind, difficulty: Difficulty, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            difficulty,
            cell,
            step_count: 0,
            failed_attempts: 0,
            active: true,
        }
    }

    fn clear_turn(&mut self) {
        self.step_count = 0;
        self.failed_attempts = 0;
    }

    fn snapshot(&self) -> maze_chase_core::EnemySnapshot {
        maze_chase_core::EnemySnapshot {
            id: self.id,
            kind: self.kind,
            difficulty: self.difficulty,
            cell: self.cell,
            step_count: self.step_count,
            failed_attempts: self.failed_attempts,
        }
    }
}

fn fallback_cell(grid: &Grid) -> CellCoord {
    grid.logical_cells()
        .find(|cell| grid.is_standable(*cell) && grid.tile(*cell) != Some(Tile::Trap))
        .unwrap_or(PLACEHOLDER_CELL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Direction, EnemyPlacement};

    fn corridor() -> Grid {
        // Three logical cells in a row, all doorways open.
        let mut grid = Grid::filled(7, 3, Tile::Wall);
        for column in 1..6 {
            grid.set_tile(CellCoord::new(column, 1), Tile::Floor);
        }
        grid
    }

    fn load(world: &mut World, grid: Grid, placement: AgentPlacement) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::LoadLevel {
                grid,
                placement,
                difficulty: Difficulty::Greedy,
            },
            &mut events,
        );
        events
    }

    fn enemy_at(kind: EnemyKind, column: u32, row: u32) -> EnemyPlacement {
        EnemyPlacement {
            kind,
            cell: CellCoord::new(column, row),
        }
    }

    #[test]
    fn load_level_accepts_valid_placement() {
        let mut world = World::new();
        let events = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: vec![enemy_at(EnemyKind::ChaseWhite, 5, 1)],
            },
        );

        assert_eq!(
            events,
            vec![Event::LevelLoaded {
                enemies: 1,
                gate_closed: false
            }]
        );
        assert_eq!(query::explorer(&world), CellCoord::new(1, 1));
        assert_eq!(query::enemy_view(&world).len(), 1);
        assert_eq!(query::status(&world), RoundStatus::Playing);
    }

    #[test]
    fn load_level_relocates_invalid_explorer_and_drops_bad_enemies() {
        let mut world = World::new();
        let events = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(2, 1)),
                enemies: vec![
                    enemy_at(EnemyKind::GuardRed, 9, 9),
                    enemy_at(EnemyKind::GuardWhite, 3, 1),
                ],
            },
        );

        assert!(events.contains(&Event::PlacementFallback {
            issue: PlacementIssue::ExplorerRelocated {
                requested: CellCoord::new(2, 1),
                fallback: CellCoord::new(1, 1),
            }
        }));
        assert!(events.contains(&Event::PlacementFallback {
            issue: PlacementIssue::EnemyDiscarded {
                kind: EnemyKind::GuardRed,
                cell: CellCoord::new(9, 9),
            }
        }));
        let enemies = query::enemy_view(&world).into_vec();
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].id, EnemyId::new(0));
        assert_eq!(enemies[0].kind, EnemyKind::GuardWhite);
    }

    #[test]
    fn missing_explorer_skips_traps() {
        let mut grid = corridor();
        grid.set_tile(CellCoord::new(1, 1), Tile::Trap);
        let mut world = World::new();
        let events = load(&mut world, grid, AgentPlacement::default());

        assert_eq!(
            events[0],
            Event::PlacementFallback {
                issue: PlacementIssue::MissingExplorer {
                    fallback: CellCoord::new(3, 1)
                }
            }
        );
        assert_eq!(query::explorer(&world), CellCoord::new(3, 1));
    }

    #[test]
    fn explorer_moves_only_through_open_doorways() {
        let mut world = World::new();
        let _ = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: Vec::new(),
            },
        );
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveExplorer {
                direction: Direction::North,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::MoveExplorer {
                direction: Direction::East,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ExplorerBlocked {
                    direction: Direction::North
                },
                Event::ExplorerMoved {
                    from: CellCoord::new(1, 1),
                    to: CellCoord::new(3, 1)
                },
            ]
        );
    }

    #[test]
    fn enemy_takes_at_most_one_step_per_turn() {
        let mut world = World::new();
        let _ = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: vec![enemy_at(EnemyKind::ChaseRed, 5, 1)],
            },
        );
        let enemy = EnemyId::new(0);
        let mut events = Vec::new();

        apply(&mut world, Command::BeginEnemyTurn { enemy }, &mut events);
        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(3, 1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(1, 1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::EnemyMoved {
                    enemy,
                    from: CellCoord::new(5, 1),
                    to: CellCoord::new(3, 1)
                },
                Event::EnemyStepRejected {
                    enemy,
                    to: CellCoord::new(1, 1)
                },
            ]
        );

        events.clear();
        apply(&mut world, Command::BeginEnemyTurn { enemy }, &mut events);
        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(1, 1),
            },
            &mut events,
        );
        assert!(query::is_explorer_captured(&world));
    }

    #[test]
    fn toggle_gate_twice_restores_state() {
        let mut grid = corridor();
        grid.set_tile(CellCoord::new(4, 1), Tile::Gate);
        let mut world = World::new();
        let _ = load(&mut world, grid, AgentPlacement::default());
        assert!(query::gate(&world).is_closed());

        let mut events = Vec::new();
        apply(&mut world, Command::ToggleGate, &mut events);
        apply(&mut world, Command::ToggleGate, &mut events);

        assert!(query::gate(&world).is_closed());
        assert_eq!(
            events,
            vec![
                Event::GateToggled { closed: false },
                Event::GateToggled { closed: true },
            ]
        );
    }

    #[test]
    fn undo_restores_recorded_snapshot_verbatim() {
        let mut world = World::new();
        let _ = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: vec![
                    enemy_at(EnemyKind::ChaseWhite, 5, 1),
                    enemy_at(EnemyKind::GuardWhite, 5, 1),
                ],
            },
        );
        let before = query::snapshot(&world);
        let mut events = Vec::new();

        apply(&mut world, Command::RecordSnapshot, &mut events);
        apply(
            &mut world,
            Command::MoveExplorer {
                direction: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::RemoveEnemy {
                enemy: EnemyId::new(1),
                absorbed_by: EnemyId::new(0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConcludeRound {
                status: RoundStatus::Lose,
            },
            &mut events,
        );
        assert_eq!(query::enemy_view(&world).len(), 1);

        events.clear();
        apply(&mut world, Command::Undo, &mut events);

        assert_eq!(events, vec![Event::StateRestored { depth: 0 }]);
        assert_eq!(query::snapshot(&world), before);
        assert_eq!(query::enemy_view(&world).len(), 2);
        assert_eq!(query::status(&world), RoundStatus::Playing);
    }

    #[test]
    fn undo_with_empty_history_is_ignored() {
        let mut world = World::new();
        let before = query::snapshot(&world);
        let mut events = Vec::new();

        apply(&mut world, Command::Undo, &mut events);

        assert_eq!(events, vec![Event::UndoIgnored]);
        assert_eq!(query::snapshot(&world), before);
    }

    #[test]
    fn reset_returns_to_level_start() {
        let mut world = World::new();
        let _ = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: Vec::new(),
            },
        );
        let initial = query::snapshot(&world);
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(&mut world, Command::RecordSnapshot, &mut events);
            apply(
                &mut world,
                Command::MoveExplorer {
                    direction: Direction::East,
                },
                &mut events,
            );
        }
        assert_eq!(query::history_depth(&world), 2);

        apply(&mut world, Command::Reset, &mut events);

        assert_eq!(query::snapshot(&world), initial);
        assert_eq!(query::history_depth(&world), 0);
    }

    #[test]
    fn removed_enemies_ignore_further_commands() {
        let mut world = World::new();
        let _ = load(
            &mut world,
            corridor(),
            AgentPlacement {
                explorer: Some(CellCoord::new(1, 1)),
                enemies: vec![enemy_at(EnemyKind::GuardRed, 3, 1)],
            },
        );
        let enemy = EnemyId::new(0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RemoveEnemy {
                enemy,
                absorbed_by: enemy,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::StepEnemy {
                enemy,
                to: CellCoord::new(1, 1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::EnemyStepRejected {
                enemy,
                to: CellCoord::new(1, 1)
            }]
        );
        assert!(query::enemy(&world, enemy).is_none());
        assert!(!query::is_explorer_captured(&world));
    }
}
