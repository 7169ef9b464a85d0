#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round resolution for Maze Chase.
//!
//! A round runs in a fixed order: snapshot, explorer move, key check, a first
//! half-round for every roster in priority order, a second half-round for the
//! chase rosters, and finally the win check. Capture ends the round at the
//! first point it is observed, and rosters sharing cells are merged after each
//! half-round. Every mutation goes through [`maze_chase_world::apply`].

use log::debug;
use maze_chase_core::{
    CellCoord, Command, EnemyId, EnemyKind, EnemySnapshot, Event, MoveIntent, RoundStatus, Tile,
};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, World};
use rand::Rng;

/// Turn arbiter that drives a full round against the world.
#[derive(Clone, Debug, Default)]
pub struct Arbiter {
    pursuit: Pursuit,
}

impl Arbiter {
    /// Creates an arbiter that moves enemies with the provided policies.
    #[must_use]
    pub fn new(pursuit: Pursuit) -> Self {
        Self { pursuit }
    }

    /// Resolves one round for the submitted intent and returns the new status.
    ///
    /// Rounds requested after the game finished are ignored. A step intent
    /// the grid refuses is reported as [`Event::ExplorerBlocked`] and leaves
    /// the world untouched, so no enemy moves and no snapshot is recorded.
    pub fn resolve_round<R>(
        &self,
        world: &mut World,
        intent: MoveIntent,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> RoundStatus
    where
        R: Rng + ?Sized,
    {
        let status = query::status(world);
        if status != RoundStatus::Playing {
            return status;
        }

        if let MoveIntent::Step(direction) = intent {
            let explorer = query::explorer(world);
            if query::grid(world)
                .step_target(query::gate(world), explorer, direction)
                .is_none()
            {
                out_events.push(Event::ExplorerBlocked { direction });
                return RoundStatus::Playing;
            }
        }

        world::apply(world, Command::RecordSnapshot, out_events);
        if let MoveIntent::Step(direction) = intent {
            world::apply(world, Command::MoveExplorer { direction }, out_events);
        }

        let status = self.play_out(world, rng, out_events);
        debug!(
            "round {} resolved as {status:?}",
            query::round_index(world) + 1
        );
        world::apply(world, Command::ConcludeRound { status }, out_events);
        status
    }

    fn play_out<R>(&self, world: &mut World, rng: &mut R, out_events: &mut Vec<Event>) -> RoundStatus
    where
        R: Rng + ?Sized,
    {
        let explorer = query::explorer(world);
        toggle_gate_for(world, &[explorer], out_events);
        if query::is_explorer_captured(world) {
            return RoundStatus::Lose;
        }

        for kinds in [&EnemyKind::PRIORITY[..], &EnemyKind::CHASERS[..]] {
            for &kind in kinds {
                self.move_roster(world, kind, rng, out_events);
            }
            if query::is_explorer_captured(world) {
                return RoundStatus::Lose;
            }
            merge_rosters(world, out_events);
        }

        if query::grid(world).is_goal_adjacent(query::explorer(world)) {
            RoundStatus::Win
        } else {
            RoundStatus::Playing
        }
    }

    fn move_roster<R>(
        &self,
        world: &mut World,
        kind: EnemyKind,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let roster: Vec<EnemyId> = query::enemy_view(world)
            .of_kind(kind)
            .map(|enemy| enemy.id)
            .collect();
        if roster.is_empty() {
            return;
        }

        for &enemy in &roster {
            self.move_enemy(world, enemy, rng, out_events);
        }

        let occupied: Vec<CellCoord> = roster
            .iter()
            .filter_map(|enemy| query::enemy(world, *enemy))
            .map(|enemy| enemy.cell)
            .collect();
        toggle_gate_for(world, &occupied, out_events);
    }

    fn move_enemy<R>(
        &self,
        world: &mut World,
        enemy: EnemyId,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        world::apply(world, Command::BeginEnemyTurn { enemy }, out_events);
        let Some(snapshot) = query::enemy(world, enemy) else {
            return;
        };

        let decision = self.pursuit.decide(
            query::grid(world),
            query::gate(world),
            &snapshot,
            query::explorer(world),
            rng,
        );
        if decision.failed_attempts > 0 {
            world::apply(
                world,
                Command::RecordStall {
                    enemy,
                    attempts: decision.failed_attempts,
                },
                out_events,
            );
        }
        if let Some(to) = decision.next {
            world::apply(world, Command::StepEnemy { enemy, to }, out_events);
        }
    }
}

/// Flips the gate once for every listed cell that sits on the key.
fn toggle_gate_for(world: &mut World, cells: &[CellCoord], out_events: &mut Vec<Event>) {
    let Some(key) = query::grid(world).find(Tile::Key) else {
        return;
    };
    let presses = cells.iter().filter(|cell| **cell == key).count();
    for _ in 0..presses {
        world::apply(world, Command::ToggleGate, out_events);
    }
}

/// Collapses enemies that share a cell.
///
/// Members of the same roster keep the lowest identifier. Across rosters the
/// highest-ranked kind on a cell absorbs every other enemy standing there.
fn merge_rosters(world: &mut World, out_events: &mut Vec<Event>) {
    let enemies = query::enemy_view(world).into_vec();
    let mut absorbed: Vec<(EnemyId, EnemyId)> = Vec::new();

    for (index, enemy) in enemies.iter().enumerate() {
        let twin = enemies[..index]
            .iter()
            .find(|other| other.kind == enemy.kind && other.cell == enemy.cell);
        if let Some(keeper) = twin {
            absorbed.push((enemy.id, keeper.id));
        }
    }

    for enemy in &enemies {
        if absorbed.iter().any(|(removed, _)| *removed == enemy.id) {
            continue;
        }
        if let Some(stronger) = strongest_on(&enemies, enemy.cell) {
            if stronger.kind.rank() < enemy.kind.rank() {
                absorbed.push((enemy.id, stronger.id));
            }
        }
    }

    for (enemy, absorbed_by) in absorbed {
        debug!("enemy {enemy:?} absorbed by {absorbed_by:?}");
        world::apply(
            world,
            Command::RemoveEnemy { enemy, absorbed_by },
            out_events,
        );
    }
}

fn strongest_on(enemies: &[EnemySnapshot], cell: CellCoord) -> Option<&EnemySnapshot> {
    enemies
        .iter()
        .filter(|enemy| enemy.cell == cell)
        .min_by_key(|enemy| (enemy.kind.rank(), enemy.id))
}
