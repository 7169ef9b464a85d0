//! Acceptance checks for candidate levels.

use log::trace;
use maze_chase_core::{
    AgentPlacement, Command, Difficulty, GateState, Grid, MoveIntent, RoundStatus,
};
use maze_chase_system_arbiter::Arbiter;
use maze_chase_world::{
    self as world,
    navigation::{self, NavigationField},
    query, World,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Reports whether the explorer can walk to a cell beside the goal.
///
/// The gate is treated as open and enemies are ignored, so a level that passes
/// may still be hard to win in play.
#[must_use]
pub fn is_solvable(grid: &Grid, placement: &AgentPlacement) -> bool {
    let Some(explorer) = placement.explorer else {
        return false;
    };
    let gate = GateState::open();
    grid.goal_approaches()
        .into_iter()
        .any(|approach| navigation::is_reachable(grid, &gate, explorer, approach))
}

/// Plays the level with the real round rules and reports whether the explorer wins.
///
/// Each round the explorer takes one step along a shortest path toward the
/// goal, or waits when no path is open. The game is abandoned as unsolved
/// after `max_rounds` rounds.
#[must_use]
pub fn is_solvable_by_simulation(
    grid: &Grid,
    placement: &AgentPlacement,
    max_rounds: u32,
    difficulty: Difficulty,
    seed: u64,
) -> bool {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            grid: grid.clone(),
            placement: placement.clone(),
            difficulty,
        },
        &mut events,
    );

    let approaches = grid.goal_approaches();
    let arbiter = Arbiter::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut field = NavigationField::default();

    for round in 0..max_rounds {
        field.rebuild(query::grid(&world), query::gate(&world), &approaches);
        let intent = field
            .descend(
                query::grid(&world),
                query::gate(&world),
                query::explorer(&world),
            )
            .map_or(MoveIntent::Wait, MoveIntent::Step);

        events.clear();
        match arbiter.resolve_round(&mut world, intent, &mut rng, &mut events) {
            RoundStatus::Win => {
                trace!("simulation won after {} rounds", round + 1);
                return true;
            }
            RoundStatus::Lose => return false,
            RoundStatus::Playing => {}
        }
    }
    false
}
