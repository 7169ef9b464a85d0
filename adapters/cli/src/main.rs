#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Maze Chase.
//!
//! `generate` writes a fresh solvable level as maze and agent text. `play`
//! loads a level and drives rounds from a move string or standard input,
//! printing one status line per action.

mod config;
mod layout;

use std::{
    fmt::Write as _,
    fs,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use maze_chase_core::{
    AgentPlacement, Command, Difficulty, Direction, Event, Grid, MoveIntent, RoundStatus,
};
use maze_chase_system_arbiter::Arbiter;
use maze_chase_system_generator::{create_valid_level, SolvabilityCheck};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about = "Turn-based maze chase")]
struct CliArgs {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Generates a solvable level.
    Generate(GenerateArgs),
    /// Plays a level from maze and agent files.
    Play(PlayArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Logical cells per side.
    #[arg(long)]
    size: u32,
    /// Percentage of relaxable walls that stay closed.
    #[arg(long, default_value_t = 50)]
    density: u32,
    /// Seed for reproducible output. Drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Writes the maze here instead of standard output.
    #[arg(long)]
    maze_out: Option<PathBuf>,
    /// Writes the agents here instead of standard output.
    #[arg(long)]
    agents_out: Option<PathBuf>,
    /// Also requires a simulated win against greedy enemies.
    #[arg(long)]
    strict: bool,
    /// TOML tuning file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Maze text file.
    #[arg(long)]
    maze: PathBuf,
    /// Agent text file.
    #[arg(long)]
    agents: PathBuf,
    /// Enemy policy: 1 greedy, 2 pursuit, 3 zone defense.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    difficulty: u8,
    /// Seed for the patrol draws.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Actions to play: U D L R W, `<` to undo, `!` to reset. Reads standard
    /// input when omitted.
    #[arg(long)]
    moves: Option<String>,
    /// TOML tuning file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .init();

    match args.mode {
        Mode::Generate(generate) => run_generate(&generate),
        Mode::Play(play) => run_play(&play),
    }
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let mut tuning = config.generator;
    if args.strict && tuning.check == SolvabilityCheck::Geometric {
        tuning.check = SolvabilityCheck::Simulated {
            max_rounds: args.size.saturating_mul(args.size).saturating_mul(4),
            difficulty: Difficulty::Greedy,
        };
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("generating with seed {seed}");

    let level = create_valid_level(args.size, args.density, seed, &tuning)
        .with_context(|| format!("could not generate a {0}x{0} level", args.size))?;
    debug!("level accepted after {} attempts", level.attempts);

    let maze = layout::format_maze(&level.grid);
    let agents = layout::format_agents(&level.placement);
    emit(args.maze_out.as_deref(), &maze, "maze")?;
    if args.agents_out.is_none() && args.maze_out.is_none() {
        println!();
    }
    emit(args.agents_out.as_deref(), &agents, "agents")?;
    Ok(())
}

fn emit(path: Option<&Path>, contents: &str, what: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("failed to write {what} to {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

fn run_play(args: &PlayArgs) -> Result<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let maze_text = fs::read_to_string(&args.maze)
        .with_context(|| format!("failed to read maze file {}", args.maze.display()))?;
    let grid = layout::parse_maze(&maze_text)
        .with_context(|| format!("failed to parse maze file {}", args.maze.display()))?;
    let agent_text = fs::read_to_string(&args.agents)
        .with_context(|| format!("failed to read agent file {}", args.agents.display()))?;
    let placement = layout::parse_agents(&agent_text);
    let difficulty = Difficulty::from_level(args.difficulty)
        .with_context(|| format!("unsupported difficulty {}", args.difficulty))?;

    let mut session = Session::new(Arbiter::new(Pursuit::new(config.pursuit)), args.seed);
    println!("{}", query::welcome_banner(&session.world));
    session.load(grid, placement, difficulty);
    println!("{}", session.status_line(None));

    match &args.moves {
        Some(moves) => session.play(moves),
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read moves from standard input")?;
                session.play(&line);
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Round(MoveIntent),
    Undo,
    Reset,
}

fn parse_action(symbol: char) -> Option<Action> {
    let action = match symbol.to_ascii_uppercase() {
        'U' => Action::Round(MoveIntent::Step(Direction::North)),
        'D' => Action::Round(MoveIntent::Step(Direction::South)),
        'L' => Action::Round(MoveIntent::Step(Direction::West)),
        'R' => Action::Round(MoveIntent::Step(Direction::East)),
        'W' => Action::Round(MoveIntent::Wait),
        '<' => Action::Undo,
        '!' => Action::Reset,
        _ => return None,
    };
    Some(action)
}

struct Session {
    world: World,
    arbiter: Arbiter,
    rng: ChaCha8Rng,
    events: Vec<Event>,
}

impl Session {
    fn new(arbiter: Arbiter, seed: u64) -> Self {
        Self {
            world: World::new(),
            arbiter,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    fn load(&mut self, grid: Grid, placement: AgentPlacement, difficulty: Difficulty) {
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::LoadLevel {
                grid,
                placement,
                difficulty,
            },
            &mut self.events,
        );
        for event in &self.events {
            if let Event::PlacementFallback { issue } = event {
                println!("note: {issue:?}");
            }
        }
    }

    fn play(&mut self, moves: &str) {
        for symbol in moves.chars().filter(|symbol| !symbol.is_whitespace()) {
            match parse_action(symbol) {
                Some(action) => {
                    self.perform(action);
                    println!("{}", self.status_line(Some(symbol)));
                }
                None => warn!("ignoring unknown move {symbol:?}"),
            }
        }
    }

    fn perform(&mut self, action: Action) {
        self.events.clear();
        match action {
            Action::Round(intent) => {
                let _ = self.arbiter.resolve_round(
                    &mut self.world,
                    intent,
                    &mut self.rng,
                    &mut self.events,
                );
            }
            Action::Undo => world::apply(&mut self.world, Command::Undo, &mut self.events),
            Action::Reset => world::apply(&mut self.world, Command::Reset, &mut self.events),
        }
        for event in &self.events {
            debug!("{event:?}");
        }
    }

    fn status_line(&self, symbol: Option<char>) -> String {
        let world = &self.world;
        let status = match query::status(world) {
            RoundStatus::Playing => "playing",
            RoundStatus::Win => "win",
            RoundStatus::Lose => "lose",
        };
        let explorer = query::explorer(world);
        let gate = if query::gate(world).cell().is_none() {
            "none"
        } else if query::gate(world).is_closed() {
            "closed"
        } else {
            "open"
        };

        let mut line = String::new();
        if let Some(symbol) = symbol {
            let _ = write!(line, "{symbol} ");
        }
        let _ = write!(
            line,
            "round {} {status} explorer {} {} gate {gate}",
            query::round_index(world),
            explorer.row(),
            explorer.column()
        );
        for enemy in query::enemy_view(world).iter() {
            let _ = write!(
                line,
                " {} {} {}",
                enemy.kind.code(),
                enemy.cell.row(),
                enemy.cell.column()
            );
        }
        for event in &self.events {
            match event {
                Event::ExplorerBlocked { .. } => line.push_str(" (blocked)"),
                Event::UndoIgnored => line.push_str(" (nothing to undo)"),
                _ => {}
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAZE: &str = "%%%%%%%\nS     %\n% %%% %\n%     %\n%%%%%%%\n";

    fn session(agents: &str) -> Session {
        let mut session = Session::new(Arbiter::default(), 7);
        session.load(
            layout::parse_maze(MAZE).expect("maze parses"),
            layout::parse_agents(agents),
            Difficulty::Greedy,
        );
        session
    }

    #[test]
    fn parses_move_symbols() {
        assert_eq!(
            parse_action('u'),
            Some(Action::Round(MoveIntent::Step(Direction::North)))
        );
        assert_eq!(parse_action('W'), Some(Action::Round(MoveIntent::Wait)));
        assert_eq!(parse_action('<'), Some(Action::Undo));
        assert_eq!(parse_action('!'), Some(Action::Reset));
        assert_eq!(parse_action('x'), None);
    }

    #[test]
    fn walking_to_the_goal_wins() {
        let mut session = session("E 1 5\n");
        session.play("L");
        assert_eq!(query::status(&session.world), RoundStatus::Playing);
        session.play("L");

        assert_eq!(query::status(&session.world), RoundStatus::Win);
        assert_eq!(
            session.status_line(Some('L')),
            "L round 2 win explorer 1 1 gate none"
        );
    }

    #[test]
    fn blocked_moves_and_empty_undo_are_reported() {
        let mut session = session("E 1 5\n");

        session.perform(Action::Round(MoveIntent::Step(Direction::North)));
        assert!(session.status_line(None).ends_with("(blocked)"));

        session.perform(Action::Undo);
        assert!(session.status_line(None).ends_with("(nothing to undo)"));
    }

    #[test]
    fn status_line_lists_enemies_by_row_and_column() {
        let session = session("E 3 5\nMW 1 1\n");

        assert_eq!(
            session.status_line(None),
            "round 0 playing explorer 3 5 gate none MW 1 1"
        );
    }
}
