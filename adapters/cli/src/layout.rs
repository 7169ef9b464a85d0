//! Plain-text maze and agent files.
//!
//! A maze file holds one line per grid row using `%` for walls, a space or
//! `.` for floor, `S` for the goal, `K` for the key, `G` for the gate and `T`
//! for traps. An agent file holds one character per line as `CODE row col`,
//! where `CODE` is `E` for the explorer or one of the enemy codes.

use std::fmt::Write as _;

use log::warn;
use maze_chase_core::{
    AgentPlacement, CellCoord, EnemyKind, EnemyPlacement, Grid, GridError, Tile,
};
use thiserror::Error;

const EXPLORER_CODE: &str = "E";

/// Errors raised while decoding a maze file.
#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    /// The text contained no rows.
    #[error("maze text is empty")]
    Empty,
    /// A row contained a character outside the maze alphabet.
    #[error("unknown maze character {symbol:?} at row {row}, column {column}")]
    UnknownTile {
        /// Offending character.
        symbol: char,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },
    /// The rows did not form a valid grid.
    #[error("malformed maze grid")]
    Grid(#[from] GridError),
}

/// Decodes maze text into a grid.
pub(crate) fn parse_maze(text: &str) -> Result<Grid, LayoutError> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        let _ = lines.pop();
    }
    if lines.is_empty() {
        return Err(LayoutError::Empty);
    }

    let rows = lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(|(column, symbol)| {
                    tile_for(symbol).ok_or(LayoutError::UnknownTile {
                        symbol,
                        row,
                        column,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Grid::from_rows(rows)?)
}

/// Encodes a grid as maze text, one newline-terminated line per row.
pub(crate) fn format_maze(grid: &Grid) -> String {
    let mut text = String::with_capacity(grid.len() + grid.rows() as usize);
    for row in grid.tile_rows() {
        text.extend(row.iter().map(|tile| symbol_for(*tile)));
        text.push('\n');
    }
    text
}

/// Decodes agent text. Lines that cannot be read are skipped with a warning.
pub(crate) fn parse_agents(text: &str) -> AgentPlacement {
    let mut placement = AgentPlacement::default();
    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let [code, row, column] = fields[..] else {
            warn!("skipping agent line {}: expected `CODE row col`", index + 1);
            continue;
        };
        let (Ok(row), Ok(column)) = (row.parse::<u32>(), column.parse::<u32>()) else {
            warn!("skipping agent line {}: bad coordinates", index + 1);
            continue;
        };
        let cell = CellCoord::new(column, row);

        if code == EXPLORER_CODE {
            if placement.explorer.replace(cell).is_some() {
                warn!("agent line {} replaces an earlier explorer", index + 1);
            }
        } else if let Some(kind) = EnemyKind::from_code(code) {
            placement.enemies.push(EnemyPlacement { kind, cell });
        } else {
            warn!("skipping agent line {}: unknown code {code:?}", index + 1);
        }
    }
    placement
}

/// Encodes a placement as agent text, explorer first.
pub(crate) fn format_agents(placement: &AgentPlacement) -> String {
    let mut text = String::new();
    if let Some(explorer) = placement.explorer {
        let _ = writeln!(text, "{EXPLORER_CODE} {} {}", explorer.row(), explorer.column());
    }
    for enemy in &placement.enemies {
        let _ = writeln!(
            text,
            "{} {} {}",
            enemy.kind.code(),
            enemy.cell.row(),
            enemy.cell.column()
        );
    }
    text
}

fn tile_for(symbol: char) -> Option<Tile> {
    match symbol {
        '%' => Some(Tile::Wall),
        ' ' | '.' => Some(Tile::Floor),
        'S' => Some(Tile::Goal),
        'K' => Some(Tile::Key),
        'G' => Some(Tile::Gate),
        'T' => Some(Tile::Trap),
        _ => None,
    }
}

fn symbol_for(tile: Tile) -> char {
    match tile {
        Tile::Wall => '%',
        Tile::Floor => ' ',
        Tile::Goal => 'S',
        Tile::Key => 'K',
        Tile::Gate => 'G',
        Tile::Trap => 'T',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAZE: &str = "%%%%%\nS.K %\n%%%G%\n%T  %\n%%%%%\n";

    #[test]
    fn parses_every_tile_symbol() {
        let grid = parse_maze(MAZE).expect("maze parses");

        assert_eq!(grid.columns(), 5);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.tile(CellCoord::new(0, 1)), Some(Tile::Goal));
        assert_eq!(grid.tile(CellCoord::new(1, 1)), Some(Tile::Floor));
        assert_eq!(grid.tile(CellCoord::new(2, 1)), Some(Tile::Key));
        assert_eq!(grid.tile(CellCoord::new(3, 1)), Some(Tile::Floor));
        assert_eq!(grid.tile(CellCoord::new(3, 2)), Some(Tile::Gate));
        assert_eq!(grid.tile(CellCoord::new(1, 3)), Some(Tile::Trap));
    }

    #[test]
    fn formatting_writes_floor_as_space() {
        let grid = parse_maze(MAZE).expect("maze parses");

        assert_eq!(format_maze(&grid), MAZE.replace('.', " "));
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let padded = format!("{MAZE}\n\n");

        assert_eq!(
            parse_maze(&padded).expect("maze parses"),
            parse_maze(MAZE).expect("maze parses")
        );
    }

    #[test]
    fn rejects_unknown_symbols_and_bad_shapes() {
        assert!(matches!(
            parse_maze("%%%\n%x%\n%%%\n"),
            Err(LayoutError::UnknownTile {
                symbol: 'x',
                row: 1,
                column: 1
            })
        ));
        assert!(matches!(parse_maze("\n\n"), Err(LayoutError::Empty)));
        assert!(matches!(
            parse_maze("%%%\n% \n%%%\n"),
            Err(LayoutError::Grid(GridError::RaggedRow { row: 1, .. }))
        ));
    }

    #[test]
    fn agent_lines_use_row_then_column() {
        let placement = parse_agents("E 3 5\nMW 1 1\nSR 5 3\n");

        assert_eq!(placement.explorer, Some(CellCoord::new(5, 3)));
        assert_eq!(
            placement.enemies,
            vec![
                EnemyPlacement {
                    kind: EnemyKind::ChaseWhite,
                    cell: CellCoord::new(1, 1),
                },
                EnemyPlacement {
                    kind: EnemyKind::GuardRed,
                    cell: CellCoord::new(3, 5),
                },
            ]
        );
        assert_eq!(parse_agents(&format_agents(&placement)), placement);
    }

    #[test]
    fn malformed_agent_lines_are_skipped() {
        let placement = parse_agents("E 3\nXX 1 1\nMR a 1\n\nMR 1 3\n");

        assert_eq!(placement.explorer, None);
        assert_eq!(
            placement.enemies,
            vec![EnemyPlacement {
                kind: EnemyKind::ChaseRed,
                cell: CellCoord::new(3, 1),
            }]
        );
    }
}
