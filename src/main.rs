//! Twisty Puzzle Player
//!
//! Plays N×N×N cubes in an interactive 3D view, tracking moves, elapsed time
//! and solve state. Also scrambles puzzles or applies turn sequences from the
//! command line and prints the resulting faces.

mod visualization;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use twisty::config::Settings;
use twisty::engine::Session;
use twisty::geometry::Turn;
use twisty::grid::format_net;
use twisty::PuzzleKind;

/// Plays twisty puzzles in 3D.
#[derive(Parser)]
#[command(name = "twisty")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ./twisty.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Puzzle kind.
    #[arg(long, global = true, value_enum)]
    kind: Option<PuzzleKind>,
    /// Edge length in layers.
    #[arg(long, short, global = true)]
    size: Option<usize>,
    /// Seed for reproducible scrambles.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play in an interactive 3D viewer.
    Play,
    /// Scramble a fresh puzzle and print its faces.
    Scramble {
        /// Number of random turns (defaults to max(20, 5 * size)).
        #[arg(long)]
        moves: Option<usize>,
    },
    /// Apply turns such as `y2+ x0-` to a fresh puzzle and print its faces.
    Apply {
        #[arg(required = true)]
        turns: Vec<Turn>,
    },
}

fn main() {
    env_logger::builder()
        .filter_module(
            "twisty",
            if cfg!(debug_assertions) {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            },
        )
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid settings: {e}");
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Some(Command::Play) | None => Session::from_settings(&settings).map(|session| {
            println!("Controls: U D L R F B turn faces, I invert, Space scramble, Return reset, Up/Down resize");
            println!("Drag a sticker with the left button to turn its layer; right button orbits");
            visualization::display(session, settings.drag_threshold);
        }),
        Some(Command::Scramble { moves }) => run_scramble(&settings, moves),
        Some(Command::Apply { turns }) => run_apply(&settings, &turns),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Reads the settings file, then applies command-line overrides.
fn load_settings(cli: &Cli) -> Result<Settings, twisty::error::ConfigError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(kind) = cli.kind {
        settings.kind = kind;
    }
    if let Some(size) = cli.size {
        settings.size = size;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    settings.validate()?;
    Ok(settings)
}

/// Scrambles a fresh puzzle and prints it.
fn run_scramble(settings: &Settings, moves: Option<usize>) -> Result<(), twisty::error::TurnError> {
    let mut session = Session::from_settings(settings)?;
    let turns = session.scramble(moves)?;
    println!("Scrambled with {turns} turns");
    print_state(&session);
    Ok(())
}

/// Applies a turn sequence to a fresh puzzle and prints the result.
fn run_apply(settings: &Settings, turns: &[Turn]) -> Result<(), twisty::error::TurnError> {
    let mut session = Session::from_settings(settings)?;
    for &turn in turns {
        session.rotate(turn, false)?;
    }
    print_state(&session);
    println!("Moves: {}", session.moves());
    Ok(())
}

fn print_state(session: &Session) {
    if let Some(cube) = session.puzzle().as_cube() {
        print!("{}", format_net(cube));
    }
    println!(
        "Solved: {}",
        if session.is_solved() { "yes" } else { "no" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_turn_sequence() {
        let cli = Cli::try_parse_from(["twisty", "--size", "2", "apply", "x1+", "y1-"]).unwrap();
        assert_eq!(cli.size, Some(2));
        match cli.command {
            Some(Command::Apply { turns }) => {
                assert_eq!(turns, ["x1+".parse::<Turn>().unwrap(), "y1-".parse().unwrap()]);
            }
            _ => panic!("expected apply subcommand"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_turn() {
        assert!(Cli::try_parse_from(["twisty", "apply", "q1+"]).is_err());
    }

    #[test]
    fn test_command_line_overrides_settings() {
        let cli = Cli::try_parse_from(["twisty", "--kind", "pyraminx", "--seed", "4", "scramble"])
            .unwrap();
        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.kind, PuzzleKind::Pyraminx);
        assert_eq!(settings.seed, Some(4));
    }

    #[test]
    fn test_apply_runs_turns() {
        let settings = Settings {
            size: 3,
            ..Settings::default()
        };
        assert!(run_apply(&settings, &["y2+".parse().unwrap()]).is_ok());
        assert!(run_apply(&settings, &["y3+".parse().unwrap()]).is_err());
    }
}
