use clap::Parser;
use log::warn;
use pushbox::{Direction, Levels, MoveOutcome, Session, SessionError};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "pushbox")]
#[command(about = "A Sokoban push-puzzle game", long_about = None)]
struct Args {
    /// Path to a levels file (XSB format); the built-in levels are used if omitted
    #[arg(value_name = "FILE")]
    levels_file: Option<String>,

    /// Level number to start at (1-indexed)
    #[arg(short, long, default_value = "1")]
    level: usize,

    /// Play a move script in LURD notation against the start level and exit
    #[arg(short, long, value_name = "LURD")]
    moves: Option<String>,
}

enum Command {
    Moves(Vec<Direction>),
    Reset,
    Quit,
}

fn parse_moves(text: &str) -> Result<Vec<Direction>, String> {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| Direction::from_lurd(ch).ok_or_else(|| format!("unknown move '{}'", ch)))
        .collect()
}

fn parse_command(line: &str) -> Result<Command, String> {
    match line.trim() {
        "q" | "quit" => Ok(Command::Quit),
        "reset" => Ok(Command::Reset),
        text => parse_moves(text).map(Command::Moves),
    }
}

#[derive(Default)]
struct PlayStats {
    moves: usize,
    pushes: usize,
}

/// Apply moves until they run out or the level is solved.
fn play(
    session: &mut Session,
    moves: &[Direction],
    stats: &mut PlayStats,
) -> Result<(), SessionError> {
    for (i, &dir) in moves.iter().enumerate() {
        match session.handle_move(dir)? {
            MoveOutcome::Moved => stats.moves += 1,
            MoveOutcome::PushedBox => {
                stats.moves += 1;
                stats.pushes += 1;
            }
            MoveOutcome::Blocked => {}
        }
        if session.state().is_solved() {
            if i + 1 < moves.len() {
                warn!(
                    "ignoring {} moves after the level was solved",
                    moves.len() - i - 1
                );
            }
            break;
        }
    }
    Ok(())
}

fn print_board(session: &Session) {
    println!(
        "Level {}/{}:\n{}",
        session.level_index() + 1,
        session.level_count(),
        session.grid()
    );
}

fn run_script(mut session: Session, script: &str) -> Result<(), String> {
    let moves = parse_moves(script)?;
    let mut stats = PlayStats::default();
    play(&mut session, &moves, &mut stats).map_err(|e| e.to_string())?;

    print_board(&session);
    println!(
        "level: {:<3}  solved: {}  moves: {:<5}  pushes: {}",
        session.level_index() + 1,
        if session.is_solved() { 'Y' } else { 'N' },
        stats.moves,
        stats.pushes
    );
    Ok(())
}

fn run_interactive(mut session: Session) -> Result<(), String> {
    let stdin = io::stdin();
    let mut stats = PlayStats::default();

    print_board(&session);
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(|e| e.to_string())? == 0 {
            return Ok(());
        }

        let result = match parse_command(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Reset) => {
                stats = PlayStats::default();
                session.reset_current_level()
            }
            Ok(Command::Moves(moves)) => play(&mut session, &moves, &mut stats),
            Err(msg) => {
                eprintln!("Error: {} (moves are l/u/r/d, or reset, quit)", msg);
                continue;
            }
        };
        if let Err(e) = result {
            eprintln!("Error: {}", e);
            continue;
        }

        print_board(&session);
        if session.state().is_solved() {
            println!(
                "Level {} solved in {} moves, {} pushes!\n",
                session.level_index() + 1,
                stats.moves,
                stats.pushes
            );
            session.advance_to_next_level().map_err(|e| e.to_string())?;
            stats = PlayStats::default();
            print_board(&session);
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // Load levels from file, or fall back to the built-in set
    let levels = match &args.levels_file {
        Some(path) => match Levels::from_file(path) {
            Ok(levels) => levels,
            Err(e) => {
                eprintln!("Error loading levels: {}", e);
                std::process::exit(1);
            }
        },
        None => Levels::builtin(),
    };

    if args.level == 0 {
        eprintln!("Error: level numbers must be at least 1");
        std::process::exit(1);
    }

    if args.level > levels.len() {
        eprintln!(
            "Error: level {} not found ({} levels available)",
            args.level,
            levels.len()
        );
        std::process::exit(1);
    }

    let session = match Session::with_start_level(levels, args.level - 1) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &args.moves {
        Some(script) => run_script(session, script),
        None => run_interactive(session),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
