//! Quantik analyzer CLI
//!
//! Replays a list of moves from the empty board, then prints the board, the
//! legal moves, per-move evaluations, the exact winner or the longest forced
//! sequence.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use quantik::board::{Action, Outcome, Player, Pos, Shape, BOARD_SIZE};
use quantik::{Analyzer, AnalyzerConfig, EvalSource, GameStatus};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("cannot load config '{}'", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if let Some(book) = cli.book {
        config.book_path = Some(book);
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(limit) = cli.time_limit_ms {
        config.time_limit_ms = Some(limit);
    }

    let moves = match &cli.command {
        Command::Board { moves }
        | Command::Legal { moves }
        | Command::Evaluate { moves }
        | Command::Solve { moves }
        | Command::Stall { moves, .. } => moves.clone(),
    };
    if let Command::Stall { mode: Some(mode), .. } = cli.command {
        config.depth_mode = mode;
    }
    debug!(?config, moves = moves.len(), "starting");

    let mut analyzer = Analyzer::with_config(&config).context("cannot set up analyzer")?;
    replay(&mut analyzer, &moves)?;

    match cli.command {
        Command::Board { .. } => print_board(&analyzer),
        Command::Legal { .. } => print_legal(&analyzer)?,
        Command::Evaluate { .. } => print_evaluation(&analyzer)?,
        Command::Solve { .. } => {
            let report = analyzer.solve();
            println!("winner: {} ({} nodes)", report.winner, report.nodes);
        }
        Command::Stall { .. } => {
            let report = analyzer.longest_forced_sequence();
            match report.plies {
                Some(plies) => println!("longest forced sequence: {} plies ({} nodes)", plies, report.nodes),
                None => println!("{} has no forced win from here", Player::Second),
            }
        }
    }
    Ok(())
}

/// Install the subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn replay(analyzer: &mut Analyzer, moves: &[Action]) -> Result<()> {
    for (ply, &action) in moves.iter().enumerate() {
        analyzer
            .play(action)
            .with_context(|| format!("move {} ({}) rejected", ply + 1, action))?;
    }
    info!(depth = analyzer.position().depth(), status = ?analyzer.status(), "moves replayed");
    Ok(())
}

fn print_board(analyzer: &Analyzer) {
    let position = analyzer.position();
    print!("{}", position.board());

    for player in [Player::First, Player::Second] {
        let counts: Vec<String> = Shape::ALL
            .iter()
            .map(|&shape| format!("{}:{}", shape.index(), position.supply(player, shape)))
            .collect();
        println!("{} supply: {{{}}}", player, counts.join(", "));
    }

    let history: Vec<String> = analyzer
        .history()
        .iter()
        .enumerate()
        .map(|(ply, action)| format!("{}:{}", ply + 1, action))
        .collect();
    println!("history: {}", history.join(" "));

    match analyzer.status() {
        GameStatus::Active => println!("{} to move", position.player()),
        GameStatus::EndedByCompletion { winner } => println!("{} won by completing a region", winner),
        GameStatus::EndedByNoMoves { loser } => println!("{} has no legal move and lost", loser),
    }
}

/// One line per row, one bracketed group per shape, one character per column
fn print_grid(cell: impl Fn(Action) -> char) {
    for row in 0..BOARD_SIZE as u8 {
        let groups: Vec<String> = Shape::ALL
            .iter()
            .map(|&shape| {
                let cells: String = (0..BOARD_SIZE as u8)
                    .map(|col| cell(Action::new(Pos::new(row, col), shape)))
                    .collect();
                format!("[{}]", cells)
            })
            .collect();
        println!("{}", groups.join(" "));
    }
}

fn print_legal(analyzer: &Analyzer) -> Result<()> {
    let legal = analyzer.legal_actions()?;
    print_grid(|action| if legal.contains(&action) { '+' } else { '.' });
    println!("{} legal actions", legal.len());
    Ok(())
}

fn print_evaluation(analyzer: &Analyzer) -> Result<()> {
    let eval = analyzer.evaluate()?;
    let mover = analyzer.position().player();
    print_grid(|action| match eval.outcome(action) {
        Outcome::Invalid => '.',
        Outcome::Won(winner) if winner == mover => 'w',
        Outcome::Won(_) => 'l',
    });

    let source = match eval.source {
        EvalSource::Book => "opening book",
        EvalSource::Search => "search",
    };
    println!("source: {} ({} nodes, {} ms)", source, eval.nodes, eval.time_ms);
    Ok(())
}
