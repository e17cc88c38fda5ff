//! Analysis session tying the rules, the solver and the opening book together
//!
//! An [`Analyzer`] owns a game in progress: the position, the moves that led
//! to it and whether the game is still running. Asked to evaluate, it answers
//! for every one of the 64 actions at once:
//!
//! 1. **Opening book**: positions up to three plies deep are looked up
//! 2. **Search**: deeper positions (or any position when no book is loaded)
//!    are solved action by action, optionally on a rayon pool and under a
//!    time limit
//!
//! # Example
//!
//! ```
//! use quantik::board::{Action, Pos, Shape};
//! use quantik::{Analyzer, GameStatus};
//!
//! let mut analyzer = Analyzer::new();
//! let status = analyzer.play(Action::new(Pos::new(0, 0), Shape::Cube)).unwrap();
//! assert_eq!(status, GameStatus::Active);
//!
//! // The opponent's cubes are now shut out of row 0, column 0 and the top-left quadrant
//! let blocked = Action::new(Pos::new(1, 1), Shape::Cube);
//! assert!(analyzer.play(blocked).is_err());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, instrument, warn};

use crate::board::{Action, ActionList, Evaluations, Outcome, Player, Position, ALL_ACTIONS, NUM_ACTIONS};
use crate::book::{OpeningBook, MAX_BOOK_DEPTH};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzeError, PlayError};
use crate::rules::{completes_region, has_legal_action, is_legal, legal_actions};
use crate::search::{
    longest_forced_sequence, solve_instrumented, solve_interruptible, DepthMode, Interrupt, SearchCancelled,
    SolveReport, StallReport,
};

/// Whether the game is still running, and how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    /// The last move completed a region
    EndedByCompletion { winner: Player },
    /// The player to move has no legal placement
    EndedByNoMoves { loser: Player },
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        self != GameStatus::Active
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Active => None,
            GameStatus::EndedByCompletion { winner } => Some(winner),
            GameStatus::EndedByNoMoves { loser } => Some(loser.opponent()),
        }
    }
}

/// Where an evaluation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalSource {
    /// Looked up in the opening book
    Book,
    /// Solved by search
    Search,
}

/// Outcome of every action from the current position.
#[derive(Debug, Clone)]
pub struct ActionEvaluation {
    /// Indexed by action code; `Invalid` for illegal actions
    pub outcomes: Evaluations,
    pub source: EvalSource,
    /// Search nodes over all actions (0 for book answers)
    pub nodes: u64,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl ActionEvaluation {
    #[inline]
    pub fn outcome(&self, action: Action) -> Outcome {
        self.outcomes[action.encode() as usize]
    }

    /// Actions after which `player` wins with best play
    pub fn winning_actions(&self, player: Player) -> impl Iterator<Item = Action> + '_ {
        ALL_ACTIONS
            .into_iter()
            .filter(move |&action| self.outcome(action) == Outcome::Won(player))
    }
}

/// How per-action searches are scheduled
#[derive(Debug)]
enum Workers {
    /// On the calling thread
    Sequential,
    /// On rayon's global pool
    Global,
    /// On a dedicated pool
    Pool(ThreadPool),
}

/// A game in progress with book and search analysis.
#[derive(Debug)]
pub struct Analyzer {
    position: Position,
    history: Vec<Action>,
    status: GameStatus,
    book: Option<Arc<OpeningBook>>,
    workers: Workers,
    time_limit: Option<Duration>,
    depth_mode: DepthMode,
}

impl Analyzer {
    /// New game with no book, sequential search and no time limit
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Position::new(),
            history: Vec::new(),
            status: GameStatus::Active,
            book: None,
            workers: Workers::Sequential,
            time_limit: None,
            depth_mode: DepthMode::Absolute,
        }
    }

    /// New game set up from `config`: loads the book and builds the thread pool
    #[instrument(skip(config), fields(threads = config.threads))]
    pub fn with_config(config: &AnalyzerConfig) -> Result<Self, AnalyzeError> {
        let book = match &config.book_path {
            Some(path) => Some(Arc::new(OpeningBook::load(path)?)),
            None => None,
        };

        let workers = match config.threads {
            1 => Workers::Sequential,
            0 => Workers::Global,
            n => Workers::Pool(ThreadPoolBuilder::new().num_threads(n).build()?),
        };
        debug!(?workers, "analyzer configured");

        Ok(Self {
            book,
            workers,
            time_limit: config.time_limit_ms.map(Duration::from_millis),
            depth_mode: config.depth_mode,
            ..Self::new()
        })
    }

    /// Use `book` for shallow positions
    #[must_use]
    pub fn with_book(mut self, book: Arc<OpeningBook>) -> Self {
        self.book = Some(book);
        self
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Moves played so far, oldest first
    #[inline]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn has_book(&self) -> bool {
        self.book.is_some()
    }

    /// Play a move for the side to move
    pub fn play(&mut self, action: Action) -> Result<GameStatus, PlayError> {
        if self.status.is_over() {
            return Err(PlayError::GameOver);
        }
        if !is_legal(&self.position, action) {
            return Err(PlayError::Illegal { action });
        }

        let mover = self.position.player();
        self.position.apply(action);
        self.history.push(action);

        self.status = if completes_region(&self.position, action) {
            GameStatus::EndedByCompletion { winner: mover }
        } else if !has_legal_action(&self.position) {
            GameStatus::EndedByNoMoves {
                loser: self.position.player(),
            }
        } else {
            GameStatus::Active
        };
        debug!(%action, depth = self.position.depth(), status = ?self.status, "move played");
        Ok(self.status)
    }

    /// Take back the last move. The game is active again afterwards.
    pub fn undo(&mut self) -> Option<Action> {
        let action = self.history.pop()?;
        self.position.undo(action);
        self.status = GameStatus::Active;
        Some(action)
    }

    /// Legal actions for the side to move.
    ///
    /// Refused once a region has been completed; after starvation the list is
    /// simply empty.
    pub fn legal_actions(&self) -> Result<ActionList, PlayError> {
        if let GameStatus::EndedByCompletion { .. } = self.status {
            return Err(PlayError::GameOver);
        }
        Ok(legal_actions(&self.position))
    }

    /// Outcome of every action from the current position.
    #[instrument(skip(self), fields(depth = self.position.depth()))]
    pub fn evaluate(&self) -> Result<ActionEvaluation, AnalyzeError> {
        if self.status.is_over() {
            return Err(AnalyzeError::GameOver);
        }

        let start = Instant::now();
        let (outcomes, source, nodes) = match &self.book {
            Some(book) if self.position.depth() <= MAX_BOOK_DEPTH => {
                let outcomes = book.lookup(&self.position, &self.history)?;
                (outcomes, EvalSource::Book, 0)
            }
            _ => {
                if self.position.depth() <= MAX_BOOK_DEPTH {
                    warn!("no opening book loaded, searching a shallow position");
                }
                let (outcomes, nodes) = self.search_all()?;
                (outcomes, EvalSource::Search, nodes)
            }
        };

        let time_ms = start.elapsed().as_millis() as u64;
        info!(?source, nodes, time_ms, "evaluation complete");
        Ok(ActionEvaluation {
            outcomes,
            source,
            nodes,
            time_ms,
        })
    }

    /// Exact winner of the current position
    pub fn solve(&self) -> SolveReport {
        solve_instrumented(&self.position)
    }

    /// Longest forced sequence from the current position, in the configured depth mode
    pub fn longest_forced_sequence(&self) -> StallReport {
        longest_forced_sequence(&self.position, self.depth_mode)
    }

    /// Search every action, stopping at the time limit if one is set
    fn search_all(&self) -> Result<(Evaluations, u64), SearchCancelled> {
        let stop = AtomicBool::new(false);
        let Some(limit) = self.time_limit else {
            return self.search_each(&stop);
        };

        std::thread::scope(|scope| {
            let (done_tx, done_rx) = mpsc::channel::<()>();
            let stop = &stop;
            scope.spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(limit) {
                    debug!(?limit, "time limit reached, stopping search");
                    stop.store(true, Ordering::Relaxed);
                }
            });

            let result = self.search_each(stop);
            drop(done_tx);
            result
        })
    }

    fn search_each(&self, stop: &AtomicBool) -> Result<(Evaluations, u64), SearchCancelled> {
        let position = &self.position;
        let results: Vec<(Outcome, u64)> = match &self.workers {
            Workers::Sequential => ALL_ACTIONS
                .iter()
                .map(|&action| evaluate_action(position, action, stop))
                .collect::<Result<_, _>>()?,
            Workers::Global => ALL_ACTIONS
                .par_iter()
                .map(|&action| evaluate_action(position, action, stop))
                .collect::<Result<_, _>>()?,
            Workers::Pool(pool) => pool.install(|| {
                ALL_ACTIONS
                    .par_iter()
                    .map(|&action| evaluate_action(position, action, stop))
                    .collect::<Result<_, _>>()
            })?,
        };

        let mut outcomes = [Outcome::Invalid; NUM_ACTIONS];
        let mut nodes = 0;
        for (slot, (outcome, searched)) in outcomes.iter_mut().zip(results) {
            *slot = outcome;
            nodes += searched;
        }
        Ok((outcomes, nodes))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a single action: invalid, an immediate completion, or the
/// solved value of the resulting position
fn evaluate_action(position: &Position, action: Action, stop: &AtomicBool) -> Result<(Outcome, u64), SearchCancelled> {
    if !is_legal(position, action) {
        return Ok((Outcome::Invalid, 0));
    }
    stop.check()?;

    let mover = position.player();
    let mut child = position.clone();
    child.apply(action);
    if completes_region(&child, action) {
        return Ok((Outcome::Won(mover), 0));
    }

    let report = solve_interruptible(&child, stop)?;
    Ok((Outcome::Won(report.winner), report.nodes))
}
