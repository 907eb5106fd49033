//! Monte Carlo equity simulation: repeatedly complete the unknown cards,
//! deal random opponent hands, and count showdown outcomes.

use std::cmp::Ordering;
use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cards::{check_no_duplicates, Card, FULL_DECK};
use crate::error::{OddsError, OddsResult};
use crate::hand_evaluator::{evaluate_unchecked, HandResult, NUM_CATEGORIES};

/// Trial count for pre-flop estimates, which are computed once and cached.
pub const PREFLOP_TRIALS: usize = 500_000;

/// Trial count for post-flop estimates, which must stay interactive.
pub const POSTFLOP_TRIALS: usize = 75_000;

/// Trials per rayon work unit. Each chunk draws from its own seeded rng so
/// results do not depend on thread scheduling.
const CHUNK_TRIALS: usize = 4096;

#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub hero: [Card; 2],
    pub community: Vec<Card>,
    pub opponents: usize,
    pub trials: usize,
    pub seed: Option<u64>,
    pub deadline: Option<Duration>,
}

impl SimulationRequest {
    pub fn new(hero: [Card; 2], community: Vec<Card>, opponents: usize, trials: usize) -> Self {
        SimulationRequest {
            hero,
            community,
            opponents,
            trials,
            seed: None,
            deadline: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cards the simulation must draw per trial: board completion plus two
    /// hole cards per opponent.
    fn cards_needed(&self) -> usize {
        (5 - self.community.len()) + 2 * self.opponents
    }

    pub fn validate(&self) -> OddsResult<()> {
        if !matches!(self.community.len(), 0 | 3 | 4 | 5) {
            return Err(OddsError::InvalidBoardSize(self.community.len()));
        }
        let mut dealt: Vec<Card> = self.hero.to_vec();
        dealt.extend_from_slice(&self.community);
        check_no_duplicates(&dealt)?;
        if self.opponents == 0 {
            return Err(OddsError::NoOpponents);
        }
        if self.trials == 0 {
            return Err(OddsError::NoTrials);
        }
        let available = 52 - dealt.len();
        let requested = self.cards_needed();
        if requested > available {
            return Err(OddsError::InsufficientDeck {
                requested,
                available,
            });
        }
        Ok(())
    }
}

/// Hero hand-category probabilities at each street of a pre-flop runout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetCategories {
    pub flop: [f64; NUM_CATEGORIES],
    pub turn: [f64; NUM_CATEGORIES],
    pub river: [f64; NUM_CATEGORIES],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
    /// Trials actually run; lower than requested when a deadline cut in.
    pub trials: usize,
    /// Probability the hero's final best hand lands in each category,
    /// indexed by `HandCategory as usize`.
    pub categories: [f64; NUM_CATEGORIES],
    /// Per-street breakdown, present for pre-flop requests only.
    pub streets: Option<StreetCategories>,
}

impl SimulationResult {
    pub fn equity(&self) -> f64 {
        self.win + self.tie / 2.0
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Tie {:.1}% | Lose {:.1}% (equity: {:.1}%)",
            self.win * 100.0,
            self.tie * 100.0,
            self.lose * 100.0,
            self.equity() * 100.0,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct TrialCounts {
    wins: u64,
    ties: u64,
    losses: u64,
    trials: u64,
    categories: [u64; NUM_CATEGORIES],
    flop: [u64; NUM_CATEGORIES],
    turn: [u64; NUM_CATEGORIES],
    river: [u64; NUM_CATEGORIES],
}

impl Default for TrialCounts {
    fn default() -> Self {
        TrialCounts {
            wins: 0,
            ties: 0,
            losses: 0,
            trials: 0,
            categories: [0; NUM_CATEGORIES],
            flop: [0; NUM_CATEGORIES],
            turn: [0; NUM_CATEGORIES],
            river: [0; NUM_CATEGORIES],
        }
    }
}

impl TrialCounts {
    fn merge(mut self, other: TrialCounts) -> TrialCounts {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.trials += other.trials;
        for i in 0..NUM_CATEGORIES {
            self.categories[i] += other.categories[i];
            self.flop[i] += other.flop[i];
            self.turn[i] += other.turn[i];
            self.river[i] += other.river[i];
        }
        self
    }
}

fn eval_with(buf: &mut Vec<Card>, hole: &[Card], board: &[Card]) -> HandResult {
    buf.clear();
    buf.extend_from_slice(hole);
    buf.extend_from_slice(board);
    evaluate_unchecked(buf)
}

fn run_chunk(
    request: &SimulationRequest,
    remaining: &[Card],
    chunk: usize,
    chunk_trials: usize,
    base_seed: u64,
    started: Instant,
) -> TrialCounts {
    let mut counts = TrialCounts::default();
    if chunk > 0 {
        if let Some(deadline) = request.deadline {
            if started.elapsed() >= deadline {
                return counts;
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(
        base_seed.wrapping_add((chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
    );
    let mut deck = remaining.to_vec();
    let mut buf: Vec<Card> = Vec::with_capacity(7);

    let revealed = request.community.len();
    let board_needed = 5 - revealed;
    let draw = request.cards_needed();
    let track_streets = revealed == 0;

    let mut board = [request.hero[0]; 5];
    board[..revealed].copy_from_slice(&request.community);

    for _ in 0..chunk_trials {
        let (dealt, _) = deck.partial_shuffle(&mut rng, draw);
        for i in 0..board_needed {
            board[revealed + i] = dealt[i];
        }

        let hero_result = eval_with(&mut buf, &request.hero, &board);
        counts.categories[hero_result.category as usize] += 1;

        if track_streets {
            let flop = eval_with(&mut buf, &request.hero, &board[..3]);
            counts.flop[flop.category as usize] += 1;
            let turn = eval_with(&mut buf, &request.hero, &board[..4]);
            counts.turn[turn.category as usize] += 1;
            counts.river[hero_result.category as usize] += 1;
        }

        let mut beaten = false;
        let mut tied = false;
        for opp_hole in dealt[board_needed..].chunks_exact(2) {
            let opp_result = eval_with(&mut buf, opp_hole, &board);
            match hero_result.cmp(&opp_result) {
                Ordering::Less => {
                    beaten = true;
                    break;
                }
                Ordering::Equal => tied = true,
                Ordering::Greater => {}
            }
        }
        if beaten {
            counts.losses += 1;
        } else if tied {
            counts.ties += 1;
        } else {
            counts.wins += 1;
        }
        counts.trials += 1;
    }

    counts
}

/// Run the trials of a validated request. Infallible; `simulate` is the
/// public checked entry point.
pub(crate) fn run_trials(request: &SimulationRequest) -> SimulationResult {
    let remaining: Vec<Card> = FULL_DECK
        .iter()
        .copied()
        .filter(|c| !request.hero.contains(c) && !request.community.contains(c))
        .collect();

    let base_seed = request.seed.unwrap_or_else(|| thread_rng().gen());
    let started = Instant::now();
    let n_chunks = (request.trials + CHUNK_TRIALS - 1) / CHUNK_TRIALS;

    let totals = (0..n_chunks)
        .into_par_iter()
        .map(|chunk| {
            let chunk_trials = CHUNK_TRIALS.min(request.trials - chunk * CHUNK_TRIALS);
            run_chunk(request, &remaining, chunk, chunk_trials, base_seed, started)
        })
        .reduce(TrialCounts::default, TrialCounts::merge);

    let trials = totals.trials as f64;
    let pct = |counts: [u64; NUM_CATEGORIES]| counts.map(|c| c as f64 / trials);

    let streets = if request.community.is_empty() {
        Some(StreetCategories {
            flop: pct(totals.flop),
            turn: pct(totals.turn),
            river: pct(totals.river),
        })
    } else {
        None
    };

    SimulationResult {
        win: totals.wins as f64 / trials,
        tie: totals.ties as f64 / trials,
        lose: totals.losses as f64 / trials,
        trials: totals.trials as usize,
        categories: pct(totals.categories),
        streets,
    }
}

/// Estimate win/tie/loss probabilities and the hero's hand-category
/// distribution for a request.
pub fn simulate(request: &SimulationRequest) -> OddsResult<SimulationResult> {
    request.validate()?;
    Ok(run_trials(request))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
