use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::cards::{parse_board, Card};
use crate::display::{
    board_display, categories_table, equity_bar, odds_table, print_error, print_section,
    print_success,
};
use crate::error::{OddsError, OddsResult};
use crate::hand_evaluator::evaluate_cards;
use crate::odds::OddsService;

#[derive(Parser)]
#[command(
    name = "odds",
    version = "1.0.0",
    about = "Texas Hold'em odds calculator — Monte Carlo win/tie estimates with a persisted pre-flop cache."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate win/tie/loss odds for a hand
    Odds {
        /// Hero hole cards (e.g., AhAs)
        hand: String,
        /// Community cards (e.g., Ks9d4c, Ks9d4c7h)
        #[arg(short, long)]
        board: Option<String>,
        /// Number of opponents
        #[arg(short = 'n', long, default_value = "1")]
        opponents: usize,
        /// Trial count override
        #[arg(short, long)]
        trials: Option<usize>,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Post-flop time budget in milliseconds
        #[arg(long)]
        max_ms: Option<u64>,
    },
    /// Evaluate the best five-card hand from 5-7 cards
    Eval {
        /// Cards (e.g., AhAsKd5c2s)
        cards: String,
    },
    /// Inspect or clear the persisted pre-flop cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached pre-flop entries
    List,
    /// Remove all cached pre-flop entries
    Clear,
}

pub fn run() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Odds {
            hand,
            board,
            opponents,
            trials,
            seed,
            max_ms,
        } => cmd_odds(&hand, board.as_deref(), opponents, trials, seed, max_ms),
        Commands::Eval { cards } => cmd_eval(&cards),
        Commands::Cache { action } => match action {
            CacheAction::List => cmd_cache_list(),
            CacheAction::Clear => cmd_cache_clear(),
        },
    };

    if let Err(e) = outcome {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn parse_hero(notation: &str) -> OddsResult<[Card; 2]> {
    let cards = parse_board(notation)?;
    if cards.len() != 2 {
        return Err(OddsError::InvalidBoardNotation(notation.to_string()));
    }
    Ok([cards[0], cards[1]])
}

fn cmd_odds(
    hand: &str,
    board: Option<&str>,
    opponents: usize,
    trials: Option<usize>,
    seed: Option<u64>,
    max_ms: Option<u64>,
) -> OddsResult<()> {
    let hero = parse_hero(hand)?;
    let community = match board {
        Some(notation) => parse_board(notation)?,
        None => Vec::new(),
    };

    let mut service = OddsService::new();
    if let Some(trials) = trials {
        service = service.preflop_trials(trials).postflop_trials(trials);
    }
    if let Some(seed) = seed {
        service = service.seed(seed);
    }
    if let Some(ms) = max_ms {
        service = service.postflop_deadline(Duration::from_millis(ms));
    }

    let result = service.get_odds(hero, &community, opponents)?;

    print_section("Hand", &board_display(&hero));
    if community.is_empty() {
        print_section("Board", &"(pre-flop)".dimmed().to_string());
    } else {
        print_section("Board", &board_display(&community));
    }
    print_section(
        "Opponents",
        &format!("{} ({} trials)", opponents, result.trials),
    );
    print_section("Equity", &equity_bar(result.equity(), 30));
    println!("\n{}", odds_table(&result));
    println!("\n{}", categories_table(&result));
    Ok(())
}

fn cmd_eval(cards: &str) -> OddsResult<()> {
    let cards = parse_board(cards)?;
    let result = evaluate_cards(&cards)?;

    print_section("Cards", &board_display(&cards));
    print_section("Best hand", &result.category.to_string().bold().to_string());
    Ok(())
}

fn cmd_cache_list() -> OddsResult<()> {
    let service = OddsService::new();
    let keys = service.cache_keys();
    if keys.is_empty() {
        println!("{}", "Cache is empty.".dimmed());
        return Ok(());
    }
    println!("{} cached pre-flop entries:", keys.len());
    for key in keys {
        println!("  {}", key);
    }
    Ok(())
}

fn cmd_cache_clear() -> OddsResult<()> {
    let service = OddsService::new();
    service.clear_cache();
    print_success("Pre-flop cache cleared.");
    Ok(())
}
