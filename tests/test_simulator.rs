use std::time::Duration;

use approx::assert_abs_diff_eq;

use holdem_odds::cards::*;
use holdem_odds::error::OddsError;
use holdem_odds::simulator::*;

fn pair(notation: &str) -> [Card; 2] {
    let cards = parse_board(notation).unwrap();
    [cards[0], cards[1]]
}

#[test]
fn test_outcomes_sum_to_one() {
    let request = SimulationRequest::new(pair("AsKh"), vec![], 2, 20_000).with_seed(7);
    let result = simulate(&request).unwrap();
    assert_abs_diff_eq!(result.win + result.tie + result.lose, 1.0, epsilon = 1e-9);
}

#[test]
fn test_categories_sum_to_one() {
    let board = parse_board("Kd5c2h").unwrap();
    let request = SimulationRequest::new(pair("AsKh"), board, 1, 20_000).with_seed(7);
    let result = simulate(&request).unwrap();
    let total: f64 = result.categories.iter().sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
}

#[test]
fn test_preflop_tracks_streets() {
    let request = SimulationRequest::new(pair("AsKh"), vec![], 1, 10_000).with_seed(3);
    let result = simulate(&request).unwrap();
    let streets = result.streets.expect("pre-flop result should carry streets");
    for pcts in [&streets.flop, &streets.turn, &streets.river] {
        let total: f64 = pcts.iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
    }
    assert_eq!(streets.river, result.categories);
}

#[test]
fn test_postflop_has_no_streets() {
    let board = parse_board("Kd5c2h").unwrap();
    let request = SimulationRequest::new(pair("AsKh"), board, 1, 5_000).with_seed(3);
    let result = simulate(&request).unwrap();
    assert!(result.streets.is_none());
}

#[test]
fn test_pocket_aces_heads_up() {
    let request = SimulationRequest::new(pair("AsAh"), vec![], 1, 100_000).with_seed(42);
    let result = simulate(&request).unwrap();
    // Known pocket-aces heads-up equity is ~85%.
    assert!(result.win > 0.83 && result.win < 0.87, "win={}", result.win);
}

#[test]
fn test_seven_deuce_heads_up() {
    let request = SimulationRequest::new(pair("7c2d"), vec![], 1, 100_000).with_seed(42);
    let result = simulate(&request).unwrap();
    // The weakest starting hand still wins about a third of heads-up runouts.
    assert!(result.win > 0.29 && result.win < 0.38, "win={}", result.win);
}

#[test]
fn test_more_opponents_less_equity() {
    let heads_up = SimulationRequest::new(pair("AsAh"), vec![], 1, 30_000).with_seed(9);
    let full_table = SimulationRequest::new(pair("AsAh"), vec![], 8, 30_000).with_seed(9);
    let r1 = simulate(&heads_up).unwrap();
    let r8 = simulate(&full_table).unwrap();
    assert!(r8.win < r1.win);
}

#[test]
fn test_nuts_on_river_always_wins() {
    // Hero holds the royal flush on a full board.
    let board = parse_board("QsJsTs5c2d").unwrap();
    let request = SimulationRequest::new(pair("AsKs"), board, 3, 5_000).with_seed(1);
    let result = simulate(&request).unwrap();
    assert_abs_diff_eq!(result.win, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.categories[9], 1.0, epsilon = 1e-9);
}

#[test]
fn test_seeded_runs_reproduce() {
    let request = SimulationRequest::new(pair("QdQc"), vec![], 2, 20_000).with_seed(123);
    let r1 = simulate(&request).unwrap();
    let r2 = simulate(&request).unwrap();
    assert_eq!(r1, r2);
}

#[test]
fn test_different_seeds_differ() {
    let base = SimulationRequest::new(pair("QdQc"), vec![], 2, 20_000);
    let r1 = simulate(&base.clone().with_seed(1)).unwrap();
    let r2 = simulate(&base.with_seed(2)).unwrap();
    assert_ne!(r1, r2);
}

#[test]
fn test_deadline_returns_partial_estimate() {
    let request = SimulationRequest::new(pair("AsKh"), parse_board("Kd5c2h").unwrap(), 1, 500_000)
        .with_seed(5)
        .with_deadline(Duration::ZERO);
    let result = simulate(&request).unwrap();
    assert!(result.trials > 0);
    assert!(result.trials < 500_000);
    assert_abs_diff_eq!(result.win + result.tie + result.lose, 1.0, epsilon = 1e-9);
}

#[test]
fn test_insufficient_deck_rejected() {
    let request = SimulationRequest::new(pair("AsAh"), vec![], 23, 100);
    assert!(matches!(
        simulate(&request),
        Err(OddsError::InsufficientDeck { .. })
    ));
}

#[test]
fn test_nine_opponents_preflop_ok() {
    // Hero + 9 opponents needs 20 of the 50 unseen cards plus a board.
    let request = SimulationRequest::new(pair("AsAh"), vec![], 9, 2_000).with_seed(11);
    let result = simulate(&request).unwrap();
    assert!(result.win < 0.6);
}

#[test]
fn test_overlapping_board_rejected() {
    let board = parse_board("AsKd5c").unwrap();
    let request = SimulationRequest::new(pair("AsAh"), board, 1, 100);
    assert!(matches!(
        simulate(&request),
        Err(OddsError::DuplicateCard(_))
    ));
}

#[test]
fn test_result_string() {
    let request = SimulationRequest::new(pair("AsAh"), vec![], 1, 2_000).with_seed(4);
    let result = simulate(&request).unwrap();
    let s = format!("{}", result);
    assert!(s.contains("Win"));
    assert!(s.contains("equity"));
}
