use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::cards::{Card, Suit};
use crate::hand_evaluator::ALL_CATEGORIES;
use crate::simulator::SimulationResult;

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let rank = card.rank.to_char();
            let symbol = card.suit.symbol();
            match card.suit {
                Suit::Spades => format!("{}{}", rank, symbol).white().to_string(),
                Suit::Hearts => format!("{}{}", rank, symbol).red().to_string(),
                Suit::Diamonds => format!("{}{}", rank, symbol).blue().to_string(),
                Suit::Clubs => format!("{}{}", rank, symbol).green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn equity_bar(equity: f64, width: usize) -> String {
    let filled = (equity * width as f64) as usize;
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", equity * 100.0);

    if equity >= 0.6 {
        format!("{} {}", bar.green(), pct)
    } else if equity >= 0.4 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn odds_table(result: &SimulationResult) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Outcome").set_alignment(CellAlignment::Left),
        Cell::new("Probability").set_alignment(CellAlignment::Right),
    ]);

    table.add_row(vec![
        Cell::new("Win".bold().to_string()),
        Cell::new(format!("{:.1}%", result.win * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Tie".bold().to_string()),
        Cell::new(format!("{:.1}%", result.tie * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Lose".bold().to_string()),
        Cell::new(format!("{:.1}%", result.lose * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("Equity".bold().to_string()),
        Cell::new(format!("{:.1}%", result.equity() * 100.0)),
    ]);

    table.to_string()
}

/// Hand-category distribution table. Pre-flop results carry per-street
/// columns; post-flop results get a single column for the final hand.
pub fn categories_table(result: &SimulationResult) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Hand").set_alignment(CellAlignment::Left)];
    if result.streets.is_some() {
        for street in ["Flop", "Turn", "River"] {
            header.push(Cell::new(street).set_alignment(CellAlignment::Right));
        }
    } else {
        header.push(Cell::new("Probability").set_alignment(CellAlignment::Right));
    }
    table.set_header(header);

    for category in ALL_CATEGORIES.iter().rev() {
        let i = *category as usize;
        let mut row = vec![Cell::new(category.to_string())];
        match &result.streets {
            Some(streets) => {
                for pcts in [&streets.flop, &streets.turn, &streets.river] {
                    row.push(Cell::new(format!("{:.1}%", pcts[i] * 100.0)));
                }
            }
            None => row.push(Cell::new(format!("{:.1}%", result.categories[i] * 100.0))),
        }
        table.add_row(row);
    }

    table.to_string()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
