use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;

use crate::cards::{check_no_duplicates, Card};
use crate::error::{OddsError, OddsResult};

pub const NUM_CATEGORIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

pub const ALL_CATEGORIES: [HandCategory; NUM_CATEGORIES] = [
    HandCategory::HighCard,
    HandCategory::OnePair,
    HandCategory::TwoPair,
    HandCategory::ThreeOfAKind,
    HandCategory::Straight,
    HandCategory::Flush,
    HandCategory::FullHouse,
    HandCategory::FourOfAKind,
    HandCategory::StraightFlush,
    HandCategory::RoyalFlush,
];

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

/// Comparable strength of a best five-card hand. Category rank first, then
/// kicker values high-to-low; unused kicker slots stay zero so the array
/// comparison never reaches them within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandResult {
    pub rank: u8,
    pub category: HandCategory,
    pub kickers: [u8; 5],
}

impl HandResult {
    pub fn new(rank: u8, category: HandCategory, kickers: [u8; 5]) -> Self {
        HandResult {
            rank,
            category,
            kickers,
        }
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.rank.cmp(&other.rank) {
            Ordering::Equal => self.kickers.cmp(&other.kickers),
            ord => ord,
        }
    }
}

/// High card of a straight among five distinct sorted-descending values,
/// if any. The wheel (A-2-3-4-5) counts as a five-high straight.
fn straight_high(values: &[u8; 5]) -> Option<u8> {
    let mut unique = [0u8; 5];
    let mut n = 0;
    for &v in values {
        if n == 0 || unique[n - 1] != v {
            unique[n] = v;
            n += 1;
        }
    }
    if n < 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    if unique == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: [Card; 5]) -> HandResult {
    let mut values = [0u8; 5];
    for (i, c) in cards.iter().enumerate() {
        values[i] = c.value();
    }
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards[1..].iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_high(&values);

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    if flush {
        if let Some(high) = straight {
            if high == 14 {
                return HandResult::new(9, HandCategory::RoyalFlush, [14, 0, 0, 0, 0]);
            }
            return HandResult::new(8, HandCategory::StraightFlush, [high, 0, 0, 0, 0]);
        }
    }

    // Frequency list: (count, value) sorted by count desc, then value desc
    let mut freq = [(0u8, 0u8); 5];
    let mut nf = 0;
    for v in (2..=14u8).rev() {
        if counts[v as usize] > 0 {
            freq[nf] = (counts[v as usize], v);
            nf += 1;
        }
    }
    freq[..nf].sort_unstable_by(|a, b| b.cmp(a));

    // Four of a kind
    if freq[0].0 == 4 {
        let quad_val = freq[0].1;
        let kicker = freq[1].1;
        return HandResult::new(7, HandCategory::FourOfAKind, [quad_val, kicker, 0, 0, 0]);
    }

    // Full house
    if freq[0].0 == 3 && freq[1].0 == 2 {
        return HandResult::new(6, HandCategory::FullHouse, [freq[0].1, freq[1].1, 0, 0, 0]);
    }

    // Flush
    if flush {
        return HandResult::new(5, HandCategory::Flush, values);
    }

    // Straight
    if let Some(high) = straight {
        return HandResult::new(4, HandCategory::Straight, [high, 0, 0, 0, 0]);
    }

    // Three of a kind
    if freq[0].0 == 3 {
        return HandResult::new(
            3,
            HandCategory::ThreeOfAKind,
            [freq[0].1, freq[1].1, freq[2].1, 0, 0],
        );
    }

    // Two pair
    if freq[0].0 == 2 && freq[1].0 == 2 {
        return HandResult::new(
            2,
            HandCategory::TwoPair,
            [freq[0].1, freq[1].1, freq[2].1, 0, 0],
        );
    }

    // One pair
    if freq[0].0 == 2 {
        return HandResult::new(
            1,
            HandCategory::OnePair,
            [freq[0].1, freq[1].1, freq[2].1, freq[3].1, 0],
        );
    }

    // High card
    HandResult::new(0, HandCategory::HighCard, values)
}

/// Best five-card hand out of 5 to 7 cards, without input validation.
/// Callers must guarantee cardinality and distinctness.
pub(crate) fn evaluate_unchecked(cards: &[Card]) -> HandResult {
    let mut best: Option<HandResult> = None;
    for combo in cards.iter().combinations(5) {
        let five = [*combo[0], *combo[1], *combo[2], *combo[3], *combo[4]];
        let result = evaluate_five(five);
        if best.map_or(true, |b| result > b) {
            best = Some(result);
        }
    }
    best.unwrap()
}

/// Evaluate the best five-card hand from a set of 5 to 7 distinct cards.
pub fn evaluate_cards(cards: &[Card]) -> OddsResult<HandResult> {
    if !(5..=7).contains(&cards.len()) {
        return Err(OddsError::InvalidCardCount(cards.len()));
    }
    check_no_duplicates(cards)?;
    Ok(evaluate_unchecked(cards))
}

/// Evaluate hole cards plus board as one combined hand.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> OddsResult<HandResult> {
    let mut all_cards: Vec<Card> = Vec::with_capacity(hole_cards.len() + board.len());
    all_cards.extend_from_slice(hole_cards);
    all_cards.extend_from_slice(board);
    evaluate_cards(&all_cards)
}

pub fn compare_hands(hand1: &[Card], hand2: &[Card], board: &[Card]) -> OddsResult<i32> {
    let r1 = evaluate_hand(hand1, board)?;
    let r2 = evaluate_hand(hand2, board)?;
    Ok(match r1.cmp(&r2) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    })
}
