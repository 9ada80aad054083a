use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{ensure_unique, Card};
use crate::errors::GameError;

/// Hand categories, lowest first. The discriminant is the category's numeric rank.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weight of one category step. Five base-100 tiebreak digits stay below it.
pub const CATEGORY_WEIGHT: u64 = 100u64.pow(5);

/// The best five-card hand found for a player.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankedHand {
    pub category: Category,
    /// Single comparable strength: category weight plus packed tiebreak ranks.
    pub strength: u64,
    /// Tiebreak ranks (2..=14), most significant first.
    pub tiebreakers: Vec<u8>,
    pub cards: [Card; 5],
}

impl RankedHand {
    pub fn name(&self) -> &'static str {
        self.category.name()
    }
}

/// All 5-card index patterns over 7 cards, C(7,5) = 21.
const COMBINATIONS: [[usize; 5]; 21] = [
    [0, 1, 2, 3, 4],
    [0, 1, 2, 3, 5],
    [0, 1, 2, 3, 6],
    [0, 1, 2, 4, 5],
    [0, 1, 2, 4, 6],
    [0, 1, 2, 5, 6],
    [0, 1, 3, 4, 5],
    [0, 1, 3, 4, 6],
    [0, 1, 3, 5, 6],
    [0, 1, 4, 5, 6],
    [0, 2, 3, 4, 5],
    [0, 2, 3, 4, 6],
    [0, 2, 3, 5, 6],
    [0, 2, 4, 5, 6],
    [0, 3, 4, 5, 6],
    [1, 2, 3, 4, 5],
    [1, 2, 3, 4, 6],
    [1, 2, 3, 5, 6],
    [1, 2, 4, 5, 6],
    [1, 3, 4, 5, 6],
    [2, 3, 4, 5, 6],
];

/// Ranks the best five-card hand from hole and community cards combined.
///
/// Between 5 and 7 cards in total are accepted. Every 5-card subset is scored
/// and the strongest one is returned.
///
/// # Errors
///
/// - [`GameError::NotEnoughCards`] / [`GameError::TooManyCards`] outside 5..=7 cards
/// - [`GameError::DuplicateCard`] if the same card appears twice
///
/// # Examples
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::hand::{evaluate_hand, Category};
///
/// let hole = parse_cards("A_hearts K_hearts").unwrap();
/// let board = parse_cards("Q_hearts J_hearts 10_hearts 2_clubs 3_clubs").unwrap();
/// let hand = evaluate_hand(&hole, &board).unwrap();
/// assert_eq!(hand.category, Category::RoyalFlush);
/// ```
pub fn evaluate_hand(hole_cards: &[Card], community_cards: &[Card]) -> Result<RankedHand, GameError> {
    let mut all = Vec::with_capacity(7);
    all.extend_from_slice(hole_cards);
    all.extend_from_slice(community_cards);
    let n = all.len();
    if n < 5 {
        return Err(GameError::NotEnoughCards(n));
    }
    if n > 7 {
        return Err(GameError::TooManyCards(n));
    }
    ensure_unique(&all)?;

    let mut best: Option<RankedHand> = None;
    for pattern in COMBINATIONS.into_iter().filter(|p| p.iter().all(|&i| i < n)) {
        let hand = evaluate_five(pattern.map(|i| all[i]));
        if best.as_ref().map_or(true, |b| hand.strength > b.strength) {
            best = Some(hand);
        }
    }
    best.ok_or(GameError::NotEnoughCards(n))
}

pub fn compare_hands(a: &RankedHand, b: &RankedHand) -> Ordering {
    a.strength.cmp(&b.strength)
}

/// A player sharing the best hand at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub player_id: String,
    pub hand: RankedHand,
}

/// Evaluates every contender and returns all of those holding the strongest hand.
///
/// `contenders` pairs a player id with that player's hole cards.
pub fn find_winner(
    contenders: &[(&str, &[Card])],
    community_cards: &[Card],
) -> Result<Vec<Winner>, GameError> {
    let mut results = contenders
        .iter()
        .map(|(id, hole)| {
            evaluate_hand(hole, community_cards).map(|hand| Winner {
                player_id: (*id).to_string(),
                hand,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    results.sort_by(|a, b| compare_hands(&b.hand, &a.hand));
    let Some(top) = results.first().map(|w| w.hand.strength) else {
        return Ok(Vec::new());
    };
    results.retain(|w| w.hand.strength == top);
    Ok(results)
}

fn evaluate_five(cards: [Card; 5]) -> RankedHand {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    for c in &cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1u16 << r;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high_from_mask(rank_mask);

    // (count, rank) groups, largest group first, then highest rank
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));
    let grouped: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();

    let (category, tiebreakers) = match (straight_high, is_flush) {
        (Some(14), true) => (Category::RoyalFlush, vec![14]),
        (Some(high), true) => (Category::StraightFlush, vec![high]),
        _ if groups[0].0 == 4 => (Category::FourOfAKind, grouped),
        _ if groups[0].0 == 3 && groups[1].0 == 2 => (Category::FullHouse, grouped),
        (_, true) => (Category::Flush, grouped),
        (Some(high), false) => (Category::Straight, vec![high]),
        _ if groups[0].0 == 3 => (Category::ThreeOfAKind, grouped),
        _ if groups[0].0 == 2 && groups[1].0 == 2 => (Category::TwoPair, grouped),
        _ if groups[0].0 == 2 => (Category::Pair, grouped),
        _ => (Category::HighCard, grouped),
    };

    RankedHand {
        category,
        strength: pack_strength(category, &tiebreakers),
        tiebreakers,
        cards,
    }
}

fn pack_strength(category: Category, tiebreakers: &[u8]) -> u64 {
    let mut packed = 0u64;
    for i in 0..5 {
        packed = packed * 100 + u64::from(tiebreakers.get(i).copied().unwrap_or(0));
    }
    category as u64 * CATEGORY_WEIGHT + packed
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Treat Ace as 14 and optionally as 1
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to the wheel (5)
    for high in (5..=14u8).rev() {
        let window = 0b11111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}
