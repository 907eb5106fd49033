use thiserror::Error;

#[derive(Error, Debug)]
pub enum OddsError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Hand evaluation takes 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Board must have 0, 3, 4, or 5 cards, got {0}")]
    InvalidBoardSize(usize),

    #[error("Need at least one opponent")]
    NoOpponents,

    #[error("Trial count must be at least 1")]
    NoTrials,

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    InsufficientDeck { requested: usize, available: usize },
}

pub type OddsResult<T> = Result<T, OddsError>;
