//! Configuration constants for the survey board
//!
//! This module contains the fixed shape of the game (answers per question,
//! strikes per question) and the bounds used when validating presentation
//! options.

/// Question board constants
pub mod board {
    /// Number of ranked answers every question carries, one per number key
    pub const ANSWER_COUNT: usize = 6;
}

/// Strike tracking constants
pub mod strikes {
    /// Maximum number of strikes a question can accumulate
    pub const MAX: u8 = 3;
}

/// Full-screen "big cross" overlay constants
pub mod overlay {
    /// Default time in milliseconds before the overlay clears itself
    pub const DEFAULT_DURATION_MILLIS: u64 = 4000;
    /// Minimum overlay duration in seconds
    pub const MIN_DURATION: u64 = 1;
    /// Maximum overlay duration in seconds
    pub const MAX_DURATION: u64 = 30;
}
