//! Question board content
//!
//! This module contains the static data source the game reads from: the
//! ordered list of survey questions, each with its six ranked answers and
//! point values. The content is loaded once and never mutated.

pub mod config;

pub use config::{Answer, Board, Error, Question};
