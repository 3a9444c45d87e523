//! Question, answer and board definitions
//!
//! Questions are accepted in the record shape used by the survey content
//! files: `{ "question": ..., "answers": [{ "answer": ..., "points": ... }] }`.
//! The answer list is a fixed-size array, so a record with any other number
//! of answers is rejected as malformed when it is parsed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::board::ANSWER_COUNT;

/// Built-in survey content bundled with the crate
const SAMPLE: &str = include_str!("sample.json");

/// A single ranked survey answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text shown once revealed
    #[serde(rename = "answer")]
    text: String,
    /// Points awarded for this answer
    points: u32,
}

impl Answer {
    /// Creates a new answer with its point value
    pub fn new(text: impl Into<String>, points: u32) -> Self {
        Self {
            text: text.into(),
            points,
        }
    }

    /// Returns the answer text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the point value of the answer
    pub fn points(&self) -> u32 {
        self.points
    }
}

/// A survey question with its ranked answers
///
/// The position of an answer in `answers` is its display rank and also the
/// keyboard slot that reveals it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text
    #[serde(rename = "question")]
    text: String,
    /// Ranked answers, highest first
    answers: [Answer; ANSWER_COUNT],
}

impl Question {
    /// Creates a new question from its text and six ranked answers
    pub fn new(text: impl Into<String>, answers: [Answer; ANSWER_COUNT]) -> Self {
        Self {
            text: text.into(),
            answers,
        }
    }

    /// Returns the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns all answers in rank order
    pub fn answers(&self) -> &[Answer; ANSWER_COUNT] {
        &self.answers
    }

    /// Returns the answer in the given slot, if the slot exists
    pub fn answer(&self, slot: usize) -> Option<&Answer> {
        self.answers.get(slot)
    }
}

/// Errors that can occur while loading a board
#[derive(Debug, Error)]
pub enum Error {
    /// The content is not a well-formed list of question records
    #[error("malformed question data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The ordered set of questions offered on the selection grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    questions: Vec<Question>,
}

impl Board {
    /// Creates a board from an ordered list of questions
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parses a board from a JSON array of question records
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the JSON does not match the record
    /// shape, including questions that do not have exactly six answers.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the eight-question board bundled with the crate
    ///
    /// # Panics
    ///
    /// Panics if the bundled content is malformed, which is covered by the
    /// module tests.
    pub fn sample() -> Self {
        Self::from_json(SAMPLE).expect("bundled board is well-formed")
    }

    /// Returns the number of questions on the board
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Checks if the board has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the question at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Returns all questions in board order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
