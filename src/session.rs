//! Screen and game state controller
//!
//! A [`Session`] owns everything that changes during a presentation run:
//! the active screen, which question is in play, which answers are turned
//! over, the strike count, the big cross overlay and the audio readiness.
//! Every transition is synchronous, ignores requests that do not apply to
//! the current state, and returns the side effects the caller should carry
//! out.

use std::collections::BTreeSet;

use enum_map::{Enum, EnumMap};
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    AlarmMessage, AudioEffect, Effect, ScheduledAlarm,
    audio::{Cue, Readiness},
    board::{Answer, Board, Question},
    constants,
    options::Options,
};

/// The screen currently presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Welcome screen shown until audio initialization settles
    #[default]
    Start,
    /// Question selection grid
    Board,
    /// A single question with its answer slots and strikes
    Game,
}

/// Where a question stands on the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum QuestionStatus {
    /// Not yet opened
    #[default]
    Unasked,
    /// Open on the game screen right now
    Current,
    /// Opened before; can no longer be selected
    Asked,
}

/// Commands understood by the session
///
/// Keyboard input produces the gameplay commands through
/// [`crate::input::interpret`]; the presentation layer sends the rest in
/// response to button presses and the audio handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Request audio initialization from the start screen
    StartAudioInit,
    /// Report the outcome of audio initialization
    CompleteAudioInit(bool),
    /// Open a question from the board
    SelectQuestion(usize),
    /// Go back from the game screen to the board
    ReturnToBoard,
    /// Turn over the answer in a slot
    RevealAnswer(usize),
    /// Set the strike count to an exact value
    SetStrikes(u8),
    /// Show the big cross overlay
    TriggerOverlay,
    /// Take down the overlay and wipe the strikes
    ClearOverlayAndStrikes,
}

/// All mutable state of one presentation run
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// The question content, fixed for the whole run
    board: Board,
    /// Presentation options
    options: Options,
    /// Active screen
    screen: Screen,
    /// One status per question, in board order
    statuses: Vec<QuestionStatus>,
    /// The question on the game screen; set exactly when `screen` is `Game`
    current: Option<usize>,
    /// Revealed answer slots of the current question
    revealed: BTreeSet<usize>,
    /// Strikes on the current question
    strikes: u8,
    /// Whether the big cross overlay is showing
    overlay_active: bool,
    /// Audio subsystem lifecycle
    audio: Readiness,
}

impl Session {
    /// Creates a session on the start screen with every question unasked
    ///
    /// Options that fail validation are replaced by the defaults.
    pub fn new(board: Board, options: Options) -> Self {
        let options = match options.validate() {
            Ok(()) => options,
            Err(e) => {
                warn!(error = %e, "invalid options, using defaults");
                Options::default()
            }
        };

        Self {
            statuses: vec![QuestionStatus::Unasked; board.len()],
            board,
            options,
            screen: Screen::Start,
            current: None,
            revealed: BTreeSet::new(),
            strikes: 0,
            overlay_active: false,
            audio: Readiness::Uninitialized,
        }
    }

    /// Returns the active screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns the audio subsystem readiness
    pub fn audio_readiness(&self) -> Readiness {
        self.audio
    }

    /// Returns the question content
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the presentation options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the status of the question at `index`
    pub fn question_status(&self, index: usize) -> Option<QuestionStatus> {
        self.statuses.get(index).copied()
    }

    /// Returns the statuses of all questions in board order
    pub fn question_statuses(&self) -> &[QuestionStatus] {
        &self.statuses
    }

    /// Counts the questions in each status
    pub fn status_counts(&self) -> EnumMap<QuestionStatus, usize> {
        let mut counts = EnumMap::default();
        for status in &self.statuses {
            counts[*status] += 1;
        }
        counts
    }

    /// Returns the index of the question on the game screen
    pub fn current_question_index(&self) -> Option<usize> {
        self.current
    }

    /// Returns the question on the game screen
    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|index| self.board.get(index))
    }

    /// Returns the revealed answer slots in ascending order
    pub fn revealed_answers(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    /// Whether the answer in `slot` has been revealed
    pub fn is_revealed(&self, slot: usize) -> bool {
        self.revealed.contains(&slot)
    }

    /// Returns the strike count of the current question
    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    /// Whether the big cross overlay is showing
    pub fn overlay_active(&self) -> bool {
        self.overlay_active
    }

    /// Applies a command and returns the effects it requests
    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::StartAudioInit => self.start_audio_init(),
            Command::CompleteAudioInit(success) => self.complete_audio_init(success),
            Command::SelectQuestion(index) => self.select_question(index),
            Command::ReturnToBoard => self.return_to_board(),
            Command::RevealAnswer(slot) => self.reveal_answer(slot),
            Command::SetStrikes(count) => self.set_strikes(count),
            Command::TriggerOverlay => self.trigger_overlay(),
            Command::ClearOverlayAndStrikes => self.clear_overlay_and_strikes(),
        }
    }

    /// Moves audio readiness from `Uninitialized` to `Loading`
    ///
    /// Requests the audio handshake. Ignored once initialization has been
    /// requested.
    pub fn start_audio_init(&mut self) -> Vec<Effect> {
        if self.audio != Readiness::Uninitialized {
            trace!(audio = ?self.audio, "audio init already requested");
            return Vec::new();
        }

        self.audio = Readiness::Loading;
        debug!("audio init started");
        vec![AudioEffect::Begin.into()]
    }

    /// Records the outcome of audio initialization and opens the board
    ///
    /// A failed initialization still opens the board; the game runs without
    /// sound. Only the first outcome after [`Self::start_audio_init`] counts.
    pub fn complete_audio_init(&mut self, success: bool) -> Vec<Effect> {
        if self.audio != Readiness::Loading {
            trace!(audio = ?self.audio, success, "unexpected audio init outcome");
            return Vec::new();
        }

        if success {
            self.audio = Readiness::Ready;
            debug!("audio ready");
        } else {
            self.audio = Readiness::Failed;
            warn!("audio init failed, continuing without sound");
        }

        if self.screen == Screen::Start {
            self.screen = Screen::Board;
        }
        Vec::new()
    }

    /// Opens a question from the board
    ///
    /// Ignored unless the board is showing and the question exists and has
    /// not been asked yet.
    pub fn select_question(&mut self, index: usize) -> Vec<Effect> {
        if self.screen != Screen::Board {
            trace!(index, screen = ?self.screen, "question selected off the board");
            return Vec::new();
        }

        match self.statuses.get(index) {
            Some(QuestionStatus::Unasked) => {}
            status => {
                trace!(index, ?status, "question not selectable");
                return Vec::new();
            }
        }

        self.current = Some(index);
        self.screen = Screen::Game;
        self.revealed.clear();
        self.strikes = 0;
        self.overlay_active = false;
        if let Some(status) = self.statuses.get_mut(index) {
            *status = QuestionStatus::Current;
        }
        debug!(index, "question opened");
        Vec::new()
    }

    /// Goes back to the board, marking the current question as asked
    ///
    /// A question counts as asked once it has been opened, however many of
    /// its answers were revealed.
    pub fn return_to_board(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Game {
            trace!(screen = ?self.screen, "not on the game screen");
            return Vec::new();
        }

        if let Some(index) = self.current.take()
            && let Some(status) = self.statuses.get_mut(index)
        {
            *status = QuestionStatus::Asked;
            debug!(index, "question asked");
        }
        self.screen = Screen::Board;
        Vec::new()
    }

    /// Turns over the answer in `slot`
    ///
    /// Requests the reveal cue the first time a slot is revealed. Repeated
    /// and out-of-range slots are ignored.
    pub fn reveal_answer(&mut self, slot: usize) -> Vec<Effect> {
        if self.screen != Screen::Game {
            trace!(slot, screen = ?self.screen, "not on the game screen");
            return Vec::new();
        }

        if slot >= constants::board::ANSWER_COUNT || !self.revealed.insert(slot) {
            trace!(slot, "answer slot ignored");
            return Vec::new();
        }

        debug!(slot, "answer revealed");
        vec![AudioEffect::Play(Cue::Reveal).into()]
    }

    /// Sets the strike count to `count`
    ///
    /// The count is overwritten, not incremented, so it can move backwards.
    /// The strike cue is requested only when the count goes up.
    pub fn set_strikes(&mut self, count: u8) -> Vec<Effect> {
        if self.screen != Screen::Game {
            trace!(count, screen = ?self.screen, "not on the game screen");
            return Vec::new();
        }

        if !(1..=constants::strikes::MAX).contains(&count) {
            trace!(count, "strike count ignored");
            return Vec::new();
        }

        let effects = if count > self.strikes {
            vec![AudioEffect::Play(Cue::Strike).into()]
        } else {
            Vec::new()
        };
        self.strikes = count;
        debug!(count, "strikes set");
        effects
    }

    /// Shows the big cross overlay
    ///
    /// Requests the big cross cue and an alarm that clears the overlay after
    /// the configured duration.
    pub fn trigger_overlay(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Game {
            trace!(screen = ?self.screen, "not on the game screen");
            return Vec::new();
        }

        self.overlay_active = true;
        debug!("overlay shown");
        vec![
            AudioEffect::Play(Cue::BigCross).into(),
            ScheduledAlarm {
                alarm: AlarmMessage::ClearOverlay,
                delay: self.options.overlay_duration(),
            }
            .into(),
        ]
    }

    /// Clears the overlay and resets strikes to zero
    pub fn clear_overlay_and_strikes(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Game {
            trace!(screen = ?self.screen, "not on the game screen");
            return Vec::new();
        }

        self.strikes = 0;
        self.overlay_active = false;
        debug!("overlay and strikes cleared");
        Vec::new()
    }

    /// Handles an alarm scheduled by an earlier transition
    ///
    /// Alarms are never cancelled, so a clear arriving after a manual clear
    /// or on another screen simply sets the flag it already has.
    pub fn receive_alarm(&mut self, alarm: AlarmMessage) {
        match alarm {
            AlarmMessage::ClearOverlay => {
                self.overlay_active = false;
                trace!("overlay alarm fired");
            }
        }
    }

    /// Returns the snapshot the presentation layer renders
    pub fn state_message(&self) -> SyncMessage {
        match (self.screen, self.current_question()) {
            (Screen::Start, _) => SyncMessage::Start {
                audio: self.audio,
                start_enabled: self.audio != Readiness::Loading,
            },
            (Screen::Game, Some(question)) => SyncMessage::Game {
                audio: self.audio,
                index: self.current.unwrap_or_default(),
                count: self.board.len(),
                question: question.text().to_owned(),
                answers: question
                    .answers()
                    .iter()
                    .enumerate()
                    .map(|(slot, answer)| {
                        if self.is_revealed(slot) {
                            PossiblyHidden::Visible(answer.clone())
                        } else {
                            PossiblyHidden::Hidden
                        }
                    })
                    .collect_vec(),
                revealed: self.revealed.iter().copied().collect_vec(),
                strikes: self.strikes,
                overlay: self.overlay_active,
            },
            (Screen::Board | Screen::Game, _) => SyncMessage::Board {
                audio: self.audio,
                tiles: self
                    .statuses
                    .iter()
                    .enumerate()
                    .map(|(index, status)| Tile {
                        index,
                        status: *status,
                    })
                    .collect_vec(),
                remaining: self.status_counts()[QuestionStatus::Unasked],
            },
        }
    }
}

/// Content that is only shown once it has been revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PossiblyHidden<T> {
    /// Content is visible
    Visible(T),
    /// Content is still hidden
    Hidden,
}

/// One question tile on the selection grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Index of the question on the board
    pub index: usize,
    /// Whether the question can still be selected
    pub status: QuestionStatus,
}

/// Read-only view of the session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyncMessage {
    /// The start screen
    Start {
        /// Audio readiness
        audio: Readiness,
        /// Whether the start button accepts presses
        start_enabled: bool,
    },
    /// The question selection grid
    Board {
        /// Audio readiness
        audio: Readiness,
        /// One tile per question in board order
        tiles: Vec<Tile>,
        /// Number of questions not yet asked
        remaining: usize,
    },
    /// A question in play
    Game {
        /// Audio readiness
        audio: Readiness,
        /// Index of the question on the board
        index: usize,
        /// Total number of questions on the board
        count: usize,
        /// The question text
        question: String,
        /// Answer slots in rank order
        answers: Vec<PossiblyHidden<Answer>>,
        /// Revealed slots in ascending order
        revealed: Vec<usize>,
        /// Strikes on this question
        strikes: u8,
        /// Whether the big cross overlay is showing
        overlay: bool,
    },
}

impl SyncMessage {
    /// Converts the snapshot to a JSON string for the presentation layer
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
