//! Audio cues and the audio capability
//!
//! The game never produces sound itself. It requests named cues and an
//! external capability plays them on a best-effort basis. This module
//! defines the cue names, the voice each cue is played with, the readiness
//! of the audio subsystem, and the trait a playback backend implements.

use std::time::Duration;

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A short feedback sound tied to a game event
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Enum,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum Cue {
    /// An answer was turned over
    #[display("reveal")]
    Reveal,
    /// A strike was added
    #[display("strike")]
    Strike,
    /// The full-screen big cross was shown
    #[display("bigCross")]
    BigCross,
}

/// The synthesizer voice used for a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Voice {
    /// Soft sine tone with a long release
    Sine,
    /// Harsh frequency-modulated square tone
    FmSquare,
    /// Pink noise burst
    PinkNoise,
}

/// How a cue should sound
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CueSound {
    /// Voice the cue is played with
    pub voice: Voice,
    /// Pitch in scientific notation, `None` for unpitched voices
    pub note: Option<&'static str>,
    /// How long the cue is held before release
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub duration: Duration,
}

/// Returns the voice table for every cue
pub fn cue_sounds() -> EnumMap<Cue, CueSound> {
    enum_map! {
        Cue::Reveal => CueSound {
            voice: Voice::Sine,
            note: Some("C5"),
            duration: Duration::from_millis(200),
        },
        Cue::Strike => CueSound {
            voice: Voice::FmSquare,
            note: Some("G2"),
            duration: Duration::from_millis(300),
        },
        Cue::BigCross => CueSound {
            voice: Voice::PinkNoise,
            note: None,
            duration: Duration::from_millis(400),
        },
    }
}

/// Lifecycle of the audio subsystem
///
/// Readiness only moves forward: `Uninitialized` to `Loading`, then to
/// either `Ready` or `Failed`, where it stays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Initialization has not been requested
    #[default]
    Uninitialized,
    /// Initialization is in flight
    Loading,
    /// Cues can be played
    Ready,
    /// Initialization failed; the game continues silently
    Failed,
}

impl Readiness {
    /// Whether initialization has finished, successfully or not
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Whether cues can be played
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Errors reported by an audio backend
#[derive(Debug, Error)]
pub enum Error {
    /// The output device or synthesizer could not play the cue
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

/// Trait for a cue playback backend
///
/// Implementations wrap a real synthesizer or sound device. Playback is
/// fire-and-forget: the game logs a failed cue and carries on.
pub trait AudioCapability {
    /// Starts the initialization handshake
    ///
    /// The outcome is reported back to the session later, as a
    /// [`crate::session::Command::CompleteAudioInit`].
    fn begin(&mut self) {}

    /// Plays a cue with the given voice
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not produce the sound.
    fn play_cue(&self, cue: Cue, sound: &CueSound) -> Result<(), Error>;
}

/// Backend that accepts every cue and produces no sound
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCapability for Silent {
    fn play_cue(&self, _cue: Cue, _sound: &CueSound) -> Result<(), Error> {
        Ok(())
    }
}
