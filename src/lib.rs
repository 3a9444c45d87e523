//! # Feud Board Library
//!
//! This library provides the core logic for a single-presenter survey game
//! board: a grid of questions, ranked answers revealed on command, strikes
//! for wrong guesses, and audio cues for feedback. Rendering and sound
//! playback live outside the crate; the session hands back the effects it
//! wants performed and a snapshot for the presentation layer to draw.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::ignored_unit_patterns)]

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod audio;
pub mod board;
pub mod constants;
pub mod input;
pub mod options;
pub mod presenter;
pub mod session;

/// Deferred actions the session asks to have delivered back later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Take down the big cross overlay
    ClearOverlay,
}

/// An alarm together with how long to wait before delivering it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAlarm {
    /// The alarm to deliver
    pub alarm: AlarmMessage,
    /// Delay from the moment the effect is executed
    pub delay: Duration,
}

/// Requests made to the audio capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEffect {
    /// Start the audio initialization handshake
    Begin,
    /// Play a feedback cue
    Play(audio::Cue),
}

/// Side effects requested by a state transition
///
/// The session never performs I/O itself. Every transition returns the list
/// of effects the caller should carry out, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum Effect {
    /// Talk to the audio capability
    Audio(AudioEffect),
    /// Deliver an alarm back to the session after a delay
    Schedule(ScheduledAlarm),
}

impl Effect {
    /// Returns the cue this effect plays, if it plays one
    pub fn cue(&self) -> Option<audio::Cue> {
        match self {
            Self::Audio(AudioEffect::Play(cue)) => Some(*cue),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_effect_from_audio() {
        let effect: Effect = AudioEffect::Play(audio::Cue::Strike).into();
        assert_eq!(effect.cue(), Some(audio::Cue::Strike));
    }

    #[test]
    fn test_effect_from_schedule() {
        let effect: Effect = ScheduledAlarm {
            alarm: AlarmMessage::ClearOverlay,
            delay: Duration::from_secs(4),
        }
        .into();
        assert!(effect.cue().is_none());
        assert!(matches!(effect, Effect::Schedule(_)));
    }

    #[test]
    fn test_begin_is_not_a_cue() {
        assert!(Effect::Audio(AudioEffect::Begin).cue().is_none());
    }
}
