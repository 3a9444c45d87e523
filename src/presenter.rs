//! Effect execution for a running presentation
//!
//! The [`Presenter`] glues a [`Session`] to the outside world. It feeds key
//! presses and button commands into the session, plays the requested cues
//! through an [`AudioCapability`] once audio is ready, and holds deferred
//! alarms until their due time is passed to [`Presenter::tick`].
//!
//! Time is always supplied by the caller, so the event loop decides how
//! often to tick and tests can drive the clock directly.

use enum_map::EnumMap;
use tracing::{trace, warn};
use web_time::Instant;

use crate::{
    AlarmMessage, AudioEffect, Effect, ScheduledAlarm,
    audio::{self, AudioCapability, Cue, CueSound},
    input::{self, Key},
    session::{Command, Session, SyncMessage},
};

/// Drives a session and carries out the effects it requests
#[derive(Debug)]
pub struct Presenter<A> {
    /// The game state
    session: Session,
    /// Cue playback backend
    audio: A,
    /// Voice for each cue
    sounds: EnumMap<Cue, CueSound>,
    /// Alarms waiting for their due time, earliest first
    pending: Vec<(Instant, AlarmMessage)>,
}

impl<A: AudioCapability> Presenter<A> {
    /// Creates a presenter for a fresh session
    pub fn new(session: Session, audio: A) -> Self {
        Self {
            session,
            audio,
            sounds: audio::cue_sounds(),
            pending: Vec::new(),
        }
    }

    /// Returns the session being presented
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the audio backend
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Handles a key press
    ///
    /// Returns the command the key was interpreted as, if any.
    pub fn press_key(&mut self, key: Key, now: Instant) -> Option<Command> {
        let command = input::interpret(&self.session, key)?;
        self.apply(command, now);
        Some(command)
    }

    /// Applies a command from the presentation layer and runs its effects
    pub fn apply(&mut self, command: Command, now: Instant) {
        let effects = self.session.apply(command);
        self.execute(effects, now);
    }

    /// Delivers every alarm due at or before `now`, earliest first
    ///
    /// Returns the number of alarms delivered.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.pending.partition_point(|(at, _)| *at <= now);
        for (_, alarm) in self.pending.drain(..due) {
            self.session.receive_alarm(alarm);
        }
        due
    }

    /// Returns when the next alarm is due
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.first().map(|(at, _)| *at)
    }

    /// Returns the snapshot to render
    pub fn snapshot(&self) -> SyncMessage {
        self.session.state_message()
    }

    /// Carries out effects in the order they were requested
    fn execute(&mut self, effects: Vec<Effect>, now: Instant) {
        for effect in effects {
            match effect {
                Effect::Audio(AudioEffect::Begin) => self.audio.begin(),
                Effect::Audio(AudioEffect::Play(cue)) => self.play(cue),
                Effect::Schedule(ScheduledAlarm { alarm, delay }) => {
                    let Some(at) = now.checked_add(delay) else {
                        warn!(?alarm, ?delay, "alarm delay out of range, dropped");
                        continue;
                    };
                    let index = self.pending.partition_point(|(due, _)| *due <= at);
                    self.pending.insert(index, (at, alarm));
                }
            }
        }
    }

    /// Plays a cue if audio is ready; failures are logged and dropped
    fn play(&self, cue: Cue) {
        if !self.session.audio_readiness().is_ready() {
            trace!(%cue, "audio not ready, cue skipped");
            return;
        }

        if let Err(e) = self.audio.play_cue(cue, &self.sounds[cue]) {
            warn!(%cue, error = %e, "cue playback failed");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::{cell::RefCell, time::Duration};

    use super::*;
    use crate::{
        audio::Readiness,
        board::Board,
        options::Options,
        session::{QuestionStatus, Screen},
    };

    #[derive(Default)]
    struct RecordingAudio {
        began: bool,
        played: RefCell<Vec<Cue>>,
        fail: bool,
    }

    impl AudioCapability for RecordingAudio {
        fn begin(&mut self) {
            self.began = true;
        }

        fn play_cue(&self, cue: Cue, _sound: &CueSound) -> Result<(), audio::Error> {
            self.played.borrow_mut().push(cue);
            if self.fail {
                Err(audio::Error::Unavailable("device unplugged".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn create_presenter(audio: RecordingAudio) -> Presenter<RecordingAudio> {
        Presenter::new(Session::new(Board::sample(), Options::default()), audio)
    }

    fn press_all(presenter: &mut Presenter<RecordingAudio>, keys: &str, now: Instant) {
        for c in keys.chars() {
            presenter.press_key(Key::Char(c), now);
        }
    }

    #[test]
    fn test_start_begins_audio_handshake() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        assert!(presenter.audio().began);
        assert_eq!(presenter.session().audio_readiness(), Readiness::Loading);
    }

    #[test]
    fn test_cues_played_when_ready() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        press_all(&mut presenter, "1170", now);
        assert_eq!(
            *presenter.audio().played.borrow(),
            vec![Cue::Reveal, Cue::Strike, Cue::BigCross]
        );
    }

    #[test]
    fn test_cues_skipped_when_audio_failed() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(false), now);
        presenter.apply(Command::SelectQuestion(0), now);
        press_all(&mut presenter, "170", now);
        assert!(presenter.audio().played.borrow().is_empty());
        assert_eq!(presenter.session().strikes(), 1);
        assert!(presenter.session().overlay_active());
    }

    #[test]
    fn test_playback_failure_is_not_fatal() {
        let mut presenter = create_presenter(RecordingAudio {
            fail: true,
            ..RecordingAudio::default()
        });
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        press_all(&mut presenter, "12", now);
        assert_eq!(presenter.audio().played.borrow().len(), 2);
        assert_eq!(presenter.session().revealed_answers().len(), 2);
    }

    #[test]
    fn test_overlay_clears_after_duration() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        presenter.press_key(Key::Char('0'), now);
        assert!(presenter.session().overlay_active());
        assert_eq!(presenter.next_due(), Some(now + Duration::from_secs(4)));

        assert_eq!(presenter.tick(now + Duration::from_secs(3)), 0);
        assert!(presenter.session().overlay_active());

        assert_eq!(presenter.tick(now + Duration::from_secs(4)), 1);
        assert!(!presenter.session().overlay_active());
        assert!(presenter.next_due().is_none());
    }

    #[test]
    fn test_stale_alarm_clears_retriggered_overlay() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        presenter.press_key(Key::Char('0'), now);
        presenter.press_key(Key::Char('0'), now + Duration::from_secs(2));

        // The first alarm still fires and takes the overlay down early
        assert_eq!(presenter.tick(now + Duration::from_secs(4)), 1);
        assert!(!presenter.session().overlay_active());
        assert_eq!(presenter.tick(now + Duration::from_secs(6)), 1);
        assert!(!presenter.session().overlay_active());
    }

    #[test]
    fn test_backspace_clears_before_alarm() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        press_all(&mut presenter, "90", now);
        presenter.press_key(Key::Backspace, now);
        assert_eq!(presenter.session().strikes(), 0);
        assert!(!presenter.session().overlay_active());
        assert_eq!(presenter.tick(now + Duration::from_secs(4)), 1);
        assert!(!presenter.session().overlay_active());
    }

    #[test]
    fn test_overlay_with_out_of_range_duration_uses_default() {
        let session = Session::new(
            Board::sample(),
            Options::with_overlay_duration(Duration::MAX),
        );
        let mut presenter = Presenter::new(session, RecordingAudio::default());
        let now = Instant::now();
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        assert_eq!(
            presenter.press_key(Key::Char('0'), now),
            Some(Command::TriggerOverlay)
        );
        assert_eq!(presenter.next_due(), Some(now + Duration::from_secs(4)));
        assert_eq!(presenter.tick(now + Duration::from_secs(4)), 1);
        assert!(!presenter.session().overlay_active());
    }

    #[test]
    fn test_unschedulable_alarm_is_dropped() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        presenter.execute(
            vec![
                ScheduledAlarm {
                    alarm: AlarmMessage::ClearOverlay,
                    delay: Duration::MAX,
                }
                .into(),
            ],
            now,
        );
        assert!(presenter.next_due().is_none());
    }

    #[test]
    fn test_press_key_reports_command() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        assert_eq!(presenter.press_key(Key::Char('1'), now), None);
        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(true), now);
        presenter.apply(Command::SelectQuestion(0), now);
        assert_eq!(
            presenter.press_key(Key::Char('1'), now),
            Some(Command::RevealAnswer(0))
        );
        assert_eq!(presenter.press_key(Key::Char('1'), now), None);
    }

    #[test]
    fn test_full_scenario() {
        let mut presenter = create_presenter(RecordingAudio::default());
        let now = Instant::now();
        assert_eq!(presenter.session().board().len(), 8);

        presenter.apply(Command::StartAudioInit, now);
        presenter.apply(Command::CompleteAudioInit(false), now);
        assert_eq!(presenter.session().screen(), Screen::Board);
        assert_eq!(presenter.session().audio_readiness(), Readiness::Failed);

        presenter.apply(Command::SelectQuestion(2), now);
        assert_eq!(presenter.session().screen(), Screen::Game);
        assert_eq!(
            presenter.session().question_status(2),
            Some(QuestionStatus::Current)
        );

        let mut session = presenter.session().clone();
        let mut requested = Vec::new();
        for c in ['1', '1', '7', '0'] {
            if let Some(command) = input::interpret(&session, Key::Char(c)) {
                requested.extend(session.apply(command).iter().filter_map(Effect::cue));
            }
        }
        assert_eq!(requested, vec![Cue::Reveal, Cue::Strike, Cue::BigCross]);

        press_all(&mut presenter, "1170", now);
        assert_eq!(
            presenter
                .session()
                .revealed_answers()
                .iter()
                .copied()
                .collect::<Vec<_>>(),
            vec![0]
        );
        assert_eq!(presenter.session().strikes(), 1);
        assert!(presenter.session().overlay_active());

        presenter.apply(Command::ReturnToBoard, now);
        assert_eq!(
            presenter.session().question_status(2),
            Some(QuestionStatus::Asked)
        );
        assert!(presenter.session().current_question_index().is_none());
        assert!(matches!(presenter.snapshot(), SyncMessage::Board { .. }));
    }
}
