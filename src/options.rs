//! Presentation options
//!
//! Options are read from JSON by the embedding application and validated
//! before a session is created.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::overlay;

/// Validation result type for duration validation
type ValidationResult = garde::Result;

/// Validates that the overlay duration falls within the configured bounds
fn validate_overlay_duration(val: &Duration) -> ValidationResult {
    if (overlay::MIN_DURATION..=overlay::MAX_DURATION).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "overlay_duration is outside of the bounds [{},{}]",
            overlay::MIN_DURATION,
            overlay::MAX_DURATION,
        )))
    }
}

/// Errors that can occur while loading options
#[derive(Debug, Error)]
pub enum Error {
    /// The options are not well-formed JSON
    #[error("malformed options: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The options parsed but hold out-of-bounds values
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
}

/// Options that tune the presentation without changing the rules
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// How long the big cross stays up before it clears itself
    #[garde(custom(|v, _| validate_overlay_duration(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    overlay_duration: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            overlay_duration: Duration::from_millis(overlay::DEFAULT_DURATION_MILLIS),
        }
    }
}

impl Options {
    /// Creates options with a custom overlay duration
    ///
    /// The value is not validated here; call [`Validate::validate`] or load
    /// through [`Options::from_json`].
    pub fn with_overlay_duration(overlay_duration: Duration) -> Self {
        Self { overlay_duration }
    }

    /// Parses and validates options from JSON
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for invalid JSON and [`Error::Invalid`]
    /// when a value is outside its bounds.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Returns how long the big cross overlay stays visible
    pub fn overlay_duration(&self) -> Duration {
        self.overlay_duration
    }
}
