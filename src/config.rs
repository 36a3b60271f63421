//! Client timings and feature switches, loadable from JSON.
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse client config from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Timings are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How long the old board stays up after a street change.
    pub street_transition_ms: u64,
    /// Extra control lock on streets that deal cards.
    pub controls_extra_ms: u64,
    /// Before opponents' cards flip and before results show.
    pub reveal_delay_ms: u64,
    /// Between results appearing and the gauge starting.
    pub gauge_lead_ms: u64,
    pub next_hand_gauge_ms: u64,
    pub action_clock_ms: u64,
    /// Whether the action clock is on when the client starts.
    pub action_clock_enabled: bool,
    pub heartbeat_ms: u64,
    /// Show a 1..=turn_roll_max roll whenever the local player's turn begins.
    pub show_turn_roll: bool,
    pub turn_roll_max: u32,
    /// Stack at or below which a manual top up may be requested.
    pub manual_topup_threshold: u64,
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            street_transition_ms: 650,
            controls_extra_ms: 400,
            reveal_delay_ms: 1200,
            gauge_lead_ms: 1500,
            next_hand_gauge_ms: 5000,
            action_clock_ms: 30_000,
            action_clock_enabled: false,
            heartbeat_ms: 25_000,
            show_turn_roll: false,
            turn_roll_max: 100,
            manual_topup_threshold: 100,
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config: ClientConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Try to parse as file path first, then as inline JSON
    pub fn from_str_or_file(input: &str) -> Result<Self, ConfigError> {
        match Self::from_file(input) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Self::from_json(input)
            }
            Err(err) => Err(err),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.next_hand_gauge_ms == 0 {
            return Err(ConfigError::Validation(
                "next_hand_gauge_ms must be greater than 0".to_string(),
            ));
        }
        if self.action_clock_ms == 0 {
            return Err(ConfigError::Validation(
                "action_clock_ms must be greater than 0".to_string(),
            ));
        }
        if self.heartbeat_ms == 0 {
            return Err(ConfigError::Validation(
                "heartbeat_ms must be greater than 0".to_string(),
            ));
        }
        if self.turn_roll_max == 0 {
            return Err(ConfigError::Validation(
                "turn_roll_max must be at least 1".to_string(),
            ));
        }
        // A gauge shorter than one tick would complete before it is drawn.
        if self.next_hand_gauge_ms < crate::timer::TICK_MS {
            return Err(ConfigError::Validation(format!(
                "next_hand_gauge_ms ({}) must be at least one tick ({} ms)",
                self.next_hand_gauge_ms,
                crate::timer::TICK_MS
            )));
        }
        Ok(())
    }

    /// Total control lock when a street change lands on `street`.
    pub fn controls_lock_ms(&self, deals_cards: bool) -> u64 {
        if deals_cards {
            self.street_transition_ms + self.controls_extra_ms
        } else {
            self.street_transition_ms
        }
    }
}
