//! Cumulative earnings lookup with a per session cache.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// What the earnings endpoint returns for one player. The `_69_92` fields
/// count only hands played with 6-9 or 9-2 hole cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub hands: u64,
    pub chips_delta: i64,
    #[serde(default)]
    pub hands_69_92: u64,
    #[serde(default)]
    pub chips_delta_69_92: i64,
}

impl EarningsSummary {
    pub fn from_json(json: &str) -> Result<Self, EarningsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Average result per hand, if any hands were played.
    pub fn per_hand(&self) -> Option<f64> {
        if self.hands == 0 {
            None
        } else {
            Some(self.chips_delta as f64 / self.hands as f64)
        }
    }
}

#[derive(Debug, Error)]
pub enum EarningsError {
    #[error("no earnings recorded for {0}")]
    NotFound(String),
    #[error("earnings lookup failed: {0}")]
    Source(String),
    #[error("could not parse earnings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The read side of persisted earnings, keyed by player identity.
pub trait EarningsSource {
    fn fetch(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError>;
}

/// In memory source, for tests and offline play.
#[derive(Debug, Clone, Default)]
pub struct StaticEarnings {
    summaries: HashMap<String, EarningsSummary>,
    lookups: usize,
}

impl StaticEarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player_id: &str, summary: EarningsSummary) {
        self.summaries.insert(player_id.to_string(), summary);
    }

    /// How many times `fetch` was called.
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}

impl EarningsSource for StaticEarnings {
    fn fetch(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError> {
        self.lookups += 1;
        self.summaries
            .get(player_id)
            .copied()
            .ok_or_else(|| EarningsError::NotFound(player_id.to_string()))
    }
}

/// Caches one summary per player for the session. Entries only change on an
/// explicit refresh.
#[derive(Debug)]
pub struct EarningsCache<S> {
    source: S,
    entries: HashMap<String, EarningsSummary>,
}

impl<S: EarningsSource> EarningsCache<S> {
    pub fn new(source: S) -> Self {
        EarningsCache {
            source,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError> {
        if let Some(summary) = self.entries.get(player_id) {
            return Ok(*summary);
        }
        self.refresh(player_id)
    }

    /// Look the player up again, replacing any cached entry.
    pub fn refresh(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError> {
        debug!(player_id, "Fetching earnings");
        let summary = self.source.fetch(player_id)?;
        self.entries.insert(player_id.to_string(), summary);
        Ok(summary)
    }

    pub fn cached(&self, player_id: &str) -> Option<&EarningsSummary> {
        self.entries.get(player_id)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
