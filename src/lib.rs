//! Client side presentation for a real-time poker table.
//!
//! The table engine is authoritative and pushes a complete snapshot of the
//! table after every change. This crate decides what the player should see
//! and when: it ranks hands for labels, projects per-street action badges,
//! paces street changes and the end of each hand with a bank of pausable
//! timers, and sends the player's commands back to the engine.
//!
//! # Layout
//!
//! - [`core`]: cards, hand ranking and hand labels.
//! - [`table`]: the snapshot data model and the inbound message parser.
//! - [`display`]: pure functions from a snapshot to what is drawn.
//! - [`timer`]: pausable countdowns driven by explicit timestamps.
//! - [`reconciler`]: the state machine that paces snapshots.
//! - [`command`]: outbound commands, sinks and the heartbeat.
//! - [`client`]: one player's session, tying everything together.
//!
//! # Example
//!
//! ```
//! use rs_poker_table::config::ClientConfig;
//! use rs_poker_table::reconciler::{Effect, Phase, Reconciler};
//! use rs_poker_table::table::{Street, TableSnapshotBuilder, TableUpdate};
//!
//! let mut reconciler = Reconciler::new(ClientConfig::default(), "alice");
//! let preflop = TableSnapshotBuilder::new()
//!     .players(&["alice", "bob"])
//!     .street(Street::Preflop)
//!     .build()
//!     .unwrap();
//! let effects = reconciler.ingest(TableUpdate::Snapshot(Box::new(preflop)), 0);
//! assert!(matches!(effects.as_slice(), [Effect::Display(_)]));
//! assert_eq!(Phase::Live, reconciler.phase());
//! ```
pub mod client;
pub mod command;
pub mod config;
pub mod core;
pub mod display;
pub mod earnings;
pub mod reconciler;
pub mod table;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_util;
