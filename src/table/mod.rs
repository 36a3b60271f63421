//! The engine's view of a table: snapshots, seats, and the action log.
mod action;
mod builder;
mod message;
mod seat;
mod snapshot;
mod street;

pub use action::{ActionKind, ActionRecord};
pub use builder::{SnapshotBuilderError, TableSnapshotBuilder, MAX_SEATS};
pub use message::{parse_message, parse_message_lossy, MessageError, TableUpdate};
pub use seat::Seat;
pub use snapshot::TableSnapshot;
pub use street::Street;
