//! One player's connection to one table.
mod session;

pub use session::{ConnectionState, PlayerIdentity, TableSession};
