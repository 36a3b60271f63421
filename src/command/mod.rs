//! Outbound commands and the sinks that carry them.
mod message;
mod outbound;
mod sink;

pub use message::{
    ActionPayload, Command, JoinTablePayload, PlayerAction, PlayerPayload, ReserveSeatPayload,
    SaveStatsPayload, StartHandPayload,
};
pub use outbound::Outbound;
pub use sink::{CommandSink, JsonLineSink, NullSink, RecordingSink, SinkError};
