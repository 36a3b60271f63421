use tracing::{debug, trace, warn};

use super::{Command, CommandSink};
use crate::timer::Countdown;

/// The outbound side of a connection: a sink plus the idle heartbeat.
///
/// Every successful send re-arms the heartbeat, so a heartbeat only goes out
/// after `heartbeat_ms` without any other traffic. Nothing is sent while
/// disconnected; failed sends are logged and dropped.
pub struct Outbound {
    sink: Box<dyn CommandSink>,
    player_id: String,
    connected: bool,
    heartbeat: Countdown,
    heartbeat_ms: u64,
}

impl Outbound {
    pub fn new(sink: Box<dyn CommandSink>, player_id: &str, heartbeat_ms: u64) -> Self {
        Outbound {
            sink,
            player_id: player_id.to_string(),
            connected: false,
            heartbeat: Countdown::new(),
            heartbeat_ms,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool, now_ms: u64) {
        self.connected = connected;
        if connected {
            self.heartbeat.start(now_ms, self.heartbeat_ms);
        } else {
            self.heartbeat.cancel();
        }
    }

    /// Returns whether the command was handed to the sink.
    pub fn send(&mut self, command: Command, now_ms: u64) -> bool {
        if !self.connected {
            debug!(kind = command.kind(), "Not connected, dropping command");
            return false;
        }
        trace!(kind = command.kind(), "Sending command");
        match self.sink.send(&command) {
            Ok(()) => {
                self.heartbeat.start(now_ms, self.heartbeat_ms);
                true
            }
            Err(error) => {
                warn!(%error, kind = command.kind(), "Failed to send command");
                false
            }
        }
    }

    /// Drive the heartbeat.
    pub fn tick(&mut self, now_ms: u64) {
        if self.heartbeat.advance(now_ms) {
            let heartbeat = Command::heartbeat(&self.player_id);
            if !self.send(heartbeat, now_ms) && self.connected {
                // Try again next period even when the sink is failing.
                self.heartbeat.start(now_ms, self.heartbeat_ms);
            }
        }
    }

    pub fn heartbeat_remaining_ms(&self) -> u64 {
        self.heartbeat.remaining_ms()
    }
}
