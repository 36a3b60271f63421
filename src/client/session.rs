use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{Command, CommandSink, Outbound, PlayerAction};
use crate::config::ClientConfig;
use crate::earnings::{EarningsCache, EarningsError, EarningsSource, EarningsSummary};
use crate::reconciler::{Effect, Reconciler};
use crate::table::{parse_message_lossy, Seat, Street, TableUpdate};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub player_id: String,
    pub name: String,
}

impl PlayerIdentity {
    pub fn new(player_id: &str, name: &str) -> Self {
        PlayerIdentity {
            player_id: player_id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    /// Only a user request moves on from here.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Wires the reconciler, the outbound channel and the earnings cache
/// together for one player.
///
/// The host owns the transport. It reports connection changes, passes every
/// inbound text frame to `on_text`, calls `tick` every `TICK_MS` and draws
/// the effects that come back. Outbound commands never reach the host; they
/// go straight to the sink.
pub struct TableSession<S> {
    identity: PlayerIdentity,
    config: ClientConfig,
    state: ConnectionState,
    reconciler: Reconciler,
    outbound: Outbound,
    earnings: EarningsCache<S>,
    last_hand: Option<u64>,
    leave_after_hand: bool,
    manual_topup_requested: bool,
    revealed_by_user: bool,
}

impl<S: EarningsSource> TableSession<S> {
    pub fn new(
        identity: PlayerIdentity,
        config: ClientConfig,
        sink: Box<dyn CommandSink>,
        earnings: S,
    ) -> Self {
        let reconciler = Reconciler::new(config.clone(), &identity.player_id);
        Self::with_reconciler(identity, config, sink, earnings, reconciler)
    }

    pub fn with_reconciler(
        identity: PlayerIdentity,
        config: ClientConfig,
        sink: Box<dyn CommandSink>,
        earnings: S,
        reconciler: Reconciler,
    ) -> Self {
        let outbound = Outbound::new(sink, &identity.player_id, config.heartbeat_ms);
        TableSession {
            identity,
            config,
            state: ConnectionState::Connecting,
            reconciler,
            outbound,
            earnings: EarningsCache::new(earnings),
            last_hand: None,
            leave_after_hand: false,
            manual_topup_requested: false,
            revealed_by_user: false,
        }
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut Reconciler {
        &mut self.reconciler
    }

    /// The transport is up. Announces the player to the table.
    pub fn on_connected(&mut self, now_ms: u64) {
        info!(player = %self.identity.player_id, "Connected");
        self.state = ConnectionState::Connected;
        self.outbound.set_connected(true, now_ms);
        let join = Command::join_table(&self.identity.player_id, &self.identity.name);
        self.outbound.send(join, now_ms);
    }

    /// The transport dropped. Every timer is cancelled and nothing is shown
    /// until the next snapshot after a reconnect.
    pub fn on_disconnected(&mut self, now_ms: u64) -> Vec<Effect> {
        warn!(player = %self.identity.player_id, "Disconnected");
        self.state = ConnectionState::Disconnected;
        self.outbound.set_connected(false, now_ms);
        self.reconciler.reset();
        self.last_hand = None;
        vec![Effect::Cleared]
    }

    /// User asked to reconnect. Returns whether the host should dial again.
    pub fn reconnect(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        debug!("Reconnecting");
        self.state = ConnectionState::Connecting;
        true
    }

    /// Feed one inbound text frame. Unknown or malformed frames are dropped.
    pub fn on_text(&mut self, text: &str, now_ms: u64) -> Vec<Effect> {
        match parse_message_lossy(text) {
            Some(update) => self.on_update(update, now_ms),
            None => Vec::new(),
        }
    }

    pub fn on_update(&mut self, update: TableUpdate, now_ms: u64) -> Vec<Effect> {
        let effects = self.reconciler.ingest(update, now_ms);
        self.dispatch(effects, now_ms)
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        let effects = self.reconciler.tick(now_ms);
        self.outbound.tick(now_ms);
        self.dispatch(effects, now_ms)
    }

    /// Send the commands, track per-hand session flags and hand the rest to
    /// the host.
    fn dispatch(&mut self, effects: Vec<Effect>, now_ms: u64) -> Vec<Effect> {
        let mut visible = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::Send(command) => {
                    self.outbound.send(command, now_ms);
                }
                other => visible.push(other),
            }
        }
        self.observe_table();
        visible
    }

    fn observe_table(&mut self) {
        let hand = self.reconciler.hand_number();
        if hand.is_some() && hand != self.last_hand {
            if self.last_hand.is_some() {
                self.manual_topup_requested = false;
                self.revealed_by_user = false;
            }
            self.last_hand = hand;
        }
        if self.leave_after_hand && self.hero_seat().is_none() && hand.is_some() {
            debug!("No longer seated, clearing leave after hand");
            self.leave_after_hand = false;
        }
    }

    fn hero_seat(&self) -> Option<&Seat> {
        self.reconciler
            .display()?
            .table
            .seat_of(&self.identity.player_id)
    }

    fn send(&mut self, command: Command, now_ms: u64) -> bool {
        self.outbound.send(command, now_ms)
    }

    /// Send a betting decision. Only goes out while it is the player's turn
    /// and controls are unlocked; amounts are the engine's to validate.
    pub fn act(&mut self, action: PlayerAction, amount: Option<u64>, now_ms: u64) -> bool {
        if !self.reconciler.is_local_turn() {
            debug!(?action, "Not our turn, ignoring action");
            return false;
        }
        let command = Command::action(&self.identity.player_id, action, amount);
        self.send(command, now_ms)
    }

    pub fn reserve_seat(&mut self, seat_index: usize, now_ms: u64) -> bool {
        let command = Command::reserve_seat(
            &self.identity.player_id,
            &self.identity.name,
            seat_index,
        );
        self.send(command, now_ms)
    }

    pub fn start_hand(&mut self, now_ms: u64) -> bool {
        if !self.reconciler.can_start_hand() {
            return false;
        }
        let save = self.reconciler.save_stats();
        self.send(Command::start_hand(Some(save)), now_ms)
    }

    /// Show our cards after an uncontested hand. Once per hand.
    pub fn reveal_hand(&mut self, now_ms: u64) -> bool {
        let showable = self.reconciler.street() == Some(Street::Settlement)
            && self.hero_seat().is_some_and(Seat::has_hole_cards);
        if !showable || self.revealed_by_user {
            return false;
        }
        self.revealed_by_user = true;
        let command = Command::reveal_hand(&self.identity.player_id);
        self.send(command, now_ms)
    }

    pub fn revealed_by_user(&self) -> bool {
        self.revealed_by_user
    }

    /// Flip the leave-after-hand request. Returns the new value.
    pub fn toggle_leave_after_hand(&mut self, now_ms: u64) -> bool {
        let next = !self.leave_after_hand;
        let command = Command::leave_after_hand(&self.identity.player_id, next);
        if self.send(command, now_ms) {
            self.leave_after_hand = next;
        }
        self.leave_after_hand
    }

    pub fn leave_after_hand(&self) -> bool {
        self.leave_after_hand
    }

    /// Leaving on the spot is only offered between hands.
    pub fn can_leave_now(&self) -> bool {
        self.hero_seat().is_some() && self.reconciler.street() == Some(Street::Waiting)
    }

    pub fn leave_now(&mut self, now_ms: u64) -> bool {
        if !self.can_leave_now() {
            return false;
        }
        let command = Command::leave_now(&self.identity.player_id);
        self.send(command, now_ms)
    }

    pub fn leave_table(&mut self, now_ms: u64) -> bool {
        let command = Command::leave_table(&self.identity.player_id);
        self.send(command, now_ms)
    }

    pub fn reset_table(&mut self, now_ms: u64) -> bool {
        self.send(Command::ResetTable, now_ms)
    }

    pub fn set_save_stats(&mut self, save: bool, now_ms: u64) -> bool {
        self.reconciler.set_save_stats(save);
        self.send(Command::set_save_stats(save), now_ms)
    }

    /// A seated player whose stack started the hand at or below the
    /// threshold may ask for chips for the next hand.
    pub fn can_request_manual_topup(&self) -> bool {
        self.hero_seat().is_some_and(|seat| {
            seat.hand_start_stack.unwrap_or(seat.stack) <= self.config.manual_topup_threshold
        })
    }

    pub fn request_manual_topup(&mut self, now_ms: u64) -> bool {
        if self.manual_topup_requested || !self.can_request_manual_topup() {
            return false;
        }
        let command = Command::request_manual_topup(&self.identity.player_id);
        self.manual_topup_requested = self.send(command, now_ms);
        self.manual_topup_requested
    }

    pub fn manual_topup_requested(&self) -> bool {
        self.manual_topup_requested
    }

    pub fn toggle_hold(&mut self, now_ms: u64) -> bool {
        self.reconciler.toggle_hold(now_ms)
    }

    pub fn set_auto_fold(&mut self, enabled: bool, now_ms: u64) -> Vec<Effect> {
        let effects = self.reconciler.set_auto_fold(enabled, now_ms);
        self.dispatch(effects, now_ms)
    }

    pub fn set_action_clock(&mut self, enabled: bool) {
        self.reconciler.set_action_clock(enabled);
    }

    pub fn earnings(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError> {
        self.earnings.get(player_id)
    }

    pub fn refresh_earnings(&mut self, player_id: &str) -> Result<EarningsSummary, EarningsError> {
        self.earnings.refresh(player_id)
    }

    pub fn earnings_source(&self) -> &S {
        self.earnings.source()
    }
}
