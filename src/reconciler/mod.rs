//! The snapshot reconciler: decides when each authoritative snapshot becomes
//! visible, and owns every table timer.
//!
//! The engine pushes complete table snapshots as fast as the game moves. The
//! reconciler turns them into a paced sequence of `DisplayState`s: a street
//! change holds the old board for a moment, a finished hand reveals cards,
//! then results, then runs the inter-hand gauge before the next hand is
//! shown. Nothing here blocks or reads a clock; the host passes `now_ms` into
//! `ingest` and `tick` and acts on the returned `Effect`s.
mod autopilot;
mod phase;
mod view;

pub use autopilot::{AutoPilot, TurnKey, TurnRoll};
pub use phase::{Phase, SettlementStage};
pub use view::{ClockView, GaugeView};

use tracing::{debug, info, instrument, trace};

use crate::command::Command;
use crate::config::ClientConfig;
use crate::display::{history_entries, Blinds, DisplayState, HandResults, HistoryEntry};
use crate::table::{ActionKind, Street, TableSnapshot, TableUpdate};
use crate::timer::{TimerBank, TimerEvent, TimerId};

/// Something the host has to do after an `ingest` or `tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Draw this state.
    Display(Box<DisplayState>),
    /// The engine has no table for us. Clear the screen.
    Cleared,
    /// Send this to the engine.
    Send(Command),
}

/// State that lives for exactly one hand.
#[derive(Debug, Clone, Default)]
struct HandFlags {
    /// Hand whose settlement narrative was already started.
    gauge_scheduled: Option<u64>,
    /// Hand for which `nextHandGaugeComplete` went out.
    signalled: Option<u64>,
    reveal_opponents: bool,
    runout_hand: Option<u64>,
    frozen_blinds: Option<Blinds>,
    /// Hold requested before the gauge started.
    hold_pending: bool,
}

pub struct Reconciler {
    config: ClientConfig,
    player_id: String,
    timers: TimerBank,
    phase: Phase,
    display: Option<DisplayState>,
    /// Depth one, last write wins.
    pending: Option<TableSnapshot>,
    controls_enabled: bool,
    /// Last (hand, street) whose entry actions ran.
    entered: Option<(u64, Street)>,
    hand: HandFlags,
    autopilot: AutoPilot,
    action_clock_enabled: bool,
    /// Action clock toggle waiting for the next hand.
    pending_action_clock: Option<bool>,
    clock_key: Option<TurnKey>,
    turn_roll: TurnRoll,
    save_stats: bool,
}

impl Reconciler {
    pub fn new(config: ClientConfig, player_id: &str) -> Self {
        let roll = TurnRoll::new(config.turn_roll_max);
        Self::with_turn_roll(config, player_id, roll)
    }

    pub fn with_turn_roll(config: ClientConfig, player_id: &str, turn_roll: TurnRoll) -> Self {
        Reconciler {
            action_clock_enabled: config.action_clock_enabled,
            config,
            player_id: player_id.to_string(),
            timers: TimerBank::new(),
            phase: Phase::Idle,
            display: None,
            pending: None,
            controls_enabled: true,
            entered: None,
            hand: HandFlags::default(),
            autopilot: AutoPilot::new(),
            pending_action_clock: None,
            clock_key: None,
            turn_roll,
            save_stats: false,
        }
    }

    /// Feed one inbound table update.
    #[instrument(level = "trace", skip_all, fields(player = %self.player_id))]
    pub fn ingest(&mut self, update: TableUpdate, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        match update {
            TableUpdate::Cleared => {
                debug!("Table cleared by the engine");
                self.reset();
                effects.push(Effect::Cleared);
            }
            TableUpdate::Snapshot(next) => self.apply(*next, now_ms, &mut effects),
        }
        self.refresh_turn(now_ms, &mut effects);
        effects
    }

    /// Drive every timer. Call at `TICK_MS` cadence.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        for TimerEvent::Completed(id) in self.timers.advance(now_ms) {
            // An earlier completion in this batch may have restarted it.
            if self.timers.is_active(id) {
                trace!(timer = %id, "Skipping stale completion");
                continue;
            }
            self.on_timer(id, now_ms, &mut effects);
        }
        self.refresh_turn(now_ms, &mut effects);
        effects
    }

    /// Forget everything, as on disconnect. Cancelled timers never signal.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.phase = Phase::Idle;
        self.display = None;
        self.pending = None;
        self.controls_enabled = true;
        self.entered = None;
        self.hand = HandFlags::default();
        self.autopilot = AutoPilot::new();
        self.clock_key = None;
        if let Some(enabled) = self.pending_action_clock.take() {
            self.action_clock_enabled = enabled;
        }
    }

    fn apply(&mut self, next: TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        if let Some(save) = next.save_earnings {
            self.save_stats = save;
        }
        let Some(shown) = self.display.as_ref() else {
            debug!(hand = next.hand_number, street = %next.street, "First snapshot");
            self.phase = Phase::Live;
            self.adopt(&next, now_ms, effects);
            return;
        };
        let shown_hand = shown.hand_number();

        if self.phase.is_gauge_running() {
            if next.hand_number == shown_hand && next.has_action(&ActionKind::HandReveal) {
                trace!(hand = shown_hand, "Reveal during gauge");
                // A same-hand snapshot stashed earlier is older than this one.
                if self.pending.as_ref().map(|p| p.hand_number) == Some(shown_hand) {
                    self.pending = None;
                }
                let display = DisplayState::build(&next, self.display.as_ref());
                self.show(display, effects);
            } else if next.hand_number != shown_hand
                || self
                    .pending
                    .as_ref()
                    .map_or(true, |p| p.hand_number == shown_hand)
            {
                self.stash(next);
            } else {
                trace!(hand = next.hand_number, "Next hand already pending, dropping");
            }
            return;
        }

        if self.phase == Phase::StreetTransitioning {
            self.stash(next);
            return;
        }

        self.apply_live(next, now_ms, effects);
    }

    /// The rules that apply when nothing is holding the screen.
    fn apply_live(&mut self, next: TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        let Some(shown) = self.display.as_ref() else {
            self.phase = Phase::Live;
            self.adopt(&next, now_ms, effects);
            return;
        };
        if next.hand_number != shown.hand_number() {
            self.start_new_hand(next, now_ms, effects);
        } else if next.street == Street::Waiting && shown.table.street != Street::Waiting {
            self.enter_waiting(&next, now_ms, effects);
        } else if next.street != shown.table.street {
            self.start_transition(next, now_ms, effects);
        } else {
            self.adopt(&next, now_ms, effects);
        }
    }

    fn stash(&mut self, next: TableSnapshot) {
        trace!(
            hand = next.hand_number,
            street = %next.street,
            replaced = self.pending.is_some(),
            "Stashing snapshot"
        );
        self.pending = Some(next);
    }

    fn start_new_hand(&mut self, next: TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        match self.display.as_ref() {
            Some(prev) if prev.table.street.is_hand_over() => {
                debug!(from = prev.hand_number(), to = next.hand_number, "New hand");
            }
            Some(prev) => {
                info!(
                    from = prev.hand_number(),
                    to = next.hand_number,
                    street = %prev.table.street,
                    "Hand reset before settlement"
                );
            }
            None => {}
        }
        self.timers.cancel_all();
        self.hand = HandFlags::default();
        if let Some(enabled) = self.pending_action_clock.take() {
            debug!(enabled, "Applying action clock setting");
            self.action_clock_enabled = enabled;
        }
        self.pending = None;
        self.entered = None;
        self.phase = Phase::Live;
        self.controls_enabled = true;
        self.autopilot = AutoPilot::new();
        self.clock_key = None;
        self.show(DisplayState::new_hand(&next), effects);
        self.on_displayed(now_ms, effects);
    }

    fn start_transition(&mut self, next: TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        let Some(shown) = self.display.as_ref() else {
            return;
        };
        debug!(
            hand = next.hand_number,
            from = %shown.table.street,
            to = %next.street,
            "Street change"
        );
        let staged = DisplayState::staged(shown, &next);
        self.timers.cancel(TimerId::RevealDelay);
        self.timers.cancel(TimerId::GaugeLead);
        self.show(staged, effects);

        self.phase = Phase::StreetTransitioning;
        self.timers.start(
            TimerId::StreetTransition,
            now_ms,
            self.config.street_transition_ms,
        );
        self.controls_enabled = false;
        self.timers.start(
            TimerId::ControlsUnlock,
            now_ms,
            self.config.controls_lock_ms(next.street.deals_cards()),
        );
        self.pending = Some(next);
    }

    fn finish_transition(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        self.phase = Phase::Live;
        let Some(next) = self.pending.take() else {
            return;
        };
        let same_hand = self
            .display
            .as_ref()
            .is_some_and(|d| d.hand_number() == next.hand_number);
        if !same_hand {
            self.start_new_hand(next, now_ms, effects);
        } else if next.street == Street::Waiting {
            self.enter_waiting(&next, now_ms, effects);
        } else {
            self.adopt(&next, now_ms, effects);
        }
    }

    fn enter_waiting(&mut self, next: &TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        debug!(hand = next.hand_number, "Table waiting");
        for id in [
            TimerId::ControlsUnlock,
            TimerId::RevealDelay,
            TimerId::GaugeLead,
            TimerId::InterHandGauge,
        ] {
            self.timers.cancel(id);
        }
        self.hand.frozen_blinds = None;
        self.controls_enabled = true;
        self.phase = Phase::Live;
        self.adopt(next, now_ms, effects);
    }

    fn adopt(&mut self, next: &TableSnapshot, now_ms: u64, effects: &mut Vec<Effect>) {
        let display = DisplayState::build(next, self.display.as_ref());
        self.show(display, effects);
        self.on_displayed(now_ms, effects);
    }

    fn show(&mut self, display: DisplayState, effects: &mut Vec<Effect>) {
        let display = display.with_frozen_blinds(self.hand.frozen_blinds);
        self.display = Some(display.clone());
        effects.push(Effect::Display(Box::new(display)));
    }

    /// Entry actions for the street now on screen.
    fn on_displayed(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        let Some(display) = self.display.as_ref() else {
            return;
        };
        let hand = display.hand_number();
        let street = display.table.street;
        if display.table.is_auto_runout() && self.hand.runout_hand != Some(hand) {
            debug!(hand, "Automatic run-out");
            self.hand.runout_hand = Some(hand);
        }
        self.autopilot.observe_street(hand, street);

        if self.entered == Some((hand, street)) {
            return;
        }
        self.entered = Some((hand, street));
        match street {
            Street::Showdown => {
                if self.hand.runout_hand == Some(hand) {
                    self.hand.reveal_opponents = true;
                } else {
                    self.timers
                        .start(TimerId::RevealDelay, now_ms, self.config.reveal_delay_ms);
                }
            }
            Street::Settlement => self.enter_settlement(now_ms, effects),
            _ => {}
        }
    }

    fn enter_settlement(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        let Some(display) = self.display.as_ref() else {
            return;
        };
        let hand = display.hand_number();
        if self.hand.gauge_scheduled == Some(hand) {
            trace!(hand, "Settlement already scheduled");
            return;
        }
        self.hand.gauge_scheduled = Some(hand);
        let showdown = display.table.has_showdown();
        debug!(hand, showdown, "Entering settlement");

        if showdown && self.hand.runout_hand == Some(hand) {
            self.hand.reveal_opponents = true;
            self.start_results(now_ms, effects);
        } else {
            self.hand.reveal_opponents = showdown;
            self.phase = Phase::SettlementWaiting(SettlementStage::Revealing);
            self.timers
                .start(TimerId::RevealDelay, now_ms, self.config.reveal_delay_ms);
        }
    }

    fn start_results(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        self.phase = Phase::SettlementWaiting(SettlementStage::Results);
        if let Some(display) = self.display.take() {
            self.hand.frozen_blinds = Some(display.blinds());
            self.show(display, effects);
        }
        if self.config.gauge_lead_ms == 0 {
            self.start_gauge(now_ms);
        } else {
            self.timers
                .start(TimerId::GaugeLead, now_ms, self.config.gauge_lead_ms);
        }
    }

    fn start_gauge(&mut self, now_ms: u64) {
        debug!(held = self.hand.hold_pending, "Starting next hand gauge");
        self.phase = Phase::SettlementWaiting(SettlementStage::Gauge);
        self.timers.start(
            TimerId::InterHandGauge,
            now_ms,
            self.config.next_hand_gauge_ms,
        );
        if self.hand.hold_pending {
            self.timers.pause(TimerId::InterHandGauge, now_ms);
        }
    }

    fn finish_gauge(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        self.phase = Phase::SettlementWaiting(SettlementStage::Awaiting);
        self.hand.frozen_blinds = None;
        self.hand.hold_pending = false;
        if let Some(hand) = self.display.as_ref().map(DisplayState::hand_number) {
            if self.hand.signalled != Some(hand) {
                self.hand.signalled = Some(hand);
                info!(hand, "Next hand gauge complete");
                effects.push(Effect::Send(Command::next_hand_gauge_complete(
                    &self.player_id,
                )));
            }
        }
        match self.pending.take() {
            Some(next) => self.apply_live(next, now_ms, effects),
            None => {
                if let Some(display) = self.display.take() {
                    self.show(display, effects);
                }
            }
        }
    }

    fn on_timer(&mut self, id: TimerId, now_ms: u64, effects: &mut Vec<Effect>) {
        trace!(timer = %id, "Timer completed");
        match id {
            TimerId::StreetTransition => self.finish_transition(now_ms, effects),
            TimerId::ControlsUnlock => self.controls_enabled = true,
            TimerId::RevealDelay => {
                if self.phase == Phase::SettlementWaiting(SettlementStage::Revealing) {
                    self.start_results(now_ms, effects);
                } else if self.street() == Some(Street::Showdown) {
                    self.hand.reveal_opponents = true;
                }
            }
            TimerId::GaugeLead => {
                if self.phase == Phase::SettlementWaiting(SettlementStage::Results) {
                    self.start_gauge(now_ms);
                }
            }
            TimerId::InterHandGauge => self.finish_gauge(now_ms, effects),
            TimerId::ActionClock => {
                info!(player = %self.player_id, "Action clock expired");
                self.autopilot.force();
            }
        }
    }

    /// Start or stop the action clock and let the autopilot act.
    fn refresh_turn(&mut self, now_ms: u64, effects: &mut Vec<Effect>) {
        let turn = self.local_turn();
        self.turn_roll.observe(turn.is_some());
        let Some(key) = turn else {
            if self.clock_key.take().is_some() {
                self.timers.cancel(TimerId::ActionClock);
            }
            self.autopilot.turn_ended();
            return;
        };
        if self.action_clock_enabled && self.clock_key != Some(key) {
            self.clock_key = Some(key);
            self.timers
                .start(TimerId::ActionClock, now_ms, self.config.action_clock_ms);
        }
        if let Some(action) = self.autopilot.decide(key) {
            info!(
                ?action,
                hand = key.hand_number,
                street = %key.street,
                forced = self.autopilot.is_forced(),
                "Auto action"
            );
            self.timers.cancel(TimerId::ActionClock);
            effects.push(Effect::Send(Command::action(&self.player_id, action, None)));
        }
    }

    /// The local player's current decision point, if they can act now.
    fn local_turn(&self) -> Option<TurnKey> {
        let table = &self.display.as_ref()?.table;
        if !self.controls_enabled
            || !table.street.is_betting()
            || !table.is_turn_of(&self.player_id)
        {
            return None;
        }
        let committed = table
            .seat_of(&self.player_id)
            .map_or(0, |seat| seat.street_commit);
        Some(TurnKey {
            hand_number: table.hand_number,
            street: table.street,
            to_call: table.current_bet.saturating_sub(committed),
            current_bet: table.current_bet,
        })
    }

    /// Hold the gauge, or skip it if it is already held.
    ///
    /// While results are showing but the gauge has not started, this only
    /// arms (or disarms) a hold that applies when it starts. Returns whether
    /// a hold is now in effect.
    pub fn toggle_hold(&mut self, now_ms: u64) -> bool {
        match self.phase {
            Phase::SettlementWaiting(SettlementStage::Results) => {
                self.hand.hold_pending = !self.hand.hold_pending;
                self.hand.hold_pending
            }
            Phase::SettlementWaiting(SettlementStage::Gauge) => {
                if self.timers.get(TimerId::InterHandGauge).is_paused() {
                    debug!("Skipping next hand gauge");
                    self.hand.hold_pending = false;
                    self.timers.skip(TimerId::InterHandGauge, now_ms);
                    false
                } else {
                    debug!("Holding next hand gauge");
                    self.timers.pause(TimerId::InterHandGauge, now_ms);
                    true
                }
            }
            _ => false,
        }
    }

    /// Let a held gauge run again from where it stopped.
    pub fn resume_gauge(&mut self, now_ms: u64) {
        self.hand.hold_pending = false;
        self.timers.resume(TimerId::InterHandGauge, now_ms);
    }

    pub fn set_auto_fold(&mut self, enabled: bool, now_ms: u64) -> Vec<Effect> {
        self.autopilot.set_all_fold(enabled);
        let mut effects = Vec::new();
        self.refresh_turn(now_ms, &mut effects);
        effects
    }

    /// Turn the action clock on or off. Mid-hand this waits for the next
    /// hand so a running turn is never put on (or taken off) the clock.
    pub fn set_action_clock(&mut self, enabled: bool) {
        let between_hands = self
            .display
            .as_ref()
            .map_or(true, |d| d.table.street == Street::Waiting);
        if between_hands {
            self.action_clock_enabled = enabled;
            self.pending_action_clock = None;
            if !enabled {
                self.timers.cancel(TimerId::ActionClock);
                self.clock_key = None;
            }
        } else {
            self.pending_action_clock = Some(enabled);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> Option<&DisplayState> {
        self.display.as_ref()
    }

    pub fn pending(&self) -> Option<&TableSnapshot> {
        self.pending.as_ref()
    }

    pub fn hand_number(&self) -> Option<u64> {
        self.display.as_ref().map(DisplayState::hand_number)
    }

    pub fn street(&self) -> Option<Street> {
        self.display.as_ref().map(|d| d.table.street)
    }

    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn is_local_turn(&self) -> bool {
        self.local_turn().is_some()
    }

    pub fn auto_fold(&self) -> bool {
        self.autopilot.all_fold()
    }

    pub fn action_clock_enabled(&self) -> bool {
        self.action_clock_enabled
    }

    pub fn save_stats(&self) -> bool {
        self.save_stats
    }

    pub fn set_save_stats(&mut self, save: bool) {
        self.save_stats = save;
    }

    pub fn gauge(&self) -> Option<GaugeView> {
        self.phase
            .is_gauge_running()
            .then(|| GaugeView::of(self.timers.get(TimerId::InterHandGauge)))
    }

    /// A hold is armed or the gauge is paused.
    pub fn is_holding(&self) -> bool {
        self.hand.hold_pending || self.timers.get(TimerId::InterHandGauge).is_paused()
    }

    pub fn action_clock(&self) -> Option<ClockView> {
        let clock = self.timers.get(TimerId::ActionClock);
        clock.is_active().then(|| ClockView::of(clock))
    }

    pub fn reveals_opponents(&self) -> bool {
        self.hand.reveal_opponents
    }

    pub fn frozen_blinds(&self) -> Option<Blinds> {
        self.hand.frozen_blinds
    }

    pub fn turn_roll(&self) -> Option<u32> {
        if self.config.show_turn_roll {
            self.turn_roll.value()
        } else {
            None
        }
    }

    pub fn can_start_hand(&self) -> bool {
        self.display
            .as_ref()
            .is_some_and(|d| d.table.can_start_hand())
    }

    fn in_runout(&self, display: &DisplayState) -> bool {
        display.table.is_auto_runout() || self.hand.runout_hand == Some(display.hand_number())
    }

    /// Nobody is acting during a run-out, so stale badges are hidden once the
    /// board starts coming.
    pub fn hide_action_badges(&self) -> bool {
        self.display
            .as_ref()
            .is_some_and(|d| d.table.street != Street::Preflop && self.in_runout(d))
    }

    /// Whether the hole cards at `seat_index` are drawn face up.
    pub fn shows_hole_cards(&self, seat_index: usize) -> bool {
        let Some(display) = self.display.as_ref() else {
            return false;
        };
        let Some(seat) = display.table.seat(seat_index) else {
            return false;
        };
        if seat.is_player(&self.player_id) {
            return true;
        }
        if !seat.is_occupied() {
            return false;
        }
        let street = display.table.street;
        if !seat.is_folded
            && ((street.is_hand_over() && self.hand.reveal_opponents) || self.in_runout(display))
        {
            return true;
        }
        if street == Street::Settlement && !display.table.has_showdown() {
            if let Some(id) = seat.player_id.as_deref() {
                return display.table.revealed_player_ids().contains(&id);
            }
        }
        false
    }

    /// The action log of the hand on screen, as the history panel lists it.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.display
            .as_ref()
            .map(|d| history_entries(&d.table.action_history, self.config.locale))
            .unwrap_or_default()
    }

    /// Result overlays, once the settlement has reached the results stage.
    pub fn results(&self) -> Option<HandResults> {
        let display = self.display.as_ref()?;
        let table = &display.table;
        if !self.phase.shows_results() || !table.street.is_hand_over() || !table.has_payout() {
            return None;
        }
        Some(HandResults::compute(table, self.config.locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PlayerAction;
    use crate::table::ActionRecord;
    use crate::test_util::*;

    fn reconciler() -> Reconciler {
        Reconciler::with_turn_roll(ClientConfig::default(), HERO, TurnRoll::seeded(1, 100))
    }

    fn displays(effects: &[Effect]) -> Vec<&DisplayState> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Display(d) => Some(d.as_ref()),
                _ => None,
            })
            .collect()
    }

    fn sent(effects: &[Effect]) -> Vec<&Command> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Tick every 100 ms from `from` (exclusive) through `to`.
    fn run(r: &mut Reconciler, from: u64, to: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut now = from;
        while now < to {
            now += 100;
            effects.extend(r.tick(now));
        }
        effects
    }

    fn gauge_complete_count(effects: &[Effect]) -> usize {
        sent(effects)
            .iter()
            .filter(|c| matches!(c, Command::NextHandGaugeComplete(_)))
            .count()
    }

    /// Ingest a showdown settlement at t=0 and run it until the gauge starts
    /// at 2700 ms.
    fn into_gauge(r: &mut Reconciler) {
        r.ingest(update(snapshot(1, Street::River)), 0);
        r.ingest(update(settlement(1, true)), 0);
        run(r, 0, 700);
        assert_eq!(
            Phase::SettlementWaiting(SettlementStage::Revealing),
            r.phase()
        );
        // Settlement shown at 700, reveal delay ends at 1900, lead at 3400.
        run(r, 700, 3400);
        assert!(r.phase().is_gauge_running());
    }

    #[test_log::test]
    fn test_first_snapshot_adopted() {
        let mut r = reconciler();
        assert_eq!(Phase::Idle, r.phase());
        let effects = r.ingest(update(snapshot(1, Street::Flop)), 0);
        assert_eq!(1, displays(&effects).len());
        assert_eq!(Phase::Live, r.phase());
        assert_eq!(Some(Street::Flop), r.street());
    }

    #[test_log::test]
    fn test_cleared_payload_resets() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Flop)), 0);
        let effects = r.ingest(TableUpdate::Cleared, 100);
        assert_eq!(vec![Effect::Cleared], effects);
        assert_eq!(Phase::Idle, r.phase());
        assert!(r.display().is_none());
    }

    #[test_log::test]
    fn test_new_hand_clears_badges() {
        let mut r = reconciler();
        let mut flop = snapshot(1, Street::Flop);
        flop.action_history.push(
            ActionRecord::new(ActionKind::Bet, Street::Flop)
                .by(VILLAIN)
                .amount(20),
        );
        r.ingest(update(flop), 0);
        assert_eq!(
            Some(ActionKind::Bet),
            r.display().unwrap().table.seats[1].last_action
        );

        // The next hand arrives with blinds already posted.
        let effects = r.ingest(update(snapshot(2, Street::Preflop)), 100);
        let shown = displays(&effects);
        assert_eq!(1, shown.len());
        assert_eq!(2, shown[0].hand_number());
        assert!(shown[0].table.seats.iter().all(|s| s.last_action.is_none()));
    }

    #[test_log::test]
    fn test_street_change_holds_board() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);

        let effects = r.ingest(update(snapshot(1, Street::Flop)), 100);
        let staged = displays(&effects);
        assert_eq!(1, staged.len());
        assert!(staged[0].table.board.is_empty());
        assert_eq!(Phase::StreetTransitioning, r.phase());
        assert!(!r.controls_enabled());

        let effects = run(&mut r, 100, 700);
        assert!(displays(&effects).is_empty());
        assert!(r.display().unwrap().table.board.is_empty());

        let effects = run(&mut r, 700, 800);
        let shown = displays(&effects);
        assert_eq!(1, shown.len());
        assert_eq!(3, shown[0].table.board.len());
        assert_eq!(Phase::Live, r.phase());
    }

    #[test_log::test]
    fn test_controls_unlock_after_flop_lock() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        r.ingest(update(snapshot(1, Street::Flop)), 0);
        run(&mut r, 0, 1000);
        assert!(!r.controls_enabled());
        run(&mut r, 1000, 1100);
        assert!(r.controls_enabled());
    }

    #[test_log::test]
    fn test_settlement_street_change_locks_without_extra() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Showdown)), 0);
        r.ingest(update(settlement(1, true)), 0);
        run(&mut r, 0, 600);
        assert!(!r.controls_enabled());
        run(&mut r, 600, 700);
        assert!(r.controls_enabled());
    }

    #[test_log::test]
    fn test_pending_last_write_wins() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        r.ingest(update(snapshot(1, Street::Flop)), 0);

        let mut later = snapshot(1, Street::Flop);
        later.pot = 40;
        assert!(displays(&r.ingest(update(snapshot(1, Street::Flop)), 100)).is_empty());
        r.ingest(update(later), 200);
        assert_eq!(40, r.pending().unwrap().pot);

        run(&mut r, 200, 700);
        assert_eq!(40, r.display().unwrap().table.pot);
        assert!(r.pending().is_none());
    }

    #[test_log::test]
    fn test_waiting_street_is_immediate() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        r.ingest(update(snapshot(1, Street::Flop)), 0);
        run(&mut r, 0, 700);

        let effects = r.ingest(update(snapshot(1, Street::Waiting)), 800);
        assert_eq!(1, displays(&effects).len());
        assert_eq!(Some(Street::Waiting), r.street());
        assert_eq!(Phase::Live, r.phase());
        assert!(r.controls_enabled());
        assert!(!r.timers().is_active(TimerId::ControlsUnlock));
        assert!(!r.timers().is_active(TimerId::StreetTransition));
    }

    #[test_log::test]
    fn test_settlement_narrative() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::River)), 0);
        r.ingest(update(settlement(1, true)), 0);
        run(&mut r, 0, 700);
        assert!(r.reveals_opponents());
        assert!(r.results().is_none());

        let effects = run(&mut r, 700, 1900);
        assert_eq!(
            Phase::SettlementWaiting(SettlementStage::Results),
            r.phase()
        );
        // Results re-emit the display with frozen blinds.
        let shown = displays(&effects);
        assert_eq!(1, shown.len());
        assert_eq!(Some(Blinds::of(&shown[0].table)), shown[0].frozen_blinds);
        let results = r.results().unwrap();
        assert_eq!(vec![HERO.to_string()], results.winners);
        assert!(r.gauge().is_none());

        run(&mut r, 1900, 3400);
        let gauge = r.gauge().unwrap();
        assert_eq!(5000, gauge.remaining_ms);
        assert_eq!(5, gauge.seconds);
        assert!(!gauge.held);

        let effects = run(&mut r, 3400, 8400);
        assert_eq!(1, gauge_complete_count(&effects));
        assert_eq!(
            Phase::SettlementWaiting(SettlementStage::Awaiting),
            r.phase()
        );
        assert_eq!(None, r.display().unwrap().frozen_blinds);
    }

    #[test_log::test]
    fn test_gauge_pause_keeps_remaining() {
        let mut r = reconciler();
        into_gauge(&mut r);
        run(&mut r, 3400, 4400);
        assert!(r.toggle_hold(4400));
        let effects = run(&mut r, 4400, 7400);
        assert_eq!(0, gauge_complete_count(&effects));
        r.resume_gauge(7400);
        assert!(r.gauge().unwrap().remaining_ms >= 3900);
        run(&mut r, 7400, 7500);
        assert!(r.gauge().unwrap().remaining_ms >= 3900);
    }

    #[test_log::test]
    fn test_second_hold_skips_gauge() {
        let mut r = reconciler();
        into_gauge(&mut r);
        assert!(r.toggle_hold(3500));
        assert!(r.gauge().unwrap().held);
        assert!(!r.toggle_hold(3600));
        let effects = r.tick(3700);
        assert_eq!(1, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_hold_armed_before_gauge() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::River)), 0);
        r.ingest(update(settlement(1, true)), 0);
        run(&mut r, 0, 2000);
        assert!(r.toggle_hold(2000));
        assert!(r.is_holding());
        run(&mut r, 2000, 3400);
        let gauge = r.gauge().unwrap();
        assert!(gauge.held);
        assert_eq!(5000, gauge.remaining_ms);
        let effects = run(&mut r, 3400, 10_000);
        assert_eq!(0, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_reveals_during_gauge_keep_gauge() {
        let mut r = reconciler();
        into_gauge(&mut r);
        run(&mut r, 3400, 4400);
        let before = r.gauge().unwrap().remaining_ms;

        let once = with_reveal(settlement(1, true), VILLAIN);
        let effects = r.ingest(update(once.clone()), 4450);
        assert_eq!(1, displays(&effects).len());
        assert_eq!(1, r.display().unwrap().table.reveal_count());

        let twice = with_reveal(once, HERO);
        let effects = r.ingest(update(twice), 4480);
        assert_eq!(1, displays(&effects).len());
        assert_eq!(2, r.display().unwrap().table.reveal_count());

        assert!(r.phase().is_gauge_running());
        assert_eq!(before, r.gauge().unwrap().remaining_ms);
        let effects = run(&mut r, 4400, 8400);
        assert_eq!(1, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_reveal_supersedes_stashed_update() {
        let mut r = reconciler();
        into_gauge(&mut r);

        let mut ready = settlement(1, true);
        ready.seats[0].is_ready = true;
        let effects = r.ingest(update(ready), 3500);
        assert!(displays(&effects).is_empty());
        assert!(r.pending().is_some());

        let revealed = with_reveal(settlement(1, true), VILLAIN);
        let effects = r.ingest(update(revealed), 3600);
        assert_eq!(1, displays(&effects).len());
        assert!(r.pending().is_none());

        let effects = run(&mut r, 3600, 8400);
        assert_eq!(1, gauge_complete_count(&effects));
        assert_eq!(1, r.display().unwrap().table.reveal_count());
    }

    #[test_log::test]
    fn test_reveal_keeps_stashed_next_hand() {
        let mut r = reconciler();
        into_gauge(&mut r);
        r.ingest(update(snapshot(2, Street::Preflop)), 3500);

        let revealed = with_reveal(settlement(1, true), VILLAIN);
        r.ingest(update(revealed), 3600);
        assert_eq!(Some(2), r.pending().map(|p| p.hand_number));

        run(&mut r, 3600, 8400);
        assert_eq!(Some(2), r.hand_number());
    }

    #[test_log::test]
    fn test_next_hand_waits_for_gauge() {
        let mut r = reconciler();
        into_gauge(&mut r);

        let effects = r.ingest(update(snapshot(2, Street::Preflop)), 4000);
        assert!(displays(&effects).is_empty());
        // A late same-hand snapshot does not displace the next hand.
        r.ingest(update(settlement(1, true)), 4100);
        assert_eq!(2, r.pending().unwrap().hand_number);

        let effects = run(&mut r, 3400, 8400);
        assert_eq!(1, gauge_complete_count(&effects));
        let shown = displays(&effects);
        assert_eq!(2, shown.last().unwrap().hand_number());
        assert_eq!(Phase::Live, r.phase());

        let effects = run(&mut r, 8400, 20_000);
        assert_eq!(0, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_gauge_signal_sent_once() {
        let mut r = reconciler();
        into_gauge(&mut r);
        let mut effects = run(&mut r, 3400, 8400);
        effects.extend(r.ingest(update(settlement(1, true)), 8500));
        effects.extend(run(&mut r, 8500, 20_000));
        assert_eq!(1, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_hand_change_cancels_without_signal() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::River)), 0);
        r.ingest(update(settlement(1, true)), 0);
        run(&mut r, 0, 2000);
        assert!(r.timers().any_active());

        r.ingest(update(snapshot(2, Street::Preflop)), 2000);
        assert!(!r.timers().any_active());
        assert_eq!(Phase::Live, r.phase());
        assert!(!r.reveals_opponents());
        let effects = run(&mut r, 2000, 20_000);
        assert_eq!(0, gauge_complete_count(&effects));
    }

    #[test_log::test]
    fn test_abrupt_reset_mid_hand() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        r.ingest(update(snapshot(1, Street::Flop)), 0);
        // Stashed behind the transition.
        r.ingest(update(snapshot(2, Street::Waiting)), 100);
        let effects = run(&mut r, 100, 700);
        let shown = displays(&effects);
        assert_eq!(2, shown.last().unwrap().hand_number());
        assert_eq!(Phase::Live, r.phase());
        assert!(!r.timers().any_active());
        assert!(r.controls_enabled());
    }

    #[test_log::test]
    fn test_showdown_reveal_delay() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Showdown)), 0);
        assert!(!r.reveals_opponents());
        assert!(!r.shows_hole_cards(1));
        run(&mut r, 0, 1200);
        assert!(r.reveals_opponents());
        assert!(r.shows_hole_cards(1));
    }

    #[test_log::test]
    fn test_runout_reveals_at_once() {
        let mut r = reconciler();
        let flop = heads_up(1, Street::Flop).all_in(0).all_in(1).build().unwrap();
        r.ingest(update(flop), 0);
        assert!(r.hide_action_badges());
        assert!(r.shows_hole_cards(1));

        let showdown = heads_up(1, Street::Showdown)
            .all_in(0)
            .all_in(1)
            .build()
            .unwrap();
        r.ingest(update(showdown), 100);
        run(&mut r, 100, 800);
        assert!(r.reveals_opponents());
        assert!(!r.timers().is_active(TimerId::RevealDelay));
    }

    #[test_log::test]
    fn test_uncontested_shows_only_reveals() {
        let mut r = reconciler();
        r.ingest(update(settlement(1, false)), 0);
        assert!(r.shows_hole_cards(0));
        assert!(!r.shows_hole_cards(1));
        assert!(!r.reveals_opponents());

        let revealed = with_reveal(settlement(1, false), VILLAIN);
        r.ingest(update(revealed), 100);
        assert!(r.shows_hole_cards(1));
        // Empty seats never show cards.
        assert!(!r.shows_hole_cards(4));
    }

    #[test_log::test]
    fn test_action_clock_folds_once() {
        let config = ClientConfig {
            action_clock_enabled: true,
            ..ClientConfig::default()
        };
        let mut r = Reconciler::with_turn_roll(config, HERO, TurnRoll::seeded(1, 100));
        let facing_bet = heads_up(1, Street::Preflop)
            .current_bet(10)
            .street_commit(vec![5, 10, 0, 0, 0, 0])
            .current_turn_seat(Some(0))
            .build()
            .unwrap();
        r.ingest(update(facing_bet.clone()), 0);
        assert_eq!(30, r.action_clock().unwrap().seconds);

        let effects = run(&mut r, 0, 29_900);
        assert!(sent(&effects).is_empty());
        let effects = r.tick(30_000);
        assert_eq!(
            vec![&Command::action(HERO, PlayerAction::Fold, None)],
            sent(&effects)
        );

        // The engine has not answered yet.
        let mut later = run(&mut r, 30_000, 31_000);
        later.extend(r.ingest(update(facing_bet), 31_000));
        assert!(sent(&later).is_empty());
    }

    #[test_log::test]
    fn test_action_clock_stops_off_turn() {
        let config = ClientConfig {
            action_clock_enabled: true,
            ..ClientConfig::default()
        };
        let mut r = Reconciler::with_turn_roll(config, HERO, TurnRoll::seeded(1, 100));
        r.ingest(update(hero_turn(1, Street::Preflop)), 0);
        assert!(r.action_clock().is_some());
        r.ingest(update(snapshot(1, Street::Preflop)), 1000);
        assert!(r.action_clock().is_none());
        let effects = run(&mut r, 1000, 40_000);
        assert!(sent(&effects).is_empty());
    }

    #[test_log::test]
    fn test_action_clock_toggle_waits_for_next_hand() {
        let mut r = reconciler();
        r.ingest(update(hero_turn(1, Street::Preflop)), 0);
        r.set_action_clock(true);
        assert!(!r.action_clock_enabled());
        r.ingest(update(hero_turn(1, Street::Preflop)), 100);
        assert!(r.action_clock().is_none());

        r.ingest(update(hero_turn(2, Street::Preflop)), 200);
        assert!(r.action_clock_enabled());
        assert!(r.action_clock().is_some());
    }

    #[test_log::test]
    fn test_action_clock_toggle_between_hands() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Waiting)), 0);
        r.set_action_clock(true);
        assert!(r.action_clock_enabled());
    }

    #[test_log::test]
    fn test_auto_fold_checks_then_switches_off() {
        let mut r = reconciler();
        r.ingest(update(hero_turn(1, Street::Flop)), 0);
        let effects = r.set_auto_fold(true, 0);
        assert_eq!(
            vec![&Command::action(HERO, PlayerAction::Check, None)],
            sent(&effects)
        );
        assert!(r.auto_fold());

        r.ingest(update(snapshot(1, Street::Turn)), 100);
        run(&mut r, 100, 800);
        assert!(!r.auto_fold());
    }

    #[test_log::test]
    fn test_auto_fold_waits_for_controls() {
        let mut r = reconciler();
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        assert!(r.set_auto_fold(true, 0).is_empty());

        let facing_bet = heads_up(1, Street::Flop)
            .current_bet(20)
            .current_turn_seat(Some(0))
            .build()
            .unwrap();
        let effects = r.ingest(update(facing_bet), 100);
        assert!(sent(&effects).is_empty());
        let effects = run(&mut r, 100, 1200);
        assert_eq!(
            vec![&Command::action(HERO, PlayerAction::Fold, None)],
            sent(&effects)
        );
    }

    #[test_log::test]
    fn test_save_earnings_mirrored() {
        let mut r = reconciler();
        let snapshot = heads_up(1, Street::Waiting)
            .save_earnings(true)
            .build()
            .unwrap();
        r.ingest(update(snapshot), 0);
        assert!(r.save_stats());
        assert!(r.can_start_hand());
    }

    #[test_log::test]
    fn test_history_follows_display() {
        let mut r = reconciler();
        assert!(r.history().is_empty());
        r.ingest(update(snapshot(1, Street::Preflop)), 0);
        let history = r.history();
        assert_eq!(2, history.len());
        assert_eq!(Some(10), history[1].amount);
    }

    #[test_log::test]
    fn test_turn_roll_hidden_unless_enabled() {
        let mut r = reconciler();
        r.ingest(update(hero_turn(1, Street::Preflop)), 0);
        assert_eq!(None, r.turn_roll());

        let config = ClientConfig {
            show_turn_roll: true,
            ..ClientConfig::default()
        };
        let mut r = Reconciler::with_turn_roll(config, HERO, TurnRoll::seeded(1, 100));
        r.ingest(update(hero_turn(1, Street::Preflop)), 0);
        assert!((1..=100).contains(&r.turn_roll().unwrap()));
    }
}
