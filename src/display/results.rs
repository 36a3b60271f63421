use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::{hand_label, Locale};
use crate::table::{ActionKind, Street, TableSnapshot};

/// Net result shown over a seat once a hand is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatResult {
    pub seat_index: usize,
    /// Payout minus what the seat put into the pot.
    pub delta: i64,
    pub label: Option<String>,
}

/// Everything the result overlays need, derived from the action log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HandResults {
    pub payouts: BTreeMap<String, u64>,
    pub contributions: BTreeMap<String, u64>,
    pub seats: Vec<SeatResult>,
    /// Players paid a positive amount.
    pub winners: Vec<String>,
    /// For a hand won without showdown, the street of the final fold.
    pub fold_street: Option<Street>,
}

impl HandResults {
    pub fn compute(snapshot: &TableSnapshot, locale: Locale) -> HandResults {
        let payouts = payout_totals(snapshot);
        let contributions = hand_contributions(snapshot);
        let seats = seat_results(snapshot, &payouts, &contributions, locale);
        HandResults {
            winners: pot_winners(snapshot),
            fold_street: fold_visible_street(snapshot),
            payouts,
            contributions,
            seats,
        }
    }

    pub fn seat(&self, seat_index: usize) -> Option<&SeatResult> {
        self.seats.iter().find(|r| r.seat_index == seat_index)
    }
}

pub fn payout_totals(snapshot: &TableSnapshot) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for record in &snapshot.action_history {
        if record.action != ActionKind::Payout {
            continue;
        }
        if let Some(id) = &record.actor_id {
            *totals.entry(id.clone()).or_insert(0) += record.amount.unwrap_or(0);
        }
    }
    totals
}

pub fn pot_winners(snapshot: &TableSnapshot) -> Vec<String> {
    let mut winners: Vec<String> = Vec::new();
    for record in &snapshot.action_history {
        if record.action != ActionKind::Payout || record.amount.unwrap_or(0) == 0 {
            continue;
        }
        if let Some(id) = &record.actor_id {
            if !winners.contains(id) {
                winners.push(id.clone());
            }
        }
    }
    winners
}

/// Rebuild how much each player put in this hand.
///
/// Blinds and bets add their amount. Calls, raises and all-ins carry the
/// street total, so only the increase over the player's earlier commit on
/// that street is added. The engine returns an uncalled bet without logging
/// it; that refund is reapplied whenever a street, the betting or the hand
/// closes.
pub fn hand_contributions(snapshot: &TableSnapshot) -> BTreeMap<String, u64> {
    let seated: Vec<&str> = snapshot
        .seats
        .iter()
        .filter_map(|s| s.player_id.as_deref())
        .collect();
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    let mut street_commit: BTreeMap<String, u64> = BTreeMap::new();

    for record in &snapshot.action_history {
        match &record.action {
            ActionKind::StreetMarker(_) => {
                refund_uncalled(&seated, &mut totals, &mut street_commit);
                street_commit.clear();
                continue;
            }
            ActionKind::HandEnd | ActionKind::Showdown | ActionKind::Payout => {
                refund_uncalled(&seated, &mut totals, &mut street_commit);
                continue;
            }
            _ => {}
        }

        let Some(actor) = record.actor_id.as_ref() else {
            continue;
        };
        let amount = record.amount.unwrap_or(0);
        if amount == 0 {
            continue;
        }
        match record.action {
            ActionKind::PostSmallBlind | ActionKind::PostBigBlind | ActionKind::Bet => {
                *totals.entry(actor.clone()).or_insert(0) += amount;
                *street_commit.entry(actor.clone()).or_insert(0) += amount;
            }
            ActionKind::Call | ActionKind::Raise | ActionKind::AllIn => {
                let prev = street_commit.get(actor).copied().unwrap_or(0);
                let delta = amount.saturating_sub(prev);
                if delta > 0 {
                    *totals.entry(actor.clone()).or_insert(0) += delta;
                }
                street_commit.insert(actor.clone(), amount);
            }
            _ => {}
        }
    }
    // Logs cut short before any closing marker still get their refund.
    refund_uncalled(&seated, &mut totals, &mut street_commit);
    totals
}

/// Give the single largest street commit back down to the second largest.
/// Ties for the largest mean the bet was called and nothing is returned.
fn refund_uncalled(
    seated: &[&str],
    totals: &mut BTreeMap<String, u64>,
    street_commit: &mut BTreeMap<String, u64>,
) {
    let amounts: Vec<u64> = seated
        .iter()
        .map(|id| street_commit.get(*id).copied().unwrap_or(0))
        .collect();
    let max = amounts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return;
    }
    let top: Vec<&str> = seated
        .iter()
        .zip(&amounts)
        .filter(|(_, a)| **a == max)
        .map(|(id, _)| *id)
        .collect();
    if top.len() != 1 {
        return;
    }
    let second = amounts.iter().copied().filter(|a| *a != max).max().unwrap_or(0);
    let refund = max - second;
    let id = top[0];
    if let Some(total) = totals.get_mut(id) {
        *total = total.saturating_sub(refund);
    }
    if let Some(commit) = street_commit.get_mut(id) {
        *commit = commit.saturating_sub(refund);
    }
}

/// Result badges for every seat that was dealt in. Hand names are only
/// shown after a showdown on a full board, and never for folded seats.
pub fn seat_results(
    snapshot: &TableSnapshot,
    payouts: &BTreeMap<String, u64>,
    contributions: &BTreeMap<String, u64>,
    locale: Locale,
) -> Vec<SeatResult> {
    let can_label = snapshot.has_showdown() && snapshot.board.len() >= 5;
    snapshot
        .seats
        .iter()
        .filter(|s| s.has_hole_cards())
        .filter_map(|seat| {
            let id = seat.player_id.as_ref()?;
            let payout = payouts.get(id).copied().unwrap_or(0) as i64;
            let contrib = contributions.get(id).copied().unwrap_or(0) as i64;
            let label = if can_label && !seat.is_folded {
                hand_label(&seat.known_hole_cards(), &snapshot.board, locale)
            } else {
                None
            };
            Some(SeatResult {
                seat_index: seat.seat_index,
                delta: payout - contrib,
                label,
            })
        })
        .collect()
}

/// Street of the last fold in a hand settled without showdown.
pub fn fold_visible_street(snapshot: &TableSnapshot) -> Option<Street> {
    if snapshot.street != Street::Settlement || snapshot.has_showdown() {
        return None;
    }
    snapshot
        .action_history
        .iter()
        .rev()
        .find(|r| r.action == ActionKind::Fold)
        .map(|r| r.street)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ActionRecord, TableSnapshotBuilder};

    fn act(kind: ActionKind, street: Street, who: &str, amount: u64) -> ActionRecord {
        ActionRecord::new(kind, street).by(who).amount(amount)
    }

    fn marker(street: Street) -> ActionRecord {
        ActionRecord::new(ActionKind::StreetMarker(street), street)
    }

    #[test]
    fn test_uncalled_raise_is_refunded() {
        // a raises to 40, b folds: 30 of a's raise comes back.
        let snapshot = TableSnapshotBuilder::new()
            .players(&["a", "b"])
            .street(Street::Settlement)
            .actions(vec![
                act(ActionKind::PostSmallBlind, Street::Preflop, "a", 5),
                act(ActionKind::PostBigBlind, Street::Preflop, "b", 10),
                act(ActionKind::Raise, Street::Preflop, "a", 40),
                act(ActionKind::Fold, Street::Preflop, "b", 0),
                ActionRecord::new(ActionKind::HandEnd, Street::Settlement),
                act(ActionKind::Payout, Street::Settlement, "a", 20),
            ])
            .build()
            .unwrap();
        let contrib = hand_contributions(&snapshot);
        assert_eq!(Some(&10), contrib.get("a"));
        assert_eq!(Some(&10), contrib.get("b"));

        let results = HandResults::compute(&snapshot, Locale::English);
        // Nobody was dealt cards in this log-only fixture.
        assert!(results.seats.is_empty());
        assert_eq!(vec!["a".to_string()], results.winners);
        assert_eq!(Some(Street::Preflop), results.fold_street);
    }

    #[test]
    fn test_called_streets_accumulate() {
        let snapshot = TableSnapshotBuilder::new()
            .players(&["a", "b"])
            .street(Street::Flop)
            .actions(vec![
                act(ActionKind::PostSmallBlind, Street::Preflop, "a", 5),
                act(ActionKind::PostBigBlind, Street::Preflop, "b", 10),
                act(ActionKind::Call, Street::Preflop, "a", 10),
                act(ActionKind::Check, Street::Preflop, "b", 0),
                marker(Street::Flop),
                act(ActionKind::Bet, Street::Flop, "b", 20),
                act(ActionKind::Raise, Street::Flop, "a", 60),
                act(ActionKind::Call, Street::Flop, "b", 60),
            ])
            .build()
            .unwrap();
        let contrib = hand_contributions(&snapshot);
        assert_eq!(Some(&70), contrib.get("a"));
        assert_eq!(Some(&70), contrib.get("b"));
    }

    #[test]
    fn test_seat_results_and_labels() {
        let snapshot = TableSnapshotBuilder::new()
            .players(&["a", "b", "c"])
            .street(Street::Settlement)
            .board("2♠ 7♦ 9♣ K♥ 3♦")
            .hole_cards(0, "K♠ K♦")
            .hole_cards(1, "A♣ Q♣")
            .folded(2)
            .hole_cards(2, "?? ??")
            .actions(vec![
                act(ActionKind::PostSmallBlind, Street::Preflop, "a", 5),
                act(ActionKind::PostBigBlind, Street::Preflop, "b", 10),
                act(ActionKind::Fold, Street::Preflop, "c", 0),
                act(ActionKind::Call, Street::Preflop, "a", 10),
                act(ActionKind::Check, Street::Preflop, "b", 0),
                marker(Street::Flop),
                marker(Street::Turn),
                marker(Street::River),
                ActionRecord::new(ActionKind::Showdown, Street::Showdown),
                act(ActionKind::Payout, Street::Settlement, "a", 20),
            ])
            .build()
            .unwrap();
        let results = HandResults::compute(&snapshot, Locale::Japanese);

        let a = results.seat(0).unwrap();
        assert_eq!(10, a.delta);
        assert_eq!(Some("Kのスリーカード".to_string()), a.label);

        let b = results.seat(1).unwrap();
        assert_eq!(-10, b.delta);
        assert_eq!(Some("Aハイ".to_string()), b.label);

        let c = results.seat(2).unwrap();
        assert_eq!(0, c.delta);
        assert_eq!(None, c.label);
        assert_eq!(None, results.fold_street);
    }

    #[test]
    fn test_tied_max_is_not_refunded() {
        let snapshot = TableSnapshotBuilder::new()
            .players(&["a", "b", "c"])
            .street(Street::Turn)
            .actions(vec![
                act(ActionKind::Bet, Street::Flop, "a", 50),
                act(ActionKind::Call, Street::Flop, "b", 50),
                act(ActionKind::Fold, Street::Flop, "c", 0),
                marker(Street::Turn),
            ])
            .build()
            .unwrap();
        let contrib = hand_contributions(&snapshot);
        assert_eq!(Some(&50), contrib.get("a"));
        assert_eq!(Some(&50), contrib.get("b"));
        assert_eq!(None, contrib.get("c"));
    }
}
