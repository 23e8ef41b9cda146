//! Clutch detection: crediting a round to the winning team's lone survivor.

use std::collections::HashMap;

use crate::record::{EventKind, MatchRecord, RoundRecord};
use crate::roundstate::{self, RoundState};

struct Situation {
    candidate: String,
    enemies_at_start: usize,
    kills_after: u64,
}

/// Clutch rounds per player. A round is a clutch for the winning team's
/// candidate when all of these hold:
/// - the winning team's alive count drops (from above one) to exactly one,
///   with at least 2 opponents still alive at that moment,
/// - the candidate is still the team's sole survivor once the round's events
///   run out,
/// - the candidate lands at least one further Kill after the drop, or the
///   opponent count at the drop was at least 3.
///
/// Only the first drop to one is considered, and rounds without a resolvable
/// winner are excluded entirely. The kills-after-or-3-opponents gate keeps a
/// quiet 1vX round (opponents lost without the candidate doing anything) from
/// counting unless the odds were long enough.
pub fn clutches(record: &MatchRecord) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = record
        .roster
        .iter()
        .map(|totals| (totals.username.clone(), 0))
        .collect();

    for (number, round) in record.rounds.iter().enumerate() {
        if let Some(candidate) = clutch_in_round(round) {
            tracing::debug!(round = number, candidate = %candidate, "clutch detected");
            *counts.entry(candidate).or_default() += 1;
        }
    }

    counts
}

fn clutch_in_round(round: &RoundRecord) -> Option<String> {
    let winner = match roundstate::winner_index(round) {
        Some(winner) => winner,
        None => {
            tracing::debug!("no resolvable winner, skipping round for clutch detection");
            return None;
        }
    };

    let mut state = RoundState::new(round);
    let mut situation: Option<Situation> = None;
    let mut transition_seen = false;
    let mut prev_alive = state.alive_count(winner);

    for event in &round.events {
        // Kills the candidate lands after the drop. The event that produced
        // the drop can never be counted here, since the candidate is only set
        // on an earlier iteration.
        if let Some(situation) = situation.as_mut() {
            if let EventKind::Kill(elim) = &event.kind {
                if elim.attacker == situation.candidate {
                    situation.kills_after += 1;
                }
            }
        }

        state.apply(event);

        let now_alive = state.alive_count(winner);
        if !transition_seen && prev_alive > 1 && now_alive == 1 {
            transition_seen = true;
            let enemies = state.enemies_alive(winner);
            if enemies >= 2 {
                if let Some(candidate) = state.survivor(winner) {
                    situation = Some(Situation {
                        candidate: candidate.to_owned(),
                        enemies_at_start: enemies,
                        kills_after: 0,
                    });
                }
            }
        }
        prev_alive = now_alive;
    }

    let situation = situation?;
    if state.survivor(winner)? != situation.candidate {
        return None;
    }
    if situation.kills_after >= 1 || situation.enemies_at_start >= 3 {
        Some(situation.candidate)
    } else {
        None
    }
}
