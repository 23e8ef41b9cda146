//! Aggregate per-player metric calculators.
//!
//! Every function is one pure pass over the record producing a map keyed by
//! username. Maps are seeded from the roster; usernames appearing only in
//! event data gain zero-initialized entries as they are touched (the report
//! later keeps roster names only). Events are consumed in document order,
//! which the loader treats as chronological.

use std::collections::{HashMap, HashSet};

use crate::record::{EventKind, MatchRecord};

/// `kills / rounds_played` from the match totals; 0.0 for a player with no
/// recorded rounds.
pub fn kills_per_round(record: &MatchRecord) -> HashMap<String, f64> {
    record
        .roster
        .iter()
        .map(|totals| {
            let value = if totals.rounds_played == 0 {
                0.0
            } else {
                totals.kills as f64 / totals.rounds_played as f64
            };
            (totals.username.clone(), value)
        })
        .collect()
}

/// Rounds in which a player landed more than one Kill. Each such round adds
/// exactly 1, however many kills past the second it held; TeamKill events do
/// not count toward it.
pub fn multikills(record: &MatchRecord) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = roster_map(record);

    for round in &record.rounds {
        let mut kills: HashMap<&str, u64> = HashMap::new();
        for event in &round.events {
            if let EventKind::Kill(elim) = &event.kind {
                *kills.entry(elim.attacker.as_str()).or_default() += 1;
            }
        }
        for (username, in_round) in kills {
            if in_round > 1 {
                *counts.entry(username.to_owned()).or_default() += 1;
            }
        }
    }

    counts
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OpeningPicks {
    pub kills: u64,
    pub deaths: u64,
}

/// First Kill event of each round: +1 opening kill for the attacker and +1
/// opening death for the victim when one is named. "First" means first in
/// array order, the document's chronological contract, even when timestamps
/// disagree with it; rounds without a Kill event contribute nothing.
pub fn opening_picks(record: &MatchRecord) -> HashMap<String, OpeningPicks> {
    let mut picks: HashMap<String, OpeningPicks> = roster_map(record);

    for round in &record.rounds {
        let first = round.events.iter().find_map(|event| match &event.kind {
            EventKind::Kill(elim) => Some(elim),
            _ => None,
        });
        let elim = match first {
            Some(elim) => elim,
            None => continue,
        };

        picks.entry(elim.attacker.clone()).or_default().kills += 1;
        if let Some(target) = &elim.target {
            picks.entry(target.clone()).or_default().deaths += 1;
        }
    }

    picks
}

/// Kill-or-Survived share of rounds as a 0-1 fraction. Credit is judged per
/// round against that round's own player list: an entry earns the round when
/// it has at least one Kill event attributed to it or it did not die. The
/// Objective and Traded legs of canonical KOST are not evaluated; the input
/// document does not carry what they need.
pub fn kost(record: &MatchRecord) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = roster_map(record);
    let total_rounds = record.rounds.len().max(1) as f64;

    for round in &record.rounds {
        let killers: HashSet<&str> = round
            .events
            .iter()
            .filter_map(|event| match &event.kind {
                EventKind::Kill(elim) => Some(elim.attacker.as_str()),
                _ => None,
            })
            .collect();

        for player in &round.players {
            if killers.contains(player.username.as_str()) || !player.died {
                *scores.entry(player.username.clone()).or_default() += 1.0 / total_rounds;
            }
        }
    }

    scores
}

/// `1 - deaths / rounds_played`; 0.0 for a player with no recorded rounds.
pub fn survival_rate(record: &MatchRecord) -> HashMap<String, f64> {
    record
        .roster
        .iter()
        .map(|totals| {
            let value = if totals.rounds_played == 0 {
                0.0
            } else {
                1.0 - totals.deaths as f64 / totals.rounds_played as f64
            };
            (totals.username.clone(), value)
        })
        .collect()
}

/// The roster's pre-aggregated headshot percentage as a 0-1 fraction.
pub fn headshot_rate(record: &MatchRecord) -> HashMap<String, f64> {
    record
        .roster
        .iter()
        .map(|totals| (totals.username.clone(), totals.headshot_percentage / 100.0))
        .collect()
}

/// TeamKill events per attacker across the whole match.
pub fn teamkills(record: &MatchRecord) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = roster_map(record);

    for round in &record.rounds {
        for event in &round.events {
            if let EventKind::TeamKill(elim) = &event.kind {
                *counts.entry(elim.attacker.clone()).or_default() += 1;
            }
        }
    }

    counts
}

fn roster_map<V: Default>(record: &MatchRecord) -> HashMap<String, V> {
    record
        .roster
        .iter()
        .map(|totals| (totals.username.clone(), V::default()))
        .collect()
}
