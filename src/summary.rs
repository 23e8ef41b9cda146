//! Per-round presentation views: a one-glance summary and the event
//! timeline. Both are derived from a single round, independent of the
//! aggregate report.

use std::collections::HashMap;

use crate::record::{self, Elimination, EventKind, RoundRecord};
use crate::roundstate::{self, RoundState};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundSummary {
    pub map_name: String,
    pub teams: Vec<TeamScore>,
    /// Winning team's name; `None` when the round has no resolvable winner.
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TeamScore {
    pub index: i64,
    pub name: String,
    pub kills: u64,
}

pub fn round_summary(round: &RoundRecord) -> RoundSummary {
    let state = RoundState::new(round);

    // Kill events only; a team kill is not a scoreboard kill. Attackers the
    // round roster cannot place are left out of every tally.
    let mut tally: HashMap<i64, u64> = HashMap::new();
    for event in &round.events {
        if let EventKind::Kill(elim) = &event.kind {
            if let Some(team) = state.team_of(&elim.attacker) {
                *tally.entry(team).or_default() += 1;
            }
        }
    }

    let winner = roundstate::winner_index(round).and_then(|index| {
        round
            .teams
            .iter()
            .find(|team| team.index == index)
            .map(|team| team.name.clone())
    });

    RoundSummary {
        map_name: round.map_name.clone(),
        teams: round
            .teams
            .iter()
            .map(|team| TeamScore {
                index: team.index,
                name: team.name.clone(),
                kills: tally.get(&team.index).copied().unwrap_or(0),
            })
            .collect(),
        winner,
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineEvent {
    pub seconds: f64,
    /// `M:SS` rendering of `seconds`.
    pub clock: String,
    pub text: String,
}

/// One human-readable line per event. Display order sorts on the timestamp,
/// descending: the source clock counts down within a round, so descending
/// clock order is chronological. The sort is stable and equal clocks keep
/// document order.
pub fn round_timeline(round: &RoundRecord) -> Vec<TimelineEvent> {
    let mut timeline: Vec<TimelineEvent> = round
        .events
        .iter()
        .map(|event| TimelineEvent {
            seconds: event.seconds,
            clock: record::format_clock(event.seconds),
            text: describe(&event.kind),
        })
        .collect();
    timeline.sort_by(|a, b| b.seconds.total_cmp(&a.seconds));
    timeline
}

fn describe(kind: &EventKind) -> String {
    match kind {
        EventKind::Kill(elim) => elimination_text("killed", elim),
        EventKind::TeamKill(elim) => elimination_text("team killed", elim),
        EventKind::Death { username } => format!("{} died", username),
        EventKind::RoundStart => "Round started".to_owned(),
        EventKind::RoundEnd { winner } => match winner {
            Some(winner) => format!("Round won by {}", winner),
            None => "Round ended".to_owned(),
        },
        EventKind::OperatorSwap { username, from, to } => {
            format!("{} swapped from {} to {}", username, from, to)
        }
        EventKind::Unknown { name, username } => format!("{} ({})", name, username),
    }
}

fn elimination_text(verb: &str, elim: &Elimination) -> String {
    let mut text = match &elim.target {
        Some(target) => format!("{} {} {}", elim.attacker, verb, target),
        None => format!("{} {} an unknown player", elim.attacker, verb),
    };
    if elim.weapon != record::UNKNOWN {
        text.push_str(&format!(" with {}", elim.weapon));
    }
    if elim.headshot {
        text.push_str(" (headshot)");
    }
    text
}
