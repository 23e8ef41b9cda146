//! Replays a round's event stream to track which players remain alive on
//! each team at every point of the timeline. Clutch detection and the round
//! summary are built on top of this.

use std::collections::{HashMap, HashSet};

use crate::record::{Event, EventKind, RoundRecord};

#[derive(Debug)]
pub struct RoundState {
    alive: HashMap<i64, HashSet<String>>,
    team_of: HashMap<String, i64>,
}

impl RoundState {
    /// Seeds per-team alive-sets from the round's player list. Entries
    /// without a team assignment cannot be placed and are left out.
    pub fn new(round: &RoundRecord) -> Self {
        let mut alive: HashMap<i64, HashSet<String>> = HashMap::new();
        let mut team_of = HashMap::new();

        for player in &round.players {
            let team = match player.team_index {
                Some(team) => team,
                None => continue,
            };
            alive
                .entry(team)
                .or_default()
                .insert(player.username.clone());
            team_of.insert(player.username.clone(), team);
        }

        Self { alive, team_of }
    }

    /// Applies one event. Only Kill and TeamKill mutate anything: the victim
    /// is removed from its team's alive-set, resolved through the round
    /// roster. A missing or unresolvable victim leaves every set untouched;
    /// the event still exists for timeline purposes.
    pub fn apply(&mut self, event: &Event) {
        let victim = match &event.kind {
            EventKind::Kill(elim) | EventKind::TeamKill(elim) => match &elim.target {
                Some(victim) => victim,
                None => return,
            },
            _ => return,
        };

        let team = match self.team_of.get(victim) {
            Some(team) => *team,
            None => {
                tracing::debug!(victim = %victim, "victim on no round team, alive-sets unchanged");
                return;
            }
        };

        if let Some(set) = self.alive.get_mut(&team) {
            set.remove(victim);
        }
    }

    pub fn alive_count(&self, team: i64) -> usize {
        self.alive.get(&team).map(HashSet::len).unwrap_or(0)
    }

    /// Alive players on every team other than `team`.
    pub fn enemies_alive(&self, team: i64) -> usize {
        self.alive
            .iter()
            .filter(|(other, _)| **other != team)
            .map(|(_, set)| set.len())
            .sum()
    }

    /// The single remaining player on `team`, when exactly one remains.
    pub fn survivor(&self, team: i64) -> Option<&str> {
        let set = self.alive.get(&team)?;
        if set.len() == 1 {
            set.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_alive(&self, username: &str) -> bool {
        match self.team_of.get(username) {
            Some(team) => self
                .alive
                .get(team)
                .map(|set| set.contains(username))
                .unwrap_or(false),
            None => false,
        }
    }

    /// Round-roster team of `username`, if the round placed them on one.
    pub fn team_of(&self, username: &str) -> Option<i64> {
        self.team_of.get(username).copied()
    }
}

/// Resolves the winning team's index from the first RoundEnd event. `None`
/// when the round has no RoundEnd, the first one names no winner, or the
/// name matches none of the round's teams; such rounds are skipped by clutch
/// detection and winner-dependent summary fields, but still count for every
/// other metric.
pub fn winner_index(round: &RoundRecord) -> Option<i64> {
    let winner = round.events.iter().find_map(|event| match &event.kind {
        EventKind::RoundEnd { winner } => Some(winner.as_deref()),
        _ => None,
    })?;
    let winner = winner?;

    match round.teams.iter().find(|team| team.name == winner) {
        Some(team) => Some(team.index),
        None => {
            tracing::debug!(winner = %winner, "winner name matches no round team");
            None
        }
    }
}
