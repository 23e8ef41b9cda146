//! Merges every per-player metric into one report, ordered like the roster.

use crate::aggregate;
use crate::clutch;
use crate::record::MatchRecord;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerReport {
    pub username: String,
    pub kills: u64,
    pub deaths: u64,
    pub kills_per_round: f64,
    pub multikills: u64,
    pub opening_kills: u64,
    pub opening_deaths: u64,
    pub clutches: u64,
    /// 0-100.
    pub kost: f64,
    /// 0-1 fraction, deliberately left unscaled.
    pub survival_rate: f64,
    /// 0-100.
    pub headshot_rate: f64,
    pub teamkills: u64,
}

/// One row per roster entry, in roster order. Usernames appearing only in
/// event data never become rows. KOST and headshot rate are scaled to
/// percentages here and nowhere earlier.
#[tracing::instrument(skip(record))]
pub fn generate(record: &MatchRecord) -> Vec<PlayerReport> {
    let kills_per_round = aggregate::kills_per_round(record);
    let multikills = aggregate::multikills(record);
    let opening = aggregate::opening_picks(record);
    let kost = aggregate::kost(record);
    let survival = aggregate::survival_rate(record);
    let headshot = aggregate::headshot_rate(record);
    let teamkills = aggregate::teamkills(record);
    let clutches = clutch::clutches(record);

    record
        .roster
        .iter()
        .map(|totals| {
            let username = totals.username.as_str();
            let picks = opening.get(username).cloned().unwrap_or_default();

            PlayerReport {
                username: totals.username.clone(),
                kills: totals.kills,
                deaths: totals.deaths,
                kills_per_round: kills_per_round.get(username).copied().unwrap_or(0.0),
                multikills: multikills.get(username).copied().unwrap_or(0),
                opening_kills: picks.kills,
                opening_deaths: picks.deaths,
                clutches: clutches.get(username).copied().unwrap_or(0),
                kost: kost.get(username).copied().unwrap_or(0.0) * 100.0,
                survival_rate: survival.get(username).copied().unwrap_or(0.0),
                headshot_rate: headshot.get(username).copied().unwrap_or(0.0) * 100.0,
                teamkills: teamkills.get(username).copied().unwrap_or(0),
            }
        })
        .collect()
}
