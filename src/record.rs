//! Normalized match record and the permissive loader that produces it.
//!
//! The input document comes from an external replay decoder and its shape
//! drifts between decoder versions, so the loader never fails on a missing or
//! wrong-typed field below the top level: strings default to `"Unknown"`,
//! numbers to zero, booleans to `false`, sequences to empty. Only input that
//! is not a JSON object at the top level is rejected. Event order in the
//! arrays is taken as chronological; nothing here re-sorts.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

pub(crate) const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub roster: Vec<PlayerTotals>,
    pub rounds: Vec<RoundRecord>,
}

/// Whole-match totals for one player, as pre-aggregated by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTotals {
    pub username: String,
    pub kills: u64,
    pub deaths: u64,
    pub rounds_played: u64,
    /// 0-100, straight from the input document.
    pub headshot_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub map_name: String,
    pub teams: Vec<TeamInfo>,
    pub players: Vec<RoundPlayer>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamInfo {
    /// Wire `id` when the document carries one, else the entry's position in
    /// the `teams` array. Small, but not guaranteed contiguous.
    pub index: i64,
    pub name: String,
}

/// One player's row for a single round, joined from the round's `players`
/// entry (team assignment) and its `stats` entry (death flag).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPlayer {
    pub username: String,
    pub team_index: Option<i64>,
    pub died: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// In-round clock in seconds. The source clock counts down, so later
    /// events usually carry smaller values.
    pub seconds: f64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Kill(Elimination),
    TeamKill(Elimination),
    Death { username: String },
    RoundStart,
    RoundEnd { winner: Option<String> },
    OperatorSwap { username: String, from: String, to: String },
    Unknown { name: String, username: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Elimination {
    pub attacker: String,
    /// `None` when the feedback entry carries no victim at all.
    pub target: Option<String>,
    pub weapon: String,
    pub headshot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Kill,
    TeamKill,
    Death,
    RoundStart,
    RoundEnd,
    OperatorSwap,
}

// Feedback type names emitted by the decoder; everything else loads as
// `EventKind::Unknown` with the name preserved.
// https://github.com/redraskal/r6-dissect
pub static FEEDBACK_KINDS: phf::Map<&'static str, FeedbackKind> = phf::phf_map! {
    "Kill" => FeedbackKind::Kill,
    "TeamKill" => FeedbackKind::TeamKill,
    "Death" => FeedbackKind::Death,
    "RoundStart" => FeedbackKind::RoundStart,
    "RoundEnd" => FeedbackKind::RoundEnd,
    "OperatorSwap" => FeedbackKind::OperatorSwap,
};

/// The input is not a usable document. This is the only fatal error in the
/// pipeline; everything below the top level degrades to defaults instead.
#[derive(Debug)]
pub enum MalformedRecord {
    InvalidJson(serde_json::Error),
    NotAnObject,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "input is not valid JSON: {}", err),
            Self::NotAnObject => write!(f, "top-level value is not an object"),
        }
    }
}

impl std::error::Error for MalformedRecord {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

pub fn parse(buf: &[u8]) -> Result<MatchRecord, MalformedRecord> {
    let doc: Value = serde_json::from_slice(buf).map_err(MalformedRecord::InvalidJson)?;
    from_value(&doc)
}

/// Normalizes an already-parsed document. Fails only when `doc` is not an
/// object.
pub fn from_value(doc: &Value) -> Result<MatchRecord, MalformedRecord> {
    if !doc.is_object() {
        return Err(MalformedRecord::NotAnObject);
    }

    let roster: Vec<_> = array_field(doc, "stats")
        .iter()
        .filter_map(totals_from_value)
        .collect();
    let rounds: Vec<_> = array_field(doc, "rounds")
        .iter()
        .map(round_from_value)
        .collect();

    tracing::debug!(
        roster = roster.len(),
        rounds = rounds.len(),
        "normalized match record"
    );

    Ok(MatchRecord { roster, rounds })
}

/// Parses a `"M:SS"` clock string to seconds. Strings without a colon are
/// accepted as a plain number of seconds.
pub fn parse_clock(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: f64 = minutes.parse().ok()?;
            let seconds: f64 = seconds.parse().ok()?;
            Some(minutes * 60.0 + seconds)
        }
        None => raw.parse().ok(),
    }
}

/// Renders seconds back to the `M:SS` clock form used by the timeline.
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn totals_from_value(value: &Value) -> Option<PlayerTotals> {
    // A totals row without its key is unusable; it cannot become a report row.
    let username = str_field(value, "username").filter(|u| !u.is_empty())?;

    let rounds_played = value
        .get("rounds")
        .or_else(|| value.get("roundsPlayed"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Some(PlayerTotals {
        username,
        kills: uint_field(value, "kills"),
        deaths: uint_field(value, "deaths"),
        rounds_played,
        headshot_percentage: float_field(value, "headshotPercentage"),
    })
}

fn round_from_value(value: &Value) -> RoundRecord {
    let map_name = name_field(value, "map").unwrap_or_else(|| UNKNOWN.to_owned());

    let teams = array_field(value, "teams")
        .iter()
        .enumerate()
        .map(|(position, team)| TeamInfo {
            index: team
                .get("id")
                .and_then(Value::as_i64)
                .unwrap_or(position as i64),
            name: str_field(team, "name").unwrap_or_else(|| UNKNOWN.to_owned()),
        })
        .collect();

    let events = value
        .get("matchFeedback")
        .or_else(|| value.get("events"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .map(event_from_value)
        .collect();

    RoundRecord {
        map_name,
        teams,
        players: round_players(value),
        events,
    }
}

fn round_players(value: &Value) -> Vec<RoundPlayer> {
    let mut players: Vec<RoundPlayer> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for entry in array_field(value, "players") {
        let username = match str_field(entry, "username").filter(|u| !u.is_empty()) {
            Some(u) => u,
            // A defaulted name would alias distinct players inside alive-sets.
            None => continue,
        };
        if by_name.contains_key(&username) {
            continue;
        }
        by_name.insert(username.clone(), players.len());
        players.push(RoundPlayer {
            username,
            team_index: entry.get("teamIndex").and_then(Value::as_i64),
            died: false,
        });
    }

    for entry in array_field(value, "stats") {
        let username = match str_field(entry, "username").filter(|u| !u.is_empty()) {
            Some(u) => u,
            None => continue,
        };
        let died = bool_field(entry, "died");
        match by_name.get(&username) {
            Some(&at) => players[at].died = died,
            None => {
                by_name.insert(username.clone(), players.len());
                players.push(RoundPlayer {
                    username,
                    team_index: entry.get("teamIndex").and_then(Value::as_i64),
                    died,
                });
            }
        }
    }

    players
}

fn event_from_value(value: &Value) -> Event {
    let name = name_field(value, "type").unwrap_or_default();

    let kind = match FEEDBACK_KINDS.get(name.as_str()) {
        Some(FeedbackKind::Kill) => EventKind::Kill(elimination_from_value(value)),
        Some(FeedbackKind::TeamKill) => EventKind::TeamKill(elimination_from_value(value)),
        Some(FeedbackKind::Death) => EventKind::Death {
            username: actor(value),
        },
        Some(FeedbackKind::RoundStart) => EventKind::RoundStart,
        Some(FeedbackKind::RoundEnd) => EventKind::RoundEnd {
            winner: str_field(value, "winnerTeamName").filter(|w| !w.is_empty()),
        },
        Some(FeedbackKind::OperatorSwap) => EventKind::OperatorSwap {
            username: actor(value),
            from: name_field(value, "fromOperator").unwrap_or_else(|| UNKNOWN.to_owned()),
            to: name_field(value, "toOperator")
                .or_else(|| name_field(value, "operator"))
                .unwrap_or_else(|| UNKNOWN.to_owned()),
        },
        None => EventKind::Unknown {
            name,
            username: actor(value),
        },
    };

    Event {
        seconds: event_seconds(value),
        kind,
    }
}

fn elimination_from_value(value: &Value) -> Elimination {
    Elimination {
        attacker: actor(value),
        target: str_field(value, "target").filter(|t| !t.is_empty()),
        weapon: name_field(value, "weaponName")
            .or_else(|| name_field(value, "weapon"))
            .unwrap_or_else(|| UNKNOWN.to_owned()),
        headshot: bool_field(value, "headshot"),
    }
}

fn event_seconds(value: &Value) -> f64 {
    if let Some(seconds) = value.get("timeInSeconds").and_then(Value::as_f64) {
        return seconds;
    }
    match value.get("time") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(clock)) => parse_clock(clock).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn actor(value: &Value) -> String {
    str_field(value, "username").unwrap_or_else(|| UNKNOWN.to_owned())
}

// `key` holding either a plain string or an object with a `name` field; the
// decoder uses both forms depending on version.
fn name_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        nested => str_field(nested, "name"),
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn uint_field(value: &Value, key: &str) -> u64 {
    let value = match value.get(key) {
        Some(v) => v,
        None => return 0,
    };
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|f| f as u64))
        .unwrap_or(0)
}

fn float_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn array_field<'v>(value: &'v Value, key: &str) -> &'v [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
