//! Derives per-player performance metrics and per-round views from the JSON
//! match export of an external replay decoder.
//!
//! [`record::parse`] normalizes the export into a [`record::MatchRecord`];
//! [`report::generate`] turns that into one scoreboard row per roster player,
//! and [`summary`] exposes a per-round summary and event timeline. Every
//! computation is a pure function over the record; the only fatal error is an
//! input that is not a JSON object.

pub mod aggregate;
pub mod clutch;
pub mod record;
pub mod report;
pub mod roundstate;
pub mod summary;
