use breacher::record::{
    self, Elimination, Event, EventKind, MatchRecord, PlayerTotals, RoundPlayer, RoundRecord,
};
use breacher::report::{self, PlayerReport};
use breacher::{aggregate, clutch};
use pretty_assertions::assert_eq;

#[test]
fn scrim() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testfiles/scrim.json");
    dbg!(path);
    let input_bytes = std::fs::read(path).unwrap();

    let record = record::parse(&input_bytes).unwrap();
    let result = report::generate(&record);

    let expected = vec![
        PlayerReport {
            username: "praeter".to_owned(),
            kills: 3,
            deaths: 2,
            kills_per_round: 1.0,
            multikills: 1,
            opening_kills: 2,
            opening_deaths: 0,
            clutches: 0,
            kost: 2.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 2.0 / 3.0,
            headshot_rate: 33.33 / 100.0 * 100.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "NokkOps".to_owned(),
            kills: 3,
            deaths: 3,
            kills_per_round: 1.0,
            multikills: 1,
            opening_kills: 0,
            opening_deaths: 0,
            clutches: 0,
            kost: 2.0 / 3.0 * 100.0,
            survival_rate: 0.0,
            headshot_rate: 33.33 / 100.0 * 100.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "flashfire".to_owned(),
            kills: 4,
            deaths: 2,
            kills_per_round: 4.0 / 3.0,
            multikills: 2,
            opening_kills: 0,
            opening_deaths: 1,
            clutches: 0,
            kost: 2.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 2.0 / 3.0,
            headshot_rate: 25.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "M870fan".to_owned(),
            kills: 1,
            deaths: 2,
            kills_per_round: 1.0 / 3.0,
            multikills: 0,
            opening_kills: 0,
            opening_deaths: 0,
            clutches: 0,
            kost: 1.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 2.0 / 3.0,
            headshot_rate: 0.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "VigilKang".to_owned(),
            kills: 2,
            deaths: 1,
            kills_per_round: 2.0 / 3.0,
            multikills: 1,
            opening_kills: 0,
            opening_deaths: 0,
            clutches: 0,
            kost: 2.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 1.0 / 3.0,
            headshot_rate: 50.0,
            teamkills: 1,
        },
        PlayerReport {
            username: "KaliMain".to_owned(),
            kills: 2,
            deaths: 3,
            kills_per_round: 2.0 / 3.0,
            multikills: 0,
            opening_kills: 0,
            opening_deaths: 1,
            clutches: 0,
            kost: 2.0 / 3.0 * 100.0,
            survival_rate: 0.0,
            headshot_rate: 100.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "dokkaebi77".to_owned(),
            kills: 1,
            deaths: 3,
            kills_per_round: 1.0 / 3.0,
            multikills: 0,
            opening_kills: 1,
            opening_deaths: 0,
            clutches: 0,
            kost: 1.0 / 3.0 * 100.0,
            survival_rate: 0.0,
            headshot_rate: 0.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "SledgeMan".to_owned(),
            kills: 0,
            deaths: 2,
            kills_per_round: 0.0,
            multikills: 0,
            opening_kills: 0,
            opening_deaths: 1,
            clutches: 0,
            kost: 1.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 2.0 / 3.0,
            headshot_rate: 0.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "QuietStorm".to_owned(),
            kills: 4,
            deaths: 2,
            kills_per_round: 4.0 / 3.0,
            multikills: 1,
            opening_kills: 0,
            opening_deaths: 0,
            clutches: 1,
            kost: 1.0 / 3.0 * 100.0,
            survival_rate: 1.0 - 2.0 / 3.0,
            headshot_rate: 25.0,
            teamkills: 0,
        },
        PlayerReport {
            username: "peeker".to_owned(),
            kills: 1,
            deaths: 3,
            kills_per_round: 1.0 / 3.0,
            multikills: 0,
            opening_kills: 0,
            opening_deaths: 0,
            clutches: 0,
            kost: 1.0 / 3.0 * 100.0,
            survival_rate: 0.0,
            headshot_rate: 0.0,
            teamkills: 0,
        },
    ];

    assert_eq!(expected, result);
}

#[test]
fn rows_match_the_calculators() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/testfiles/scrim.json");
    let input_bytes = std::fs::read(path).unwrap();
    let record = record::parse(&input_bytes).unwrap();

    let result = report::generate(&record);

    let kills_per_round = aggregate::kills_per_round(&record);
    let multikills = aggregate::multikills(&record);
    let opening = aggregate::opening_picks(&record);
    let kost = aggregate::kost(&record);
    let survival = aggregate::survival_rate(&record);
    let headshot = aggregate::headshot_rate(&record);
    let teamkills = aggregate::teamkills(&record);
    let clutches = clutch::clutches(&record);

    assert_eq!(record.roster.len(), result.len());
    for row in &result {
        let username = row.username.as_str();
        assert_eq!(kills_per_round[username], row.kills_per_round, "{}", username);
        assert_eq!(multikills[username], row.multikills, "{}", username);
        assert_eq!(opening[username].kills, row.opening_kills, "{}", username);
        assert_eq!(opening[username].deaths, row.opening_deaths, "{}", username);
        assert_eq!(kost[username] * 100.0, row.kost, "{}", username);
        assert_eq!(survival[username], row.survival_rate, "{}", username);
        assert_eq!(headshot[username] * 100.0, row.headshot_rate, "{}", username);
        assert_eq!(teamkills[username], row.teamkills, "{}", username);
        assert_eq!(clutches[username], row.clutches, "{}", username);
    }
}

#[test]
fn full_credit_kost_reaches_one_hundred() {
    let survivor = |username: &str| RoundPlayer {
        username: username.to_owned(),
        team_index: Some(0),
        died: false,
    };
    let record = MatchRecord {
        roster: vec![PlayerTotals {
            username: "praeter".to_owned(),
            kills: 0,
            deaths: 0,
            rounds_played: 2,
            headshot_percentage: 0.0,
        }],
        rounds: vec![
            RoundRecord {
                map_name: "CLUB_HOUSE".to_owned(),
                teams: Vec::new(),
                players: vec![survivor("praeter")],
                events: Vec::new(),
            },
            RoundRecord {
                map_name: "CLUB_HOUSE".to_owned(),
                teams: Vec::new(),
                players: vec![survivor("praeter")],
                events: Vec::new(),
            },
        ],
    };

    let result = report::generate(&record);

    assert_eq!(100.0, result[0].kost);
}

#[test]
fn two_round_scenario() {
    let record = MatchRecord {
        roster: vec![
            PlayerTotals {
                username: "praeter".to_owned(),
                kills: 1,
                deaths: 0,
                rounds_played: 2,
                headshot_percentage: 0.0,
            },
            PlayerTotals {
                username: "peeker".to_owned(),
                kills: 0,
                deaths: 1,
                rounds_played: 2,
                headshot_percentage: 0.0,
            },
        ],
        rounds: vec![
            RoundRecord {
                map_name: "CLUB_HOUSE".to_owned(),
                teams: Vec::new(),
                players: Vec::new(),
                events: Vec::new(),
            },
            RoundRecord {
                map_name: "CLUB_HOUSE".to_owned(),
                teams: Vec::new(),
                players: Vec::new(),
                events: vec![Event {
                    seconds: 120.0,
                    kind: EventKind::Kill(Elimination {
                        attacker: "praeter".to_owned(),
                        target: Some("peeker".to_owned()),
                        weapon: "M4".to_owned(),
                        headshot: false,
                    }),
                }],
            },
        ],
    };

    let result = report::generate(&record);

    assert_eq!(1, result[0].opening_kills);
    assert_eq!(0, result[0].opening_deaths);
    assert_eq!(0, result[1].opening_kills);
    assert_eq!(1, result[1].opening_deaths);
    assert_eq!(0, result[0].multikills);
    assert_eq!(0, result[1].multikills);
}

#[test]
fn roster_without_rounds() {
    let record = MatchRecord {
        roster: vec![PlayerTotals {
            username: "praeter".to_owned(),
            kills: 12,
            deaths: 9,
            rounds_played: 0,
            headshot_percentage: 50.0,
        }],
        rounds: Vec::new(),
    };

    let result = report::generate(&record);

    // Totals pass through; every per-round rate guards the division.
    let expected = vec![PlayerReport {
        username: "praeter".to_owned(),
        kills: 12,
        deaths: 9,
        kills_per_round: 0.0,
        multikills: 0,
        opening_kills: 0,
        opening_deaths: 0,
        clutches: 0,
        kost: 0.0,
        survival_rate: 0.0,
        headshot_rate: 50.0,
        teamkills: 0,
    }];
    assert_eq!(expected, result);
}

#[test]
fn event_only_usernames_never_become_rows() {
    let record = MatchRecord {
        roster: vec![PlayerTotals {
            username: "praeter".to_owned(),
            kills: 0,
            deaths: 2,
            rounds_played: 2,
            headshot_percentage: 0.0,
        }],
        rounds: vec![RoundRecord {
            map_name: "CLUB_HOUSE".to_owned(),
            teams: Vec::new(),
            players: Vec::new(),
            events: vec![
                Event {
                    seconds: 150.0,
                    kind: EventKind::Kill(Elimination {
                        attacker: "smurf".to_owned(),
                        target: Some("praeter".to_owned()),
                        weapon: "M4".to_owned(),
                        headshot: false,
                    }),
                },
                Event {
                    seconds: 140.0,
                    kind: EventKind::Kill(Elimination {
                        attacker: "smurf".to_owned(),
                        target: Some("praeter".to_owned()),
                        weapon: "M4".to_owned(),
                        headshot: false,
                    }),
                },
            ],
        }],
    };

    let result = report::generate(&record);

    // smurf earned a multikill and the opening pick but has no totals row, so
    // no report row either.
    assert_eq!(1, result.len());
    assert_eq!("praeter", result[0].username);
    assert_eq!(0, result[0].multikills);
    assert_eq!(1, result[0].opening_deaths);
}
