//! Generated sample rosters.
//!
//! Used by unit tests, the game bench and the calibration tool. Every club
//! gets the same shape (13 position players, six starters, a closer and
//! five relievers) with ratings nudged by a hash of the club id so that
//! clubs differ but stay reproducible.
//!
//! ```text
//! hitters   C 1B 2B 3B SS LF CF RF DH | C SS CF 1B (bench)
//! pitchers  slots 1-6 | 9 (closer) | 10-14
//! ```

use crate::data::club;
use crate::models::{
    Division, League, ParkFactors, PitchRepertoireEntry, Player, Position, Ratings, StatsCounters, Team,
};
use fxhash::FxHasher;
use std::hash::{Hash, Hasher};

const STARTER_REST: i32 = 4;

const LINEUP: [(Position, u8); 13] = [
    (Position::C, 66),
    (Position::FirstBase, 78),
    (Position::SecondBase, 72),
    (Position::ThirdBase, 75),
    (Position::SS, 74),
    (Position::LF, 70),
    (Position::CF, 76),
    (Position::RF, 73),
    (Position::DH, 77),
    (Position::C, 52),
    (Position::SS, 55),
    (Position::CF, 54),
    (Position::FirstBase, 50),
];

/// (rotation slot, rating)
const STAFF: [(u8, u8); 12] = [
    (1, 80),
    (2, 76),
    (3, 73),
    (4, 70),
    (5, 67),
    (6, 62),
    (9, 75),
    (10, 70),
    (11, 66),
    (12, 63),
    (13, 58),
    (14, 55),
];

fn clamp_rating(v: i32) -> u8 {
    v.clamp(20, 99) as u8
}

fn base_player(id: &str, position: Position, rating: u8) -> Player {
    Player {
        id: id.to_string(),
        name: format!("Player {id}"),
        position,
        is_two_way: false,
        number: 0,
        age: 28,
        days_rest: 0,
        rotation_slot: 0,
        rating,
        potential: rating,
        attributes: Ratings::default(),
        repertoire: Vec::new(),
        injury: Default::default(),
        counters: StatsCounters::default(),
        batting: Default::default(),
        pitching: Default::default(),
        defense: Default::default(),
        history: Vec::new(),
    }
}

/// A position player whose batting and fielding attributes sit at `rating`.
pub fn hitter(id: &str, position: Position, rating: u8) -> Player {
    let r = clamp_rating(rating as i32);
    let mut p = base_player(id, position, r);
    p.attributes = Ratings { stuff: 25, control: 25, stamina: 25, velocity: 25, spin: 25, ..Ratings::uniform(r) };
    p
}

/// A pitcher in `slot` whose pitching attributes sit at `rating`.
pub fn pitcher(id: &str, slot: u8, rating: u8) -> Player {
    let r = clamp_rating(rating as i32);
    let mut p = base_player(id, Position::P, r);
    p.rotation_slot = slot;
    p.days_rest = STARTER_REST;
    p.age = 29;
    p.attributes = Ratings { contact: 25, power: 25, eye: 25, ..Ratings::uniform(r) };
    let velo = 88.0 + r as f64 / 10.0;
    p.repertoire = vec![
        PitchRepertoireEntry { pitch_type: "Four-Seam Fastball".into(), speed: velo, usage: 55.0 },
        PitchRepertoireEntry { pitch_type: "Slider".into(), speed: velo - 8.0, usage: 30.0 },
        PitchRepertoireEntry { pitch_type: "Changeup".into(), speed: velo - 10.0, usage: 15.0 },
    ];
    p
}

fn club_offset(id: &str) -> i32 {
    let mut h = FxHasher::default();
    id.hash(&mut h);
    (h.finish() % 11) as i32 - 5
}

/// A full club. Known ids take their name, league and park from the club
/// table; anything else lands in the AL East at a neutral park.
pub fn team(id: &str) -> Team {
    let mut team = club(id).map(Team::from_club).unwrap_or_else(|| Team {
        id: id.to_string(),
        mlb_id: 0,
        city: id.to_uppercase(),
        name: "Testers".into(),
        abbreviation: id.to_uppercase(),
        stadium: format!("{} Park", id.to_uppercase()),
        league: League::AL,
        division: Division::East,
        park_factors: ParkFactors::default(),
        roster: Vec::new(),
        wins: 0,
        losses: 0,
        runs_scored: 0,
        runs_allowed: 0,
    });

    let offset = club_offset(id);
    for (n, (pos, rating)) in LINEUP.iter().enumerate() {
        let mut p = hitter(&format!("{id}_h{n}"), *pos, clamp_rating(*rating as i32 + offset));
        p.number = n as u8 + 1;
        p.age = 24 + (n as u32 * 3) % 12;
        p.attributes.speed = clamp_rating(45 + (n as i32 * 7) % 40);
        team.roster.push(p);
    }
    for (n, (slot, rating)) in STAFF.iter().enumerate() {
        let mut p = pitcher(&format!("{id}_p{n}"), *slot, clamp_rating(*rating as i32 - offset));
        p.number = n as u8 + 40;
        p.age = 25 + (n as u32 * 5) % 13;
        team.roster.push(p);
    }
    team
}
