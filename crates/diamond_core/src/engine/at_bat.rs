//! At-bat resolver
//!
//! `resolve_plate_appearance` walks a plate appearance pitch by pitch and,
//! on contact, hands off to `resolve_ball_in_play`. The resolver reads the
//! batter, pitcher and fielders but never mutates them; the game engine
//! applies the returned outcome.

use super::performance::{effective_attribute, fatigue_penalty, PerformanceFactors};
use super::pitch_meta::{choose_pitch, PitchChoice};
use super::probability as prob;
use super::rng::SimRng;
use crate::models::{EventKind, ParkFactors, PitchOutcome, Player, Position};

// ============================================================================
// Bases
// ============================================================================

/// Base state. `T` is whatever identifies a runner; the resolver itself only
/// needs occupancy (`T = ()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bases<T> {
    pub first: Option<T>,
    pub second: Option<T>,
    pub third: Option<T>,
}

pub type BaseOccupancy = Bases<()>;

impl<T> Default for Bases<T> {
    fn default() -> Self {
        Self { first: None, second: None, third: None }
    }
}

/// Result of moving runners for one play.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance<T> {
    pub bases: Bases<T>,
    /// In the order they crossed the plate.
    pub scored: Vec<T>,
    /// Runners put out on the bases (not the batter).
    pub retired: Vec<T>,
}

impl<T: Copy> Bases<T> {
    pub fn occupancy(&self) -> BaseOccupancy {
        Bases { first: self.first.map(|_| ()), second: self.second.map(|_| ()), third: self.third.map(|_| ()) }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }

    pub fn is_loaded(&self) -> bool {
        self.first.is_some() && self.second.is_some() && self.third.is_some()
    }

    pub fn count(&self) -> usize {
        [self.first, self.second, self.third].iter().filter(|r| r.is_some()).count()
    }

    /// Lead runner first.
    pub fn runners(&self) -> impl Iterator<Item = T> {
        [self.third, self.second, self.first].into_iter().flatten()
    }

    /// Everyone moves up one base; returns the runner who scored.
    pub fn wild_pitch(&mut self) -> Option<T> {
        let scored = self.third.take();
        self.third = self.second.take();
        self.second = self.first.take();
        scored
    }

    /// Batter to first, runners move only when forced.
    fn forced(&self, batter: T) -> Advance<T> {
        let mut bases = *self;
        let mut scored = Vec::new();
        if bases.first.is_some() {
            if bases.second.is_some() {
                if let Some(r) = bases.third.take() {
                    scored.push(r);
                }
                bases.third = bases.second;
            }
            bases.second = bases.first;
        }
        bases.first = Some(batter);
        Advance { bases, scored, retired: Vec::new() }
    }

    /// Moves runners for `outcome`. Outs charged to the batter are not
    /// reflected here; only runners put out on the bases are returned.
    pub fn advance(
        &self,
        outcome: &AtBatOutcome,
        batter: T,
        speed_of: impl Fn(T) -> f64,
        rng: &mut dyn SimRng,
    ) -> Advance<T> {
        let mut next = Bases::default();
        let mut scored = Vec::new();
        let mut retired = Vec::new();

        match outcome {
            AtBatOutcome::Walk
            | AtBatOutcome::IntentionalWalk
            | AtBatOutcome::HitByPitch
            | AtBatOutcome::ReachedOnError { .. } => return self.forced(batter),

            AtBatOutcome::Strikeout | AtBatOutcome::GroundOut { .. } | AtBatOutcome::FlyOut { .. } => {
                next = *self;
            }

            AtBatOutcome::Single { .. } => {
                scored.extend(self.third);
                if let Some(r) = self.second {
                    if rng.chance(prob::score_from_second(speed_of(r))) {
                        scored.push(r);
                    } else {
                        next.third = Some(r);
                    }
                }
                next.second = self.first;
                next.first = Some(batter);
            }

            AtBatOutcome::Double { .. } => {
                scored.extend(self.third);
                scored.extend(self.second);
                next.third = self.first;
                next.second = Some(batter);
            }

            AtBatOutcome::Triple { .. } => {
                scored.extend(self.runners());
                next.third = Some(batter);
            }

            AtBatOutcome::HomeRun { .. } => {
                scored.extend(self.runners());
                scored.push(batter);
            }

            AtBatOutcome::SacrificeFly { .. } => {
                next = *self;
                scored.extend(next.third.take());
            }

            AtBatOutcome::SacrificeBunt => {
                let mut moved = *self;
                scored.extend(moved.wild_pitch());
                next = moved;
            }

            AtBatOutcome::FieldersChoice { .. } => {
                next = *self;
                retired.extend(next.first.take());
                next.first = Some(batter);
            }

            AtBatOutcome::DoublePlay { .. } => {
                next = *self;
                retired.extend(next.first.take());
            }
        }

        Advance { bases: next, scored, retired }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Terminal result of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtBatOutcome {
    Strikeout,
    Walk,
    IntentionalWalk,
    HitByPitch,
    SacrificeBunt,
    ReachedOnError { fielder: Position, exit_velocity: f64, launch_angle: f64 },
    Single { exit_velocity: f64, launch_angle: f64 },
    Double { exit_velocity: f64, launch_angle: f64 },
    Triple { exit_velocity: f64, launch_angle: f64 },
    HomeRun { exit_velocity: f64, launch_angle: f64 },
    GroundOut { fielder: Position, exit_velocity: f64, launch_angle: f64 },
    FlyOut { fielder: Position, exit_velocity: f64, launch_angle: f64 },
    SacrificeFly { fielder: Position, exit_velocity: f64, launch_angle: f64 },
    FieldersChoice { fielder: Position, exit_velocity: f64, launch_angle: f64 },
    DoublePlay { fielder: Position, exit_velocity: f64, launch_angle: f64 },
}

impl AtBatOutcome {
    /// Outs recorded on the play, including runners retired.
    pub fn outs(&self) -> u8 {
        match self {
            AtBatOutcome::Strikeout
            | AtBatOutcome::SacrificeBunt
            | AtBatOutcome::GroundOut { .. }
            | AtBatOutcome::FlyOut { .. }
            | AtBatOutcome::SacrificeFly { .. }
            | AtBatOutcome::FieldersChoice { .. } => 1,
            AtBatOutcome::DoublePlay { .. } => 2,
            _ => 0,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            AtBatOutcome::Single { .. }
                | AtBatOutcome::Double { .. }
                | AtBatOutcome::Triple { .. }
                | AtBatOutcome::HomeRun { .. }
        )
    }

    /// Counts as an official at-bat.
    pub fn is_at_bat(&self) -> bool {
        !matches!(
            self,
            AtBatOutcome::Walk
                | AtBatOutcome::IntentionalWalk
                | AtBatOutcome::HitByPitch
                | AtBatOutcome::SacrificeFly { .. }
                | AtBatOutcome::SacrificeBunt
        )
    }

    pub fn total_bases(&self) -> u32 {
        match self {
            AtBatOutcome::Single { .. } => 1,
            AtBatOutcome::Double { .. } => 2,
            AtBatOutcome::Triple { .. } => 3,
            AtBatOutcome::HomeRun { .. } => 4,
            _ => 0,
        }
    }

    /// `(exit_velocity, launch_angle)` for tracked batted balls.
    pub fn batted_ball(&self) -> Option<(f64, f64)> {
        match *self {
            AtBatOutcome::ReachedOnError { exit_velocity, launch_angle, .. }
            | AtBatOutcome::Single { exit_velocity, launch_angle }
            | AtBatOutcome::Double { exit_velocity, launch_angle }
            | AtBatOutcome::Triple { exit_velocity, launch_angle }
            | AtBatOutcome::HomeRun { exit_velocity, launch_angle }
            | AtBatOutcome::GroundOut { exit_velocity, launch_angle, .. }
            | AtBatOutcome::FlyOut { exit_velocity, launch_angle, .. }
            | AtBatOutcome::SacrificeFly { exit_velocity, launch_angle, .. }
            | AtBatOutcome::FieldersChoice { exit_velocity, launch_angle, .. }
            | AtBatOutcome::DoublePlay { exit_velocity, launch_angle, .. } => Some((exit_velocity, launch_angle)),
            _ => None,
        }
    }

    pub fn fielder(&self) -> Option<Position> {
        match *self {
            AtBatOutcome::ReachedOnError { fielder, .. }
            | AtBatOutcome::GroundOut { fielder, .. }
            | AtBatOutcome::FlyOut { fielder, .. }
            | AtBatOutcome::SacrificeFly { fielder, .. }
            | AtBatOutcome::FieldersChoice { fielder, .. }
            | AtBatOutcome::DoublePlay { fielder, .. } => Some(fielder),
            _ => None,
        }
    }

    pub fn is_fly_ball(&self) -> bool {
        matches!(self, AtBatOutcome::FlyOut { .. } | AtBatOutcome::SacrificeFly { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            AtBatOutcome::Strikeout => "K",
            AtBatOutcome::Walk => "BB",
            AtBatOutcome::IntentionalWalk => "IBB",
            AtBatOutcome::HitByPitch => "HBP",
            AtBatOutcome::SacrificeBunt => "SAC",
            AtBatOutcome::ReachedOnError { .. } => "ROE",
            AtBatOutcome::Single { .. } => "1B",
            AtBatOutcome::Double { .. } => "2B",
            AtBatOutcome::Triple { .. } => "3B",
            AtBatOutcome::HomeRun { .. } => "HR",
            AtBatOutcome::GroundOut { .. } => "GO",
            AtBatOutcome::FlyOut { .. } => "FO",
            AtBatOutcome::SacrificeFly { .. } => "SF",
            AtBatOutcome::FieldersChoice { .. } => "FC",
            AtBatOutcome::DoublePlay { .. } => "DP",
        }
    }

    pub fn event_kind(&self) -> EventKind {
        match self {
            _ if self.is_hit() => EventKind::Hit,
            AtBatOutcome::Walk | AtBatOutcome::IntentionalWalk | AtBatOutcome::HitByPitch => EventKind::Walk,
            AtBatOutcome::ReachedOnError { .. } => EventKind::Error,
            _ => EventKind::Out,
        }
    }

    pub fn description(&self, batter: &str) -> String {
        let at = |p: Position| p.abbrev();
        match self {
            AtBatOutcome::Strikeout => format!("{batter} strikes out."),
            AtBatOutcome::Walk => format!("{batter} walks."),
            AtBatOutcome::IntentionalWalk => format!("{batter} is intentionally walked."),
            AtBatOutcome::HitByPitch => format!("{batter} is hit by a pitch."),
            AtBatOutcome::SacrificeBunt => format!("{batter} lays down a sacrifice bunt."),
            AtBatOutcome::ReachedOnError { fielder, .. } => {
                format!("{batter} reaches on an error by the {}.", at(*fielder))
            }
            AtBatOutcome::Single { .. } => format!("{batter} singles."),
            AtBatOutcome::Double { .. } => format!("{batter} doubles!"),
            AtBatOutcome::Triple { .. } => format!("{batter} triples!"),
            AtBatOutcome::HomeRun { .. } => format!("{batter} homers!"),
            AtBatOutcome::GroundOut { fielder, .. } => format!("{batter} grounds out to {}.", at(*fielder)),
            AtBatOutcome::FlyOut { fielder, .. } => format!("{batter} flies out to {}.", at(*fielder)),
            AtBatOutcome::SacrificeFly { fielder, .. } => {
                format!("{batter} hits a sacrifice fly to {}.", at(*fielder))
            }
            AtBatOutcome::FieldersChoice { fielder, .. } => {
                format!("{batter} reaches on a fielder's choice to {}.", at(*fielder))
            }
            AtBatOutcome::DoublePlay { fielder, .. } => {
                format!("{batter} grounds into a double play to {}.", at(*fielder))
            }
        }
    }
}

// ============================================================================
// Matchup
// ============================================================================

/// Fielding ratings of whoever stands at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FielderRating {
    pub defense: u8,
    pub reaction: u8,
    pub arm: u8,
}

impl Default for FielderRating {
    fn default() -> Self {
        Self { defense: 50, reaction: 50, arm: 50 }
    }
}

impl FielderRating {
    pub fn of(player: &Player) -> Self {
        Self { defense: player.attributes.defense, reaction: player.attributes.reaction, arm: player.attributes.arm }
    }
}

/// Everything the resolver reads for one plate appearance.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub batter: &'a Player,
    pub pitcher: &'a Player,
    pub batter_factors: PerformanceFactors,
    pub pitcher_factors: PerformanceFactors,
    /// Pitches thrown by this pitcher before the plate appearance.
    pub pitches_before: u32,
    pub park: &'a ParkFactors,
    /// Indexed by `Position::index()`.
    pub fielders: [FielderRating; 10],
}

/// One pitch with the count on either side of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchRecord {
    pub outcome: PitchOutcome,
    pub balls_before: u8,
    pub strikes_before: u8,
    pub balls_after: u8,
    pub strikes_after: u8,
    pub choice: PitchChoice,
}

impl PitchRecord {
    pub fn count_after(&self) -> String {
        format!("{}-{}", self.balls_after, self.strikes_after)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlateAppearance {
    pub outcome: AtBatOutcome,
    pub pitches: Vec<PitchRecord>,
}

impl PlateAppearance {
    pub fn wild_pitches(&self) -> usize {
        self.pitches.iter().filter(|p| p.outcome == PitchOutcome::WildPitch).count()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// One pitch. `fatigue` is the pitcher's current fatigue penalty.
pub fn simulate_pitch(m: &Matchup, fatigue: f64, rng: &mut dyn SimRng) -> PitchOutcome {
    let control = effective_attribute(m.pitcher.attributes.control, fatigue, rng);
    let eye = effective_attribute(m.batter.attributes.eye, 0.0, rng);

    if rng.chance(prob::HIT_BY_PITCH) {
        return PitchOutcome::HitByPitch;
    }
    if rng.chance(prob::WILD_PITCH) {
        return PitchOutcome::WildPitch;
    }

    if !rng.chance(prob::strike_zone(control)) {
        return if rng.chance(prob::chase(eye)) { PitchOutcome::StrikeSwinging } else { PitchOutcome::Ball };
    }

    if !rng.chance(prob::SWING_IN_ZONE) {
        return PitchOutcome::StrikeLooking;
    }

    let mut stuff = effective_attribute(m.pitcher.attributes.stuff, fatigue * 0.8, rng);
    if m.pitcher_factors.pitching > 1.08 {
        stuff += 4.0;
    }
    let contact = effective_attribute(m.batter.attributes.contact, 0.0, rng);
    if !rng.chance(prob::contact(contact, stuff)) {
        return PitchOutcome::StrikeSwinging;
    }
    if rng.chance(prob::FOUL_ON_CONTACT) {
        PitchOutcome::Foul
    } else {
        PitchOutcome::InPlay
    }
}

const OUTFIELD: [Position; 3] = [Position::LF, Position::CF, Position::RF];
const INFIELD: [Position; 3] = [Position::SS, Position::SecondBase, Position::ThirdBase];

/// Outcome of a ball put in play.
pub fn resolve_ball_in_play(
    m: &Matchup,
    bases: BaseOccupancy,
    outs: u8,
    fatigue: f64,
    rng: &mut dyn SimRng,
) -> AtBatOutcome {
    let a = &m.batter.attributes;
    let power = a.power as f64;
    let speed = a.speed as f64;
    let exit_velocity = (85.0 + power / 4.0 + rng.range(-10.0, 15.0)).clamp(60.0, 120.0);

    let first_only = bases.first.is_some() && bases.second.is_none() && bases.third.is_none();
    if first_only && outs < 2 && a.power < 45 && rng.chance(prob::SACRIFICE_BUNT) {
        return AtBatOutcome::SacrificeBunt;
    }

    let contact = effective_attribute(a.contact, 0.0, rng);
    let stuff = effective_attribute(m.pitcher.attributes.stuff, fatigue * 0.8, rng);
    let p_hit = prob::hit(
        contact,
        stuff,
        fatigue,
        m.batter_factors.contact,
        m.pitcher_factors.pitching,
        m.park,
    );

    if !rng.chance(p_hit) {
        let fly = rng.chance(prob::FLY_BALL_SHARE);
        let fielder = if fly { OUTFIELD[rng.index(3)] } else { INFIELD[rng.index(3)] };
        let launch_angle = if fly { rng.range(25.0, 50.0) } else { rng.range(-10.0, 10.0) };
        let defense = m.fielders[fielder.index()].defense as f64;

        if rng.chance(prob::error(defense)) {
            return AtBatOutcome::ReachedOnError { fielder, exit_velocity, launch_angle };
        }
        if !fly && first_only && outs < 2 && rng.chance(prob::double_play(speed)) {
            return AtBatOutcome::DoublePlay { fielder, exit_velocity, launch_angle };
        }
        if fly && bases.third.is_some() && outs < 2 && rng.chance(prob::sacrifice_fly(a.contact as f64)) {
            return AtBatOutcome::SacrificeFly { fielder, exit_velocity, launch_angle };
        }
        if !fly && bases.first.is_some() && outs < 2 && rng.chance(prob::FIELDERS_CHOICE) {
            return AtBatOutcome::FieldersChoice { fielder, exit_velocity, launch_angle };
        }
        return if fly {
            AtBatOutcome::FlyOut { fielder, exit_velocity, launch_angle }
        } else {
            AtBatOutcome::GroundOut { fielder, exit_velocity, launch_angle }
        };
    }

    let power_eff = effective_attribute(a.power, 0.0, rng);
    if rng.chance(prob::home_run(power_eff, stuff, m.batter_factors.power, m.park)) {
        return AtBatOutcome::HomeRun { exit_velocity: exit_velocity.max(95.0), launch_angle: rng.range(22.0, 38.0) };
    }
    if rng.chance(prob::extra_base(power, speed, m.park)) {
        if rng.chance(prob::triple_share(speed)) {
            return AtBatOutcome::Triple { exit_velocity, launch_angle: rng.range(12.0, 25.0) };
        }
        return AtBatOutcome::Double { exit_velocity, launch_angle: rng.range(10.0, 30.0) };
    }
    AtBatOutcome::Single { exit_velocity, launch_angle: rng.range(-5.0, 20.0) }
}

/// A full plate appearance, intentional walk check included.
///
/// `bases` is the state at the start; wild pitches move it locally so the
/// ball-in-play logic sees the runners where they are.
pub fn resolve_plate_appearance(
    m: &Matchup,
    mut bases: BaseOccupancy,
    outs: u8,
    rng: &mut dyn SimRng,
) -> PlateAppearance {
    if bases.second.is_some()
        && bases.first.is_none()
        && outs < 2
        && m.batter.rating > 85
        && rng.chance(prob::INTENTIONAL_WALK)
    {
        return PlateAppearance { outcome: AtBatOutcome::IntentionalWalk, pitches: Vec::new() };
    }

    let mut balls: u8 = 0;
    let mut strikes: u8 = 0;
    let mut pitches = Vec::with_capacity(8);

    loop {
        let fatigue = fatigue_penalty(m.pitcher, m.pitches_before + pitches.len() as u32);
        let choice = choose_pitch(m.pitcher, rng);
        let outcome = simulate_pitch(m, fatigue, rng);
        let (balls_before, strikes_before) = (balls, strikes);

        let terminal = match outcome {
            PitchOutcome::Ball | PitchOutcome::WildPitch => {
                balls += 1;
                if outcome == PitchOutcome::WildPitch {
                    bases.wild_pitch();
                }
                (balls >= 4).then_some(AtBatOutcome::Walk)
            }
            PitchOutcome::HitByPitch => Some(AtBatOutcome::HitByPitch),
            PitchOutcome::StrikeLooking | PitchOutcome::StrikeSwinging => {
                strikes += 1;
                (strikes >= 3).then_some(AtBatOutcome::Strikeout)
            }
            PitchOutcome::Foul => {
                if strikes < 2 {
                    strikes += 1;
                }
                None
            }
            PitchOutcome::InPlay => Some(resolve_ball_in_play(m, bases, outs, fatigue, rng)),
        };

        pitches.push(PitchRecord {
            outcome,
            balls_before,
            strikes_before,
            balls_after: balls,
            strikes_after: strikes,
            choice,
        });

        if let Some(outcome) = terminal {
            return PlateAppearance { outcome, pitches };
        }
    }
}
