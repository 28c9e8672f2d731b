//! Half-inning loop.
//!
//! Bases carry `Runner` values so every run can be charged to the pitcher
//! who put that runner on. Counter writes all go through
//! `GameEngine::record`, which also rolls for injuries.

use super::deltas::{batter_delta, pitcher_delta};
use super::lineup::{defensive_upgrade, pinch_hitter_for, pinch_runner_for};
use super::pitching_staff::{change_needed, get_reliever, stamina_limit};
use super::side_table::{opponent, Appearance, GoAhead, Runner, AWAY, HOME};
use super::GameEngine;
use crate::engine::at_bat::{resolve_plate_appearance, AtBatOutcome, Bases, FielderRating, Matchup};
use crate::engine::performance::{historical_factors, PerformanceFactors};
use crate::engine::probability as prob;
use crate::engine::rng::SimRng;
use crate::engine::stats::{fielding_delta, refresh_player, FieldingPlay};
use crate::models::{EventKind, GameEvent, PitchDetails, PitchOutcome, Position, StatsCounters};
use crate::replay::{Count, ReplayRunners};

/// Chance a manager uses an available pinch hitter.
const PINCH_HIT: f64 = 0.35;
/// First inning that starts with a runner on second.
const AUTOMATIC_RUNNER_INNING: u32 = 26;

impl GameEngine<'_> {
    pub(super) fn play_half(&mut self, top: bool) {
        self.is_top = top;
        let bat = if top { AWAY } else { HOME };
        let field = opponent(bat);

        let mut outs: u8 = 0;
        let mut bases: Bases<Runner> = Bases::default();
        let mut last_batter: Option<usize> = None;

        self.defensive_substitution(field);
        self.check_pitching(field, true, 0);

        if self.inning >= AUTOMATIC_RUNNER_INNING {
            self.place_automatic_runner(bat, field, &mut bases);
        }

        while outs < 3 {
            self.consider_pinch_runners(bat, field, &mut bases);

            if self.attempt_steal(bat, field, &mut bases, &mut outs) && outs >= 3 {
                // the batter leads off next half
                break;
            }

            let slot = self.sides[bat].next_slot;
            self.consider_pinch_hitter(bat, field, slot);
            let Some(batter) = self.sides[bat].lineup.get(slot).map(|s| s.player) else {
                break;
            };
            last_batter = Some(batter);

            let walk_off = self.plate_appearance(bat, field, batter, slot, &mut bases, &mut outs);

            let len = self.sides[bat].lineup.len().max(1);
            self.sides[bat].next_slot = (slot + 1) % len;

            if walk_off {
                break;
            }
            if outs < 3 {
                let on_base = bases.count() as u32;
                self.check_pitching(field, false, on_base);
            }
        }

        if let Some(batter) = last_batter {
            let left = bases.count() as u32;
            if left > 0 {
                self.record(bat, batter, StatsCounters { lob: left, ..Default::default() });
            }
        }
    }

    fn prefix(&self) -> String {
        format!("{} {}:", if self.is_top { "Top" } else { "Bot" }, self.inning)
    }

    fn event(&mut self, kind: EventKind, text: String) {
        self.log.push(GameEvent::new(kind, self.inning, self.is_top, text));
    }

    /// Fielding team's lead.
    fn lead(&self, field: usize) -> i32 {
        self.score[field] as i32 - self.score[opponent(field)] as i32
    }

    // ========================================
    // Plate appearance
    // ========================================

    /// Returns true on a walk-off.
    fn plate_appearance(
        &mut self,
        bat: usize,
        field: usize,
        batter: usize,
        slot: usize,
        bases: &mut Bases<Runner>,
        outs: &mut u8,
    ) -> bool {
        let position = self.sides[bat].lineup[slot].position;
        self.sides[bat].note_batted(batter, position);

        let pitcher = self.sides[field].pitcher();
        let batter_factors = self.factors(bat, batter);
        let pitcher_factors = self.factors(field, pitcher);
        let pitches_before = self.sides[field].current().map(|a| a.pitches).unwrap_or(0);
        let fielders = self.fielders(field);
        let park = self.teams[HOME].park_factors;
        let lead_before = self.lead(bat);
        let runners_before = self.replay_runners(bat, bases);

        let pa = {
            let m = Matchup {
                batter: &self.teams[bat].roster[batter],
                pitcher: &self.teams[field].roster[pitcher],
                batter_factors,
                pitcher_factors,
                pitches_before,
                park: &park,
                fielders,
            };
            resolve_plate_appearance(&m, bases.occupancy(), *outs, &mut self.rng)
        };
        let outcome = pa.outcome;

        // Pitch by pitch: counts, replay, wild pitches.
        let mut wild_pitch_runs = Vec::new();
        let mut runners_now = runners_before;
        for (n, p) in pa.pitches.iter().enumerate() {
            if let Some(app) = self.sides[field].current_mut() {
                app.pitches += 1;
            }
            if let Some(rec) = self.recorder.as_mut() {
                let batter_id = &self.teams[bat].roster[batter].id;
                let pitcher_id = &self.teams[field].roster[pitcher].id;
                rec.record_pitch(
                    self.inning,
                    self.is_top,
                    batter_id,
                    pitcher_id,
                    n as u32 + 1,
                    Count { balls: p.balls_before, strikes: p.strikes_before },
                    Count { balls: p.balls_after, strikes: p.strikes_after },
                    p.outcome,
                    &p.choice.pitch_type,
                    p.choice.speed_mph,
                    runners_now.clone(),
                );
            }
            if p.outcome == PitchOutcome::WildPitch {
                if let Some(r) = bases.wild_pitch() {
                    wild_pitch_runs.push(r);
                }
                runners_now = self.replay_runners(bat, bases);
            }
        }

        let bases_loaded = bases.is_loaded();

        let details: Vec<PitchDetails> = pa
            .pitches
            .iter()
            .enumerate()
            .map(|(n, p)| PitchDetails {
                number: n as u32 + 1,
                result: p.outcome,
                description: p.choice.description(),
                count: p.count_after(),
            })
            .collect();

        // Runners move.
        let is_error = matches!(outcome, AtBatOutcome::ReachedOnError { .. });
        let new_runner = Runner { player: batter, pitcher, unearned: is_error };
        let advance = {
            let team = &*self.teams[bat];
            bases.advance(&outcome, new_runner, |r: Runner| team.roster[r.player].attributes.speed as f64, &mut self.rng)
        };
        *bases = advance.bases;

        let rbi = match outcome {
            AtBatOutcome::ReachedOnError { .. } | AtBatOutcome::DoublePlay { .. } => 0,
            _ => advance.scored.len() as u32,
        };

        self.record(bat, batter, batter_delta(&outcome, &pa.pitches, rbi, bases_loaded));
        self.record(field, pitcher, pitcher_delta(&outcome, &pa.pitches));

        let made = outcome.outs();
        *outs += made;
        if let Some(app) = self.sides[field].current_mut() {
            app.outs += made as u32;
        }
        if outcome.is_hit() {
            self.sides[bat].hits += 1;
        }
        self.credit_fielders(field, &outcome);

        let name = self.player_name(bat, batter);
        let text = format!("{} {}", self.prefix(), outcome.description(&name));
        self.log.push(GameEvent::new(outcome.event_kind(), self.inning, self.is_top, text).with_pitches(details));

        if let Some(rec) = self.recorder.as_mut() {
            rec.record_hit_location(&outcome);
            let batter_id = &self.teams[bat].roster[batter].id;
            let pitcher_id = &self.teams[field].roster[pitcher].id;
            rec.record_plate_appearance(self.inning, self.is_top, batter_id, pitcher_id, &outcome, *outs);
        }

        for r in wild_pitch_runs {
            let text = format!("{} Wild pitch! {} scores.", self.prefix(), self.player_name(bat, r.player));
            self.event(EventKind::Run, text);
            self.score_run(bat, field, r, false);
        }
        for r in advance.scored {
            let text = format!("{} {} scores.", self.prefix(), self.player_name(bat, r.player));
            self.event(EventKind::Run, text);
            self.score_run(bat, field, r, is_error);
        }

        self.track_lead(bat, field, lead_before);
        self.refresh(bat, batter);
        self.refresh(field, pitcher);

        let walk_off = !self.is_top && self.inning >= 9 && self.score[HOME] > self.score[AWAY];
        if walk_off {
            self.record(bat, batter, StatsCounters { wo: 1, ..Default::default() });
            let text = format!("{} Walk-off! {} wins it.", self.prefix(), self.teams[bat].display_name());
            self.event(EventKind::Info, text);
        }
        walk_off
    }

    fn factors(&mut self, side: usize, player: usize) -> PerformanceFactors {
        let k = self.k;
        let team = &*self.teams[side];
        *self.sides[side]
            .factors
            .entry(player)
            .or_insert_with(|| team.roster.get(player).map(|p| historical_factors(p, k)).unwrap_or_default())
    }

    fn fielders(&self, field: usize) -> [FielderRating; 10] {
        let mut out = [FielderRating::default(); 10];
        let team = &self.teams[field];
        for pos in Position::LINEUP_ORDER.iter().chain(std::iter::once(&Position::P)) {
            if let Some(p) = self.sides[field].at_position(*pos).and_then(|i| team.roster.get(i)) {
                out[pos.index()] = FielderRating::of(p);
            }
        }
        out
    }

    fn replay_runners(&self, bat: usize, bases: &Bases<Runner>) -> ReplayRunners {
        if self.recorder.is_none() {
            return ReplayRunners::default();
        }
        let id = |r: Option<Runner>| r.map(|r| self.player_id(bat, r.player));
        ReplayRunners { first: id(bases.first), second: id(bases.second), third: id(bases.third) }
    }

    fn refresh(&mut self, side: usize, player: usize) {
        let k = self.k;
        if let Some(p) = self.teams[side].roster.get_mut(player) {
            refresh_player(p, k);
        }
    }

    // ========================================
    // Runs
    // ========================================

    /// Scores `runner` and charges the run to the pitcher who put him on.
    fn score_run(&mut self, bat: usize, field: usize, runner: Runner, on_error: bool) {
        self.score[bat] += 1;
        if let Some(line) = self.line.innings.last_mut() {
            if bat == HOME {
                line.home += 1;
            } else {
                line.away += 1;
            }
        }

        self.record(bat, runner.player, StatsCounters { r: 1, ..Default::default() });

        let earned = !(runner.unearned || on_error);
        if let Some(app) = self.sides[field].appearance_of(runner.pitcher) {
            app.runs_allowed += 1;
            if earned {
                app.earned_runs += 1;
            }
        }
        self.record(field, runner.pitcher, StatsCounters { p_r: 1, er: earned as u32, ..Default::default() });

        let current = self.sides[field].pitcher();
        if runner.pitcher != current {
            self.record(field, current, StatsCounters { irs: 1, ..Default::default() });
        }

        if let Some(rec) = self.recorder.as_mut() {
            let runner_id = &self.teams[bat].roster[runner.player].id;
            rec.record_score(self.inning, self.is_top, runner_id, self.score[AWAY], self.score[HOME]);
        }
    }

    /// Go-ahead snapshot for decisions, and lost leads for blown saves.
    fn track_lead(&mut self, bat: usize, field: usize, lead_before: i32) {
        let lead_now = self.lead(bat);
        if lead_before <= 0 && lead_now > 0 {
            self.sides[bat].go_ahead = Some(GoAhead {
                own: self.sides[bat].current_appearance_index(),
                opposing: self.sides[field].current_appearance_index(),
            });
        }
        let field_lead = self.lead(field);
        if let Some(app) = self.sides[field].current_mut() {
            if app.entry_lead > 0 && field_lead <= 0 {
                app.lead_lost = true;
            }
        }
    }

    // ========================================
    // Fielding
    // ========================================

    fn credit_fielders(&mut self, field: usize, outcome: &AtBatOutcome) {
        use FieldingPlay::*;
        use Position::*;

        let plays: Vec<(Position, FieldingPlay, bool)> = match *outcome {
            AtBatOutcome::Strikeout => vec![(C, PutOut, false)],
            AtBatOutcome::GroundOut { fielder, .. } => vec![(fielder, Assist, false), (FirstBase, PutOut, false)],
            AtBatOutcome::FlyOut { fielder, .. } | AtBatOutcome::SacrificeFly { fielder, .. } => {
                vec![(fielder, PutOut, false)]
            }
            AtBatOutcome::DoublePlay { fielder, .. } => vec![(fielder, Assist, true), (FirstBase, PutOut, true)],
            AtBatOutcome::FieldersChoice { fielder, .. } => {
                let cover = if fielder == SecondBase { SS } else { SecondBase };
                vec![(fielder, Assist, false), (cover, PutOut, false)]
            }
            AtBatOutcome::SacrificeBunt => vec![(C, Assist, false), (FirstBase, PutOut, false)],
            AtBatOutcome::ReachedOnError { fielder, .. } => {
                self.sides[field].errors += 1;
                vec![(fielder, Error, false)]
            }
            _ => Vec::new(),
        };

        for (pos, play, turned_two) in plays {
            self.credit_fielder(field, pos, play, turned_two);
        }
    }

    fn credit_fielder(&mut self, field: usize, pos: Position, play: FieldingPlay, turned_two: bool) {
        let Some(i) = self.sides[field].at_position(pos) else {
            return;
        };
        let Some(p) = self.teams[field].roster.get(i) else {
            return;
        };
        let mut delta = fielding_delta(p, play, &mut self.rng);
        if turned_two {
            delta.dp = 1;
        }
        self.record(field, i, delta);
    }

    // ========================================
    // Baserunning
    // ========================================

    /// Runner on first only. Returns true when a caught stealing made an out.
    fn attempt_steal(&mut self, bat: usize, field: usize, bases: &mut Bases<Runner>, outs: &mut u8) -> bool {
        let Some(runner) = bases.first else {
            return false;
        };
        if bases.second.is_some() || bases.third.is_some() {
            return false;
        }

        let speed = self.teams[bat].roster[runner.player].attributes.speed as f64;
        if !self.rng.chance(prob::steal_attempt(speed)) {
            return false;
        }
        let arm = self.sides[field]
            .at_position(Position::C)
            .and_then(|i| self.teams[field].roster.get(i))
            .map(|c| c.attributes.arm as f64)
            .unwrap_or(50.0);
        let name = self.player_name(bat, runner.player);

        if self.rng.chance(prob::steal_success(speed, arm)) {
            bases.first = None;
            bases.second = Some(runner);
            self.record(bat, runner.player, StatsCounters { sb: 1, ..Default::default() });
            let text = format!("{} {} steals 2nd base!", self.prefix(), name);
            self.event(EventKind::Steal, text);
            return false;
        }

        bases.first = None;
        *outs += 1;
        self.record(bat, runner.player, StatsCounters { cs: 1, ..Default::default() });
        let pitcher = self.sides[field].pitcher();
        self.record(field, pitcher, StatsCounters { outs_pitched: 1, ..Default::default() });
        if let Some(app) = self.sides[field].current_mut() {
            app.outs += 1;
        }
        self.credit_fielder(field, Position::C, FieldingPlay::Assist, false);
        self.credit_fielder(field, Position::SS, FieldingPlay::PutOut, false);

        let text = format!("{} {} caught stealing 2nd.", self.prefix(), name);
        self.event(EventKind::Out, text);
        true
    }

    pub(super) fn place_automatic_runner(&mut self, bat: usize, field: usize, bases: &mut Bases<Runner>) {
        let side = &self.sides[bat];
        let len = side.lineup.len();
        if len == 0 {
            return;
        }
        let player = side.lineup[(side.next_slot + len - 1) % len].player;
        bases.second = Some(Runner { player, pitcher: self.sides[field].pitcher(), unearned: true });

        log::warn!(
            "inning {} still tied ({}-{}); runner placed on second",
            self.inning,
            self.score[AWAY],
            self.score[HOME]
        );
        let text = format!("{} {} starts the inning on second base.", self.prefix(), self.player_name(bat, player));
        self.event(EventKind::Info, text);
    }

    // ========================================
    // Substitutions
    // ========================================

    pub(super) fn consider_pinch_runners(&mut self, bat: usize, field: usize, bases: &mut Bases<Runner>) {
        if self.inning < 8 || self.lead(field).abs() > 1 || bases.is_empty() {
            return;
        }
        for base in [&mut bases.first, &mut bases.second, &mut bases.third] {
            let Some(runner) = *base else {
                continue;
            };
            let Some(new) = pinch_runner_for(&self.teams[bat], &self.sides[bat].used, runner.player) else {
                continue;
            };
            if let Some(slot) = self.sides[bat].slot_of(runner.player) {
                let position = self.sides[bat].lineup[slot].position;
                self.sides[bat].lineup[slot].player = new;
                self.sides[bat].note_batted(new, position);
            }
            *base = Some(Runner { player: new, ..runner });
            self.substitute(bat, new, runner.player, "pinch_runner", "Pinch Runner");
        }
    }

    pub(super) fn consider_pinch_hitter(&mut self, bat: usize, field: usize, slot: usize) {
        if self.inning < 7 || self.lead(field).abs() > 3 {
            return;
        }
        let Some(current) = self.sides[bat].lineup.get(slot).map(|s| s.player) else {
            return;
        };
        if !self.rng.chance(PINCH_HIT) {
            return;
        }
        let Some(new) = pinch_hitter_for(&self.teams[bat], &self.sides[bat].used, current) else {
            return;
        };
        self.sides[bat].lineup[slot].player = new;
        self.substitute(bat, new, current, "pinch_hitter", "Pinch Hitter");
    }

    /// Inning 8 on, fielding team ahead: swap the weakest glove for a
    /// better one off the bench.
    pub(super) fn defensive_substitution(&mut self, field: usize) {
        if self.inning < 8 || self.lead(field) <= 0 {
            return;
        }
        let Some((slot, new)) = defensive_upgrade(&self.teams[field], &self.sides[field].used, &self.sides[field].lineup)
        else {
            return;
        };
        let old = self.sides[field].lineup[slot].player;
        let position = self.sides[field].lineup[slot].position;
        self.sides[field].lineup[slot].player = new;
        self.sides[field].note_batted(new, position);
        self.substitute(field, new, old, "defense", "Defensive Substitution");
    }

    fn substitute(&mut self, side: usize, player_in: usize, player_out: usize, role: &str, label: &str) {
        self.enter_game(side, player_in);
        let text = format!(
            "{} {}: {} replaces {}",
            self.prefix(),
            label,
            self.player_name(side, player_in),
            self.player_name(side, player_out)
        );
        log::debug!("[{}] {}", self.teams[side].abbreviation, text);
        self.event(EventKind::Info, text);

        if let Some(rec) = self.recorder.as_mut() {
            let team = &*self.teams[side];
            rec.record_substitution(
                self.inning,
                self.is_top,
                &team.id,
                &team.roster[player_in].id,
                Some(&team.roster[player_out].id),
                role,
            );
        }
    }

    // ========================================
    // Pitching changes
    // ========================================

    /// Brings in a reliever when a trigger fires. With nobody available the
    /// current pitcher stays in.
    fn check_pitching(&mut self, field: usize, pre_half: bool, inherited: u32) {
        let lead = self.lead(field);
        let Some(app) = self.sides[field].current() else {
            return;
        };
        let current = app.player;
        let Some(pitcher) = self.teams[field].roster.get(current) else {
            return;
        };
        let Some(role) = change_needed(app, pitcher, self.inning, lead, pre_half) else {
            return;
        };
        let Some(new) = get_reliever(&self.teams[field], &self.sides[field].used, role, self.inning, lead, self.k) else {
            return;
        };

        if let Some(app) = self.sides[field].current_mut() {
            app.exit_lead = Some(lead);
        }
        let limit = stamina_limit(&self.teams[field].roster[new], &mut self.rng);
        self.sides[field].appearances.push(Appearance::new(new, false, limit, self.inning, lead, inherited));
        self.credit(field, new, &StatsCounters { gp: 1, ir: inherited, ..Default::default() });
        self.substitute(field, new, current, "pitcher", "Pitching Change");
    }
}
