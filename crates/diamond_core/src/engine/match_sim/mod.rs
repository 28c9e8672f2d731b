//! Game Simulation Engine
//!
//! Plays one game pitch by pitch and returns an immutable `GameResult`.
//!
//! ## Data Flow
//!
//! ```text
//!   simulate_game(home, away, date, is_postseason, options)
//!        │
//!        ▼
//!   validate_roster ──► SimError::InvalidRoster
//!        │
//!        ▼
//!   GameEngine::new ── seed ──► SeededRng (ChaCha8), ReplayRecorder
//!        │
//!        ▼
//!   run(): lineups + starters, then per inning
//!        play_half(top)  ─► half_inning.rs
//!          pre-half: defensive sub, pitching check
//!          per PA:   pinch runner, steal, pinch hitter,
//!                    resolve_plate_appearance, counters, runs, fielding
//!          post-PA:  pitching check, derived stat refresh
//!        │
//!        ▼
//!   finish(): decisions, refresh every roster player, box score
//! ```
//!
//! ## Sub-modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `side_table` | Per-game state of one team, dropped with the engine |
//! | `half_inning` | Half-inning loop and plate-appearance bookkeeping |
//! | `lineup` | Starting nine and bench moves |
//! | `pitching_staff` | Starters, relievers, change triggers |
//! | `decisions` | W/L/SV/HLD/BS/QS/CG/SHO at game end |
//! | `deltas` | Counter deltas for batter and pitcher |
//! | `injuries` | In-game injury rolls |
//!
//! The engine holds both teams mutably for the length of the game and is
//! the only writer of player counters.

mod decisions;
mod deltas;
mod half_inning;
mod injuries;
pub mod lineup;
pub mod pitching_staff;
mod side_table;

#[cfg(test)]
mod contract_tests;

pub use injuries::{draw_injury, roll_injury, INJURY_TYPES};
pub use lineup::{get_best_lineup, starter_score};
pub use pitching_staff::{get_reliever, get_starter, RelieverRole};
pub use side_table::{LineupSlot, AWAY, HOME};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use side_table::{Appearance, SideState};

use super::config::{league_constants, LeagueConstants};
use super::rng::{derive_game_seed, random_bytes, SeededRng};
use super::stats::refresh_player;
use crate::error::{Result, SimError};
use crate::models::{
    BoxScore, BoxScorePlayer, EventKind, GameEvent, GameResult, InjuryNote, InningLine, LineScore,
    Position, StatsCounters, Team,
};
use crate::replay::ReplayRecorder;

/// Fewest healthy hitters a team can take the field with.
pub const MIN_HITTERS: usize = 8;

/// Per-call options for `simulate_game`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Game seed. Derived from the team ids and date when absent.
    pub seed: Option<u64>,
    pub capture_replay: bool,
}

impl GameOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed), capture_replay: false }
    }

    pub fn with_replay(mut self) -> Self {
        self.capture_replay = true;
        self
    }
}

/// Simulates one game between `home` and `away`.
///
/// Both rosters are updated in place: counters, derived stats and any
/// injuries picked up during the game. Standings and rest days are left to
/// the caller.
pub fn simulate_game(
    home: &mut Team,
    away: &mut Team,
    date: NaiveDate,
    is_postseason: bool,
    options: &GameOptions,
) -> Result<GameResult> {
    validate_roster(home)?;
    validate_roster(away)?;
    GameEngine::new(home, away, date, options).postseason(is_postseason).run()
}

/// A team needs a starting pitcher and eight healthy hitters.
pub fn validate_roster(team: &Team) -> Result<()> {
    if get_starter(team).is_none() {
        return Err(SimError::invalid_roster(&team.id, "no healthy pitcher available to start"));
    }
    let hitters = team.roster.iter().filter(|p| p.is_healthy() && p.is_hitter_eligible()).count();
    if hitters < MIN_HITTERS {
        return Err(SimError::invalid_roster(
            &team.id,
            format!("{hitters} healthy position players, need {MIN_HITTERS}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

pub struct GameEngine<'a> {
    /// Indexed by `AWAY` / `HOME`.
    teams: [&'a mut Team; 2],
    sides: [SideState; 2],
    rng: SeededRng,
    k: &'static LeagueConstants,
    seed: u64,
    date: NaiveDate,
    is_postseason: bool,
    log: Vec<GameEvent>,
    line: LineScore,
    recorder: Option<ReplayRecorder>,
    /// Runs, indexed by side.
    score: [u32; 2],
    inning: u32,
    is_top: bool,
}

impl<'a> GameEngine<'a> {
    pub fn new(home: &'a mut Team, away: &'a mut Team, date: NaiveDate, options: &GameOptions) -> Self {
        let seed = options.seed.unwrap_or_else(|| derive_game_seed(&home.id, &away.id, date));
        Self {
            teams: [away, home],
            sides: Default::default(),
            rng: SeededRng::new(seed),
            k: league_constants(),
            seed,
            date,
            is_postseason: false,
            log: Vec::with_capacity(128),
            line: LineScore::default(),
            recorder: options.capture_replay.then(|| ReplayRecorder::new(seed)),
            score: [0, 0],
            inning: 1,
            is_top: true,
        }
    }

    pub fn postseason(mut self, is_postseason: bool) -> Self {
        self.is_postseason = is_postseason;
        self
    }

    pub fn with_constants(mut self, k: &'static LeagueConstants) -> Self {
        self.k = k;
        self
    }

    pub fn run(mut self) -> Result<GameResult> {
        let game_id = format!("game_{}", uuid::Builder::from_random_bytes(random_bytes(&mut self.rng)).into_uuid());

        for side in [AWAY, HOME] {
            self.take_the_field(side)?;
        }

        let starters = format!(
            "Starters: {} (Away) vs {} (Home)",
            self.player_name(AWAY, self.sides[AWAY].pitcher()),
            self.player_name(HOME, self.sides[HOME].pitcher()),
        );
        log::debug!("[{}] {}", game_id, starters);
        self.log.push(GameEvent::new(EventKind::Info, 1, true, starters));

        loop {
            self.line.innings.push(InningLine { inning: self.inning, away: 0, home: 0 });

            self.play_half(true);
            if self.inning >= 9 && self.score[HOME] > self.score[AWAY] {
                break;
            }

            self.play_half(false);
            if self.inning >= 9 && self.score[HOME] != self.score[AWAY] {
                break;
            }

            self.inning += 1;
        }

        Ok(self.finish(game_id))
    }

    // ========================================
    // Setup
    // ========================================

    fn take_the_field(&mut self, side: usize) -> Result<()> {
        let team = &*self.teams[side];
        let lineup = get_best_lineup(team, self.k);
        let starter = get_starter(team)
            .ok_or_else(|| SimError::invalid_roster(&team.id, "no healthy pitcher available to start"))?;
        let limit = pitching_staff::stamina_limit(&team.roster[starter], &mut self.rng);

        self.sides[side].lineup = lineup.clone();
        for slot in &lineup {
            self.enter_game(side, slot.player);
        }
        self.sides[side].appearances.push(Appearance::new(starter, true, limit, 1, 0, 0));
        self.enter_game(side, starter);
        self.credit(side, starter, &StatsCounters { gs: 1, gp: 1, ..Default::default() });

        if let Some(rec) = self.recorder.as_mut() {
            let team = &*self.teams[side];
            rec.record_substitution(1, true, &team.id, &team.roster[starter].id, None, "starter");
        }
        Ok(())
    }

    // ========================================
    // Counter writes
    // ========================================

    /// First entry into the game counts a game played.
    fn enter_game(&mut self, side: usize, player: usize) {
        if self.sides[side].used.insert(player) {
            self.credit(side, player, &StatsCounters { g: 1, ..Default::default() });
        }
    }

    /// Applies `delta` to the season counters and this game's counters.
    fn credit(&mut self, side: usize, player: usize, delta: &StatsCounters) {
        let Some(p) = self.teams[side].roster.get_mut(player) else {
            return;
        };
        p.counters = p.counters.apply(delta);
        let game = self.sides[side].game.entry(player).or_default();
        *game = game.apply(delta);
    }

    /// A stat-recording event: credit, then the injury roll.
    fn record(&mut self, side: usize, player: usize, delta: StatsCounters) {
        self.credit(side, player, &delta);

        let Some(p) = self.teams[side].roster.get(player) else {
            return;
        };
        let Some(injury) = roll_injury(p, &mut self.rng) else {
            return;
        };
        let note = InjuryNote {
            player_id: p.id.clone(),
            player_name: p.name.clone(),
            injury_type: injury.injury_type.clone(),
            days_remaining: injury.days_remaining,
            severity: injury.severity,
        };
        let text = format!("{} leaves the game with {} ({}).", p.name, injury.injury_type.to_lowercase(), injury.severity.label());
        log::debug!("{}", text);

        if let Some(p) = self.teams[side].roster.get_mut(player) {
            p.injury = injury;
        }
        let mut event = GameEvent::new(EventKind::Injury, self.inning, self.is_top, text);
        event.injured = Some(note);
        self.log.push(event);
    }

    fn player_name(&self, side: usize, player: usize) -> String {
        self.teams[side].roster.get(player).map(|p| p.name.clone()).unwrap_or_default()
    }

    fn player_id(&self, side: usize, player: usize) -> String {
        self.teams[side].roster.get(player).map(|p| p.id.clone()).unwrap_or_default()
    }

    // ========================================
    // Finish
    // ========================================

    fn finish(mut self, game_id: String) -> GameResult {
        let winner = if self.score[HOME] > self.score[AWAY] { HOME } else { AWAY };

        for (side, player, delta) in decisions::assign(&self.sides, winner) {
            self.credit(side, player, &delta);
        }
        let k = self.k;
        for team in self.teams.iter_mut() {
            for player in team.roster.iter_mut() {
                refresh_player(player, k);
            }
        }

        self.line.away_total = self.score[AWAY];
        self.line.home_total = self.score[HOME];
        self.line.away_hits = self.sides[AWAY].hits;
        self.line.home_hits = self.sides[HOME].hits;
        self.line.away_errors = self.sides[AWAY].errors;
        self.line.home_errors = self.sides[HOME].errors;

        let box_score = BoxScore {
            home_lineup: self.batters(HOME),
            away_lineup: self.batters(AWAY),
            home_pitchers: self.pitchers(HOME),
            away_pitchers: self.pitchers(AWAY),
            line_score: self.line.clone(),
        };

        log::debug!(
            "[{}] final {} {} - {} {} ({} innings)",
            game_id,
            self.teams[AWAY].abbreviation,
            self.score[AWAY],
            self.teams[HOME].abbreviation,
            self.score[HOME],
            self.inning
        );

        GameResult {
            id: game_id,
            date: self.date,
            home_team_id: self.teams[HOME].id.clone(),
            away_team_id: self.teams[AWAY].id.clone(),
            home_score: self.score[HOME],
            away_score: self.score[AWAY],
            innings: self.inning,
            winner_id: Some(self.teams[winner].id.clone()),
            played: true,
            is_postseason: self.is_postseason,
            log: std::mem::take(&mut self.log),
            box_score: Some(box_score),
            replay_seed: self.seed,
            replay: self.recorder.take().map(ReplayRecorder::finish),
            stadium: self.teams[HOME].stadium.clone(),
        }
    }

    fn box_line(&self, side: usize, player: usize, pos: Position) -> Option<BoxScorePlayer> {
        let p = self.teams[side].roster.get(player)?;
        Some(BoxScorePlayer {
            id: p.id.clone(),
            name: p.name.clone(),
            pos,
            stats: self.sides[side].game_counters(player),
        })
    }

    fn batters(&self, side: usize) -> Vec<BoxScorePlayer> {
        self.sides[side].batted.iter().filter_map(|&(player, pos)| self.box_line(side, player, pos)).collect()
    }

    fn pitchers(&self, side: usize) -> Vec<BoxScorePlayer> {
        let mut seen = Vec::new();
        self.sides[side]
            .appearances
            .iter()
            .filter(|a| {
                let first = !seen.contains(&a.player);
                seen.push(a.player);
                first
            })
            .filter_map(|a| self.box_line(side, a.player, Position::P))
            .collect()
    }
}
