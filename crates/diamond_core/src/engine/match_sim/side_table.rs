//! Per-game side table.
//!
//! Everything the engine needs to remember about a team during one game
//! (lineup, bench usage, pitcher appearances, this game's counters, cached
//! performance factors) lives here, keyed by roster index. It is created at
//! first pitch and dropped with the engine.

use crate::engine::performance::PerformanceFactors;
use crate::models::{Position, StatsCounters};
use fxhash::{FxHashMap, FxHashSet};

pub const AWAY: usize = 0;
pub const HOME: usize = 1;

#[inline]
pub fn opponent(side: usize) -> usize {
    1 - side
}

/// A runner on base and the pitcher charged if they score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runner {
    pub player: usize,
    /// Roster index on the fielding team.
    pub pitcher: usize,
    pub unearned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineupSlot {
    pub player: usize,
    pub position: Position,
}

/// One pitcher's stint.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub player: usize,
    pub is_starter: bool,
    pub pitches: u32,
    pub stamina_limit: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub outs: u32,
    pub entry_inning: u32,
    /// Own team's lead when the pitcher entered.
    pub entry_lead: i32,
    pub inherited: u32,
    pub save_situation: bool,
    pub lead_lost: bool,
    /// Own team's lead when the pitcher left; `None` while still in.
    pub exit_lead: Option<i32>,
}

impl Appearance {
    pub fn new(player: usize, is_starter: bool, stamina_limit: u32, entry_inning: u32, entry_lead: i32, inherited: u32) -> Self {
        Self {
            player,
            is_starter,
            pitches: 0,
            stamina_limit,
            runs_allowed: 0,
            earned_runs: 0,
            outs: 0,
            entry_inning,
            entry_lead,
            inherited,
            save_situation: !is_starter && (1..=3).contains(&entry_lead),
            lead_lost: false,
            exit_lead: None,
        }
    }
}

/// Who was pitching when a side last took the lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoAhead {
    /// Appearance index on the side that took the lead.
    pub own: usize,
    /// Appearance index on the other side.
    pub opposing: usize,
}

#[derive(Debug, Default)]
pub struct SideState {
    pub lineup: Vec<LineupSlot>,
    /// Next batting-order slot.
    pub next_slot: usize,
    /// Everyone who has entered the game.
    pub used: FxHashSet<usize>,
    pub appearances: Vec<Appearance>,
    /// Everyone in the batting order, in order of entry.
    pub batted: Vec<(usize, Position)>,
    pub game: FxHashMap<usize, StatsCounters>,
    pub factors: FxHashMap<usize, PerformanceFactors>,
    pub hits: u32,
    pub errors: u32,
    pub go_ahead: Option<GoAhead>,
}

impl SideState {
    pub fn current(&self) -> Option<&Appearance> {
        self.appearances.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Appearance> {
        self.appearances.last_mut()
    }

    /// Roster index of the pitcher on the mound.
    pub fn pitcher(&self) -> usize {
        self.current().map(|a| a.player).unwrap_or(0)
    }

    pub fn current_appearance_index(&self) -> usize {
        self.appearances.len().saturating_sub(1)
    }

    pub fn appearance_of(&mut self, player: usize) -> Option<&mut Appearance> {
        self.appearances.iter_mut().rev().find(|a| a.player == player)
    }

    pub fn slot_of(&self, player: usize) -> Option<usize> {
        self.lineup.iter().position(|s| s.player == player)
    }

    pub fn at_position(&self, position: Position) -> Option<usize> {
        if position == Position::P {
            return Some(self.pitcher());
        }
        self.lineup.iter().find(|s| s.position == position).map(|s| s.player)
    }

    pub fn note_batted(&mut self, player: usize, position: Position) {
        if !self.batted.iter().any(|(p, _)| *p == player) {
            self.batted.push((player, position));
        }
    }

    pub fn game_counters(&self, player: usize) -> StatsCounters {
        self.game.get(&player).cloned().unwrap_or_default()
    }
}
