//! Starter selection, bullpen selection and pitching-change triggers.

use super::side_table::Appearance;
use crate::engine::config::LeagueConstants;
use crate::engine::rng::SimRng;
use crate::models::{Player, Team};
use fxhash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelieverRole {
    General,
    Setup,
    Closer,
}

const CLOSER_IP_CAP: f64 = 65.0;
const RELIEVER_IP_CAP: f64 = 70.0;
const CLOSER_APPEARANCE_CAP: u32 = 70;
const RELIEVER_APPEARANCE_CAP: u32 = 75;

// ============================================================================
// Starters
// ============================================================================

/// Rotation arm (slots 1-6) with four days' rest, most rested first; then
/// the best rested bullpen arm; then anyone healthy who can pitch.
pub fn get_starter(team: &Team) -> Option<usize> {
    let pitchers: Vec<(usize, &Player)> = team
        .roster
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_healthy() && p.is_pitcher_eligible())
        .collect();

    let rotation = pitchers
        .iter()
        .filter(|(_, p)| (1..=6).contains(&p.rotation_slot) && p.days_rest >= 4)
        .min_by_key(|(_, p)| (std::cmp::Reverse(p.days_rest), p.rotation_slot));
    if let Some((i, _)) = rotation {
        return Some(*i);
    }

    let bullpen = pitchers
        .iter()
        .filter(|(_, p)| p.rotation_slot > 8 && p.days_rest >= 3)
        .min_by_key(|(_, p)| std::cmp::Reverse(p.rating));
    if let Some((i, _)) = bullpen {
        return Some(*i);
    }

    pitchers.iter().min_by_key(|(_, p)| std::cmp::Reverse(p.days_rest)).map(|(i, _)| *i)
}

/// Pitch limit for a new appearance.
pub fn stamina_limit(pitcher: &Player, rng: &mut dyn SimRng) -> u32 {
    if pitcher.is_relief_arm() {
        let (base, spread) = if pitcher.is_closer() { (15.0, 5.0) } else { (18.0, 10.0) };
        (base + rng.range(0.0, spread)).round() as u32
    } else {
        let stamina = pitcher.attributes.stamina as f64;
        (stamina * 0.90 + 45.0 + rng.range(-5.0, 5.0)).clamp(70.0, 100.0).round() as u32
    }
}

// ============================================================================
// Change triggers
// ============================================================================

/// Why the current pitcher should come out, if he should.
///
/// `lead` is the fielding team's lead. `pre_half` enables the role-based
/// checks that only run between half-innings.
pub fn change_needed(app: &Appearance, pitcher: &Player, inning: u32, lead: i32, pre_half: bool) -> Option<RelieverRole> {
    let pitches = app.pitches;
    let limit = app.stamina_limit;

    if pitches >= limit
        || (app.is_starter && inning >= 8 && pitches as f64 >= limit as f64 * 0.85)
        || (app.runs_allowed >= 4 && inning <= 5)
        || app.runs_allowed >= 5
        || (inning >= 6 && app.runs_allowed >= 3 && pitches > 75)
    {
        return Some(RelieverRole::General);
    }

    if !pre_half {
        return None;
    }

    if inning >= 9 && (1..=3).contains(&lead) && !pitcher.is_closer() {
        return Some(RelieverRole::Closer);
    }
    if inning == 8 && (1..=3).contains(&lead) && app.is_starter {
        return Some(RelieverRole::Setup);
    }
    if inning >= 7 && lead.abs() <= 2 && !pitcher.is_relief_arm() {
        return Some(RelieverRole::Setup);
    }
    None
}

// ============================================================================
// Bullpen
// ============================================================================

fn available(p: &Player, i: usize, used: &FxHashSet<usize>) -> bool {
    if used.contains(&i) || !p.is_healthy() || !p.is_pitcher_eligible() || p.days_rest < 0 {
        return false;
    }
    if p.rotation_slot < 9 {
        return false;
    }
    let (ip_cap, app_cap) = if p.is_closer() {
        if p.days_rest < 1 {
            return false;
        }
        (CLOSER_IP_CAP, CLOSER_APPEARANCE_CAP)
    } else {
        (RELIEVER_IP_CAP, RELIEVER_APPEARANCE_CAP)
    };
    p.season_innings() < ip_cap && p.counters.gp < app_cap
}

/// Recent high-leverage track record: saves, games, run prevention and
/// innings over the last three qualifying seasons.
fn leverage_history(p: &Player, k: &LeagueConstants) -> f64 {
    let mut rows: Vec<_> = p
        .history
        .iter()
        .filter(|h| h.year_number().map_or(true, |y| y >= k.base_year - 3) && h.stats.ip.unwrap_or(0.0) > 0.0)
        .collect();
    rows.sort_by_key(|h| std::cmp::Reverse(h.year_number().unwrap_or(i32::MAX)));
    rows.iter()
        .take(3)
        .enumerate()
        .map(|(idx, h)| {
            let s = &h.stats;
            let recency = [1.5, 1.2, 1.0][idx];
            let era = s.era.unwrap_or(k.lg_era);
            let raw = s.saves.unwrap_or(0) as f64 * 3.0
                + s.games as f64
                + (5.0 - era).max(0.0) * 10.0
                + s.ip.unwrap_or(0.0).min(70.0);
            raw * recency
        })
        .sum()
}

fn relief_score(p: &Player, inning: u32, lead: i32, save_spot: bool, k: &LeagueConstants) -> f64 {
    let ip = p.season_innings();
    let rest = p.days_rest.clamp(0, 3) as f64 * 15.0;
    let mut score = 0.35 * leverage_history(p, k)
        + 0.25 * p.rating as f64
        + 0.20 * rest
        + 0.20 * (50.0 - ip).max(0.0)
        - 2.0 * (ip - 50.0).max(0.0);

    if (10..=12).contains(&p.rotation_slot) && inning >= 7 && lead.abs() <= 2 {
        score += 8.0;
    }
    if p.is_closer() && !save_spot {
        score -= 25.0;
    }
    if p.rotation_slot >= 13 && lead.abs() >= 5 {
        score += 6.0;
    }
    score
}

fn best_rated(team: &Team, candidates: &[usize]) -> Option<usize> {
    candidates.iter().copied().fold(None, |best, i| match best {
        Some(b) if team.roster[b].rating >= team.roster[i].rating => Some(b),
        _ => Some(i),
    })
}

/// Picks a reliever for the fielding team. `lead` is the fielding team's
/// lead. Returns `None` when nobody can pitch.
pub fn get_reliever(
    team: &Team,
    used: &FxHashSet<usize>,
    role: RelieverRole,
    inning: u32,
    lead: i32,
    k: &LeagueConstants,
) -> Option<usize> {
    let candidates: Vec<usize> = team
        .roster
        .iter()
        .enumerate()
        .filter(|(i, p)| available(p, *i, used))
        .map(|(i, _)| i)
        .collect();

    let save_spot = inning >= 9 && (1..=3).contains(&lead);
    let setup_spot = inning == 8 && (1..=3).contains(&lead);
    let closer = candidates.iter().copied().find(|&i| team.roster[i].is_closer());
    let setup_arms: Vec<usize> = candidates.iter().copied().filter(|&i| team.roster[i].rotation_slot >= 10).collect();

    if role == RelieverRole::Closer || save_spot {
        if let Some(c) = closer {
            return Some(c);
        }
        if let Some(s) = best_rated(team, &setup_arms) {
            return Some(s);
        }
    }

    if role == RelieverRole::Setup || setup_spot {
        if let Some(s) = best_rated(team, &setup_arms) {
            return Some(s);
        }
    }

    let scored = candidates.iter().copied().fold(None, |best: Option<(usize, f64)>, i| {
        let s = relief_score(&team.roster[i], inning, lead, save_spot, k);
        match best {
            Some((_, bs)) if bs >= s => best,
            _ => Some((i, s)),
        }
    });
    if let Some((i, _)) = scored {
        return Some(i);
    }

    // Bullpen exhausted: anyone healthy and unused, soft caps ignored.
    let emergency = team
        .roster
        .iter()
        .enumerate()
        .filter(|(i, p)| !used.contains(i) && p.is_healthy() && p.is_pitcher_eligible())
        .min_by_key(|(_, p)| std::cmp::Reverse(p.days_rest))
        .map(|(i, _)| i);
    if let Some(i) = emergency {
        log::warn!(
            "[{}] bullpen exhausted in inning {}; emergency arm {}",
            team.abbreviation,
            inning,
            team.roster[i].name
        );
    }
    emergency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRng;
    use crate::fixtures;

    fn k() -> LeagueConstants {
        LeagueConstants::default()
    }

    fn slot_of(team: &Team, slot: u8) -> usize {
        team.roster.iter().position(|p| p.rotation_slot == slot && p.is_pitcher_eligible()).unwrap()
    }

    #[test]
    fn test_starter_prefers_most_rested_then_lowest_slot() {
        let mut team = fixtures::team("nyy");
        for p in team.roster.iter_mut() {
            p.days_rest = 4;
        }
        assert_eq!(get_starter(&team), Some(slot_of(&team, 1)));

        let three = slot_of(&team, 3);
        team.roster[three].days_rest = 5;
        assert_eq!(get_starter(&team), Some(three));
    }

    #[test]
    fn test_starter_falls_back_to_bullpen() {
        let mut team = fixtures::team("nyy");
        for p in team.roster.iter_mut() {
            p.days_rest = if p.rotation_slot > 8 { 3 } else { 1 };
        }
        let pick = get_starter(&team).unwrap();
        assert!(team.roster[pick].rotation_slot > 8);
    }

    #[test]
    fn test_stamina_limits() {
        let team = fixtures::team("nyy");
        let mut rng = ScriptedRng::constant(0.5);
        let starter = &team.roster[slot_of(&team, 1)];
        let limit = stamina_limit(starter, &mut rng);
        assert!((70..=100).contains(&limit));
        let closer = &team.roster[slot_of(&team, 9)];
        assert_eq!(stamina_limit(closer, &mut rng), 18);
        let middle = &team.roster[slot_of(&team, 11)];
        assert_eq!(stamina_limit(middle, &mut rng), 23);
    }

    #[test]
    fn test_change_triggers() {
        let team = fixtures::team("nyy");
        let starter = &team.roster[slot_of(&team, 1)];
        let mut app = Appearance::new(0, true, 95, 1, 0, 0);

        app.pitches = 60;
        assert_eq!(change_needed(&app, starter, 4, 0, false), None);
        app.pitches = 95;
        assert_eq!(change_needed(&app, starter, 4, 0, false), Some(RelieverRole::General));

        app.pitches = 50;
        app.runs_allowed = 4;
        assert_eq!(change_needed(&app, starter, 5, 0, false), Some(RelieverRole::General));
        assert_eq!(change_needed(&app, starter, 6, 0, false), None);

        app.runs_allowed = 0;
        assert_eq!(change_needed(&app, starter, 7, 1, true), Some(RelieverRole::Setup));
        assert_eq!(change_needed(&app, starter, 7, 1, false), None);
        assert_eq!(change_needed(&app, starter, 9, 2, true), Some(RelieverRole::Closer));
    }

    #[test]
    fn test_closer_gets_the_save_spot() {
        let mut team = fixtures::team("nyy");
        for p in team.roster.iter_mut() {
            p.days_rest = 2;
        }
        let used = FxHashSet::default();
        let pick = get_reliever(&team, &used, RelieverRole::General, 9, 2, &k()).unwrap();
        assert!(team.roster[pick].is_closer());

        let closer = slot_of(&team, 9);
        team.roster[closer].days_rest = 0;
        let pick = get_reliever(&team, &used, RelieverRole::Closer, 9, 2, &k()).unwrap();
        assert!(team.roster[pick].rotation_slot >= 10);
    }

    #[test]
    fn test_overworked_relievers_are_skipped() {
        let mut team = fixtures::team("nyy");
        for p in team.roster.iter_mut() {
            p.days_rest = 2;
            if p.rotation_slot >= 9 {
                p.counters.outs_pitched = 75 * 3;
            }
        }
        let used = FxHashSet::default();
        let pick = get_reliever(&team, &used, RelieverRole::General, 5, 0, &k()).unwrap();
        // only the emergency path is left: a starter-slot arm
        assert!(team.roster[pick].rotation_slot < 9);
    }

    #[test]
    fn test_nobody_left() {
        let team = fixtures::team("nyy");
        let used: FxHashSet<usize> = (0..team.roster.len()).collect();
        assert_eq!(get_reliever(&team, &used, RelieverRole::General, 5, 0, &k()), None);
    }
}
