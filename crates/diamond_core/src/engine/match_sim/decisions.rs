//! Pitching decisions at the end of a game.
//!
//! Win and loss come from the go-ahead snapshot the engine records after
//! each plate appearance. Everything else (saves, holds, blown saves, games
//! finished, quality starts, complete games, shutouts) is read off the
//! appearance list.

use super::side_table::{opponent, Appearance, SideState};
use crate::models::StatsCounters;

/// Outs a starter needs to qualify for the win.
const STARTER_WIN_OUTS: u32 = 15;

/// Counter deltas to apply, as `(side, roster index, delta)`.
pub fn assign(sides: &[SideState; 2], winner: usize) -> Vec<(usize, usize, StatsCounters)> {
    let mut out = Vec::new();
    let loser = opponent(winner);

    let (win_idx, loss_idx) = match sides[winner].go_ahead {
        Some(g) => (Some(winning_appearance(&sides[winner].appearances, g.own)), Some(g.opposing)),
        None => (None, None),
    };

    if let Some(i) = win_idx {
        if let Some(app) = sides[winner].appearances.get(i) {
            out.push((winner, app.player, StatsCounters { wins: 1, ..Default::default() }));
        }
    }
    if let Some(i) = loss_idx {
        if let Some(app) = sides[loser].appearances.get(i) {
            out.push((loser, app.player, StatsCounters { losses: 1, ..Default::default() }));
        }
    }

    for side in [winner, loser] {
        let apps = &sides[side].appearances;
        let last = apps.len().saturating_sub(1);
        for (i, app) in apps.iter().enumerate() {
            let mut d = StatsCounters::default();
            let finished = i == last;

            if app.is_starter {
                if app.outs >= 18 && app.earned_runs <= 3 {
                    d.qs = 1;
                }
                if app.outs >= 27 {
                    d.cg = 1;
                    if app.runs_allowed == 0 {
                        d.sho = 1;
                    }
                }
            } else {
                if app.save_situation {
                    d.svo = 1;
                    if app.lead_lost {
                        d.blown_saves = 1;
                    }
                }
                if finished {
                    d.gf = 1;
                }
                let is_winner = side == winner && win_idx == Some(i);
                if side == winner && finished && !is_winner && earns_save(app) {
                    d.saves = 1;
                    d.svo = 1;
                }
                if app.save_situation && !finished && !app.lead_lost && app.exit_lead.map_or(false, |l| l > 0) {
                    d.holds = 1;
                }
            }

            if !d.is_empty() {
                out.push((side, app.player, d));
            }
        }
    }

    out
}

/// The pitcher of record, unless it is a starter short of five innings,
/// in which case the reliever with the most outs takes the win.
fn winning_appearance(apps: &[Appearance], of_record: usize) -> usize {
    let Some(app) = apps.get(of_record) else {
        return of_record;
    };
    if !app.is_starter || app.outs >= STARTER_WIN_OUTS {
        return of_record;
    }
    apps.iter()
        .enumerate()
        .filter(|(_, a)| !a.is_starter)
        .fold(None, |best: Option<(usize, u32)>, (i, a)| match best {
            Some((_, outs)) if outs >= a.outs => best,
            _ => Some((i, a.outs)),
        })
        .map(|(i, _)| i)
        .unwrap_or(of_record)
}

fn earns_save(app: &Appearance) -> bool {
    app.entry_lead > 0 && !app.lead_lost && (app.entry_lead <= 3 || app.inherited > 0 || app.outs >= 9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::match_sim::side_table::{GoAhead, AWAY, HOME};

    fn app(player: usize, is_starter: bool, outs: u32, entry_lead: i32) -> Appearance {
        let mut a = Appearance::new(player, is_starter, 90, 1, entry_lead, 0);
        a.outs = outs;
        a
    }

    fn find(out: &[(usize, usize, StatsCounters)], side: usize, player: usize) -> StatsCounters {
        out.iter()
            .filter(|(s, p, _)| *s == side && *p == player)
            .fold(StatsCounters::default(), |acc, (_, _, d)| acc.apply(d))
    }

    #[test]
    fn test_starter_win_and_closer_save() {
        let mut sides: [SideState; 2] = Default::default();
        // home: starter 7 IP, setup 1 IP, closer 1 IP with a two-run lead
        let mut setup = app(11, false, 3, 2);
        setup.exit_lead = Some(2);
        sides[HOME].appearances = vec![app(10, true, 21, 0), setup, app(12, false, 3, 2)];
        sides[HOME].go_ahead = Some(GoAhead { own: 0, opposing: 0 });
        sides[AWAY].appearances = vec![app(20, true, 24, 0)];

        let out = assign(&sides, HOME);

        assert_eq!(find(&out, HOME, 10).wins, 1);
        assert_eq!(find(&out, HOME, 10).qs, 1);
        assert_eq!(find(&out, HOME, 11).holds, 1);
        let closer = find(&out, HOME, 12);
        assert_eq!((closer.saves, closer.svo, closer.gf), (1, 1, 1));
        assert_eq!(find(&out, AWAY, 20).losses, 1);
        assert_eq!(find(&out, AWAY, 20).qs, 1);
    }

    #[test]
    fn test_short_start_hands_win_to_bullpen() {
        let mut sides: [SideState; 2] = Default::default();
        sides[AWAY].appearances = vec![app(1, true, 12, 0), app(2, false, 9, 3), app(3, false, 6, 3)];
        sides[AWAY].go_ahead = Some(GoAhead { own: 0, opposing: 0 });
        let mut complete = app(20, true, 27, 0);
        complete.runs_allowed = 2;
        complete.earned_runs = 2;
        sides[HOME].appearances = vec![complete];

        let out = assign(&sides, AWAY);

        assert_eq!(find(&out, AWAY, 1).wins, 0);
        assert_eq!(find(&out, AWAY, 2).wins, 1);
        let home_starter = find(&out, HOME, 20);
        assert_eq!((home_starter.losses, home_starter.cg, home_starter.qs), (1, 1, 1));
        assert_eq!(home_starter.sho, 0);
    }

    #[test]
    fn test_blown_save() {
        let mut sides: [SideState; 2] = Default::default();
        let mut blew_it = app(11, false, 3, 1);
        blew_it.lead_lost = true;
        blew_it.exit_lead = Some(-1);
        sides[HOME].appearances = vec![app(10, true, 24, 0), blew_it];
        sides[AWAY].appearances = vec![app(20, true, 27, 0)];
        sides[AWAY].go_ahead = Some(GoAhead { own: 0, opposing: 1 });

        let out = assign(&sides, AWAY);
        let d = find(&out, HOME, 11);
        assert_eq!((d.blown_saves, d.svo, d.losses, d.saves), (1, 1, 1, 0));
    }
}
