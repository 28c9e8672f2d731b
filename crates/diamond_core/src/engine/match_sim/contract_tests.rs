//! Engine Contract Tests
//!
//! Whole-game properties every result must satisfy:
//! 1. Determinism (same seed, same bytes)
//! 2. Score consistency, no ties
//! 3. Out conservation
//! 4. Counter bookkeeping (season == game for a fresh roster)
//! 5. Roster preconditions
//! 6. Bench moves and the automatic runner fire only when their game
//!    situation calls for them

#[cfg(test)]
mod tests {
    use crate::engine::at_bat::Bases;
    use crate::engine::match_sim::side_table::{Runner, AWAY, HOME};
    use crate::engine::match_sim::{simulate_game, GameEngine, GameOptions};
    use crate::engine::stats::plate_appearances;
    use crate::fixtures;
    use crate::models::{EventKind, GameResult, Player, Position, Team};
    use chrono::NaiveDate;

    fn opening_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 27).unwrap()
    }

    fn play(seed: u64) -> (GameResult, Team, Team) {
        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        let result = simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::seeded(seed)).unwrap();
        (result, home, away)
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let (a, _, _) = play(42);
        let (b, _, _) = play(42);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert!(a.id.starts_with("game_"));

        let (c, _, _) = play(43);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_derived_seed_is_stable() {
        let run = || {
            let mut home = fixtures::team("nyy");
            let mut away = fixtures::team("bos");
            simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::default()).unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.replay_seed, b.replay_seed);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_score_consistency_and_no_ties() {
        for seed in 0..25 {
            let (r, home, away) = play(seed);
            assert!(r.played);
            assert_ne!(r.home_score, r.away_score, "seed {seed}");
            assert!(r.innings >= 9);

            let bs = r.box_score.as_ref().unwrap();
            let line = &bs.line_score;
            assert_eq!(line.innings.len() as u32, r.innings);
            assert_eq!(line.innings.iter().map(|i| i.away).sum::<u32>(), r.away_score);
            assert_eq!(line.innings.iter().map(|i| i.home).sum::<u32>(), r.home_score);
            assert_eq!((line.away_total, line.home_total), (r.away_score, r.home_score));

            let winner = if r.home_won() { &home.id } else { &away.id };
            assert_eq!(r.winner_id.as_ref(), Some(winner));

            // runs scored by batters and runs charged to pitchers both add up
            let runs = |v: &[crate::models::BoxScorePlayer]| v.iter().map(|p| p.stats.r).sum::<u32>();
            let allowed = |v: &[crate::models::BoxScorePlayer]| v.iter().map(|p| p.stats.p_r).sum::<u32>();
            assert_eq!(runs(&bs.home_lineup), r.home_score);
            assert_eq!(runs(&bs.away_lineup), r.away_score);
            assert_eq!(allowed(&bs.away_pitchers), r.home_score);
            assert_eq!(allowed(&bs.home_pitchers), r.away_score);

            let hits = |v: &[crate::models::BoxScorePlayer]| v.iter().map(|p| p.stats.h).sum::<u32>();
            assert_eq!(hits(&bs.home_lineup), line.home_hits);
            assert_eq!(hits(&bs.away_lineup), line.away_hits);
        }
    }

    #[test]
    fn test_out_conservation() {
        for seed in 0..25 {
            let (r, _, _) = play(seed);
            let bs = r.box_score.as_ref().unwrap();
            let outs = |v: &[crate::models::BoxScorePlayer]| v.iter().map(|p| p.stats.outs_pitched).sum::<u32>();
            let home_outs = outs(&bs.home_pitchers);
            let away_outs = outs(&bs.away_pitchers);

            // home pitches every top half in full
            assert_eq!(home_outs, 3 * r.innings, "seed {seed}");
            // the last bottom half is skipped or cut short by a walk-off
            assert!(away_outs >= 3 * (r.innings - 1) && away_outs <= 3 * r.innings, "seed {seed}");
            if away_outs < 3 * r.innings {
                assert!(r.home_won());
            }
            if r.innings == 9 {
                assert!((51..=54).contains(&(home_outs + away_outs)));
            }
        }
    }

    #[test]
    fn test_one_winner_one_loser() {
        for seed in 0..25 {
            let (r, _, _) = play(seed);
            let bs = r.box_score.as_ref().unwrap();
            let all: Vec<_> = bs.home_pitchers.iter().chain(bs.away_pitchers.iter()).collect();
            assert_eq!(all.iter().map(|p| p.stats.wins).sum::<u32>(), 1, "seed {seed}");
            assert_eq!(all.iter().map(|p| p.stats.losses).sum::<u32>(), 1, "seed {seed}");
            assert!(all.iter().map(|p| p.stats.saves).sum::<u32>() <= 1);
            assert_eq!(bs.home_pitchers[0].stats.gs, 1);
            assert_eq!(bs.away_pitchers[0].stats.gs, 1);

            let winners = if r.home_won() { &bs.home_pitchers } else { &bs.away_pitchers };
            assert_eq!(winners.iter().map(|p| p.stats.wins).sum::<u32>(), 1);
        }
    }

    #[test]
    fn test_season_counters_match_game_counters() {
        let (r, home, away) = play(7);
        let bs = r.box_score.as_ref().unwrap();
        for (team, lines) in [(&home, &bs.home_lineup), (&away, &bs.away_lineup)] {
            for line in lines {
                let p = team.player(&line.id).unwrap();
                assert_eq!(p.counters, line.stats, "{}", p.name);
                assert_eq!(p.batting.pa, plate_appearances(&p.counters));
                assert_eq!(p.counters.g, 1);
            }
        }
        for (team, lines) in [(&home, &bs.home_pitchers), (&away, &bs.away_pitchers)] {
            for line in lines {
                let p = team.player(&line.id).unwrap();
                assert_eq!(p.counters.gp, 1);
                assert_eq!(p.pitching.pitches_thrown, p.counters.pitches_thrown);
            }
        }
    }

    #[test]
    fn test_play_by_play_shape() {
        let (r, _, _) = play(11);
        assert!(r.log[0].description.starts_with("Starters: "));
        assert!(r.log[0].description.ends_with(" (Home)"));
        let with_pitches = r.log.iter().filter_map(|e| e.pitches.as_ref()).flatten().count();
        assert!(with_pitches > 150);
        assert!(r.log.iter().any(|e| e.description.starts_with("Top 1:")));
        assert!(r.log.iter().any(|e| e.description.starts_with("Bot 1:")));
    }

    #[test]
    fn test_replay_capture_does_not_change_the_game() {
        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        let plain = simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::seeded(9)).unwrap();

        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        let options = GameOptions::seeded(9).with_replay();
        let captured = simulate_game(&mut home, &mut away, opening_day(), false, &options).unwrap();

        assert!(plain.replay.is_none());
        assert_eq!(plain.log, captured.log);
        assert_eq!((plain.home_score, plain.away_score), (captured.home_score, captured.away_score));

        let replay = captured.replay.as_ref().unwrap();
        assert_eq!(replay.schema, "v1");
        assert_eq!(replay.seed, 9);
        let bs = captured.box_score.as_ref().unwrap();
        let thrown: u32 = bs.home_pitchers.iter().chain(bs.away_pitchers.iter()).map(|p| p.stats.pitches_thrown).sum();
        assert_eq!(replay.pitch_count() as u32, thrown);
    }

    #[test]
    fn test_postseason_flag_is_carried() {
        let mut home = fixtures::team("lad");
        let mut away = fixtures::team("sd");
        let r = simulate_game(&mut home, &mut away, opening_day(), true, &GameOptions::seeded(1)).unwrap();
        assert!(r.is_postseason);
        assert_eq!(r.stadium, home.stadium);
    }

    #[test]
    fn test_short_roster_is_rejected() {
        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        home.roster.retain(|p| p.is_pitcher_eligible());
        let err = simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::seeded(1)).unwrap_err();
        assert!(err.is_precondition());

        let mut home = fixtures::team("nyy");
        for p in home.roster.iter_mut().filter(|p| p.is_pitcher_eligible()) {
            p.injury.is_injured = true;
        }
        let err = simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::seeded(1)).unwrap_err();
        assert!(err.is_precondition());
        assert!(away.roster.iter().all(|p| p.counters.is_empty()));
    }

    // ========================================
    // Bench moves
    // ========================================

    /// Low rating keeps him out of the starting nine.
    fn slugger(id: &str) -> Player {
        let mut p = fixtures::hitter(&format!("{id}_ph"), Position::LF, 30);
        p.attributes.contact = 99;
        p.attributes.power = 99;
        p.attributes.eye = 99;
        p
    }

    fn speedster(id: &str) -> Player {
        let mut p = fixtures::hitter(&format!("{id}_pr"), Position::CF, 30);
        p.attributes.speed = 99;
        p
    }

    fn glove(id: &str) -> Player {
        let mut p = fixtures::hitter(&format!("{id}_gl"), Position::SS, 30);
        p.attributes.defense = 99;
        p.attributes.reaction = 99;
        p
    }

    fn deep_bench(id: &str) -> Team {
        let mut team = fixtures::team(id);
        team.roster.extend([slugger(id), speedster(id), glove(id)]);
        team
    }

    fn index_of(team: &Team, id: &str) -> usize {
        team.roster.iter().position(|p| p.id == id).unwrap()
    }

    fn engine<'a>(home: &'a mut Team, away: &'a mut Team) -> GameEngine<'a> {
        let mut engine = GameEngine::new(home, away, opening_day(), &GameOptions::seeded(3));
        for side in [AWAY, HOME] {
            engine.take_the_field(side).unwrap();
        }
        engine
    }

    fn descriptions(engine: &GameEngine, label: &str) -> usize {
        engine.log.iter().filter(|e| e.description.contains(label)).count()
    }

    #[test]
    fn test_pinch_hitter_only_late_and_close() {
        let mut home = deep_bench("nyy");
        let mut away = fixtures::team("bos");
        let ph = index_of(&home, "nyy_ph");
        let mut e = engine(&mut home, &mut away);
        e.is_top = false;

        // too early
        e.inning = 6;
        for _ in 0..50 {
            e.consider_pinch_hitter(HOME, AWAY, 0);
        }
        assert_ne!(e.sides[HOME].lineup[0].player, ph);

        // late but not close
        e.inning = 7;
        e.score = [4, 0];
        for _ in 0..50 {
            e.consider_pinch_hitter(HOME, AWAY, 0);
        }
        assert_ne!(e.sides[HOME].lineup[0].player, ph);
        assert_eq!(descriptions(&e, "Pinch Hitter"), 0);

        // seventh inning, down three
        e.score = [3, 0];
        for _ in 0..50 {
            e.consider_pinch_hitter(HOME, AWAY, 0);
        }
        assert_eq!(e.sides[HOME].lineup[0].player, ph);
        assert!(e.sides[HOME].used.contains(&ph));
        assert_eq!(descriptions(&e, "Pinch Hitter"), 1);

        // he bats, then shows up in the box score with one game
        e.sides[HOME].next_slot = 0;
        e.play_half(false);
        let r = e.finish("game_test".into());
        let line = r.box_score.unwrap().home_lineup.into_iter().find(|l| l.id == "nyy_ph").unwrap();
        assert_eq!(line.stats.g, 1);
        assert_eq!(home.roster[ph].counters.g, 1);
    }

    #[test]
    fn test_pinch_runner_only_for_slow_runner_in_tight_game() {
        let mut home = deep_bench("nyy");
        let mut away = fixtures::team("bos");
        let pr = index_of(&home, "nyy_pr");
        let mut e = engine(&mut home, &mut away);
        e.is_top = false;

        let slow = e.sides[HOME].lineup[0].player;
        let pitcher = e.sides[AWAY].pitcher();
        let on_first = |player| Bases { first: Some(Runner { player, pitcher, unearned: false }), ..Bases::default() };

        // quick enough already
        e.inning = 8;
        let mut bases = on_first(slow);
        e.consider_pinch_runners(HOME, AWAY, &mut bases);
        assert_eq!(bases.first.map(|r| r.player), Some(slow));

        e.teams[HOME].roster[slow].attributes.speed = 30;

        // too early
        e.inning = 7;
        e.consider_pinch_runners(HOME, AWAY, &mut bases);
        assert_eq!(bases.first.map(|r| r.player), Some(slow));

        // eighth, but a two-run game
        e.inning = 8;
        e.score = [0, 2];
        e.consider_pinch_runners(HOME, AWAY, &mut bases);
        assert_eq!(bases.first.map(|r| r.player), Some(slow));
        assert_eq!(descriptions(&e, "Pinch Runner"), 0);

        // eighth, one-run game
        e.score = [0, 1];
        e.consider_pinch_runners(HOME, AWAY, &mut bases);
        let runner = bases.first.unwrap();
        assert_eq!(runner.player, pr);
        assert_eq!(runner.pitcher, pitcher);
        assert_eq!(e.sides[HOME].lineup[0].player, pr);
        assert_eq!(descriptions(&e, "Pinch Runner"), 1);

        let r = e.finish("game_test".into());
        let line = r.box_score.unwrap().home_lineup.into_iter().find(|l| l.id == "nyy_pr").unwrap();
        assert_eq!(line.stats.g, 1);
    }

    #[test]
    fn test_defensive_substitution_only_when_protecting_a_lead() {
        let mut home = deep_bench("nyy");
        let mut away = fixtures::team("bos");
        let gl = index_of(&home, "nyy_gl");
        let mut e = engine(&mut home, &mut away);

        let on_field = |e: &GameEngine| e.sides[HOME].lineup.iter().any(|s| s.player == gl);

        // ahead, but too early
        e.inning = 7;
        e.score = [0, 1];
        e.defensive_substitution(HOME);
        assert!(!on_field(&e));

        // eighth, tied
        e.inning = 8;
        e.score = [1, 1];
        e.defensive_substitution(HOME);
        assert!(!on_field(&e));
        assert_eq!(descriptions(&e, "Defensive Substitution"), 0);

        // eighth, ahead: the weakest glove (never the DH) makes way
        e.score = [1, 2];
        let weakest = e.sides[HOME]
            .lineup
            .iter()
            .filter(|s| s.position != Position::DH)
            .min_by_key(|s| e.teams[HOME].roster[s.player].attributes.fielding_sum())
            .copied()
            .unwrap();
        e.defensive_substitution(HOME);
        let slot = e.sides[HOME].lineup.iter().find(|s| s.player == gl).copied().unwrap();
        assert_eq!(slot.position, weakest.position);
        assert_eq!(descriptions(&e, "Defensive Substitution"), 1);

        // the glove is now the best fielder, so nothing else moves
        e.defensive_substitution(HOME);
        assert_eq!(descriptions(&e, "Defensive Substitution"), 1);

        let r = e.finish("game_test".into());
        let line = r.box_score.unwrap().home_lineup.into_iter().find(|l| l.id == "nyy_gl").unwrap();
        assert_eq!((line.stats.g, line.pos), (1, weakest.position));
    }

    #[test]
    fn test_automatic_runner_is_the_previous_batter() {
        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        let mut e = engine(&mut home, &mut away);
        e.inning = 26;
        e.sides[AWAY].next_slot = 3;
        let expected = e.sides[AWAY].lineup[2].player;

        let mut bases: Bases<Runner> = Bases::default();
        e.place_automatic_runner(AWAY, HOME, &mut bases);
        let runner = bases.second.unwrap();
        assert_eq!(runner.player, expected);
        assert_eq!(runner.pitcher, e.sides[HOME].pitcher());
        assert!(runner.unearned);
        assert!(bases.first.is_none() && bases.third.is_none());
    }

    #[test]
    fn test_automatic_runner_from_the_twenty_sixth() {
        let mut home = fixtures::team("nyy");
        let mut away = fixtures::team("bos");
        let mut e = engine(&mut home, &mut away);

        e.inning = 25;
        e.play_half(true);
        assert_eq!(descriptions(&e, "starts the inning on second base"), 0);

        e.inning = 26;
        let placed = e.teams[AWAY].roster[e.sides[AWAY].lineup[(e.sides[AWAY].next_slot + 8) % 9].player].name.clone();
        e.play_half(true);
        let event = e.log.iter().find(|ev| ev.description.contains("starts the inning on second base")).unwrap();
        assert_eq!(event.kind, EventKind::Info);
        assert_eq!((event.inning, event.is_top), (26, true));
        assert!(event.description.starts_with(&format!("Top 26: {placed}")));
    }

    /// Every bench move in a full game happens in its window, and everyone
    /// who came off the bench has a box-score line with one game.
    #[test]
    fn test_bench_moves_in_full_games() {
        let mut seen = [0usize; 3];
        for seed in 0..20 {
            let mut home = deep_bench("nyy");
            let mut away = deep_bench("bos");
            for team in [&mut home, &mut away] {
                let slowest = team.roster.iter().position(|p| p.position == Position::C).unwrap();
                team.roster[slowest].attributes.speed = 30;
            }
            let r = simulate_game(&mut home, &mut away, opening_day(), false, &GameOptions::seeded(seed)).unwrap();
            let bs = r.box_score.as_ref().unwrap();

            for (n, (label, first_inning)) in
                [("Pinch Hitter: ", 7), ("Pinch Runner: ", 8), ("Defensive Substitution: ", 8)].into_iter().enumerate()
            {
                for event in r.log.iter().filter(|ev| ev.description.contains(label)) {
                    seen[n] += 1;
                    assert!(event.inning >= first_inning, "seed {seed}: {}", event.description);

                    let rest = event.description.split(label).nth(1).unwrap();
                    let name = rest.split(" replaces ").next().unwrap();
                    // a bench bat runs for the side at the plate; a glove takes the field
                    let batting_home = if n == 2 { event.is_top } else { !event.is_top };
                    let lines = if batting_home { &bs.home_lineup } else { &bs.away_lineup };
                    let line = lines.iter().find(|l| l.name == name).unwrap();
                    assert_eq!(line.stats.g, 1, "seed {seed}: {name}");
                }
            }
            assert_ne!(r.home_score, r.away_score);
        }
        assert!(seen[0] > 0, "no pinch hitters in 20 games");
        assert!(seen[2] > 0, "no defensive substitutions in 20 games");
    }
}
