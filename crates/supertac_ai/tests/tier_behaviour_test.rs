//! Behaviour of each difficulty tier on hand-built positions.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use strum::IntoEnumIterator;
use supertac_ai::{evaluate, greedy_move, Bot, Difficulty, SearchConfig, WIN_SCORE};
use supertac_rules::{Mark, MetaBoard, Move, SubBoard, BOARD_CELLS};

fn sub(pattern: &str) -> SubBoard {
    SubBoard::from_pattern(pattern).expect("valid pattern")
}

fn position(patterns: [&str; BOARD_CELLS], to_move: Mark, active: Option<usize>) -> MetaBoard {
    MetaBoard::from_position(patterns.map(sub), to_move, active)
}

fn never_blunder() -> SearchConfig {
    SearchConfig::default().with_blunder_rate(0.0)
}

/// O owns boards 0 and 1 and can finish board 2 at cell 2 for the match.
fn o_to_win_match() -> MetaBoard {
    position(
        [
            "OOO......", "OOO......", "OO.XX....",
            ".........", "XX.......", ".........",
            ".........", ".........", ".........",
        ],
        Mark::O,
        Some(2),
    )
}

#[test]
fn test_hard_takes_immediate_meta_win() {
    let board = o_to_win_match();
    for depth in [1, 2, 4] {
        let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_depth(depth).with_time_budget(None));
        let report = bot.search(&board, None).expect("moves");
        assert_eq!(*report.mv(), Move::new(2, 2), "depth {depth}");
        assert_eq!(*report.score(), WIN_SCORE);
    }
}

#[test]
fn test_hard_as_x_takes_immediate_meta_win() {
    let board = o_to_win_match().mirrored();
    let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_depth(3));
    let report = bot.search(&board, None).expect("moves");
    assert_eq!(*report.mv(), Move::new(2, 2));
    assert_eq!(*report.score(), -WIN_SCORE);
}

#[test]
fn test_hard_avoids_sending_opponent_to_the_winning_board() {
    // X owns boards 0 and 1 and threatens board 2 at cell 2. Any O reply in
    // board 5 at cells 0-2 lets X reach board 2 next.
    let board = position(
        [
            "XXX......", "XXX......", "XX.O.....",
            ".........", ".........", ".........",
            ".........", ".........", ".........",
        ],
        Mark::O,
        Some(5),
    );
    let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_depth(2).with_time_budget(None));
    let report = bot.search(&board, None).expect("moves");
    assert_eq!(report.mv().board, 5);
    assert!(report.mv().cell >= 3, "walked into {}", report.mv());
    assert!(*report.score() > -WIN_SCORE);
}

#[test]
fn test_hard_search_is_deterministic_without_budget() {
    let board = MetaBoard::new().play(Move::new(4, 4)).expect("legal");
    let config = SearchConfig::default().with_depth(3).with_time_budget(None);
    let a = Bot::new(Difficulty::Hard, config.clone()).search(&board, None).expect("moves");
    let b = Bot::new(Difficulty::Hard, config).search(&board, None).expect("moves");
    assert_eq!(a.mv(), b.mv());
    assert_eq!(a.score(), b.score());
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(*a.depth_reached(), 3);
}

#[test]
fn test_zero_budget_still_returns_legal_move() {
    let board = MetaBoard::new();
    let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_time_budget(Some(Duration::ZERO)));
    let report = bot.search(&board, None).expect("moves");
    assert!(board.legal_moves().contains(report.mv()));
    assert!(*report.depth_reached() <= 1);
}

#[test]
fn test_cancelled_search_returns_promptly() {
    let cancel = AtomicBool::new(true);
    let bot = Bot::new(Difficulty::Hard, SearchConfig::default().with_depth(12).with_time_budget(None));
    let mut rng = StdRng::seed_from_u64(0);
    let mv = bot.choose_move(&MetaBoard::new(), &mut rng, Some(&cancel)).expect("moves");
    assert!(MetaBoard::new().legal_moves().contains(&mv));
}

#[test]
fn test_medium_wins_match_before_anything_else() {
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(greedy_move(&o_to_win_match(), 0.0, &mut rng), Some(Move::new(2, 2)));

    let bot = Bot::new(Difficulty::Medium, never_blunder());
    for _ in 0..10 {
        assert_eq!(bot.choose_move(&o_to_win_match(), &mut rng, None), Some(Move::new(2, 2)));
    }
}

#[test]
fn test_medium_blocks_opponent_match_win() {
    // O cannot win anything in board 2 but X could finish the match there.
    let board = position(
        [
            "XXX......", "XXX......", "XX.O.....",
            ".........", ".........", ".........",
            ".........", ".........", ".........",
        ],
        Mark::O,
        Some(2),
    );
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(greedy_move(&board, 0.0, &mut rng), Some(Move::new(2, 2)));
}

#[test]
fn test_medium_prefers_sub_board_win_over_block() {
    // Board 0: O threatens cell 2, X can win at cell 5. X to move.
    let board = position(
        [
            "OO.XX....", ".........", ".........",
            ".........", ".........", ".........",
            ".........", ".........", ".........",
        ],
        Mark::X,
        Some(0),
    );
    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(greedy_move(&board, 0.0, &mut rng), Some(Move::new(0, 5)));
}

#[test]
fn test_medium_blocks_sub_board_win() {
    // Board 0: only O threatens, at cell 2.
    let board = position(
        [
            "OO..X....", ".........", ".........",
            ".........", ".........", ".........",
            ".........", ".........", ".........",
        ],
        Mark::X,
        Some(0),
    );
    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(greedy_move(&board, 0.0, &mut rng), Some(Move::new(0, 2)));
}

#[test]
fn test_medium_takes_a_center_when_quiet() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..20 {
        let mv = greedy_move(&MetaBoard::new(), 0.0, &mut rng).expect("moves");
        assert_eq!(mv.cell, 4);
    }
}

#[test]
fn test_medium_always_blunders_at_rate_one() {
    // A certain blunder is a random move, which is almost never the single winning one.
    let board = o_to_win_match();
    let mut rng = StdRng::seed_from_u64(1);
    let picks: Vec<Move> = (0..30)
        .map(|_| greedy_move(&board, 1.0, &mut rng).expect("moves"))
        .collect();
    assert!(picks.iter().all(|mv| board.legal_moves().contains(mv)));
    assert!(picks.iter().any(|mv| *mv != Move::new(2, 2)));
}

#[test]
fn test_every_tier_returns_none_when_game_over() {
    let board = position(
        [
            "XXX......", "XXX......", "XXX......",
            ".........", ".........", ".........",
            ".........", ".........", ".........",
        ],
        Mark::O,
        None,
    );
    let mut rng = StdRng::seed_from_u64(0);
    for difficulty in Difficulty::iter() {
        assert_eq!(Bot::from(difficulty).choose_move(&board, &mut rng, None), None);
    }
}

#[test]
fn test_evaluate_scores_decided_matches() {
    let board = o_to_win_match().play(Move::new(2, 2)).expect("legal");
    assert_eq!(evaluate(&board), WIN_SCORE);
    assert_eq!(evaluate(&board.mirrored()), -WIN_SCORE);
}
