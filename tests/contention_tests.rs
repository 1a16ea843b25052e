//! Contention tests.
//!
//! Tests for thread safety:
//! - First-card waits resolve when the card is released
//! - Unrelated players never block behind a waiter
//! - Disjoint flips never deadlock
//! - Randomized interleavings keep every invariant

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use memory_grid::board::Board;
use memory_grid::core::{BoardConfig, FlipError, PlayerId, Position};
use memory_grid::flip::TurnPhase;
use memory_grid::grid::BoardSpec;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn checked_board(text: &str) -> Board {
    let config = BoardConfig::new().with_invariant_checks(true);
    Board::with_config(BoardSpec::parse(text).unwrap(), config)
}

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

/// Spin until `cond` holds, failing the test after a generous deadline.
fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "gave up waiting for {}", what);
        thread::sleep(Duration::from_millis(1));
    }
}

/// Test that a contended first card suspends, an unrelated player keeps
/// going, and the waiter gets the card once it is released.
#[test]
fn test_waiter_resumes_after_release() {
    init_tracing();
    let board = Arc::new(checked_board("3x3\nA\nB\nC\nA\nB\nC\nD\nD\nE\n"));
    let alice = PlayerId::new("alice");
    let bob = PlayerId::new("bob");
    let charlie = PlayerId::new("charlie");

    board.flip(&alice, p(0, 0)).unwrap();

    let waiter = {
        let board = Arc::clone(&board);
        let bob = bob.clone();
        thread::spawn(move || board.flip(&bob, p(0, 0)))
    };
    wait_until("bob to park on (0, 0)", || board.waiting_on(p(0, 0)) == 1);

    // Charlie is not blocked by the waiter.
    board.flip(&charlie, p(0, 1)).unwrap();
    board.flip(&charlie, p(1, 1)).unwrap();
    assert_eq!(board.session(&charlie).phase(), TurnPhase::HoldingPair);
    assert_eq!(board.waiting_on(p(0, 0)), 1);

    // A mismatch releases (0, 0).
    board.flip(&alice, p(0, 2)).unwrap();
    waiter.join().unwrap().unwrap();

    let bob_view = board.look(&bob);
    assert!(bob_view.starts_with("3x3\nmy A\nup B\nup C\n"), "{}", bob_view);
    assert_eq!(board.waiting_on(p(0, 0)), 0);
    board.check_invariants();
}

/// Test that a waiter whose card is removed wakes up and fails cleanly.
#[test]
fn test_waiter_sees_removed_card() {
    init_tracing();
    let board = Arc::new(checked_board("2x2\nA\nB\nA\nB\n"));
    let alice = PlayerId::new("alice");

    board.flip(&alice, p(0, 0)).unwrap();
    board.flip(&alice, p(1, 0)).unwrap();

    let waiter = {
        let board = Arc::clone(&board);
        thread::spawn(move || board.flip(&PlayerId::new("bob"), p(0, 0)))
    };
    wait_until("bob to park on (0, 0)", || board.waiting_on(p(0, 0)) == 1);

    // Alice's next turn removes the matched pair.
    board.flip(&alice, p(0, 1)).unwrap();

    assert_eq!(waiter.join().unwrap(), Err(FlipError::NoCardAtPosition(p(0, 0))));
    board.check_invariants();
}

/// Test that several waiters on one card all wake, and exactly one wins.
#[test]
fn test_many_waiters_one_winner() {
    init_tracing();
    const WAITERS: usize = 4;
    let board = Arc::new(checked_board("1x3\nA\nB\nC\n"));
    let alice = PlayerId::new("alice");

    board.flip(&alice, p(0, 0)).unwrap();

    let handles: Vec<_> = (0..WAITERS)
        .map(|i| {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                let player = PlayerId::new(format!("waiter{}", i));
                board.flip_timeout(&player, p(0, 0), Duration::from_secs(1)).map(|()| player)
            })
        })
        .collect();
    wait_until("every waiter to park", || board.waiting_on(p(0, 0)) == WAITERS);

    board.flip(&alice, p(0, 1)).unwrap();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in &results {
        if let Err(err) = result {
            assert_eq!(*err, FlipError::TimedOut(p(0, 0)));
        }
    }

    assert!(board.cell(p(0, 0)).unwrap().is_controlled_by(winners[0]));
    assert_eq!(board.waiting_on(p(0, 0)), 0);
    board.check_invariants();
}

/// Test that concurrent flips on disjoint cells never deadlock.
#[test]
fn test_concurrent_disjoint_flips() {
    init_tracing();
    const PLAYERS: usize = 8;

    let mut text = format!("{}x4\n", PLAYERS);
    for i in 0..PLAYERS {
        text.push_str(&format!("X{i}\nX{i}\nY{i}\nY{i}\n"));
    }
    let board = Arc::new(checked_board(&text));
    let barrier = Arc::new(Barrier::new(PLAYERS));

    let handles: Vec<_> = (0..PLAYERS)
        .map(|i| {
            let board = Arc::clone(&board);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                let player = PlayerId::new(format!("player{}", i));
                barrier.wait();

                for col in 0..4 {
                    board.flip(&player, p(i, col)).unwrap();
                }
                player
            })
        })
        .collect();

    for h in handles {
        let player = h.join().unwrap();
        assert_eq!(board.session(&player).phase(), TurnPhase::HoldingPair);
    }

    board.check_invariants();
    for i in 0..PLAYERS {
        assert!(board.cell(p(i, 0)).unwrap().card.is_none());
        assert!(board.cell(p(i, 2)).unwrap().face_up);
    }
}

/// Test that bounded waits that all expire leave no tickets behind.
#[test]
fn test_concurrent_timeouts_clean_up() {
    init_tracing();
    const WAITERS: usize = 6;
    let board = Arc::new(checked_board("1x2\nA\nA\n"));
    board.flip(&PlayerId::new("holder"), p(0, 1)).unwrap();

    let barrier = Arc::new(Barrier::new(WAITERS));
    let handles: Vec<_> = (0..WAITERS)
        .map(|i| {
            let board = Arc::clone(&board);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let player = PlayerId::new(format!("waiter{}", i));
                board.flip_timeout(&player, p(0, 1), Duration::from_millis(20))
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), Err(FlipError::TimedOut(p(0, 1))));
    }
    assert_eq!(board.waiting_on(p(0, 1)), 0);
    board.check_invariants();
}

/// Test randomized interleavings from seeded players.
///
/// Every outcome is a documented one, and the board satisfies every
/// invariant when the dust settles.
#[test]
fn test_random_stress() {
    init_tracing();
    const PLAYERS: usize = 4;
    const FLIPS: usize = 200;
    const SEED: u64 = 0x6d65_6d6f;

    let board = Arc::new(checked_board(
        "4x4\nA\nB\nC\nD\nE\nF\nG\nH\nA\nB\nC\nD\nE\nF\nG\nH\n",
    ));
    let barrier = Arc::new(Barrier::new(PLAYERS));

    let handles: Vec<_> = (0..PLAYERS)
        .map(|i| {
            let board = Arc::clone(&board);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(SEED + i as u64);
                let player = PlayerId::new(format!("player{}", i));
                barrier.wait();

                let mut timeouts = 0;
                for _ in 0..FLIPS {
                    let pos = p(rng.gen_range(0..4), rng.gen_range(0..4));
                    match board.flip_timeout(&player, pos, Duration::from_millis(5)) {
                        Ok(())
                        | Err(FlipError::NoCardAtPosition(_))
                        | Err(FlipError::CardControlledByAnother(_)) => {}
                        Err(FlipError::TimedOut(at)) => {
                            assert_eq!(at, pos);
                            timeouts += 1;
                        }
                        Err(other) => panic!("unexpected error: {}", other),
                    }
                }
                timeouts
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    board.check_invariants();
    for i in 0..16 {
        assert_eq!(board.waiting_on(Position::from_index(i, 4)), 0);
    }
    assert_eq!(board.watcher_count(), 0);
}
