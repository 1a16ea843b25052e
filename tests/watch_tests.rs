//! Change-watch tests.
//!
//! Watchers park until the next board change and are woken exactly once
//! per change they were registered for.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use memory_grid::board::Board;
use memory_grid::cards::Card;
use memory_grid::core::{BoardConfig, FlipError, PlayerId, Position};
use memory_grid::grid::BoardSpec;

fn board() -> Arc<Board> {
    let config = BoardConfig::new().with_invariant_checks(true);
    Arc::new(Board::with_config(BoardSpec::parse("2x2\nA\nB\nA\nB\n").unwrap(), config))
}

fn wait_for_watchers(board: &Board, count: usize) {
    while board.watcher_count() < count {
        thread::sleep(Duration::from_millis(1));
    }
}

/// Test that a flip wakes a parked watcher.
#[test]
fn test_flip_wakes_watcher() {
    let board = board();
    let watcher = {
        let board = Arc::clone(&board);
        thread::spawn(move || board.watch())
    };
    wait_for_watchers(&board, 1);

    board.flip(&PlayerId::new("alice"), Position::new(0, 0)).unwrap();

    watcher.join().unwrap().unwrap();
    assert_eq!(board.watcher_count(), 0);
}

/// Test that every watcher parked at the time of a change is woken.
#[test]
fn test_all_watchers_wake() {
    const WATCHERS: usize = 5;
    let board = board();
    let barrier = Arc::new(Barrier::new(WATCHERS));

    let handles: Vec<_> = (0..WATCHERS)
        .map(|_| {
            let board = Arc::clone(&board);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                board.watch_timeout(Duration::from_secs(5))
            })
        })
        .collect();
    wait_for_watchers(&board, WATCHERS);

    board.map(|_| Card::new("Z"));

    for h in handles {
        assert_eq!(h.join().unwrap(), Ok(()));
    }
}

/// Test that a watcher registered after a change waits for the next one.
#[test]
fn test_late_watcher_misses_earlier_change() {
    let board = board();
    board.flip(&PlayerId::new("alice"), Position::new(0, 0)).unwrap();

    assert_eq!(board.watch_timeout(Duration::from_millis(20)), Err(FlipError::WatchTimedOut));
    assert_eq!(board.watcher_count(), 0);
}

/// Test that failed flips that change nothing wake nobody.
#[test]
fn test_failed_flip_is_silent() {
    let board = board();
    let watcher = {
        let board = Arc::clone(&board);
        thread::spawn(move || board.watch_timeout(Duration::from_millis(100)))
    };
    wait_for_watchers(&board, 1);

    let err = board.flip(&PlayerId::new("alice"), Position::new(5, 5)).unwrap_err();
    assert!(matches!(err, FlipError::OutOfBounds { .. }));

    assert_eq!(watcher.join().unwrap(), Err(FlipError::WatchTimedOut));
}

/// Test the configured default watch bound.
#[test]
fn test_configured_watch_timeout() {
    let config = BoardConfig::new().with_watch_timeout(Duration::from_millis(10));
    let board = Board::with_config(BoardSpec::parse("1x1\nA\n").unwrap(), config);

    assert_eq!(board.watch(), Err(FlipError::WatchTimedOut));
    assert_eq!(board.config().watch_timeout, Some(Duration::from_millis(10)));
}
