//! Test helper functions for setting up sessions and boards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::board::{Board, Coordinate};
use crate::input::{Input, InputKind};
use crate::rules::LevelConfig;
use crate::session::Session;
use crate::tile::Tile;

/// Installs a test tracing subscriber once per process; repeated calls are
/// no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Parses a fixture board, panicking with the parse error on bad fixtures.
pub fn board(text: &str) -> Board {
    match Board::from_text(text) {
        Ok(board) => board,
        Err(error) => panic!("bad fixture board: {error}"),
    }
}

/// Builds a standard-level session around a fixture board.
pub fn standard_session(text: &str) -> Session {
    init_tracing();
    match Session::new(&LevelConfig::standard(), board(text)) {
        Ok(session) => session,
        Err(error) => panic!("fixture session refused to start: {error}"),
    }
}

/// Builds a session for an arbitrary level configuration.
pub fn session_for(config: &LevelConfig, text: &str) -> Session {
    init_tracing();
    match Session::new(config, board(text)) {
        Ok(session) => session,
        Err(error) => panic!("fixture session refused to start: {error}"),
    }
}

/// Registers a recording listener for one event kind and returns the shared
/// record of everything delivered to it.
pub fn record(session: &mut Session, kind: InputKind) -> Rc<RefCell<Vec<Input>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.bus_mut().register(kind, move |event| {
        sink.borrow_mut().push(event.clone());
    });
    seen
}

/// A finalized touch gesture on a cell.
pub fn touch(row: i32, col: i32) -> Input {
    Input::Touch {
        at: Coordinate::new(row, col),
        tile: Tile::Empty,
    }
}

/// A held press on a cell.
pub fn touch_began(row: i32, col: i32) -> Input {
    Input::TouchBegan {
        at: Coordinate::new(row, col),
    }
}

/// Reads a monster's hp, panicking if the cell holds no monster.
pub fn monster_hp(session: &Session, row: i32, col: i32) -> i32 {
    session
        .board()
        .get(Coordinate::new(row, col))
        .and_then(Tile::as_monster)
        .map_or_else(|| panic!("no monster at ({row}, {col})"), |m| m.hp)
}

/// Reads the player's hp, panicking if the board has no player.
pub fn player_hp(session: &Session) -> i32 {
    session
        .board()
        .player()
        .map_or_else(|| panic!("board has no player"), |(_, p)| p.hp)
}
