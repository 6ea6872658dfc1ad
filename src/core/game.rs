//! Turn controller: one fixed-step tick that sequences animation,
//! conveyor advance, matching, game-over detection and input.
//!
//! Every tick runs at most one of those steps, so cascades resolve one
//! visible stage at a time and the player only acts on a quiescent board.

use crate::config::Records;
use crate::core::board::{Board, BoardEvent};
use crate::core::rng::SimpleRng;
use crate::core::select;
use crate::types::{GameMode, Phase, Rules, UnitId};

/// What the rule side needs to know about the presentation: whether a
/// unit's visual caught up with its logical cell, and where a cell sits on
/// screen for pointer snapping.
pub trait Presenter {
    fn is_settled(&self, id: UnitId) -> bool;
    fn cell_to_screen(&self, x: i32, y: i32) -> (f32, f32);
}

/// Pointer state sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub pointer: (f32, f32),
    pub clicked: bool,
    /// The pointer hovers a UI element; board selection is suppressed.
    pub over_ui: bool,
}

/// Cross-board state: the current mode, a deferred mode switch, and the
/// per-rule-set record table.
///
/// Mode switches are requested during a tick but applied between ticks, so
/// every collaborator inside one tick sees a consistent mode.
#[derive(Debug, Clone)]
pub struct Session {
    mode: GameMode,
    pending: Option<GameMode>,
    pub records: Records,
}

impl Session {
    pub fn new(records: Records) -> Self {
        Self {
            mode: GameMode::Menu,
            pending: None,
            records,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn request_mode(&mut self, mode: GameMode) {
        self.pending = Some(mode);
    }

    /// Apply a pending mode switch. Returns the new mode when an actual
    /// transition happened, so the caller can react to it once.
    pub fn apply_pending(&mut self) -> Option<GameMode> {
        let next = self.pending.take()?;
        if next == self.mode {
            return None;
        }
        self.mode = next;
        Some(next)
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    phase: Phase,
    selection: Option<(i32, i32)>,
    /// Seed the current board was built from; kept for replays.
    board_seed: u32,
    seeds: SimpleRng,
}

impl Game {
    pub fn new(rules: Rules, seed: u32) -> Self {
        let mut seeds = SimpleRng::new(seed);
        let board_seed = seeds.next_u32();
        Self {
            board: Board::new(rules, board_seed),
            phase: Phase::Idle,
            selection: None,
            board_seed,
            seeds,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Currently highlighted border cell, if any.
    pub fn selection(&self) -> Option<(i32, i32)> {
        self.selection
    }

    /// Drain board events queued since the last call.
    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        self.board.take_events()
    }

    /// Start over on a freshly seeded board.
    pub fn new_board(&mut self, rules: Rules) {
        self.board_seed = self.seeds.next_u32();
        self.reset(rules);
    }

    /// Rebuild the current board from its original seed: the same starting
    /// layout and the same upcoming conveyor colors.
    pub fn replay(&mut self) {
        let rules = *self.board.rules();
        self.reset(rules);
    }

    fn reset(&mut self, rules: Rules) {
        self.board = Board::new(rules, self.board_seed);
        self.phase = Phase::Idle;
        self.selection = None;
    }

    /// One fixed-step update. Steps run in a strict order and each
    /// board-changing step ends the tick, so the presentation settles
    /// between stages of a cascade.
    pub fn tick(&mut self, session: &mut Session, input: &TickInput, presenter: &impl Presenter) {
        self.board.clear_busy();
        self.board.prune_exits(|id| presenter.is_settled(id));

        // 1. Wait for visuals to catch up with the last mutation.
        if self.board.any_unsettled(|id| presenter.is_settled(id)) {
            self.phase = Phase::Animating;
            return;
        }

        // 2. Close conveyor gaps before anything else may run.
        self.board.advance_border();
        if self.board.busy() {
            self.phase = Phase::Settling;
            return;
        }

        if session.mode() != GameMode::Playing {
            self.selection = None;
            self.phase = Phase::Idle;
            return;
        }

        // 3. Matching; a removal may expose new gaps, so the cascade loops
        //    back through step 2 next tick.
        if self.board.find_and_remove_lines() > 0 {
            let mode = self.board.rules().mode_string();
            session.records.submit(&mode, self.board.score());
            self.phase = Phase::Settling;
            return;
        }

        // 4. Only a quiescent, matchless board can be dead.
        if self.board.detect_game_over() {
            self.board.emit(BoardEvent::GameOver);
            session.request_mode(GameMode::GameOver);
            self.phase = Phase::GameOver;
            return;
        }

        // 5. Input: snap the pointer to the border and resolve clicks.
        self.phase = Phase::Idle;
        if input.over_ui {
            self.selection = None;
            return;
        }
        let (w, h) = (self.board.width(), self.board.height());
        let cell = select::resolve(w, h, input.pointer, &|x, y| presenter.cell_to_screen(x, y));
        self.selection = Some(cell);

        if input.clicked {
            self.board.push(cell.0, cell.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Presenter whose visuals are always caught up; cells map 1:1 to
    /// screen units.
    struct Instant;

    impl Presenter for Instant {
        fn is_settled(&self, _id: UnitId) -> bool {
            true
        }

        fn cell_to_screen(&self, x: i32, y: i32) -> (f32, f32) {
            (x as f32, y as f32)
        }
    }

    /// Presenter that never settles.
    struct Frozen;

    impl Presenter for Frozen {
        fn is_settled(&self, _id: UnitId) -> bool {
            false
        }

        fn cell_to_screen(&self, x: i32, y: i32) -> (f32, f32) {
            (x as f32, y as f32)
        }
    }

    fn rules() -> Rules {
        Rules {
            width: 6,
            height: 6,
            num_colors: 3,
            initial_population: 0,
            // Long lines keep random boards from matching by accident.
            line_length: 6,
            diagonal: false,
        }
    }

    fn playing_session() -> Session {
        let mut session = Session::new(Records::default());
        session.request_mode(GameMode::Playing);
        session.apply_pending();
        session
    }

    fn idle_input() -> TickInput {
        TickInput {
            pointer: (3.0, 0.0),
            clicked: false,
            over_ui: false,
        }
    }

    #[test]
    fn test_tick_waits_for_unsettled_visuals() {
        let mut game = Game::new(rules(), 7);
        let mut session = playing_session();
        game.tick(&mut session, &idle_input(), &Frozen);
        assert_eq!(game.phase(), Phase::Animating);
        // Nothing else ran: no selection was resolved.
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn test_quiescent_tick_resolves_selection() {
        let mut game = Game::new(rules(), 7);
        let mut session = playing_session();
        game.tick(&mut session, &idle_input(), &Instant);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.selection(), Some((3, 0)));
    }

    #[test]
    fn test_selection_suppressed_over_ui() {
        let mut game = Game::new(rules(), 7);
        let mut session = playing_session();
        let input = TickInput {
            over_ui: true,
            ..idle_input()
        };
        game.tick(&mut session, &input, &Instant);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.selection(), None);
    }

    #[test]
    fn test_click_pushes_selected_cell() {
        let mut game = Game::new(rules(), 7);
        let mut session = playing_session();
        let input = TickInput {
            clicked: true,
            ..idle_input()
        };
        game.tick(&mut session, &input, &Instant);

        // The top-row unit moved inward and the conveyor refilled behind
        // it, so the interior gained a unit.
        assert!(game.board().grid().is_occupied(3, 4));
        game.board().assert_occupancy_invariant();
    }

    #[test]
    fn test_menu_mode_skips_input() {
        let mut game = Game::new(rules(), 7);
        let mut session = Session::new(Records::default());
        let input = TickInput {
            clicked: true,
            ..idle_input()
        };
        game.tick(&mut session, &input, &Instant);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.selection(), None);
        assert!(game.board().grid().is_empty(3, 4));
    }

    #[test]
    fn test_replay_rebuilds_identical_board() {
        let mut game = Game::new(rules(), 7);
        let colors: Vec<_> = game.board().units().iter().map(|u| u.color).collect();

        // Disturb the board, then replay.
        game.board.push(3, 0);
        game.replay();

        let replayed: Vec<_> = game.board().units().iter().map(|u| u.color).collect();
        assert_eq!(colors, replayed);
        assert_eq!(game.board().score(), 0);
    }

    #[test]
    fn test_new_board_reseeds() {
        let mut game = Game::new(rules(), 7);
        let colors: Vec<_> = game.board().units().iter().map(|u| u.color).collect();

        game.new_board(rules());
        let fresh: Vec<_> = game.board().units().iter().map(|u| u.color).collect();
        // 20 units of 3 colors from a different seed; identical sequences
        // would mean the reseed did nothing.
        assert_ne!(colors, fresh);
    }

    #[test]
    fn test_game_over_requests_mode_switch() {
        // Width 2: the playfield is a single column, which fills up by
        // pushing each right-hand conveyor cell leftward once.
        let rules = Rules {
            width: 2,
            height: 10,
            num_colors: 3,
            initial_population: 0,
            line_length: 10,
            diagonal: false,
        };
        let mut game = Game::new(rules, 7);
        let mut session = playing_session();

        let mut guard = 0;
        let mut row = 1;
        while game.phase() != Phase::GameOver {
            let input = TickInput {
                pointer: (1.0, row as f32),
                clicked: true,
                over_ui: false,
            };
            game.tick(&mut session, &input, &Instant);
            row = if row >= 8 { 1 } else { row + 1 };
            guard += 1;
            assert!(guard < 10_000, "board never filled up");
        }

        assert_eq!(session.apply_pending(), Some(GameMode::GameOver));
        let events = game.take_events();
        assert!(events.contains(&BoardEvent::GameOver));
    }

    #[test]
    fn test_session_mode_switch_is_deferred() {
        let mut session = Session::new(Records::default());
        session.request_mode(GameMode::Playing);
        assert_eq!(session.mode(), GameMode::Menu);
        assert_eq!(session.apply_pending(), Some(GameMode::Playing));
        assert_eq!(session.mode(), GameMode::Playing);
        // Re-applying the same mode is not a transition.
        session.request_mode(GameMode::Playing);
        assert_eq!(session.apply_pending(), None);
    }
}
