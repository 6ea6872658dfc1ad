//! Terminal runner: event loop, input wiring and config persistence.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use log::info;

use ringline::config::Config;
use ringline::core::{BoardEvent, Game, Session, SimpleRng, TickInput};
use ringline::term::{GameView, MenuState, TerminalRenderer, UnitVisuals, Viewport};
use ringline::types::{GameMode, TICK_MS};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load();
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always restore the terminal, even on error.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: Config) -> Result<()> {
    let mut session = Session::new(config.records);
    let mut menu = MenuState::new(config.rules);
    let mut game = Game::new(menu.rules, SimpleRng::from_time().next_u32());
    let mut visuals = UnitVisuals::new();
    visuals.apply(&game.take_events());
    let mut view = GameView::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut pointer: (u16, u16) = (0, 0);
    let mut clicked = false;

    loop {
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('q') {
                        break;
                    }
                    match session.mode() {
                        GameMode::Menu => match key.code {
                            KeyCode::Up => menu.cursor_up(),
                            KeyCode::Down => menu.cursor_down(),
                            KeyCode::Left => menu.adjust(-1),
                            KeyCode::Right => menu.adjust(1),
                            KeyCode::Enter => {
                                game.new_board(menu.rules);
                                visuals = UnitVisuals::new();
                                session.request_mode(GameMode::Playing);
                            }
                            _ => {}
                        },
                        GameMode::Playing | GameMode::GameOver => match key.code {
                            KeyCode::Esc => session.request_mode(GameMode::Menu),
                            KeyCode::Char('n') => {
                                game.new_board(menu.rules);
                                visuals = UnitVisuals::new();
                                session.request_mode(GameMode::Playing);
                            }
                            KeyCode::Char('r') => {
                                game.replay();
                                visuals = UnitVisuals::new();
                                session.request_mode(GameMode::Playing);
                            }
                            _ => {}
                        },
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        pointer = (mouse.column, mouse.row);
                    }
                    MouseEventKind::Down(MouseButton::Left) => {
                        pointer = (mouse.column, mouse.row);
                        clicked = true;
                    }
                    _ => {}
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let dt = TICK_MS as f32 / 1000.0;

            if let Some(mode) = session.apply_pending() {
                info!("mode -> {}", mode.as_str());
            }

            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let viewport = Viewport::new(w, h);
            let layout = view.layout(viewport, game.board().rules());
            let (cell_w, cell_h) = view.cell_size();
            visuals.set_layout(layout.origin, cell_w as f32, cell_h as f32);

            let input = TickInput {
                pointer: (pointer.0 as f32, pointer.1 as f32),
                clicked,
                over_ui: !layout.hits_board(pointer.0, pointer.1),
            };
            clicked = false;

            game.tick(&mut session, &input, &visuals);

            let events = game.take_events();
            if events.contains(&BoardEvent::GameOver) {
                info!(
                    "game over: score {} on {}",
                    game.board().score(),
                    game.board().rules().mode_string()
                );
            }
            visuals.apply(&events);
            visuals.sweep(game.board().units());
            visuals.update(dt);
            view.update(dt, game.board().score());

            let mut frame = view.render(&game, &session, &visuals, &menu, viewport);
            term.draw_swap(&mut frame)?;
        }
    }

    Config {
        rules: menu.rules,
        records: session.records,
    }
    .save()
}
