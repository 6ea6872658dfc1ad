//! Maps the game state into a terminal framebuffer.
//!
//! Pure layer: no I/O, so every screen can be unit-tested by inspecting
//! the produced framebuffer.

use crate::config::Records;
use crate::core::{Game, Session};
use crate::term::anim::{approach, UnitVisual, UnitVisuals};
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameMode, Rules};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Unit palette, indexed by color. Seven entries matches the color cap.
const PALETTE: [Rgb; 7] = [
    Rgb::new(220, 80, 80),
    Rgb::new(100, 220, 120),
    Rgb::new(90, 130, 230),
    Rgb::new(235, 215, 90),
    Rgb::new(210, 110, 220),
    Rgb::new(90, 210, 210),
    Rgb::new(255, 165, 0),
];

const BOARD_BG: Rgb = Rgb::new(28, 28, 36);
const TRACK_BG: Rgb = Rgb::new(42, 42, 54);
const SELECT_BG: Rgb = Rgb::new(90, 90, 60);
const RATE_SCORE: f32 = 8.0;

pub fn unit_color(color: i32) -> Rgb {
    PALETTE[color.rem_euclid(PALETTE.len() as i32) as usize]
}

/// Where the board landed inside the viewport this frame.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub start_x: u16,
    pub start_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    /// Screen center of board cell (0, 0), for the animation layer.
    pub origin: (f32, f32),
    cell_w: u16,
    cell_h: u16,
}

impl Layout {
    pub fn new(viewport: Viewport, board_w: i32, board_h: i32, cell_w: u16, cell_h: u16) -> Self {
        let frame_w = board_w as u16 * cell_w + 2;
        let frame_h = board_h as u16 * cell_h + 2;
        // Leave room for the side panel before centering.
        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;
        let origin = (
            (start_x + 1) as f32 + (cell_w as f32 - 1.0) / 2.0,
            (start_y + 1) as f32 + (cell_h as f32 - 1.0) / 2.0,
        );
        Self {
            start_x,
            start_y,
            frame_w,
            frame_h,
            origin,
            cell_w,
            cell_h,
        }
    }

    /// True when a pointer position lands inside the board frame. Used to
    /// suppress board selection while hovering the panel.
    pub fn hits_board(&self, col: u16, row: u16) -> bool {
        col > self.start_x
            && col < self.start_x + self.frame_w - 1
            && row > self.start_y
            && row < self.start_y + self.frame_h - 1
    }

    fn cell_rect(&self, x: i32, y: i32) -> (u16, u16) {
        (
            self.start_x + 1 + x as u16 * self.cell_w,
            self.start_y + 1 + y as u16 * self.cell_h,
        )
    }
}

const PANEL_W: u16 = 20;

/// Rule fields editable from the menu, in display order.
const MENU_ROWS: [&str; 6] = [
    "Width",
    "Height",
    "Colors",
    "Starting units",
    "Line length",
    "Diagonals",
];

/// Menu cursor plus the rules being edited. The edited copy only becomes
/// the live rule set when a game starts.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub rules: Rules,
    cursor: usize,
}

impl MenuState {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules: rules.clamped(),
            cursor: 0,
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.checked_sub(1).unwrap_or(MENU_ROWS.len() - 1);
    }

    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1) % MENU_ROWS.len();
    }

    /// Nudge the selected field and re-clamp, so dependent limits (like
    /// the line length cap following the dimensions) hold immediately.
    pub fn adjust(&mut self, delta: i32) {
        match self.cursor {
            0 => self.rules.width += delta,
            1 => self.rules.height += delta,
            2 => self.rules.num_colors += delta,
            3 => self.rules.initial_population += delta,
            4 => self.rules.line_length += delta,
            _ => self.rules.diagonal = !self.rules.diagonal,
        }
        self.rules = self.rules.clamped();
    }

    fn value(&self, row: usize) -> String {
        match row {
            0 => self.rules.width.to_string(),
            1 => self.rules.height.to_string(),
            2 => self.rules.num_colors.to_string(),
            3 => self.rules.initial_population.to_string(),
            4 => self.rules.line_length.to_string(),
            _ => if self.rules.diagonal { "on" } else { "off" }.to_string(),
        }
    }
}

pub struct GameView {
    cell_w: u16,
    cell_h: u16,
    /// HUD score eases toward the real score instead of jumping.
    display_score: f32,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell evens out the terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            display_score: 0.0,
        }
    }
}

impl GameView {
    pub fn cell_size(&self) -> (u16, u16) {
        (self.cell_w, self.cell_h)
    }

    pub fn layout(&self, viewport: Viewport, rules: &Rules) -> Layout {
        Layout::new(viewport, rules.width, rules.height, self.cell_w, self.cell_h)
    }

    /// Ease the HUD score toward the actual score.
    pub fn update(&mut self, dt: f32, score: u32) {
        self.display_score = approach(self.display_score, score as f32, RATE_SCORE, dt);
        if self.display_score > score as f32 {
            // A replay reset the score; drop instantly.
            self.display_score = score as f32;
        }
    }

    pub fn render(
        &self,
        game: &Game,
        session: &Session,
        visuals: &UnitVisuals,
        menu: &MenuState,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        fb.clear(CellStyle::default());

        match session.mode() {
            GameMode::Menu => self.render_menu(&mut fb, menu, &session.records, viewport),
            GameMode::Playing | GameMode::GameOver => {
                self.render_board(&mut fb, game, session, visuals, viewport);
                if session.mode() == GameMode::GameOver {
                    self.render_game_over(&mut fb, game, session, viewport);
                }
            }
        }

        fb
    }

    fn render_board(
        &self,
        fb: &mut FrameBuffer,
        game: &Game,
        session: &Session,
        visuals: &UnitVisuals,
        viewport: Viewport,
    ) {
        let rules = game.board().rules();
        let layout = self.layout(viewport, rules);

        // Conveyor track, playfield and frame.
        fb.fill_rect(
            layout.start_x + 1,
            layout.start_y + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            CellStyle::plain(Rgb::default(), TRACK_BG),
        );
        for x in 0..rules.width - 1 {
            for y in 1..rules.height - 1 {
                let (px, py) = layout.cell_rect(x, y);
                fb.fill_rect(
                    px,
                    py,
                    self.cell_w,
                    self.cell_h,
                    '·',
                    CellStyle {
                        fg: Rgb::new(70, 70, 85),
                        bg: BOARD_BG,
                        bold: false,
                        dim: true,
                    },
                );
            }
        }
        draw_frame(fb, layout.start_x, layout.start_y, layout.frame_w, layout.frame_h);

        // Selection highlight under the units.
        if let Some((sx, sy)) = game.selection() {
            let (px, py) = layout.cell_rect(sx, sy);
            fb.fill_rect(
                px,
                py,
                self.cell_w,
                self.cell_h,
                ' ',
                CellStyle::plain(Rgb::default(), SELECT_BG),
            );
        }

        // Units, at their animated positions.
        for (_, visual) in visuals.iter() {
            self.draw_unit(fb, &layout, visual);
        }

        self.render_panel(fb, game, session, &layout);
    }

    fn draw_unit(&self, fb: &mut FrameBuffer, layout: &Layout, visual: &UnitVisual) {
        let (cx, cy) = visual.pos;
        let sx = layout.origin.0 + cx * self.cell_w as f32 - (self.cell_w as f32 - 1.0) / 2.0;
        let sy = layout.origin.1 + cy * self.cell_h as f32 - (self.cell_h as f32 - 1.0) / 2.0;
        let (px, py) = (sx.round(), sy.round());
        if px < 0.0 || py < 0.0 {
            return;
        }

        let ch = glyph(visual);
        if ch == ' ' {
            return;
        }
        let style = CellStyle {
            fg: unit_color(visual.color),
            bg: TRACK_BG,
            bold: true,
            dim: visual.exit_progress().is_some(),
        };
        for dx in 0..self.cell_w {
            fb.put_char(px as u16 + dx, py as u16, ch, style);
        }
    }

    fn render_panel(&self, fb: &mut FrameBuffer, game: &Game, session: &Session, layout: &Layout) {
        let x = layout.start_x + layout.frame_w + 2;
        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::default();
        let dim = CellStyle {
            dim: true,
            ..CellStyle::default()
        };

        let rules = game.board().rules();
        let best = session.records.get(&rules.mode_string());

        let mut y = layout.start_y;
        fb.put_str(x, y, "SCORE", label);
        y += 1;
        fb.put_str(x, y, &format!("{}", self.display_score.round() as u32), value);
        y += 2;
        fb.put_str(x, y, "BEST", label);
        y += 1;
        fb.put_str(x, y, &best.to_string(), value);
        y += 2;
        fb.put_str(x, y, &rules.mode_string(), dim);
        y += 2;
        fb.put_str(x, y, "[n] new board", dim);
        y += 1;
        fb.put_str(x, y, "[r] replay", dim);
        y += 1;
        fb.put_str(x, y, "[esc] menu", dim);
        y += 1;
        fb.put_str(x, y, "[q] quit", dim);
    }

    fn render_menu(
        &self,
        fb: &mut FrameBuffer,
        menu: &MenuState,
        records: &Records,
        viewport: Viewport,
    ) {
        let w = viewport.width;
        let title = CellStyle {
            fg: Rgb::new(235, 215, 90),
            bold: true,
            ..CellStyle::default()
        };
        let label = CellStyle::default();
        let selected = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(60, 60, 80),
            bold: true,
            dim: false,
        };
        let dim = CellStyle {
            dim: true,
            ..CellStyle::default()
        };

        let top = viewport.height.saturating_sub(MENU_ROWS.len() as u16 + 8) / 2;
        fb.put_str_centered(0, w, top, "R I N G L I N E", title);

        for (i, name) in MENU_ROWS.iter().enumerate() {
            let style = if i == menu.cursor { selected } else { label };
            let line = format!("{:<16} {:>3}", name, menu.value(i));
            fb.put_str_centered(0, w, top + 2 + i as u16, &line, style);
        }

        let y = top + 3 + MENU_ROWS.len() as u16;
        let best = records.get(&menu.rules.mode_string());
        fb.put_str_centered(0, w, y, &format!("best for this setup: {best}"), dim);
        fb.put_str_centered(
            0,
            w,
            y + 2,
            "[up/down] select  [left/right] adjust  [enter] play  [q] quit",
            dim,
        );
    }

    fn render_game_over(
        &self,
        fb: &mut FrameBuffer,
        game: &Game,
        session: &Session,
        viewport: Viewport,
    ) {
        let rules = game.board().rules();
        let layout = self.layout(viewport, rules);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(120, 30, 30),
            bold: true,
            dim: false,
        };

        let best = session.records.get(&rules.mode_string());
        let mid = layout.start_y + layout.frame_h / 2;
        fb.put_str_centered(layout.start_x, layout.frame_w, mid, " GAME OVER ", style);
        fb.put_str_centered(
            layout.start_x,
            layout.frame_w,
            mid + 1,
            &format!(" score {}  best {} ", game.board().score(), best),
            style,
        );
    }
}

fn draw_frame(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    let style = CellStyle::default();
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Glyph for a unit at its current animation stage.
fn glyph(visual: &UnitVisual) -> char {
    if let Some(progress) = visual.exit_progress() {
        return match progress {
            p if p >= 1.0 => ' ',
            p if p > 0.66 => '░',
            p if p > 0.33 => '▒',
            _ => '▓',
        };
    }
    match visual.scale {
        s if s >= 0.95 => '█',
        s if s >= 0.5 => '▓',
        _ => '·',
    }
}
