//! Crossterm terminal renderer
//!
//! Frames are composed into plain text lines first, then written in one
//! batched pass. Output errors are logged and never reach the tick loop.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::warn;

use crate::game::constants::render::{BOUNDARY_HIT_SYMBOL, COLLISION_SYMBOL, EFFECT_FRAMES};
use crate::game::constants::vehicle::SYMBOL as VEHICLE_SYMBOL;
use crate::game::outcome::EndReason;
use crate::input::Direction;
use crate::render::{Frame, Renderer};

/// Row of the first track line; row 0 is the HUD
const TRACK_TOP: usize = 1;
const HELP_LINE: &str = "a/d steer  w/s speed  q quit";

/// Short-lived marker drawn over the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub x: i32,
    pub y: i32,
    pub symbol: char,
    pub frames_left: u32,
}

impl Effect {
    fn boundary_hit(x: i32, y: i32, direction: Direction) -> Self {
        let x = match direction {
            Direction::Left => x - 1,
            Direction::Right => x + 1,
            Direction::Up | Direction::Down => x,
        };
        Self {
            x,
            y,
            symbol: BOUNDARY_HIT_SYMBOL,
            frames_left: EFFECT_FRAMES,
        }
    }

    fn collision(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            symbol: COLLISION_SYMBOL,
            frames_left: EFFECT_FRAMES,
        }
    }
}

/// Lay out a frame as text: HUD, track rows, optional debug lines, help
pub fn compose_frame(frame: &Frame, effects: &[Effect]) -> Vec<String> {
    let track = &frame.track;
    let mut grid = track.rows();

    let mut put = |x: i32, y: i32, ch: char| {
        if x >= 0 && y >= 0 {
            if let Some(cell) = grid.get_mut(y as usize).and_then(|row| row.get_mut(x as usize)) {
                *cell = ch;
            }
        }
    };

    put(frame.vehicle.x, frame.vehicle.y, frame.vehicle.symbol);
    for effect in effects {
        put(effect.x, effect.y, effect.symbol);
    }

    let mut lines = Vec::with_capacity(grid.len() + 4);
    lines.push(format!(
        "Score: {:>6}  Time: {:>3}s  Speed: {}  Level: {}",
        frame.score, frame.remaining_seconds, frame.vehicle.speed, track.difficulty_level
    ));
    lines.extend(grid.into_iter().map(|row| row.into_iter().collect::<String>()));

    if let Some(timing) = &frame.timing {
        lines.push(format!(
            "tick {:.2}ms avg  {:.2}ms p95  {:.0}% budget ({})",
            timing.average.as_secs_f64() * 1000.0,
            timing.p95.as_secs_f64() * 1000.0,
            timing.budget_percent,
            timing.status
        ));
        lines.push(format!(
            "distance {}  obstacles {}  pos ({}, {}){}",
            track.distance_traveled,
            track.obstacles.len(),
            frame.vehicle.x,
            frame.vehicle.y,
            if frame.vehicle.crashed { "  CRASHED" } else { "" }
        ));
    }

    lines.push(HELP_LINE.to_string());
    lines
}

fn color_for(ch: char, boundary: char) -> Option<Color> {
    if ch == boundary {
        return Some(Color::DarkGrey);
    }
    match ch {
        VEHICLE_SYMBOL => Some(Color::Green),
        '*' => Some(Color::Yellow),
        '>' => Some(Color::Magenta),
        'Z' => Some(Color::Cyan),
        COLLISION_SYMBOL | BOUNDARY_HIT_SYMBOL => Some(Color::Red),
        _ => None,
    }
}

pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    color: bool,
    effects: Vec<Effect>,
    /// Suppresses repeated warnings once the output is broken
    write_failed: bool,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            effects: Vec::new(),
            write_failed: false,
        }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let lines = compose_frame(frame, &self.effects);
        let track_rows = TRACK_TOP..TRACK_TOP + frame.track.height.max(0) as usize;
        let boundary = frame.track.boundary_symbol;

        queue!(self.out, MoveTo(0, 0))?;
        for (row, line) in lines.iter().enumerate() {
            if self.color && track_rows.contains(&row) {
                for ch in line.chars() {
                    match color_for(ch, boundary) {
                        Some(color) => queue!(self.out, SetForegroundColor(color), Print(ch), ResetColor)?,
                        None => queue!(self.out, Print(ch))?,
                    }
                }
            } else {
                queue!(self.out, Print(line))?;
            }
            queue!(self.out, Clear(ClearType::UntilNewLine), Print("\r\n"))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        self.out.flush()
    }

    fn draw_game_over(&mut self, score: i64, reason: &EndReason) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        if self.color {
            let color = if reason.is_crash() { Color::Red } else { Color::Yellow };
            queue!(self.out, SetForegroundColor(color), Print("GAME OVER"), ResetColor)?;
        } else {
            queue!(self.out, Print("GAME OVER"))?;
        }
        queue!(
            self.out,
            Print("\r\n"),
            Print(reason.message()),
            Print("\r\n"),
            Print(format!("Final score: {}", score)),
            Print("\r\n")
        )?;
        self.out.flush()
    }

    fn report(&mut self, result: io::Result<()>) {
        match result {
            Ok(()) => self.write_failed = false,
            Err(e) if !self.write_failed => {
                warn!("Terminal write failed: {}", e);
                self.write_failed = true;
            }
            Err(_) => {}
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        let result = self.draw(frame);
        self.report(result);

        self.effects.retain_mut(|effect| {
            effect.frames_left = effect.frames_left.saturating_sub(1);
            effect.frames_left > 0
        });
    }

    fn show_game_over(&mut self, score: i64, reason: &EndReason) {
        self.effects.clear();
        let result = self.draw_game_over(score, reason);
        self.report(result);
    }

    fn show_boundary_hit_effect(&mut self, x: i32, y: i32, direction: Direction) {
        self.effects.push(Effect::boundary_hit(x, y, direction));
    }

    fn show_collision_effect(&mut self, x: i32, y: i32, _symbol: char) {
        self.effects.push(Effect::collision(x, y));
    }
}
