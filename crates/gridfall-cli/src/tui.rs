//! Minimal frame loop for the game screen.
//!
//! Unlike a fixed tick-rate loop, the update hook receives the wall-clock
//! time elapsed since the previous frame, which the engine's gravity clock
//! accumulates. Input events are drained between frames so held keys stay
//! responsive.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event};
use ratatui::Frame;

/// Target time between rendered frames (~30 FPS).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Hooks the frame loop calls on the application.
pub trait App {
    /// Returns whether the loop should stop.
    fn should_exit(&self) -> bool;

    /// Handles one terminal event (key input, resize, ...).
    fn handle_event(&mut self, event: &Event);

    /// Advances game time by the wall-clock duration since the last frame.
    fn update(&mut self, dt: Duration);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame<'_>);
}

/// Runs the application until it asks to exit.
///
/// Each iteration drains pending input, advances game time once, and renders
/// one frame. The terminal is restored when the closure returns.
pub fn run<A: App>(app: &mut A) -> io::Result<()> {
    ratatui::run(|terminal| {
        let mut last_update = Instant::now();
        while !app.should_exit() {
            let frame_deadline = Instant::now() + FRAME_INTERVAL;
            loop {
                let timeout = frame_deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                app.handle_event(&event::read()?);
                if timeout.is_zero() {
                    break;
                }
            }

            let now = Instant::now();
            app.update(now.duration_since(last_update));
            last_update = now;

            terminal.draw(|frame| app.draw(frame))?;
        }
        Ok(())
    })
}
