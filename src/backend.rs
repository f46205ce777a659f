//! Crossterm surface for the renderer's draw operations
//!
//! Executes `DrawOp`s on a real terminal using cell-grid metrics (one pixel =
//! one cell, see `CellMetrics`). Fill rectangles become runs of
//! background-colored spaces; glyph draws become colored prints at the same
//! cells. Raw mode is enabled on construction and torn down on drop.

use crate::error::PanelError;
use crate::metrics::Rgb;
use crate::render::DrawOp;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::debug;
use std::io::{self, Stdout, Write};

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Pixel coordinates are cell indices under `CellMetrics`; saturate rather
/// than wrap if one ever exceeds the cursor range.
fn to_cell(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

pub struct TerminalSurface {
    stdout: Stdout,
    /// Screen row where the panel's row 0 is drawn.
    origin_row: u16,
    width: u16,
    height: u16,
    /// Background of the most recent fill, applied under subsequent glyphs.
    current_bg: Option<Rgb>,
}

impl TerminalSurface {
    pub fn new() -> Result<Self, PanelError> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, Clear(ClearType::All), MoveTo(0, 0))?;
        terminal::enable_raw_mode()
            .map_err(|e| PanelError::new(format!("failed to enable raw mode: {}", e)))?;
        let (width, height) = terminal::size().unwrap_or((80, 24));
        debug!("surface: {}x{} cells", width, height);
        Ok(TerminalSurface {
            stdout,
            origin_row: 0,
            width,
            height,
            current_bg: None,
        })
    }

    /// Cell dimensions of the drawable area.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) -> Result<(), PanelError> {
        execute!(self.stdout, Clear(ClearType::All))?;
        Ok(())
    }

    /// Execute a batch of draw operations and flush.
    pub fn apply(&mut self, ops: &[DrawOp]) -> Result<(), PanelError> {
        for op in ops {
            match op {
                DrawOp::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    let blank = " ".repeat(*width as usize);
                    for row in 0..*height {
                        queue!(
                            self.stdout,
                            MoveTo(
                                to_cell(*x),
                                self.origin_row.saturating_add(to_cell(y.saturating_add(row)))
                            ),
                            SetBackgroundColor(to_color(*color)),
                            Print(&blank)
                        )?;
                    }
                    self.current_bg = Some(*color);
                }
                DrawOp::Text {
                    x, y, text, color, ..
                } => {
                    queue!(
                        self.stdout,
                        MoveTo(to_cell(*x), self.origin_row.saturating_add(to_cell(*y))),
                        SetForegroundColor(to_color(*color))
                    )?;
                    if let Some(bg) = self.current_bg {
                        queue!(self.stdout, SetBackgroundColor(to_color(bg)))?;
                    }
                    queue!(self.stdout, Print(text))?;
                }
            }
        }
        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.stdout,
            ResetColor,
            Show,
            MoveTo(0, self.height.saturating_sub(1))
        );
        let _ = self.stdout.flush();
        debug!("surface: terminal restored");
    }
}
