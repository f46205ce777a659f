//! Bottom panel facade
//!
//! Owns the document, the input controller, and the page geometry, and wires
//! the wrap engine, viewport allocator, and renderer together behind the
//! narrow surface the host widget and the interpreter see: append text, feed
//! events, pull draw operations. Every operation is synchronous; a partially
//! re-wrapped line is never observable because reflow runs before control
//! returns.

use crate::error::PanelError;
use crate::input::{InputAction, InputController, InputMode};
use crate::line::{Document, StyleId, StyledRun};
use crate::metrics::TextMetrics;
use crate::render::{render, DrawOp};
use crate::viewport::allocate;
use crate::wrap::wrap_line;
use log::debug;

/// Commands and characters completed by the panel are handed to the
/// interpreter through this seam.
pub trait Interpreter {
    fn on_committed_line(&mut self, line: &str);
    fn on_character(&mut self, ch: char);
}

/// Host notifications, dispatched to one update function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Char(char),
    Enter,
    Backspace,
    HistoryOlder,
    HistoryNewer,
    Symbol,
    Back,
    Resize { width_px: u32, height_px: u32 },
}

/// Minimal redraw hint returned to the host. Row ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    Rows { from: i32, to: i32 },
    Full,
}

pub struct BottomPanel {
    doc: Document,
    input: InputController,
    metrics: Box<dyn TextMetrics>,
    page_width_px: u32,
    page_height_px: u32,
    rows_per_page: i32,
    interchar_gap: u32,
    default_style: StyleId,
    user_input_style: StyleId,
}

impl BottomPanel {
    pub fn new(
        metrics: Box<dyn TextMetrics>,
        width_px: u32,
        height_px: u32,
        default_style: StyleId,
    ) -> Self {
        let row_height = metrics.row_height();
        let rows_per_page = if row_height > 0 {
            (height_px / row_height) as i32
        } else {
            0
        };
        let interchar_gap = metrics.interchar_gap(default_style);
        let mut panel = BottomPanel {
            doc: Document::new(),
            input: InputController::new(),
            metrics,
            page_width_px: width_px,
            page_height_px: height_px,
            rows_per_page,
            interchar_gap,
            default_style,
            user_input_style: default_style,
        };
        panel.reflow();
        panel
    }

    pub fn rows_per_page(&self) -> i32 {
        self.rows_per_page
    }

    /// Current page geometry in pixels.
    pub fn page_size_px(&self) -> (u32, u32) {
        (self.page_width_px, self.page_height_px)
    }

    /// Switch input modes. Cached row boundaries may have been computed with
    /// the echo overlay in place, so every line is re-wrapped from scratch
    /// under the new mode.
    pub fn set_mode(&mut self, mode: InputMode) -> Redraw {
        if mode == self.input.mode() {
            return Redraw::None;
        }
        debug!("panel: input mode -> {:?}", mode);
        self.input.set_mode(mode);
        for line in self.doc.lines_mut().iter_mut() {
            line.invalidate();
        }
        self.reflow();
        Redraw::Full
    }

    pub fn mode(&self) -> InputMode {
        self.input.mode()
    }

    /// Style used for echoed and committed user input.
    pub fn set_user_input_style(&mut self, style: StyleId) {
        self.user_input_style = style;
    }

    /// The uncommitted buffer, for collaborators that need to inspect it.
    pub fn current_input(&self) -> &str {
        self.input.buffer()
    }

    pub fn history(&self) -> &crate::input::CommandHistory {
        self.input.history()
    }

    /// Ingestion entry point for interpreter output. Newlines split the text
    /// into further logical lines. Returns the region to repaint.
    pub fn append_styled_text(&mut self, text: &str, style: StyleId) -> Redraw {
        if text.is_empty() {
            return Redraw::None;
        }
        // A cache computed with the echo overlay cannot be resumed from;
        // rebuild the current line from scratch.
        if self.overlay().is_some() {
            self.doc.current_line_mut().invalidate();
        }

        let rows_before: Vec<i32> = self
            .doc
            .lines()
            .iter()
            .map(|l| l.first_screen_row)
            .collect();
        // Logical lines the append will add; the document normalizes '\r'
        // to '\n' before splitting.
        let added = text.chars().filter(|&c| c == '\n' || c == '\r').count();
        let touched_from = self.doc.current_line().first_screen_row;
        self.doc.append_styled_text(text, style);
        self.reflow();

        // The page scrolled if any line was evicted or any line that was
        // already present moved. Comparing only the first line's row misses
        // scrolls where eviction puts a new line at the old first row.
        let lines = self.doc.lines();
        let evicted = rows_before.len() + added > lines.len();
        let shifted = lines
            .iter()
            .zip(rows_before.iter())
            .any(|(line, &row)| line.first_screen_row != row);
        if evicted || shifted {
            return Redraw::Full;
        }
        let last = self.doc.current_line();
        let to = last.first_screen_row + last.row_count() - 1;
        let from = touched_from.max(0);
        if to < from {
            Redraw::None
        } else {
            Redraw::Rows { from, to }
        }
    }

    /// Single dispatch point for host events.
    pub fn handle_event(&mut self, event: PanelEvent, interp: &mut dyn Interpreter) -> Redraw {
        match event {
            PanelEvent::Char(ch) => {
                let action = self.input.type_char(ch);
                self.apply_action(action, interp)
            }
            PanelEvent::Enter => {
                let action = self.input.type_char('\n');
                self.apply_action(action, interp)
            }
            PanelEvent::Backspace => {
                let action = self.input.backspace();
                self.apply_action(action, interp)
            }
            PanelEvent::HistoryOlder => {
                let action = self.input.history_older();
                self.apply_action(action, interp)
            }
            PanelEvent::HistoryNewer => {
                let action = self.input.history_newer();
                self.apply_action(action, interp)
            }
            PanelEvent::Symbol => {
                self.input.symbol_key();
                Redraw::None
            }
            PanelEvent::Back => {
                self.input.back_key();
                Redraw::None
            }
            PanelEvent::Resize {
                width_px,
                height_px,
            } => self.on_resize(width_px, height_px),
        }
    }

    /// Recompute geometry, drop every boundary cache, and reflow.
    pub fn on_resize(&mut self, width_px: u32, height_px: u32) -> Redraw {
        debug!("panel: resize to {}x{} px", width_px, height_px);
        self.page_width_px = width_px;
        self.page_height_px = height_px;
        let row_height = self.metrics.row_height();
        self.rows_per_page = if row_height > 0 {
            (height_px / row_height) as i32
        } else {
            0
        };
        self.interchar_gap = self.metrics.interchar_gap(self.default_style);
        for line in self.doc.lines_mut().iter_mut() {
            line.invalidate();
        }
        self.reflow();
        Redraw::Full
    }

    /// Reset to an empty document in the given style; history and the input
    /// buffer are dropped with it.
    pub fn clear(&mut self, style: StyleId) -> Redraw {
        debug!("panel: clear");
        self.default_style = style;
        self.doc.clear();
        self.input.reset();
        self.reflow();
        Redraw::Full
    }

    /// Pull-based paint entry point: draw operations for the inclusive row
    /// range, virtual input run included.
    pub fn render(&self, row_from: i32, row_to: i32) -> Result<Vec<DrawOp>, PanelError> {
        let overlay = self.overlay();
        render(
            self.doc.lines(),
            row_from,
            row_to,
            self.metrics.as_ref(),
            overlay.as_ref(),
        )
    }

    fn apply_action(&mut self, action: InputAction, interp: &mut dyn Interpreter) -> Redraw {
        match action {
            InputAction::Forward(ch) => {
                interp.on_character(ch);
                Redraw::None
            }
            InputAction::Commit(line) => {
                // The echo overlay becomes real text: rebuild the current
                // line with the committed run and start the next one.
                self.doc.current_line_mut().invalidate();
                self.doc
                    .append_styled_text(&format!("{}\n", line), self.user_input_style);
                self.reflow();
                interp.on_committed_line(&line);
                Redraw::Full
            }
            InputAction::Echo => self.reecho_current_line(),
            InputAction::Ignored => Redraw::None,
        }
    }

    /// Re-wrap only the current line after an echo buffer change and report
    /// the union of its old and new row ranges.
    fn reecho_current_line(&mut self) -> Redraw {
        let line = self.doc.current_line();
        let old_from = line.first_screen_row;
        let old_to = old_from + line.row_count();

        self.doc.current_line_mut().invalidate();
        self.reflow();

        let line = self.doc.current_line();
        let new_from = line.first_screen_row;
        let new_to = new_from + line.row_count();

        let from = old_from.min(new_from).max(0);
        let to = old_to.max(new_to) - 1;
        if to < from {
            Redraw::None
        } else {
            Redraw::Rows { from, to }
        }
    }

    /// The uncommitted input buffer as a virtual trailing run of the current
    /// line. Never stored in the document.
    fn overlay(&self) -> Option<StyledRun> {
        if self.input.mode() == InputMode::Line && !self.input.buffer().is_empty() {
            Some(StyledRun::new(
                self.user_input_style,
                self.input.buffer().to_string(),
            ))
        } else {
            None
        }
    }

    fn reflow(&mut self) {
        if self.page_width_px == 0 || self.rows_per_page == 0 {
            return;
        }
        let overlay = self.overlay();
        let metrics = self.metrics.as_ref();
        let width = self.page_width_px;
        let gap = self.interchar_gap;

        let lines = self.doc.lines_mut();
        let last = lines.len() - 1;
        for (i, line) in lines.iter_mut().enumerate() {
            let virt = if i == last { overlay.as_ref() } else { None };
            wrap_line(line, width, metrics, gap, virt);
        }
        allocate(lines, self.rows_per_page);
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> &[crate::line::LogicalLine] {
        self.doc.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FixedMetrics;
    use test_log::test;

    const S: StyleId = StyleId(0);

    struct RecordingInterp {
        lines: Vec<String>,
        chars: Vec<char>,
    }

    impl RecordingInterp {
        fn new() -> Self {
            RecordingInterp {
                lines: Vec::new(),
                chars: Vec::new(),
            }
        }
    }

    impl Interpreter for RecordingInterp {
        fn on_committed_line(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
        fn on_character(&mut self, ch: char) {
            self.chars.push(ch);
        }
    }

    // Ten glyphs per row, five rows per page.
    fn small_panel() -> BottomPanel {
        let m = FixedMetrics::new(10, 20);
        BottomPanel::new(Box::new(m), m.page_width_for(10), 100, S)
    }

    fn type_line(panel: &mut BottomPanel, interp: &mut RecordingInterp, s: &str) {
        for ch in s.chars() {
            panel.handle_event(PanelEvent::Char(ch), interp);
        }
        panel.handle_event(PanelEvent::Enter, interp);
    }

    #[test]
    fn commit_forwards_once_and_lands_in_history() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        type_line(&mut panel, &mut interp, "go north");
        assert_eq!(interp.lines, vec!["go north"]);
        assert_eq!(panel.current_input(), "");
        assert_eq!(panel.history().entries().last(), Some("go north"));
    }

    #[test]
    fn committed_text_becomes_document_content() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        panel.append_styled_text("> ", S);
        type_line(&mut panel, &mut interp, "look");
        // "> look" on row 0, fresh current line below it.
        let ops = panel.render(0, 0).unwrap();
        let texts: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["> ", "look"]);
    }

    #[test]
    fn character_mode_forwards_and_never_echoes() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        panel.set_mode(InputMode::Character);
        let redraw = panel.handle_event(PanelEvent::Char('y'), &mut interp);
        assert_eq!(redraw, Redraw::None);
        assert_eq!(interp.chars, vec!['y']);
        assert!(panel.render(0, 0).unwrap().is_empty());
    }

    #[test]
    fn echo_redraw_covers_union_of_old_and_new_rows() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        // Ten chars fit on one row; the eleventh wraps the echo to row 1.
        for ch in "wait waits".chars() {
            let redraw = panel.handle_event(PanelEvent::Char(ch), &mut interp);
            assert_eq!(redraw, Redraw::Rows { from: 0, to: 0 });
        }
        let redraw = panel.handle_event(PanelEvent::Char('x'), &mut interp);
        assert_eq!(redraw, Redraw::Rows { from: 0, to: 1 });
    }

    #[test]
    fn resize_reflows_everything() {
        let mut panel = small_panel();
        panel.append_styled_text("hello world foobar\n", S);
        let m = FixedMetrics::new(10, 20);
        // Wide enough for the whole line in one row.
        let redraw = panel.on_resize(m.page_width_for(20), 100);
        assert_eq!(redraw, Redraw::Full);
        assert_eq!(panel.lines()[0].row_count(), 1);
    }

    #[test]
    fn overflow_scrolls_and_evicts() {
        let mut panel = small_panel();
        for i in 0..8 {
            panel.append_styled_text(&format!("line {}\n", i), S);
        }
        // Nine logical lines (eight committed plus the empty current one) on
        // a five-row page: the top four are gone.
        assert!(panel.lines().len() <= 5);
        for line in panel.lines() {
            assert!(line.first_screen_row + line.row_count() > 0);
        }
        let last = panel.lines().last().unwrap();
        assert_eq!(last.first_screen_row + last.row_count(), 5);
    }

    #[test]
    fn mode_change_discards_echo_contaminated_layout() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        // Sixteen chars echo across two rows, leaving boundaries that point
        // into the virtual input run.
        for ch in "take the lantern".chars() {
            panel.handle_event(PanelEvent::Char(ch), &mut interp);
        }
        let redraw = panel.set_mode(InputMode::Character);
        assert_eq!(redraw, Redraw::Full);
        // Appending must not resume from the stale overlay boundaries.
        panel.append_styled_text("hi", S);
        let ops = panel.render(0, 0).unwrap();
        let texts: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["hi"]);
        assert_eq!(panel.lines().last().unwrap().row_count(), 1);
    }

    #[test]
    fn append_reports_full_redraw_when_eviction_reuses_the_anchor_row() {
        let mut panel = small_panel();
        panel.append_styled_text("aaaaaaaaaaa\n", S);
        panel.append_styled_text("aaaaaaaaaaa\n", S);
        panel.append_styled_text("bbb\n", S);
        // Six rows on a five-row page: the first line starts at row -1.
        assert_eq!(panel.lines()[0].first_screen_row, -1);
        // Two more rows scroll everything up, evict the first line, and put
        // the next one at the same row the old first line had.
        let redraw = panel.append_styled_text("ccccccccccc\n", S);
        assert_eq!(panel.lines()[0].first_screen_row, -1);
        assert_eq!(redraw, Redraw::Full);
    }

    #[test]
    fn clear_resets_document_and_history() {
        let mut panel = small_panel();
        let mut interp = RecordingInterp::new();
        panel.append_styled_text("old text\n", S);
        type_line(&mut panel, &mut interp, "look");
        panel.clear(S);
        assert!(panel.history().is_empty());
        assert_eq!(panel.lines().len(), 1);
        assert!(panel.render(0, 4).unwrap().is_empty());
    }
}
