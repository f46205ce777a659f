//! Logical line and document model
//!
//! The panel's scrollback is a sequence of logical lines, one per paragraph
//! of output. Each logical line holds the styled runs appended to it plus a
//! cached sequence of row boundaries computed by the wrap engine. The last
//! line of the document is always the "current" line, the one still being
//! appended to (and the one the uncommitted input buffer echoes into).

use log::debug;

/// Opaque style key, resolved to fonts and colors by the host's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(pub u16);

/// An immutable fragment of output text carrying one style.
///
/// The text never contains row-break characters; breaks are structural
/// (separate `LogicalLine`s), split out at append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub style: StyleId,
    pub text: String,
}

impl StyledRun {
    pub fn new(style: StyleId, text: impl Into<String>) -> Self {
        StyledRun {
            style,
            text: text.into(),
        }
    }
}

/// Marks where a screen row ends: the row runs up to (but excluding) the
/// byte at `offset` within run slot `run_idx`. The final boundary of a line
/// points one past the last scanned run slot. Offsets are byte offsets and
/// always fall on character boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBoundary {
    pub run_idx: usize,
    pub offset: usize,
}

impl RowBoundary {
    pub fn new(run_idx: usize, offset: usize) -> Self {
        RowBoundary { run_idx, offset }
    }
}

/// One paragraph-level unit of text, independent of how many screen rows it
/// occupies once wrapped.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    runs: Vec<StyledRun>,
    /// Row end markers, valid when `dirty` is false. One entry per screen
    /// row; the last entry is the end-of-line boundary.
    pub boundaries: Vec<RowBoundary>,
    /// True when `boundaries` is stale and must be recomputed, possibly
    /// incrementally from its last entry.
    pub dirty: bool,
    /// Absolute screen row of this line's first row, assigned by the
    /// viewport allocator. Negative when the line starts above the page.
    pub first_screen_row: i32,
}

impl LogicalLine {
    pub fn new() -> Self {
        LogicalLine {
            runs: Vec::new(),
            boundaries: Vec::new(),
            dirty: true,
            first_screen_row: 0,
        }
    }

    pub fn with_run(run: StyledRun) -> Self {
        let mut line = LogicalLine::new();
        line.runs.push(run);
        line
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Append a run, dropping the tentative end-of-line boundary so the wrap
    /// engine resumes from the last committed row break instead of
    /// re-scanning the whole line.
    pub fn append(&mut self, run: StyledRun) {
        if run.text.is_empty() {
            return;
        }
        self.runs.push(run);
        self.boundaries.pop();
        self.dirty = true;
    }

    /// Throw away the whole boundary cache, forcing a full re-wrap.
    pub fn invalidate(&mut self) {
        self.boundaries.clear();
        self.dirty = true;
    }

    /// Number of screen rows this line occupies. Only meaningful after a
    /// wrap pass; an unwrapped line reports 0.
    pub fn row_count(&self) -> i32 {
        self.boundaries.len() as i32
    }
}

impl Default for LogicalLine {
    fn default() -> Self {
        LogicalLine::new()
    }
}

/// The scrollback: an ordered sequence of logical lines, the last one being
/// the current line. The document is the sole owner of its lines and their
/// boundary caches.
#[derive(Debug)]
pub struct Document {
    lines: Vec<LogicalLine>,
}

impl Document {
    /// A document always contains at least one (possibly empty) line.
    pub fn new() -> Self {
        Document {
            lines: vec![LogicalLine::new()],
        }
    }

    pub fn lines(&self) -> &[LogicalLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<LogicalLine> {
        &mut self.lines
    }

    pub fn current_line(&self) -> &LogicalLine {
        self.lines.last().unwrap()
    }

    pub fn current_line_mut(&mut self) -> &mut LogicalLine {
        self.lines.last_mut().unwrap()
    }

    /// Ingest styled text, splitting at newlines: each segment is appended to
    /// the current line and every `'\n'` starts a fresh logical line.
    /// `'\r'` is normalized to `'\n'` first.
    pub fn append_styled_text(&mut self, text: &str, style: StyleId) {
        let text = text.replace('\r', "\n");
        if text.is_empty() {
            return;
        }
        debug!("document: append {} chars, style {:?}", text.len(), style);

        let mut segments = text.split('\n');
        // split() always yields at least one segment
        let first = segments.next().unwrap();
        self.current_line_mut()
            .append(StyledRun::new(style, first));
        for segment in segments {
            self.lines.push(LogicalLine::new());
            self.current_line_mut()
                .append(StyledRun::new(style, segment));
        }
    }

    /// Reset to a single empty line, dropping all scrollback.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(LogicalLine::new());
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}
