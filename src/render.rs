//! Renderer: row offsets back to draw operations
//!
//! Pure pull-model rendering. Given an inclusive screen-row range, walks the
//! retained lines and their cached boundaries and emits, per styled fragment,
//! a background fill followed by a glyph draw, advancing an x cursor. The
//! uncommitted input buffer is resolved as a virtual trailing run of the last
//! line, exactly as the wrap engine sees it.
//!
//! Linear scans are fine here: eviction already bounds the retained set to
//! roughly one page of lines.

use crate::error::PanelError;
use crate::line::{LogicalLine, RowBoundary, StyleId, StyledRun};
use crate::metrics::{Rgb, TextMetrics};
use log::trace;

/// One painting primitive. Coordinates are pixels; `y` grows downward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    FillRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgb,
    },
    Text {
        x: u32,
        y: u32,
        style: StyleId,
        text: String,
        color: Rgb,
    },
}

/// Emit draw operations covering the inclusive row range `row_from..=row_to`.
///
/// Rows past the end of content are normal (a full-page repaint of a short
/// document) and produce nothing. A negative or inverted range is a contract
/// violation.
pub fn render(
    lines: &[LogicalLine],
    row_from: i32,
    row_to: i32,
    metrics: &dyn TextMetrics,
    virtual_run: Option<&StyledRun>,
) -> Result<Vec<DrawOp>, PanelError> {
    if row_from < 0 || row_from > row_to {
        return Err(PanelError::new(format!(
            "invalid render row range {}..={}",
            row_from, row_to
        )));
    }
    if lines.is_empty() {
        return Err(PanelError::new("render on an empty document"));
    }

    let row_height = metrics.row_height();
    let mut ops = Vec::new();
    let mut line_idx = 0;

    trace!("render: rows {}..={}", row_from, row_to);

    'rows: for row in row_from..=row_to {
        // Advance to the line containing this row.
        let line = loop {
            match lines.get(line_idx) {
                // Past the last line: the rest of the range is blank page.
                None => break 'rows,
                Some(line) => {
                    if row - line.first_screen_row < line.row_count() {
                        break line;
                    }
                    line_idx += 1;
                }
            }
        };

        let local = (row - line.first_screen_row) as usize;
        let start = if local == 0 {
            RowBoundary::new(0, 0)
        } else {
            line.boundaries[local - 1]
        };
        let end = line.boundaries[local];

        // The virtual input run only ever trails the current (last) line.
        let overlay = if line_idx == lines.len() - 1 {
            virtual_run.filter(|run| !run.text.is_empty())
        } else {
            None
        };

        let real_slots = line.runs().len();
        let y = row as u32 * row_height;
        let mut x: u32 = 0;
        let mut offset = start.offset;

        for slot in start.run_idx..=end.run_idx {
            let (style, text) = if slot < real_slots {
                let run = &line.runs()[slot];
                (run.style, run.text.as_str())
            } else if slot == real_slots {
                match overlay {
                    Some(run) => (run.style, run.text.as_str()),
                    None => break,
                }
            } else {
                break;
            };

            let fragment_end = if slot == end.run_idx {
                end.offset
            } else {
                text.len()
            };
            debug_assert!(offset <= fragment_end && fragment_end <= text.len());
            let fragment = &text[offset..fragment_end];

            if !fragment.is_empty() {
                let width = metrics.text_width(style, fragment);
                let (bg, fg) = metrics.colors(style);
                ops.push(DrawOp::FillRect {
                    x,
                    y,
                    width,
                    height: row_height,
                    color: bg,
                });
                ops.push(DrawOp::Text {
                    x,
                    y,
                    style,
                    text: fragment.to_string(),
                    color: fg,
                });
                x += width;
            }
            offset = 0;
        }
    }

    Ok(ops)
}
