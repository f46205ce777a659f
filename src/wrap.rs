//! Incremental word-wrap engine
//!
//! Turns one logical line into row boundaries against a pixel page width.
//! Key characteristics:
//! - Resumable: a line appended to is re-scanned only from its last committed
//!   row break (callers drop the tentative end-of-line boundary first), so
//!   appending costs time proportional to the appended text.
//! - The uncommitted input buffer rides along as a virtual trailing run: it
//!   participates in width and break decisions but is never written into the
//!   line's run sequence.
//! - Breaks prefer the start of the overflowing word (soft wrap); a word
//!   wider than the page breaks mid-word (hard wrap). Spaces may end a row
//!   but never begin one.

use crate::line::{LogicalLine, RowBoundary, StyledRun};
use crate::metrics::TextMetrics;
use log::trace;

/// Recompute `line.boundaries`, resuming from the last cached entry when one
/// exists. `interchar_gap` is the safety margin sampled from the default
/// style at init/resize time. A non-dirty line is returned untouched.
///
/// The dirty flag is cleared only when the scan covered exactly the committed
/// runs; when a non-empty `virtual_run` contributed, the line stays dirty so
/// the cache is rebuilt once the overlay changes or commits.
pub fn wrap_line(
    line: &mut LogicalLine,
    page_width_px: u32,
    metrics: &dyn TextMetrics,
    interchar_gap: u32,
    virtual_run: Option<&StyledRun>,
) {
    if !line.dirty {
        return;
    }

    let virt = virtual_run.filter(|run| !run.text.is_empty());

    // Resume position: the last committed row break, or the line start.
    let (mut slot, mut offset) = match line.boundaries.last() {
        Some(b) => (b.run_idx, b.offset),
        None => (0, 0),
    };
    trace!(
        "wrap: resume at slot {} offset {}, {} run(s), overlay: {}",
        slot,
        offset,
        line.runs().len(),
        virt.is_some()
    );

    let real_slots = line.runs().len();
    let mut fresh: Vec<RowBoundary> = Vec::new();
    let mut row_width: u32 = 0;
    let mut word_width: u32 = 0;
    let mut word_start: Option<RowBoundary> = None;
    let mut prev_ch = '\0';

    // The slot one past the real runs carries the virtual input run.
    while slot <= real_slots {
        let (style, text) = if slot < real_slots {
            let run = &line.runs()[slot];
            (run.style, run.text.as_str())
        } else {
            match virt {
                Some(run) => (run.style, run.text.as_str()),
                None => break,
            }
        };

        for (rel, ch) in text[offset..].char_indices() {
            let at = offset + rel;
            if prev_ch == ' ' && ch != ' ' {
                word_start = Some(RowBoundary::new(slot, at));
                word_width = 0;
            }

            let glyph = metrics.glyph_width(style, ch);
            word_width += glyph;

            let overflows = row_width + glyph + interchar_gap > page_width_px;
            if overflows && ch != ' ' {
                match word_start {
                    // Soft wrap: push the whole overflowing word down.
                    Some(ws) => {
                        fresh.push(ws);
                        row_width = word_width;
                    }
                    // Hard wrap: no break opportunity since the last break.
                    None => {
                        fresh.push(RowBoundary::new(slot, at));
                        row_width = glyph;
                    }
                }
                word_start = None;
                word_width = 0;
            } else {
                row_width += glyph;
            }
            prev_ch = ch;
        }

        offset = 0;
        slot += 1;
    }

    // End-of-line boundary: recomputed on every wrap, it is what row counts
    // and bottom-of-line rendering rely on.
    fresh.push(RowBoundary::new(slot, 0));
    line.boundaries.extend(fresh);
    line.dirty = virt.is_some();
}
