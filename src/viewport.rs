//! Viewport allocation and history eviction
//!
//! Assigns every wrapped logical line its absolute first screen row: content
//! that fits the page is anchored at row 0, content that overflows is shifted
//! negative so the newest row lands exactly at the bottom. Lines whose entire
//! row range has scrolled above the page are dropped; that eviction is the
//! panel's sole memory bound.

use crate::line::LogicalLine;
use log::debug;

/// Assign first screen rows and evict fully scrolled-off lines. Lines must
/// already be wrapped (row counts valid).
pub fn allocate(lines: &mut Vec<LogicalLine>, rows_per_page: i32) {
    let total_rows: i32 = lines.iter().map(|line| line.row_count()).sum();

    let mut row = (rows_per_page - total_rows).min(0);
    for line in lines.iter_mut() {
        line.first_screen_row = row;
        row += line.row_count();
    }

    let before = lines.len();
    while let Some(first) = lines.first() {
        if first.first_screen_row + first.row_count() > 0 {
            break;
        }
        lines.remove(0);
    }
    if lines.len() != before {
        debug!(
            "viewport: evicted {} line(s), {} retained",
            before - lines.len(),
            lines.len()
        );
    }
}
