//! Metric and color resolution seam
//!
//! The layout core never touches fonts or terminals directly; everything it
//! needs to know about a style comes through the `TextMetrics` trait:
//! per-glyph pixel widths, the row height, and a background/foreground color
//! pair. The host supplies the real implementation; tests use `FixedMetrics`
//! and the terminal surface uses `CellMetrics`.

use crate::line::StyleId;

/// Packed RGB color, resolved from a style by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

/// Resolution of style keys to glyph geometry and colors.
pub trait TextMetrics {
    /// Width in pixels of `ch` rendered in `style`.
    fn glyph_width(&self, style: StyleId, ch: char) -> u32;

    /// Fixed height of one screen row in pixels.
    fn row_height(&self) -> u32;

    /// `(background, foreground)` for `style`.
    fn colors(&self, style: StyleId) -> (Rgb, Rgb);

    /// Safety margin added when deciding whether one more glyph still fits
    /// on a row. Defaults to the width of a space in the given style;
    /// cell-grid metrics override this to 0.
    fn interchar_gap(&self, style: StyleId) -> u32 {
        self.glyph_width(style, ' ')
    }

    /// Total width of `text` in `style`.
    fn text_width(&self, style: StyleId, text: &str) -> u32 {
        text.chars().map(|ch| self.glyph_width(style, ch)).sum()
    }
}

/// Every glyph the same width in every style. The workhorse for tests,
/// where "a page ten glyphs wide" needs to be exact.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    pub glyph_px: u32,
    pub row_px: u32,
}

impl FixedMetrics {
    pub fn new(glyph_px: u32, row_px: u32) -> Self {
        FixedMetrics { glyph_px, row_px }
    }

    /// Page width that fits exactly `n` glyphs: `n` glyph widths plus
    /// headroom for the inter-character gap.
    pub fn page_width_for(&self, n: u32) -> u32 {
        n * self.glyph_px + self.glyph_px
    }
}

impl TextMetrics for FixedMetrics {
    fn glyph_width(&self, _style: StyleId, _ch: char) -> u32 {
        self.glyph_px
    }

    fn row_height(&self) -> u32 {
        self.row_px
    }

    fn colors(&self, style: StyleId) -> (Rgb, Rgb) {
        // Style 1 is reverse video, everything else white-on-black.
        if style.0 == 1 {
            (WHITE, BLACK)
        } else {
            (BLACK, WHITE)
        }
    }
}

/// One terminal cell per glyph: width 1, height 1, no gap. Pixel coordinates
/// coming out of the renderer are then directly column/row coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl TextMetrics for CellMetrics {
    fn glyph_width(&self, _style: StyleId, _ch: char) -> u32 {
        1
    }

    fn row_height(&self) -> u32 {
        1
    }

    fn colors(&self, style: StyleId) -> (Rgb, Rgb) {
        match style.0 {
            1 => (WHITE, BLACK),
            2 => (BLACK, Rgb(0, 255, 0)),
            _ => (BLACK, WHITE),
        }
    }

    fn interchar_gap(&self, _style: StyleId) -> u32 {
        0
    }
}
