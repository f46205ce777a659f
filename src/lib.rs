//! gruepanel - incremental word-wrap and scrollback layout engine
//!
//! A live text-layout engine for a fixed-width, page-oriented panel: styled
//! output text streams in, gets flowed into pixel-exact screen rows with
//! word wrapping, and scrolls terminal-style with the newest row pinned to
//! the page bottom. Uncommitted keystrokes echo inline as a virtual trailing
//! run of the current line without ever entering the document.
//!
//! The host drives `panel::BottomPanel` with append/event/render calls and
//! supplies glyph metrics and color resolution through `metrics::TextMetrics`;
//! completed input goes out through `panel::Interpreter`. Everything is
//! synchronous and single-threaded.

pub mod backend;
pub mod error;
pub mod input;
pub mod line;
pub mod metrics;
pub mod panel;
pub mod render;
pub mod viewport;
pub mod wrap;
