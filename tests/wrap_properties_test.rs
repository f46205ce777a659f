//! Properties of the incremental word-wrap engine

use gruepanel::line::{LogicalLine, StyleId, StyledRun};
use gruepanel::metrics::{FixedMetrics, TextMetrics};
use gruepanel::wrap::wrap_line;

const S: StyleId = StyleId(0);
const GLYPH: u32 = 10;
const PAGE_GLYPHS: u32 = 10;

fn metrics() -> FixedMetrics {
    FixedMetrics::new(GLYPH, 20)
}

fn wrap_text(text: &str) -> LogicalLine {
    let m = metrics();
    let mut line = LogicalLine::with_run(StyledRun::new(S, text));
    wrap_line(
        &mut line,
        m.page_width_for(PAGE_GLYPHS),
        &m,
        m.interchar_gap(S),
        None,
    );
    line
}

/// Reconstruct each row's text from the boundary cache.
fn row_texts(line: &LogicalLine) -> Vec<String> {
    let full: String = line.runs().iter().map(|r| r.text.as_str()).collect();
    let lens: Vec<usize> = line.runs().iter().map(|r| r.text.len()).collect();
    let mut rows = Vec::new();
    let mut start = 0;
    for b in &line.boundaries {
        let end = lens[..b.run_idx.min(lens.len())].iter().sum::<usize>() + b.offset;
        rows.push(full[start..end].to_string());
        start = end;
    }
    rows
}

const SAMPLES: &[&str] = &[
    "hello world foobar",
    "You are standing in an open field west of a white house",
    "a b c d e f g h i j k l m n o p",
    "antidisestablishmentarianism is long",
    "x",
    "trailing spaces      before a break zz",
    "  leading spaces stay on the first row",
];

#[test]
fn rows_never_exceed_page_width() {
    for sample in SAMPLES {
        let line = wrap_text(sample);
        for row in row_texts(&line) {
            // Trailing spaces may overhang; visible glyphs may not.
            let visible = row.trim_end().chars().count() as u32;
            assert!(
                visible <= PAGE_GLYPHS,
                "row {:?} of {:?} exceeds the page",
                row,
                sample
            );
        }
    }
}

#[test]
fn soft_broken_rows_never_start_with_a_space() {
    for sample in SAMPLES {
        let line = wrap_text(sample);
        for (i, row) in row_texts(&line).iter().enumerate() {
            if i > 0 {
                assert!(
                    !row.starts_with(' '),
                    "row {} {:?} of {:?} starts with a space",
                    i,
                    row,
                    sample
                );
            }
        }
    }
}

#[test]
fn all_rows_partition_the_line() {
    for sample in SAMPLES {
        let line = wrap_text(sample);
        assert_eq!(row_texts(&line).concat(), *sample);
    }
}

#[test]
fn wrap_is_idempotent_on_clean_lines() {
    for sample in SAMPLES {
        let m = metrics();
        let mut line = LogicalLine::with_run(StyledRun::new(S, *sample));
        let width = m.page_width_for(PAGE_GLYPHS);
        let gap = m.interchar_gap(S);
        wrap_line(&mut line, width, &m, gap, None);
        let first = line.boundaries.clone();
        wrap_line(&mut line, width, &m, gap, None);
        assert_eq!(line.boundaries, first);
    }
}

#[test]
fn chunked_appends_wrap_like_a_single_append() {
    let m = metrics();
    let width = m.page_width_for(PAGE_GLYPHS);
    let gap = m.interchar_gap(S);
    for sample in SAMPLES {
        for split in 1..sample.len() {
            if !sample.is_char_boundary(split) {
                continue;
            }
            let whole = wrap_text(sample);

            let mut chunked = LogicalLine::with_run(StyledRun::new(S, &sample[..split]));
            wrap_line(&mut chunked, width, &m, gap, None);
            chunked.append(StyledRun::new(S, &sample[split..]));
            wrap_line(&mut chunked, width, &m, gap, None);

            assert_eq!(
                row_texts(&whole),
                row_texts(&chunked),
                "divergence splitting {:?} at {}",
                sample,
                split
            );
        }
    }
}

#[test]
fn ten_glyph_page_wraps_at_word_boundaries() {
    let line = wrap_text("hello world foobar");
    assert_eq!(row_texts(&line), vec!["hello ", "world ", "foobar"]);
}

#[test]
fn word_wider_than_page_hard_breaks() {
    let line = wrap_text("xxxxxxxxxxxxxxx");
    assert_eq!(row_texts(&line), vec!["xxxxxxxxxx", "xxxxx"]);
}
