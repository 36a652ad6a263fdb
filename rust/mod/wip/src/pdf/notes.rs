//! `Note:` blocks and their shift classification.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::shift::Shift;

static NOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)note:").unwrap());

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})/(\d{1,2})/(\d{2,4})\s+(\d{1,2}):(\d{2})\s*(am|pm)").unwrap()
});

/// How far back from a note to look for its timestamp, in characters.
const TIMESTAMP_WINDOW: usize = 100;

/// Notes kept when none of them carries a timestamp.
const FALLBACK_NOTES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct NoteBlock {
    /// Byte offset of the `Note:` marker.
    pub start: usize,
    pub body: String,
    pub timestamp: Option<NaiveDateTime>,
}

fn starts_new_block(line: &str) -> bool {
    let head: String = line.trim_start().chars().take(5).collect::<String>().to_lowercase();
    head.starts_with("from:") || head.starts_with("to:") || head.starts_with("note:")
}

/// Every `Note:` block in document order.
///
/// A block is the rest of the marker's line plus each following line up to a
/// blank line or a line opening with `From:`, `To:` or another `Note:`.
pub(super) fn note_blocks(text: &str) -> Vec<NoteBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(m) = NOTE_RE.find_at(text, pos) {
        let rest = &text[m.end()..];
        let body_start = m.end() + (rest.len() - rest.trim_start().len());
        let mut lines = text[body_start..].split_inclusive('\n');

        let Some(first) = lines.next().filter(|l| !l.trim().is_empty()) else {
            pos = m.end();
            continue;
        };
        let mut body = vec![first.trim()];
        let mut consumed = first.len();
        for line in lines {
            if line.trim().is_empty() || starts_new_block(line) {
                break;
            }
            body.push(line.trim());
            consumed += line.len();
        }

        blocks.push(NoteBlock {
            start: m.start(),
            body: body.join("\n"),
            timestamp: timestamp_before(text, m.start()),
        });
        pos = body_start + consumed;
    }

    blocks
}

/// The earliest `M/D/YY H:MM am` stamp in the window preceding `idx`.
fn timestamp_before(text: &str, idx: usize) -> Option<NaiveDateTime> {
    let before = &text[..idx];
    let start = before
        .char_indices()
        .rev()
        .nth(TIMESTAMP_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);

    TIMESTAMP_RE
        .captures_iter(&before[start..])
        .filter_map(|caps| {
            let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            let year_digits = caps.get(3)?.as_str().len();
            let mut year = num(3)? as i32;
            if year_digits == 2 {
                year += 2000;
            }
            let hour12 = num(4)?;
            if !(1..=12).contains(&hour12) {
                return None;
            }
            let pm = caps.get(6)?.as_str().eq_ignore_ascii_case("pm");
            let hour = match (hour12, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            };
            let date = NaiveDate::from_ymd_opt(year, num(1)?, num(2)?)?;
            let time = NaiveTime::from_hms_opt(hour, num(5)?, 0)?;
            Some(NaiveDateTime::new(date, time))
        })
        .next()
}

fn format_note(stamp: &NaiveDateTime, body: &str) -> String {
    format!("{}: {}", stamp.format("%-m/%-d/%Y %-I:%M:%S %p"), body)
}

/// Split notes into (first shift, second shift) text.
pub(super) fn shift_notes(blocks: &[NoteBlock]) -> (String, String) {
    let mut first = Vec::new();
    let mut second = Vec::new();

    for block in blocks {
        let Some(stamp) = &block.timestamp else {
            continue;
        };
        let line = format_note(stamp, &block.body);
        match Shift::for_hour(stamp.hour()) {
            Shift::First => first.push(line),
            Shift::Second => second.push(line),
        }
    }

    if first.is_empty() && second.is_empty() {
        first = blocks
            .iter()
            .take(FALLBACK_NOTES)
            .enumerate()
            .map(|(i, block)| format!("Note {}: {}", i + 1, block.body))
            .collect();
    }

    (first.join("\n\n"), second.join("\n\n"))
}
