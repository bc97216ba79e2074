use std::collections::HashSet;

/// Marker separating start and end time on an SRT cue line
const TIME_RANGE_MARKER: &str = " --> ";

/// Turn SRT caption content into plain transcript text.
///
/// Sequence numbers, cue timing lines and blank lines are dropped, every line is
/// trimmed, then repeated lines are removed across the whole document keeping the
/// first occurrence. Auto-generated captions repeat each line as the next cue
/// scrolls in, so this collapses them into readable text.
pub fn caption_text(srt: &str) -> String {
    let lines = srt
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_sequence_number(line))
        .filter(|line| !line.contains(TIME_RANGE_MARKER));

    dedup_lines(lines).join("\n")
}

/// Keep only the first occurrence of each line, preserving order
pub fn dedup_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    lines.into_iter().filter(|line| seen.insert(*line)).collect()
}

fn is_sequence_number(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_digit())
}
