use std::sync::LazyLock;

use regex::Regex;

// Greedy `.+` pins the id to the last bracket pair, so a stray `[` inside
// the name stays part of the name.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\[([0-9]+)\]$").unwrap());

/// Parse one `Name[id]` hierarchy segment. Returns `None` for segments with
/// no trailing bracketed integer id.
pub fn parse_segment(segment: &str) -> Option<(i64, String)> {
    let caps = SEGMENT_RE.captures(segment.trim())?;
    let id = caps[2].parse::<i64>().ok()?;
    let name = caps[1].trim();
    if name.is_empty() {
        return None;
    }
    Some((id, name.to_string()))
}

// ── Tests ──
