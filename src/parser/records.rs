use std::str::Lines;

/// Lazy iterator over the record blocks of a raw metadata dump.
///
/// A block starts at a line whose trimmed form begins with `Id:` and ends at
/// the next blank line. Comment lines (`#`) are dropped everywhere, even
/// inside a block. Lines before the first `Id:` line are dropped. A trailing
/// block not terminated by a blank line is dropped, matching the source data
/// contract (every record in the dump is blank-line terminated).
pub struct RecordBlocks<'a> {
    lines: Lines<'a>,
}

pub fn split(raw_text: &str) -> RecordBlocks<'_> {
    RecordBlocks {
        lines: raw_text.lines(),
    }
}

impl<'a> Iterator for RecordBlocks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut current = String::new();
        let mut in_record = false;

        for line in self.lines.by_ref() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed.is_empty() {
                in_record = false;
                if !current.is_empty() {
                    return Some(current);
                }
                continue;
            }
            if in_record {
                current.push_str(trimmed);
                current.push('\n');
            } else if trimmed.starts_with("Id:") {
                in_record = true;
                current.push_str(trimmed);
                current.push('\n');
            }
        }

        None
    }
}

// ── Tests ──
