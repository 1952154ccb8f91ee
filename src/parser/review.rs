use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::relations::ReviewRow;

// The dump misspells "customer" as "cutomer" on a fraction of lines;
// `cus?tomer` accepts both.
static REVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]+-[0-9]+-[0-9]+)\s+cus?tomer:\s+(\w+)\s+rating:\s+([0-9]+)\s+votes:\s+([0-9]+)\s+helpful:\s+([0-9]+)",
    )
    .unwrap()
});

/// Parse one review line. Returns `None` when the line does not match the
/// review grammar or its date is not a real calendar date.
pub fn parse_line(line: &str) -> Option<ReviewRow> {
    let caps = REVIEW_RE.captures(line)?;
    let date = normalize_date(&caps[1])?;
    Some(ReviewRow {
        date,
        customer_id: caps[2].to_string(),
        rating: caps[3].parse().ok()?,
        votes: caps[4].parse().ok()?,
        helpful: caps[5].parse().ok()?,
    })
}

/// Zero-pad a `Y-M-D` date (month/day may be one digit) to `YYYY-MM-DD`.
fn normalize_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_pads_date() {
        let row = parse_line("2000-7-28  customer: A2JW67OY8U6HHK  rating: 5  votes:  10  helpful:   9")
            .unwrap();
        assert_eq!(row.date, "2000-07-28");
        assert_eq!(row.customer_id, "A2JW67OY8U6HHK");
        assert_eq!(row.rating, 5);
        assert_eq!(row.votes, 10);
        assert_eq!(row.helpful, 9);
    }

    #[test]
    fn tolerates_cutomer_spelling() {
        let row = parse_line("2003-12-14  cutomer: A2VE83MZF98ITY  rating: 4  votes: 6  helpful: 5")
            .unwrap();
        assert_eq!(row.date, "2003-12-14");
        assert_eq!(row.customer_id, "A2VE83MZF98ITY");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("not a review").is_none());
        assert!(parse_line("2000-7-28 customer: X rating: five votes: 1 helpful: 0").is_none());
        // Day 99 matches the shape but is not a date.
        assert!(parse_line("2000-7-99 customer: X rating: 5 votes: 1 helpful: 0").is_none());
    }
}
