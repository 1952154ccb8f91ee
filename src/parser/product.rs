use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{category, review};
use crate::relations::{MetadataSet, ParseStats, ProductRow, SimilarityRow};

/// Id:   0
/// ASIN: 0771044445
///   discontinued product
static DISCONTINUED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Id:\s+([0-9]+)\s+ASIN:\s+(\w+)\s+discontinued product").unwrap()
});

static ASIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());

static SIMILAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^similar:\s+([0-9]+)\s*(.*)$").unwrap());

static CATEGORIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^categories:\s+([0-9]+)$").unwrap());

static REVIEWS_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^reviews:\s+total:\s+([0-9]+)\s+downloaded:\s+([0-9]+)\s+avg rating:\s+(.+)$")
        .unwrap()
});

/// Parse one record block into the accumulator. Never fails: records matching
/// neither the discontinued nor the active grammar are counted and dropped.
pub fn parse_record(record_text: &str, set: &mut MetadataSet, stats: &mut ParseStats) {
    stats.records += 1;

    if let Some(caps) = DISCONTINUED_RE.captures(record_text) {
        debug!(id = &caps[1], asin = &caps[2], "discontinued product");
        stats.discontinued += 1;
        return;
    }

    match match_shape(record_text) {
        Some(rec) => {
            emit(rec, set, stats);
            stats.products += 1;
        }
        None => {
            debug!(
                first_line = record_text.lines().next().unwrap_or(""),
                "unrecognized record"
            );
            stats.unrecognized += 1;
        }
    }
}

/// An active record after the all-or-nothing shape match. Category and
/// review lines are still raw; their per-line parsing tolerates failures.
struct ActiveRecord<'a> {
    id: i64,
    asin: &'a str,
    title: &'a str,
    group: &'a str,
    salesrank: &'a str,
    similar: Vec<&'a str>,
    category_lines: Vec<&'a str>,
    review_total: i64,
    avg_rating: &'a str,
    review_lines: Vec<&'a str>,
}

/// Match the fixed line shape of an active record: header fields in order,
/// a similarity list, one-or-more category lines, then the reviews header.
/// Any deviation rejects the whole record.
fn match_shape(text: &str) -> Option<ActiveRecord<'_>> {
    let mut lines = text.lines();

    let id = field(lines.next()?, "Id:")?.parse().ok()?;
    let asin = field(lines.next()?, "ASIN:")?;
    if !ASIN_RE.is_match(asin) {
        return None;
    }
    let title = field(lines.next()?, "title:")?;
    let group = field(lines.next()?, "group:")?;
    let salesrank = field(lines.next()?, "salesrank:")?;

    let sim_caps = SIMILAR_RE.captures(lines.next()?)?;
    let similar = sim_caps.get(2).unwrap().as_str().split_whitespace().collect();

    let cat_caps = CATEGORIES_RE.captures(lines.next()?)?;
    let _declared: i64 = cat_caps[1].parse().ok()?;

    let mut category_lines = Vec::new();
    let mut header_caps = None;
    for line in lines.by_ref() {
        if line.starts_with("reviews:") {
            header_caps = REVIEWS_HEADER_RE.captures(line);
            break;
        }
        category_lines.push(line);
    }
    let header_caps = header_caps?;
    if category_lines.is_empty() {
        return None;
    }

    Some(ActiveRecord {
        id,
        asin,
        title,
        group,
        salesrank,
        similar,
        category_lines,
        review_total: header_caps[1].parse().ok()?,
        avg_rating: header_caps.get(3).unwrap().as_str().trim(),
        review_lines: lines.filter(|l| !l.is_empty()).collect(),
    })
}

/// `key: value` header line; the value is the trimmed remainder and must be
/// non-empty.
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn emit(rec: ActiveRecord<'_>, set: &mut MetadataSet, stats: &mut ParseStats) {
    let asin = rec.asin.to_string();

    set.products.push(ProductRow {
        id: rec.id,
        asin: asin.clone(),
        title: rec.title.to_string(),
        group: rec.group.to_string(),
        salesrank: rec.salesrank.to_string(),
        review_total: rec.review_total,
        avg_rating: rec.avg_rating.to_string(),
    });

    for sim in &rec.similar {
        set.similar.push(SimilarityRow {
            asin: asin.clone(),
            similar_asin: sim.to_string(),
        });
    }

    // A repeated asin starts over with an empty set; later record wins.
    set.asin_categories.insert(asin.clone(), BTreeSet::new());
    let membership = set.asin_categories.get_mut(&asin).unwrap();
    for line in &rec.category_lines {
        for segment in line.split('|') {
            if segment.trim().is_empty() {
                continue;
            }
            match category::parse_segment(segment) {
                Some((cat_id, cat_name)) => {
                    set.categories_by_id.insert(cat_id, cat_name);
                    membership.insert(cat_id);
                }
                None => stats.category_segments_skipped += 1,
            }
        }
    }

    for line in &rec.review_lines {
        match review::parse_line(line) {
            Some(row) => set.reviews.push(row),
            None => stats.review_lines_skipped += 1,
        }
    }
}

// ── Tests ──
