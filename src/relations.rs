use std::collections::{BTreeMap, BTreeSet};

/// One row of product attributes, in input order.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i64,
    pub asin: String,
    pub title: String,
    pub group: String,
    pub salesrank: String,
    pub review_total: i64,
    pub avg_rating: String,
}

/// Directed edge from a product to one of its "similar" products.
#[derive(Debug, Clone)]
pub struct SimilarityRow {
    pub asin: String,
    pub similar_asin: String,
}

/// One review event, date already normalized to YYYY-MM-DD.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub date: String,
    pub customer_id: String,
    pub rating: i64,
    pub votes: i64,
    pub helpful: i64,
}

/// The five output relations, accumulated across one full parse.
///
/// Ordered maps keep catalog and membership iteration stable, so parsing the
/// same text twice renders byte-identical output.
#[derive(Debug, Default)]
pub struct MetadataSet {
    pub products: Vec<ProductRow>,
    pub reviews: Vec<ReviewRow>,
    pub similar: Vec<SimilarityRow>,
    pub categories_by_id: BTreeMap<i64, String>,
    pub asin_categories: BTreeMap<String, BTreeSet<i64>>,
}

impl MetadataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another set parsed from an independent text, keeping
    /// single-threaded semantics: category names are last-write-wins per id,
    /// and a membership set from `other` replaces (not unions with) any
    /// earlier set for the same asin.
    pub fn merge(&mut self, other: MetadataSet) {
        self.products.extend(other.products);
        self.reviews.extend(other.reviews);
        self.similar.extend(other.similar);
        for (id, name) in other.categories_by_id {
            self.categories_by_id.insert(id, name);
        }
        for (asin, cats) in other.asin_categories {
            self.asin_categories.insert(asin, cats);
        }
    }
}

/// Skip/keep counters for one conversion run. Malformed input is dropped
/// silently at parse time; these counts are the only trace it leaves.
#[derive(Debug, Default, Clone)]
pub struct ParseStats {
    pub records: usize,
    pub products: usize,
    pub discontinued: usize,
    pub unrecognized: usize,
    pub category_segments_skipped: usize,
    pub review_lines_skipped: usize,
}

impl ParseStats {
    pub fn print(&self) {
        println!(
            "Parsed {} records: {} products, {} discontinued, {} unrecognized.",
            self.records, self.products, self.discontinued, self.unrecognized,
        );
        if self.category_segments_skipped > 0 || self.review_lines_skipped > 0 {
            println!(
                "Skipped {} category segments, {} review lines.",
                self.category_segments_skipped, self.review_lines_skipped,
            );
        }
    }
}

// ── Tests ──
