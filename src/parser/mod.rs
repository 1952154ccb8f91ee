pub mod category;
pub mod product;
pub mod records;
pub mod review;

use crate::relations::{MetadataSet, ParseStats};

/// Two-pass pipeline: raw dump → record blocks → five relations.
pub fn convert_text(raw_text: &str) -> (MetadataSet, ParseStats) {
    let mut set = MetadataSet::new();
    let mut stats = ParseStats::default();
    for record in records::split(raw_text) {
        product::parse_record(&record, &mut set, &mut stats);
    }
    (set, stats)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{render, Relation};

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/amazon_meta_sample.txt").unwrap()
    }

    #[test]
    fn fixture_counts() {
        let (set, stats) = convert_text(&fixture());
        // 4 blocks: sample product, discontinued, zero-review product, junk.
        assert_eq!(stats.records, 4);
        assert_eq!(stats.products, 2);
        assert_eq!(stats.discontinued, 1);
        assert_eq!(stats.unrecognized, 1);
        assert_eq!(set.products.len(), 2);
    }

    #[test]
    fn fixture_relations() {
        let (set, _) = convert_text(&fixture());
        assert_eq!(set.similar.len(), 5);
        assert_eq!(set.reviews.len(), 2);
        assert_eq!(set.asin_categories.len(), 2);
        assert!(set.categories_by_id.contains_key(&283155));
    }

    #[test]
    fn unterminated_tail_is_dropped() {
        let (set, stats) = convert_text("Id: 9\nASIN: X000\ntitle: t\n");
        assert_eq!(stats.records, 0);
        assert!(set.products.is_empty());
    }

    #[test]
    fn idempotent_over_same_input() {
        let text = fixture();
        let (a, _) = convert_text(&text);
        let (b, _) = convert_text(&text);
        for relation in Relation::ALL {
            assert_eq!(render(relation, &a), render(relation, &b));
        }
    }
}
