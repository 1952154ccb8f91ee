use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::relations::MetadataSet;

/// The five logical output relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    ProductProperties,
    Reviews,
    SimilarityEdges,
    CategoryCatalog,
    CategoryMembership,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::ProductProperties,
        Relation::Reviews,
        Relation::SimilarityEdges,
        Relation::CategoryCatalog,
        Relation::CategoryMembership,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Relation::ProductProperties => "product-properties",
            Relation::Reviews => "reviews",
            Relation::SimilarityEdges => "similarity-edges",
            Relation::CategoryCatalog => "category-catalog",
            Relation::CategoryMembership => "category-membership",
        }
    }
}

/// Render one relation as comma-joined rows, no header, no quoting. Field
/// content passes through unescaped; the source grammar guarantees no field
/// contains a newline, and commas only ever appear in free-text tail fields.
pub fn render(relation: Relation, set: &MetadataSet) -> Vec<String> {
    match relation {
        Relation::ProductProperties => set
            .products
            .iter()
            .map(|p| {
                format!(
                    "{},{},{},{},{},{},{}",
                    p.id, p.asin, p.title, p.group, p.salesrank, p.review_total, p.avg_rating
                )
            })
            .collect(),
        Relation::Reviews => set
            .reviews
            .iter()
            .map(|r| {
                format!(
                    "{},{},{},{},{}",
                    r.date, r.customer_id, r.rating, r.votes, r.helpful
                )
            })
            .collect(),
        Relation::SimilarityEdges => set
            .similar
            .iter()
            .map(|s| format!("{},{}", s.asin, s.similar_asin))
            .collect(),
        Relation::CategoryCatalog => set
            .categories_by_id
            .iter()
            .map(|(id, name)| format!("{},{}", id, name))
            .collect(),
        Relation::CategoryMembership => set
            .asin_categories
            .iter()
            .flat_map(|(asin, cats)| cats.iter().map(move |id| format!("{},{}", asin, id)))
            .collect(),
    }
}

/// Destination for finished relations.
pub trait RelationSink {
    fn write_relation(&mut self, relation: Relation, lines: &[String]) -> Result<()>;
}

/// Writes each relation to `<dir>/<name>.csv`, one row per line.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        Ok(Self { dir })
    }
}

impl RelationSink for DirSink {
    fn write_relation(&mut self, relation: Relation, lines: &[String]) -> Result<()> {
        let path = self.dir.join(format!("{}.csv", relation.name()));
        let mut body = lines.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        info!(relation = relation.name(), rows = lines.len(), "wrote relation");
        Ok(())
    }
}

/// Render and write all five relations.
pub fn write_all(sink: &mut dyn RelationSink, set: &MetadataSet) -> Result<()> {
    for relation in Relation::ALL {
        let lines = render(relation, set);
        sink.write_relation(relation, &lines)?;
    }
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::convert_text;

    const RECORD: &str = "\
Id: 1
ASIN: 0827229534
title: Patterns of Preaching: A Sermon Sampler
group: Book
salesrank: 396585
similar: 2 0804215715 156101074X
categories: 1
|Books[283155]|Subjects[1000]
reviews: total: 1  downloaded: 1  avg rating: 5
2000-7-28  customer: A2JW67OY8U6HHK  rating: 5  votes: 10  helpful: 9

";

    #[test]
    fn product_properties_row_format() {
        let (set, _) = convert_text(RECORD);
        let lines = render(Relation::ProductProperties, &set);
        assert_eq!(
            lines,
            vec!["1,0827229534,Patterns of Preaching: A Sermon Sampler,Book,396585,1,5"]
        );
    }

    #[test]
    fn review_row_format() {
        let (set, _) = convert_text(RECORD);
        let lines = render(Relation::Reviews, &set);
        assert_eq!(lines, vec!["2000-07-28,A2JW67OY8U6HHK,5,10,9"]);
    }

    #[test]
    fn edge_and_catalog_formats() {
        let (set, _) = convert_text(RECORD);
        assert_eq!(
            render(Relation::SimilarityEdges, &set),
            vec!["0827229534,0804215715", "0827229534,156101074X"]
        );
        assert_eq!(
            render(Relation::CategoryCatalog, &set),
            vec!["1000,Subjects", "283155,Books"]
        );
        assert_eq!(
            render(Relation::CategoryMembership, &set),
            vec!["0827229534,1000", "0827229534,283155"]
        );
    }

    #[test]
    fn dir_sink_writes_files() {
        let dir = std::env::temp_dir().join(format!("amazon_meta_sink_{}", std::process::id()));
        let (set, _) = convert_text(RECORD);
        let mut sink = DirSink::new(&dir).unwrap();
        write_all(&mut sink, &set).unwrap();
        let props = std::fs::read_to_string(dir.join("product-properties.csv")).unwrap();
        assert!(props.ends_with('\n'));
        assert!(props.starts_with("1,0827229534,"));
        for relation in Relation::ALL {
            assert!(dir.join(format!("{}.csv", relation.name())).exists());
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}
