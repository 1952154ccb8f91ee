mod fetch;
mod parser;
mod relations;
mod sink;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use relations::MetadataSet;
use sink::{DirSink, Relation};

#[derive(Parser)]
#[command(name = "amazon_meta", about = "Amazon product metadata dump to relational CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and decompress a metadata dump to a staging file
    Fetch {
        /// Source URL of the (gzip-compressed) dump
        #[arg(long)]
        url: String,
        /// Staging file to write the decompressed text to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert staged dump file(s) into the five CSV relations
    Convert {
        /// Input dump files (.gz accepted), concatenated in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory receiving the relation CSVs
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Fetch + convert in one pipeline, no staging file
    Run {
        /// Source URL of the (gzip-compressed) dump
        #[arg(long)]
        url: String,
        /// Directory receiving the relation CSVs
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch { url, output } => {
            let text = fetch::download_text(&url).await?;
            std::fs::write(&output, &text)?;
            println!("Staged {} bytes to {}", text.len(), output.display());
            Ok(())
        }
        Commands::Convert { inputs, out_dir } => {
            let text = fetch::read_raw_text(&inputs)?;
            convert_and_write(&text, &out_dir)
        }
        Commands::Run { url, out_dir } => {
            let text = fetch::download_text(&url).await?;
            convert_and_write(&text, &out_dir)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn convert_and_write(text: &str, out_dir: &PathBuf) -> anyhow::Result<()> {
    let (set, stats) = parser::convert_text(text);
    let mut sink = DirSink::new(out_dir)?;
    sink::write_all(&mut sink, &set)?;
    stats.print();
    print_row_counts(&set);
    println!("Relations written to {}", out_dir.display());
    Ok(())
}

fn print_row_counts(set: &MetadataSet) {
    let membership: usize = set.asin_categories.values().map(|c| c.len()).sum();
    println!(
        "Rows: {} {}, {} {}, {} {}, {} {}, {} {}.",
        set.products.len(),
        Relation::ProductProperties.name(),
        set.reviews.len(),
        Relation::Reviews.name(),
        set.similar.len(),
        Relation::SimilarityEdges.name(),
        set.categories_by_id.len(),
        Relation::CategoryCatalog.name(),
        membership,
        Relation::CategoryMembership.name(),
    );
}
