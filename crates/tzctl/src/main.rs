// path: crates/tzctl/src/main.rs
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use termzilla_index::builder::write_index;
use termzilla_index::catalog::IndexCatalog;
use termzilla_index::corpus::Corpus;
use termzilla_index::normalizer::BasicNormalizer;
use termzilla_index::postings::intersect_all_bounded;
use termzilla_index::query::{split_raw_query, QueryEngine, DEFAULT_MAX_SCANNED};
use termzilla_index::segjson::JsonSegmentReader;
use termzilla_index::shard::ShardPolicy;
use termzilla_index::{DocId, SegmentReader};

#[derive(Parser)]
#[command(version, about = "Termzilla control: build/query the boolean index")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Построить индекс из JSON-корпуса
    BuildIndex {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Максимум документов на сегмент text-индекса; без флага — один сегмент
        #[arg(long)]
        shard_cap: Option<usize>,
    },
    /// Конъюнктивный запрос по построенному индексу
    Query {
        #[arg(long)]
        index: PathBuf,
        /// Подзапрос по объединённому индексу «заголовок + текст»
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "")]
        director: String,
        #[arg(long, default_value = "")]
        starring: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value_t = DEFAULT_MAX_SCANNED)]
        max_scanned: u64,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::BuildIndex {
            corpus,
            out,
            shard_cap,
        } => {
            let started = Instant::now();
            let corpus = Corpus::load(&corpus)?;
            let policy = match shard_cap {
                Some(cap) => ShardPolicy::DocCountCap { cap },
                None => ShardPolicy::Single,
            };
            let n = BasicNormalizer::new();
            let catalog = write_index(&corpus, &n, &out, policy)?;
            tracing::info!(
                docs = catalog.doc_count,
                fields = catalog.fields.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "index built"
            );
        }
        Cmd::Query {
            index,
            query,
            director,
            starring,
            location,
            max_scanned,
        } => {
            let catalog = IndexCatalog::load(&index)?;
            let n = BasicNormalizer::new();

            let sub_queries = [
                ("text", &query),
                ("director", &director),
                ("starring", &starring),
                ("location", &location),
            ];

            let mut per_field: Vec<Vec<DocId>> = Vec::new();
            let mut stopwords = Vec::new();
            let mut unknown = Vec::new();

            for (field, raw) in sub_queries {
                if raw.trim().is_empty() {
                    continue;
                }
                let readers = open_field(&index, &catalog, field)?;
                let engine = QueryEngine::new(&n, &readers).with_max_scanned(max_scanned);
                let out = engine.conjunctive_query(&split_raw_query(raw))?;
                stopwords.extend(out.stopwords);
                unknown.extend(out.unknown);
                per_field.push(out.matched);
            }

            let matched = if unknown.is_empty() {
                intersect_all_bounded(per_field, max_scanned)?
            } else {
                Vec::new()
            };

            for id in &matched {
                println!("{id}");
            }
            eprintln!(
                "hits_total={} stopwords={:?} unknown={:?}",
                matched.len(),
                stopwords,
                unknown
            );
        }
    }
    Ok(())
}

fn open_field(
    root: &Path,
    catalog: &IndexCatalog,
    field: &str,
) -> Result<Vec<JsonSegmentReader>> {
    catalog
        .segments_for(field)?
        .iter()
        .map(|rel| JsonSegmentReader::open_segment(&root.join(rel)))
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
