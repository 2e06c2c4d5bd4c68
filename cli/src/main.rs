use anyhow::{Context, Result};
use booksearch_core::{
    Corpus, EnglishNormalizer, PresenterConfig, RankingEngine, ResultPresenter, SourceConfig, TextNormalizer,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "booksearch")]
#[command(about = "Rank a book corpus against a query with TF-IDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one query and print every page of results
    Query {
        /// Corpus csv file
        #[arg(long)]
        corpus: String,
        /// Free-text query
        #[arg(long)]
        query: String,
        /// Minimum score to report
        #[arg(long, default_value_t = 0.5)]
        threshold: f64,
        /// Results per page
        #[arg(long, default_value_t = 10)]
        page_size: usize,
        /// Stop after 10 pages, as the web form does
        #[arg(long, default_value_t = false)]
        cap_pages: bool,
        /// Column fed into the description field
        #[arg(long, default_value = "text_reviews_count")]
        description_column: String,
        /// Score the query as typed, without stop-word removal or stemming
        #[arg(long, default_value_t = false)]
        raw_query: bool,
        /// Print the presentation as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { corpus, query, threshold, page_size, cap_pages, description_column, raw_query, json } => {
            let source = SourceConfig { description_column, ..SourceConfig::default() };
            let config = PresenterConfig { threshold, page_size, cap_pages };
            run_query(&corpus, &source, &query, raw_query, &config, json)
        }
    }
}

fn run_query(path: &str, source: &SourceConfig, query: &str, raw_query: bool, config: &PresenterConfig, json: bool) -> Result<()> {
    let corpus = Corpus::open(path, source).with_context(|| format!("loading corpus {path}"))?;
    let normalizer = EnglishNormalizer;
    let engine = RankingEngine::new(corpus.documents(&normalizer)).context("building ranking engine")?;

    let query = if raw_query { query.to_string() } else { normalizer.normalize(query) };
    let ranking = engine.score(&query);
    tracing::info!(%query, docs = ranking.len(), "query ranked");

    let presentation = ResultPresenter::present_with(&corpus, &ranking, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&presentation)?);
    } else {
        print!("{presentation}");
        if presentation.pages().is_empty() {
            println!();
        }
    }
    Ok(())
}
