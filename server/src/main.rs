use anyhow::Result;
use axum::Router;
use booksearch_core::SourceConfig;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use booksearch_server::{build_app, ServerOptions};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus csv file
    #[arg(long, default_value = "./books.csv")]
    corpus: String,
    /// Column fed into the description field
    #[arg(long, default_value = "text_reviews_count")]
    description_column: String,
    /// Score queries as typed, without stop-word removal or stemming
    #[arg(long, default_value_t = false)]
    raw_query: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let options = ServerOptions {
        source: SourceConfig { description_column: args.description_column, ..SourceConfig::default() },
        raw_query: args.raw_query,
    };
    let app: Router = build_app(&args.corpus, &options)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
