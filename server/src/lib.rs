use anyhow::{Context, Result};
use axum::{extract::{Form, Query, State}, response::Html, routing::get, Json, Router};
use booksearch_core::presenter::Page;
use booksearch_core::{
    Corpus, EnglishNormalizer, Presentation, PresenterConfig, Ranking, RankingEngine, ResultPresenter, SourceConfig,
    TextNormalizer,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub source: SourceConfig,
    /// Skip stop-word removal and stemming of incoming queries.
    pub raw_query: bool,
}

/// Everything a request needs, built once before the listener starts.
pub struct SearchApp {
    corpus: Corpus,
    normalizer: EnglishNormalizer,
    engine: RankingEngine,
    raw_query: bool,
}

impl SearchApp {
    pub fn load<P: AsRef<Path>>(corpus_path: P, options: &ServerOptions) -> Result<Self> {
        let corpus_path = corpus_path.as_ref();
        let corpus = Corpus::open(corpus_path, &options.source)
            .with_context(|| format!("loading corpus {}", corpus_path.display()))?;
        Self::from_corpus(corpus, options.raw_query)
    }

    pub fn from_corpus(corpus: Corpus, raw_query: bool) -> Result<Self> {
        let normalizer = EnglishNormalizer;
        let engine = RankingEngine::new(corpus.documents(&normalizer)).context("building ranking engine")?;
        Ok(Self { corpus, normalizer, engine, raw_query })
    }

    pub fn rank(&self, query: &str) -> Ranking {
        if self.raw_query {
            self.engine.score(query)
        } else {
            self.engine.score(&self.normalizer.normalize(query))
        }
    }

    pub fn present(&self, ranking: &Ranking, config: &PresenterConfig) -> Presentation {
        ResultPresenter::present_with(&self.corpus, ranking, config)
    }
}

pub type AppState = Arc<SearchApp>;

#[derive(Deserialize)]
pub struct SearchForm {
    pub query: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}
fn default_threshold() -> f64 { PresenterConfig::interactive().threshold }
fn default_page_size() -> usize { PresenterConfig::interactive().page_size }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// documents with a positive score
    pub total_hits: usize,
    pub above_threshold: usize,
    pub pages: Vec<Page>,
    pub message: Option<String>,
}

pub fn build_app<P: AsRef<Path>>(corpus_path: P, options: &ServerOptions) -> Result<Router> {
    let app = SearchApp::load(corpus_path, options)?;
    Ok(router(Arc::new(app)))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(form_handler).post(results_handler))
        .route("/search", get(search_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn form_handler() -> Html<String> {
    Html(render_page("", None))
}

pub async fn results_handler(State(app): State<AppState>, Form(form): Form<SearchForm>) -> Html<String> {
    let ranking = app.rank(&form.query);
    let presentation = app.present(&ranking, &PresenterConfig::interactive());
    Html(render_page(&form.query, Some(&presentation.render_html())))
}

pub async fn search_handler(State(app): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let ranking = app.rank(&params.q);
    let config = PresenterConfig { threshold: params.threshold, page_size: params.page_size, cap_pages: true };
    let presentation = app.present(&ranking, &config);

    let total_hits = ranking.iter().filter(|(_, score)| *score > 0.0).count();
    let above_threshold = ranking.iter().filter(|(_, score)| *score >= params.threshold).count();
    let message = match &presentation {
        Presentation::Pages { .. } => None,
        other => Some(other.to_string()),
    };
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, above_threshold, "search served");
    Json(SearchResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        total_hits,
        above_threshold,
        pages: presentation.pages().to_vec(),
        message,
    })
}

fn render_page(query: &str, results: Option<&str>) -> String {
    let mut page = String::from(
        "<!doctype html>\n<html>\n<head><title>Book Search</title></head>\n<body>\n<h1>Book Search</h1>\n\
         <form method=\"post\" action=\"/\">\n",
    );
    page.push_str(&format!(
        "<input type=\"text\" name=\"query\" value=\"{}\">\n<button type=\"submit\">Search</button>\n</form>\n",
        escape_attr(query)
    ));
    if let Some(results) = results {
        page.push_str("<div class=\"results\">");
        page.push_str(results);
        page.push_str("</div>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}
