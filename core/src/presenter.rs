use std::fmt;

use serde::Serialize;

use crate::DocId;

/// Page limit applied by the interactive presentation.
pub const MAX_PAGES: usize = 10;

/// Resolves a document id to its original, unnormalized title and author.
pub trait RecordLookup {
    fn title_author(&self, id: DocId) -> Option<(&str, &str)>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterConfig {
    /// Entries scoring below this are dropped.
    pub threshold: f64,
    /// Entries per page; 0 is treated as 1.
    pub page_size: usize,
    /// Stop after `MAX_PAGES` pages.
    pub cap_pages: bool,
}

impl PresenterConfig {
    /// Settings used by the web form.
    pub fn interactive() -> Self {
        Self { threshold: 1.0, page_size: 5, cap_pages: true }
    }

    /// Settings used for reports.
    pub fn batch() -> Self {
        Self { threshold: 0.5, page_size: 10, cap_pages: false }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self { Self::batch() }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub doc_id: DocId,
    pub title: String,
    pub author: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub entries: Vec<Entry>,
}

/// A ranking after threshold filtering and pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    NoResults,
    NoneAboveThreshold { threshold: f64 },
    Pages { pages: Vec<Page> },
}

impl Presentation {
    pub fn pages(&self) -> &[Page] {
        match self {
            Presentation::Pages { pages } => pages.as_slice(),
            _ => &[],
        }
    }

    pub fn entry_count(&self) -> usize {
        self.pages().iter().map(|p| p.entries.len()).sum()
    }

    /// Same content as `Display`, with `<br>` line breaks and escaped record text.
    pub fn render_html(&self) -> String {
        match self {
            Presentation::Pages { pages } => {
                let mut out = String::new();
                for page in pages {
                    out.push_str(&format!("Page {}:<br>", page.number));
                    for e in &page.entries {
                        out.push_str(&format!(
                            "Book ID: {}, Title: {}, Author: {}, Score: {:.2}<br>",
                            e.doc_id,
                            escape_html(&e.title),
                            escape_html(&e.author),
                            e.score
                        ));
                    }
                    out.push_str("<br>");
                }
                out
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::NoResults => f.write_str("No matching books found."),
            // Debug keeps the decimal point on whole numbers: 1.0, not 1
            Presentation::NoneAboveThreshold { threshold } => {
                write!(f, "No matching books found above threshold {threshold:?}.")
            }
            Presentation::Pages { pages } => {
                for page in pages {
                    writeln!(f, "Page {}:", page.number)?;
                    for e in &page.entries {
                        writeln!(f, "Book ID: {}, Title: {}, Author: {}, Score: {:.2}", e.doc_id, e.title, e.author, e.score)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Filters a ranking by score and splits it into pages of display entries.
pub struct ResultPresenter<'a, L> {
    records: &'a L,
    cap_pages: bool,
}

impl<'a, L: RecordLookup> ResultPresenter<'a, L> {
    pub fn new(records: &'a L, cap_pages: bool) -> Self {
        Self { records, cap_pages }
    }

    /// Present with every setting taken from `config`.
    pub fn present_with(records: &'a L, ranking: &[(DocId, f64)], config: &PresenterConfig) -> Presentation {
        Self::new(records, config.cap_pages).present(ranking, config.threshold, config.page_size)
    }

    pub fn present(&self, ranking: &[(DocId, f64)], threshold: f64, page_size: usize) -> Presentation {
        if ranking.is_empty() {
            return Presentation::NoResults;
        }
        let mut filtered: Vec<(DocId, f64)> = ranking.iter().copied().filter(|(_, score)| *score >= threshold).collect();
        if filtered.is_empty() {
            return Presentation::NoneAboveThreshold { threshold };
        }
        filtered.sort_by(|a, b| b.1.total_cmp(&a.1));

        let page_size = page_size.max(1);
        let mut num_pages = filtered.len().div_ceil(page_size);
        if self.cap_pages {
            num_pages = num_pages.min(MAX_PAGES);
        }
        let pages = filtered
            .chunks(page_size)
            .take(num_pages)
            .enumerate()
            .map(|(i, chunk)| Page {
                number: i + 1,
                entries: chunk.iter().map(|&(doc_id, score)| self.entry(doc_id, score)).collect(),
            })
            .collect();
        Presentation::Pages { pages }
    }

    /// Rendered plain-text form of `present`.
    pub fn present_text(&self, ranking: &[(DocId, f64)], threshold: f64, page_size: usize) -> String {
        self.present(ranking, threshold, page_size).to_string()
    }

    fn entry(&self, doc_id: DocId, score: f64) -> Entry {
        let (title, author) = self.records.title_author(doc_id).unwrap_or_else(|| {
            tracing::warn!(doc_id, "no original record for ranked document");
            ("", "")
        });
        Entry { doc_id, title: title.to_string(), author: author.to_string(), score }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
