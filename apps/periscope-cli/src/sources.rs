//! Demo sources: a static link catalog (sync) and an adapter that serves any
//! sync source with artificial latency (async).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use periscope_core::error::{Error, Result};
use periscope_core::traits::{AsyncSource, SyncSource};
use periscope_core::types::SearchResult;

/// `[demo]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub websites: BTreeMap<String, String>,
    pub articles: BTreeMap<String, String>,
    pub articles_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let websites = [
            ("Google", "http://www.google.com/"),
            ("Bing", "http://www.bing.com/"),
            ("GitHub", "https://github.com/"),
            ("Hacker News", "https://news.ycombinator.com/"),
            ("Slashdot", "https://slashdot.org/"),
            ("Good Morning Kitten", "http://goodmorningkitten.com/"),
            ("So Pets", "http://www.sopets.com/"),
            ("Petit Bateau", "https://www.petit-bateau.de/"),
            ("Peninsulas of europe", "https://www.quora.com/What-are-all-of-the-peninsulas-in-Europe"),
            ("SBB Cargo", "http://www.sbbcargo.com/"),
            ("Cargo Domizil", "http://www.cargodomizil.ch/"),
        ];
        let articles = [
            ("Rust (programming language)", "https://en.wikipedia.org/wiki/Rust_(programming_language)"),
            ("Rust", "https://en.wikipedia.org/wiki/Rust"),
            ("Periscope", "https://en.wikipedia.org/wiki/Periscope"),
            ("Peninsula", "https://en.wikipedia.org/wiki/Peninsula"),
            ("Cargo", "https://en.wikipedia.org/wiki/Cargo"),
        ];
        Self { websites: owned(&websites), articles: owned(&articles), articles_delay_ms: 400 }
    }
}

fn owned(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Case-insensitive substring match over `name -> url` entries.
pub struct CatalogSource {
    title: String,
    entries: BTreeMap<String, String>,
    icon: Option<String>,
    command_prefix: Option<String>,
}

impl CatalogSource {
    pub fn new(title: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self { title: title.into(), entries, icon: None, command_prefix: None }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Leading word removed from queries before matching, e.g. "wikipedia ".
    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = Some(prefix.into());
        self
    }

    fn open(url: &str) -> anyhow::Result<()> {
        tracing::info!(url, "opening link");
        println!("-> {url}");
        Ok(())
    }
}

impl SyncSource for CatalogSource {
    fn title(&self) -> &str { &self.title }

    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let mut needle = query.trim().to_lowercase();
        if let Some(prefix) = &self.command_prefix {
            if let Some(rest) = needle.strip_prefix(prefix.as_str()) {
                needle = rest.to_string();
            }
        }
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let results = self
            .entries
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .map(|(name, url)| {
                let target = url.clone();
                let result = SearchResult::new(url.clone(), name.clone(), move || Self::open(&target));
                match &self.icon {
                    Some(icon) => result.with_icon(icon.clone()),
                    None => result,
                }
            })
            .collect();
        Ok(results)
    }
}

/// Serves a sync source from a blocking worker after a fixed delay.
pub struct LatentSource<S> {
    inner: Arc<S>,
    delay: Duration,
}

impl<S: SyncSource + 'static> LatentSource<S> {
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner: Arc::new(inner), delay }
    }
}

impl<S: SyncSource + 'static> AsyncSource for LatentSource<S> {
    fn title(&self) -> &str { self.inner.title() }

    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SearchResult>>> {
        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            let title = inner.title().to_string();
            tokio::task::spawn_blocking(move || inner.search(&query))
                .await
                .map_err(|e| Error::search_failed(title, e))?
        }
        .boxed()
    }
}
