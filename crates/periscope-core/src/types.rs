//! Domain types shared by sources, the ranking engine and the orchestrator.

use std::fmt;
use std::sync::Arc;

use crate::traits::{AsyncSource, SyncSource};

pub type ResultId = String;

/// Deferred side effect attached to a result (e.g. "open this URL").
pub type Action = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// One entry produced by a source for a query.
///
/// - `text`: display text, may carry markup from an external highlighter
/// - `id`: stable identity, the ranking model's training label; "the same"
///   result must carry the same id across searches
/// - `icon`: optional icon tag for the UI
/// - `action`: run at most once per selection
#[derive(Clone)]
pub struct SearchResult {
    text: String,
    id: ResultId,
    icon: Option<String>,
    action: Action,
}

impl SearchResult {
    pub fn new<F>(id: impl Into<ResultId>, text: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self { text: text.into(), id: id.into(), icon: None, action: Arc::new(action) }
    }

    /// A result whose action does nothing.
    pub fn inert(id: impl Into<ResultId>, text: impl Into<String>) -> Self {
        Self::new(id, text, || Ok(()))
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn text(&self) -> &str { &self.text }

    pub fn id(&self) -> &str { &self.id }

    pub fn icon(&self) -> Option<&str> { self.icon.as_deref() }

    pub fn run(&self) -> anyhow::Result<()> { (self.action)() }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

/// Results compare by identity; the action is not part of equality.
impl PartialEq for SearchResult {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.text == other.text && self.icon == other.icon
    }
}

impl Eq for SearchResult {}

/// Indicates how a source delivers its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sync,
    Async,
}

/// A registered source: a title plus either a blocking or a future-returning search.
#[derive(Clone)]
pub enum SourceDescriptor {
    Sync(Arc<dyn SyncSource>),
    Async(Arc<dyn AsyncSource>),
}

impl SourceDescriptor {
    pub fn title(&self) -> &str {
        match self {
            Self::Sync(source) => source.title(),
            Self::Async(source) => source.title(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Sync(_) => SourceKind::Sync,
            Self::Async(_) => SourceKind::Async,
        }
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor").field("title", &self.title()).field("kind", &self.kind()).finish()
    }
}
