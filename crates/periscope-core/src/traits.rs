use futures::future::BoxFuture;

use crate::error::Result;
use crate::types::SearchResult;

/// A source answering on the caller's thread.
pub trait SyncSource: Send + Sync {
    fn title(&self) -> &str;
    fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// A source whose answer arrives later. Dropping the future cancels the search.
pub trait AsyncSource: Send + Sync {
    fn title(&self) -> &str;
    fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<SearchResult>>>;
}

/// Receiver of ranked sections, owned by the UI layer.
pub trait ResultSink: Send + Sync {
    fn append_section(&self, title: &str, results: &[SearchResult]);
    fn clear(&self);
    fn show_loading(&self, source_title: &str);
    fn hide_loading(&self, source_title: &str);
    /// The entry currently highlighted by keyboard navigation, if the UI tracks one.
    fn highlighted(&self) -> Option<SearchResult> { None }
}
