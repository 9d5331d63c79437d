use std::sync::{Mutex, MutexGuard, PoisonError};

use periscope_core::traits::ResultSink;
use periscope_core::types::SearchResult;

/// Prints sections as numbered lines and remembers which number maps to which result.
#[derive(Default)]
pub struct TerminalSink {
    entries: Mutex<Vec<SearchResult>>,
    highlight: Mutex<Option<usize>>,
}

impl TerminalSink {
    pub fn new() -> Self { Self::default() }

    /// Result shown under `number` (1-based) in the current list.
    pub fn entry(&self, number: usize) -> Option<SearchResult> {
        number.checked_sub(1).and_then(|i| lock(&self.entries).get(i).cloned())
    }

    pub fn set_highlight(&self, number: Option<usize>) {
        *lock(&self.highlight) = number.and_then(|n| n.checked_sub(1));
    }
}

impl ResultSink for TerminalSink {
    fn append_section(&self, title: &str, results: &[SearchResult]) {
        let mut entries = lock(&self.entries);
        println!("── {title}");
        for result in results {
            entries.push(result.clone());
            let icon = result.icon().map(|i| format!("[{i}] ")).unwrap_or_default();
            println!("  {:>2}. {icon}{}", entries.len(), result.text());
        }
    }

    fn clear(&self) {
        lock(&self.entries).clear();
        *lock(&self.highlight) = None;
    }

    fn show_loading(&self, source_title: &str) { println!("   … {source_title} loading"); }

    fn hide_loading(&self, source_title: &str) { tracing::debug!(source = source_title, "loading finished"); }

    fn highlighted(&self) -> Option<SearchResult> {
        let index = (*lock(&self.highlight))?;
        lock(&self.entries).get(index).cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }
