//! In-memory [`ResultSink`] that records every call, for tests and headless use.

use std::sync::{Mutex, MutexGuard, PoisonError};

use periscope_core::traits::ResultSink;
use periscope_core::types::SearchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Clear,
    Section { title: String, results: Vec<SearchResult> },
    ShowLoading(String),
    HideLoading(String),
}

#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<SinkEvent>>,
    highlighted: Mutex<Option<SearchResult>>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<SinkEvent> { lock(&self.events).clone() }

    /// Every appended section as `(title, ids)`, in append order.
    pub fn sections(&self) -> Vec<(String, Vec<String>)> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Section { title, results } => {
                    Some((title.clone(), results.iter().map(|r| r.id().to_string()).collect()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<SinkEvent> { std::mem::take(&mut *lock(&self.events)) }

    pub fn set_highlighted(&self, result: Option<SearchResult>) { *lock(&self.highlighted) = result; }

    fn record(&self, event: SinkEvent) { lock(&self.events).push(event); }
}

impl ResultSink for MemorySink {
    fn append_section(&self, title: &str, results: &[SearchResult]) {
        self.record(SinkEvent::Section { title: title.to_string(), results: results.to_vec() });
    }

    fn clear(&self) { self.record(SinkEvent::Clear); }

    fn show_loading(&self, source_title: &str) { self.record(SinkEvent::ShowLoading(source_title.to_string())); }

    fn hide_loading(&self, source_title: &str) { self.record(SinkEvent::HideLoading(source_title.to_string())); }

    fn highlighted(&self) -> Option<SearchResult> { lock(&self.highlighted).clone() }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }
