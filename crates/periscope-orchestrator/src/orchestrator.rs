//! Query turns: fan a query out to every source, cancel superseded async
//! searches, rank each section as it arrives, feed selections back to training.
//!
//! Every turn carries a generation number. Async completions compare their
//! generation with the live turn under the turn lock before touching the sink,
//! so a completion that races a newer turn is dropped, never displayed.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use periscope_core::error::{Error, Result};
use periscope_core::traits::ResultSink;
use periscope_core::types::{SearchResult, SourceDescriptor};
use periscope_rank::{RankError, SharedRanker};

use crate::config::OrchestratorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Dispatching,
}

struct Turn {
    generation: u64,
    query: String,
    auto_execute: bool,
    auto_executed: bool,
    /// In-flight async searches keyed by source index.
    active: HashMap<usize, JoinHandle<()>>,
    displayed: Vec<SearchResult>,
}

impl Turn {
    fn new(generation: u64, query: &str, auto_execute: bool) -> Self {
        Self {
            generation,
            query: query.to_string(),
            auto_execute,
            auto_executed: false,
            active: HashMap::new(),
            displayed: Vec::new(),
        }
    }

    fn phase(&self) -> TurnPhase {
        if self.active.is_empty() { TurnPhase::Idle } else { TurnPhase::Dispatching }
    }
}

struct Inner {
    sources: Vec<SourceDescriptor>,
    ranker: SharedRanker,
    sink: Arc<dyn ResultSink>,
    config: OrchestratorConfig,
    auto_execute_first: AtomicBool,
    turn: Mutex<Turn>,
    settled: Notify,
    runtime: Handle,
}

/// Cloneable front of one search box.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    /// Must be called from within a tokio runtime; async sources are spawned on it.
    pub fn new(
        sources: Vec<SourceDescriptor>,
        ranker: SharedRanker,
        sink: Arc<dyn ResultSink>,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;
        Ok(Self::with_runtime(sources, ranker, sink, config, runtime))
    }

    pub fn with_runtime(
        sources: Vec<SourceDescriptor>,
        ranker: SharedRanker,
        sink: Arc<dyn ResultSink>,
        config: OrchestratorConfig,
        runtime: Handle,
    ) -> Self {
        let auto_execute_first = AtomicBool::new(config.auto_execute_first);
        let inner = Inner {
            sources,
            ranker,
            sink,
            config,
            auto_execute_first,
            turn: Mutex::new(Turn::new(0, "", false)),
            settled: Notify::new(),
            runtime,
        };
        Self { inner: Arc::new(inner) }
    }

    /// Typed input changed: start a new turn.
    pub fn on_input_changed(&self, text: &str) {
        let auto_execute = self.auto_execute_first();
        self.inner.consume_query(text, auto_execute);
    }

    /// Recognized speech: start a new turn that runs the most likely result.
    pub fn on_voice_input(&self, transcript: &str) {
        self.inner.consume_query(transcript, true);
    }

    /// Explicit pick: train on `(live query, result)`, then run the result's action.
    pub fn on_select(&self, result: &SearchResult) {
        self.inner.select(result);
    }

    /// Picks the sink's highlighted result, or else the first one shown this turn.
    pub fn on_enter_pressed(&self) -> Option<SearchResult> {
        let target = self.inner.sink.highlighted().or_else(|| self.inner.lock_turn().displayed.first().cloned())?;
        self.inner.select(&target);
        Some(target)
    }

    pub fn auto_execute_first(&self) -> bool { self.inner.auto_execute_first.load(Ordering::SeqCst) }

    pub fn set_auto_execute_first(&self, enabled: bool) { self.inner.auto_execute_first.store(enabled, Ordering::SeqCst); }

    pub fn phase(&self) -> TurnPhase { self.inner.lock_turn().phase() }

    pub fn generation(&self) -> u64 { self.inner.lock_turn().generation }

    pub fn current_query(&self) -> String { self.inner.lock_turn().query.clone() }

    /// Results shown in the live turn, in display order.
    pub fn displayed(&self) -> Vec<SearchResult> { self.inner.lock_turn().displayed.clone() }

    pub fn sources(&self) -> &[SourceDescriptor] { &self.inner.sources }

    /// Resolves once the live turn has no async search left in flight.
    pub async fn settled(&self) {
        loop {
            let notified = self.inner.settled.notified();
            if self.phase() == TurnPhase::Idle {
                return;
            }
            notified.await;
        }
    }
}

impl Inner {
    fn lock_turn(&self) -> MutexGuard<'_, Turn> { self.turn.lock().unwrap_or_else(PoisonError::into_inner) }

    fn consume_query(self: &Arc<Self>, query: &str, auto_execute: bool) {
        let mut turn = self.lock_turn();
        let generation = turn.generation + 1;
        for (_, task) in turn.active.drain() {
            task.abort();
        }
        *turn = Turn::new(generation, query, auto_execute);
        self.sink.clear();
        tracing::debug!(generation, query, auto_execute, "query turn started");

        for source in &self.sources {
            let SourceDescriptor::Sync(source) = source else { continue };
            let ranked = match source.search(query) {
                Ok(results) => self.rank(query, results),
                Err(err) => {
                    tracing::warn!(source = source.title(), %err, "source search failed");
                    self.append_failure(&mut turn, source.title());
                    continue;
                }
            };
            if auto_execute && !ranked.is_empty() {
                turn.auto_executed = true;
                drop(turn);
                self.execute(generation, query, &ranked[0]);
                self.settled.notify_waiters();
                return;
            }
            Self::append(&self.sink, &mut turn, source.title(), ranked);
        }

        for (index, source) in self.sources.iter().enumerate() {
            let SourceDescriptor::Async(source) = source else { continue };
            self.sink.show_loading(source.title());
            let search = AssertUnwindSafe(source.search(query)).catch_unwind();
            let title = source.title().to_string();
            let inner = Arc::clone(self);
            let task = self.runtime.spawn(async move {
                let outcome = search.await.unwrap_or_else(|panic| Err(Error::search_failed(title, panic_message(&*panic))));
                inner.complete(generation, index, outcome);
            });
            turn.active.insert(index, task);
        }

        let idle = turn.active.is_empty();
        drop(turn);
        if idle {
            self.settled.notify_waiters();
        }
    }

    fn complete(&self, generation: u64, index: usize, outcome: Result<Vec<SearchResult>>) {
        let title = self.sources[index].title();
        let mut turn = self.lock_turn();
        if turn.generation != generation {
            tracing::debug!(generation, live = turn.generation, source = title, "stale completion discarded");
            return;
        }
        turn.active.remove(&index);
        self.sink.hide_loading(title);

        match outcome {
            Ok(results) => {
                let query = turn.query.clone();
                let ranked = self.rank(&query, results);
                if turn.auto_execute && !turn.auto_executed && !ranked.is_empty() {
                    turn.auto_executed = true;
                    let idle = turn.active.is_empty();
                    drop(turn);
                    self.execute(generation, &query, &ranked[0]);
                    if idle {
                        self.settled.notify_waiters();
                    }
                    return;
                }
                Self::append(&self.sink, &mut turn, title, ranked);
            }
            Err(err) => {
                tracing::warn!(source = title, %err, "async source search failed");
                self.append_failure(&mut turn, title);
            }
        }

        if turn.active.is_empty() {
            drop(turn);
            tracing::debug!(generation, "query turn settled");
            self.settled.notify_waiters();
        }
    }

    fn select(&self, result: &SearchResult) {
        let (generation, query) = {
            let turn = self.lock_turn();
            (turn.generation, turn.query.clone())
        };
        self.train(&query, result);
        tracing::debug!(id = result.id(), query, "result selected");
        self.run_action(generation, result);
    }

    /// Auto-execution: train on the top result and run it. Called without the turn lock held.
    fn execute(&self, generation: u64, query: &str, top: &SearchResult) {
        tracing::debug!(generation, id = top.id(), query, "auto-executing top result");
        self.train(query, top);
        self.run_action(generation, top);
    }

    fn run_action(&self, generation: u64, result: &SearchResult) {
        if let Err(err) = result.run() {
            let err = Error::ActionFailed { id: result.id().to_string(), reason: format!("{err:#}") };
            tracing::warn!(%err, "result action failed");
            self.reflect_command_failure(generation);
        }
    }

    fn train(&self, query: &str, result: &SearchResult) {
        match self.ranker.train(query, result) {
            Ok(()) => {}
            Err(err @ RankError::UnknownIdentity(_)) => tracing::warn!(%err, "training skipped"),
            Err(err) => tracing::warn!(%err, "training step failed"),
        }
    }

    /// Observe + rank; a failing model keeps the source's own order.
    fn rank(&self, query: &str, results: Vec<SearchResult>) -> Vec<SearchResult> {
        match self.ranker.observe_and_rank(query, results.clone()) {
            Ok(ranked) => ranked,
            Err(err) => {
                tracing::warn!(%err, "ranking failed, keeping source order");
                results
            }
        }
    }

    fn append(sink: &Arc<dyn ResultSink>, turn: &mut Turn, title: &str, results: Vec<SearchResult>) {
        if results.is_empty() {
            return;
        }
        sink.append_section(title, &results);
        turn.displayed.extend(results);
    }

    fn append_failure(&self, turn: &mut Turn, title: &str) {
        let entry = SearchResult::inert(format!("failed:{title}"), self.config.failure_text.clone());
        Self::append(&self.sink, turn, title, vec![entry]);
    }

    fn reflect_command_failure(&self, generation: u64) {
        let mut turn = self.lock_turn();
        if turn.generation != generation {
            return;
        }
        self.sink.clear();
        turn.displayed.clear();
        let title = self.config.command_failure_title.clone();
        let entry = SearchResult::inert(format!("failed:{title}"), self.config.command_failure_text.clone());
        Self::append(&self.sink, &mut turn, &title, vec![entry]);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
