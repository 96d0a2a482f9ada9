//! Session runtime.
//!
//! The [`Controller`] owns the [`SessionState`] and is the single control
//! thread of the engine: every state change goes through
//! [`Controller::dispatch`]. Collaborator calls run as spawned tokio tasks
//! whose only effect is to send a completion [`Message`] back over an
//! unbounded channel; the controller applies it on its next
//! [`next_completion`](Controller::next_completion).
//!
//! In-flight requests are never aborted. A stale recommendation is simply
//! ignored by `update` when it arrives. A collaborator call that panics still
//! reports back, as a `TaskFailed` error, so `settle` always returns.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;

use super::messages::{FileAnalysis, Message};
use super::state::SessionState;
use super::task::{BatchId, RequestEpoch, Task};
use super::update::update;
use crate::model::{Track, TrackId};
use crate::services::{AnalysisError, Analyzer, RecommendationError, Recommender};

/// What a completion turned out to be, for presentation layers that want to
/// react (print the new suggestions, report a finished batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Analysis { batch: BatchId },
    Recommendation { epoch: RequestEpoch, applied: bool },
}

pub struct Controller {
    state: SessionState,
    analyzer: Arc<dyn Analyzer>,
    recommender: Arc<dyn Recommender>,
    analysis_concurrency: usize,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
}

impl Controller {
    pub fn new(state: SessionState, analyzer: Arc<dyn Analyzer>, recommender: Arc<dyn Recommender>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            analyzer,
            recommender,
            analysis_concurrency: 1,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Analyzer calls per batch that may run at once. 1 (the default) analyses
    /// files one after another; results are merged in input order either way.
    pub fn with_analysis_concurrency(mut self, concurrency: usize) -> Self {
        self.analysis_concurrency = concurrency.max(1);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Collaborator calls whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and start whatever collaborator calls it requests.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// Only completions received from the controller's own workers count
    /// against [`in_flight`](Self::in_flight); a completion dispatched here is
    /// applied like any other message.
    pub fn dispatch(&mut self, message: Message) {
        if message.is_completion() {
            tracing::debug!(target: "session::runtime", "Completion dispatched from outside the worker channel");
        }
        self.apply(message);
    }

    fn apply(&mut self, message: Message) {
        let task = update(&mut self.state, message);
        self.run(task);
    }

    /// Wait for the next collaborator call to finish and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let message = self.rx.recv().await?;
        self.in_flight -= 1;
        let completion = match &message {
            Message::AnalysisFinished { batch, .. } => Completion::Analysis { batch: *batch },
            Message::SuggestionsReceived { epoch, .. } => Completion::Recommendation {
                epoch: *epoch,
                applied: self.state.recommendations.awaits(*epoch),
            },
            _ => return None,
        };
        self.apply(message);
        Some(completion)
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Analyze { batch, files } => self.spawn_analysis(batch, files),
            Task::Recommend {
                epoch,
                current,
                candidates,
            } => self.spawn_recommendation(epoch, current, candidates),
            Task::None => {}
        }
    }

    fn spawn_analysis(&mut self, batch: BatchId, files: Vec<String>) {
        self.in_flight += 1;
        let analyzer = Arc::clone(&self.analyzer);
        let tx = self.tx.clone();
        let concurrency = self.analysis_concurrency;

        tokio::spawn(async move {
            let outcomes: Vec<FileAnalysis> = futures::stream::iter(files)
                .map(|source| {
                    let analyzer = Arc::clone(&analyzer);
                    async move {
                        // The analyzer only ever sees the file name, never the directory
                        let filename = TrackId::from_source(&source).to_string();
                        let call = tokio::spawn(async move { analyzer.analyze(&filename).await });
                        let result = call.await.unwrap_or_else(|e| {
                            tracing::error!(target: "session::runtime", "Analyzer task for {} failed: {}", source, e);
                            Err(AnalysisError::TaskFailed(e.to_string()))
                        });
                        FileAnalysis { source, result }
                    }
                })
                .buffered(concurrency)
                .collect()
                .await;
            // The receiver lives as long as the controller
            let _ = tx.send(Message::AnalysisFinished { batch, outcomes });
        });
    }

    fn spawn_recommendation(&mut self, epoch: RequestEpoch, current: Track, candidates: Vec<Track>) {
        self.in_flight += 1;
        let recommender = Arc::clone(&self.recommender);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let call = tokio::spawn(async move { recommender.recommend(&current, &candidates).await });
            let result = call.await.unwrap_or_else(|e| {
                tracing::error!(target: "session::runtime", "Recommender task failed: {}", e);
                Err(RecommendationError::TaskFailed(e.to_string()))
            });
            let _ = tx.send(Message::SuggestionsReceived { epoch, result });
        });
    }
}
