//! Debounced search session behind a text input.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::debounce::Debouncer;
use crate::store::DataStore;

use super::{SearchOutcome, SearchTerm, global};

/// Keystrokes go in through [`SearchSession::input`]; once typing pauses for
/// the debounce window the last text is evaluated and the outcome published
/// on a watch channel.
///
/// A failed search is logged and the last settled outcome (anything other
/// than [`SearchOutcome::Loading`]) is put back. An outcome computed for text
/// that has since changed is dropped; the evaluation for the newer text
/// settles the panel.
pub struct SearchSession {
    text: Arc<Mutex<String>>,
    outcome: Outcome,
    debouncer: Debouncer<String>,
}

/// The published outcome plus the last one that was not `Loading`.
#[derive(Clone)]
struct Outcome {
    sender: watch::Sender<SearchOutcome>,
    settled: Arc<Mutex<SearchOutcome>>,
}

impl Outcome {
    fn new() -> Self {
        let (sender, _) = watch::channel(SearchOutcome::Prompt);
        Self {
            sender,
            settled: Arc::new(Mutex::new(SearchOutcome::Prompt)),
        }
    }

    fn publish(&self, next: SearchOutcome) {
        if next != SearchOutcome::Loading {
            *self.settled.lock() = next.clone();
        }
        self.sender.send_replace(next);
    }

    fn restore(&self) {
        let settled = self.settled.lock().clone();
        self.sender.send_replace(settled);
    }
}

impl SearchSession {
    /// Must be called inside a tokio runtime.
    pub fn new<S>(store: Arc<S>, window: Duration, limit: usize) -> Self
    where
        S: DataStore + 'static,
    {
        let text = Arc::new(Mutex::new(String::new()));
        let outcome = Outcome::new();

        let debouncer = Debouncer::new(window, {
            let text = text.clone();
            let outcome = outcome.clone();
            move |input: String| {
                let store = store.clone();
                let text = text.clone();
                let outcome = outcome.clone();
                async move {
                    if SearchTerm::parse(&input).is_none() {
                        outcome.publish(SearchOutcome::Prompt);
                        return;
                    }

                    outcome.publish(SearchOutcome::Loading);
                    let result = global::evaluate(store.as_ref(), &input, limit).await;

                    if *text.lock() != input {
                        tracing::debug!("dropping search outcome for superseded input");
                        return;
                    }
                    match result {
                        Ok(next) => outcome.publish(next),
                        Err(e) => {
                            tracing::warn!("Search error: {e}");
                            outcome.restore();
                        }
                    }
                }
            }
        });

        Self {
            text,
            outcome,
            debouncer,
        }
    }

    /// Record the current input and restart the debounce window.
    pub fn input(&self, text: &str) {
        *self.text.lock() = text.to_string();
        self.debouncer.push(text.to_string());
    }

    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome> {
        self.outcome.sender.subscribe()
    }

    /// Clear the input and results, dropping any pending evaluation.
    pub fn close(&self) {
        self.text.lock().clear();
        self.debouncer.cancel();
        self.outcome.publish(SearchOutcome::Prompt);
    }
}
