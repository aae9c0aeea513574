//! Trailing-edge debouncer.
//!
//! Values pushed into a [`Debouncer`] are forwarded to a background tokio
//! task. The task waits for the first value, then keeps draining the channel
//! until `window` elapses with no new value; only the last value of the burst
//! is handed to the callback. Each push restarts the window.
//!
//! Cancelling drops the pending value. Dropping the debouncer aborts the task,
//! so nothing fires after the owner is gone.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

enum Signal<T> {
    Push(T),
    Cancel,
}

pub struct Debouncer<T> {
    sender: mpsc::UnboundedSender<Signal<T>>,
    task: JoinHandle<()>,
    window: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task. Must be called inside a tokio runtime.
    pub fn new<F, Fut>(window: Duration, on_fire: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debounce_loop(receiver, window, on_fire));
        Self {
            sender,
            task,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a value and restart the quiescence window.
    pub fn push(&self, value: T) {
        if self.sender.send(Signal::Push(value)).is_err() {
            tracing::debug!("debounce task has stopped; dropping value");
        }
    }

    /// Discard the pending value, if any.
    pub fn cancel(&self) {
        let _ = self.sender.send(Signal::Cancel);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_debounce_loop<T, F, Fut>(
    mut receiver: mpsc::UnboundedReceiver<Signal<T>>,
    window: Duration,
    mut on_fire: F,
) where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        // Wait for the first value of a burst
        let mut pending = match receiver.recv().await {
            Some(Signal::Push(value)) => value,
            Some(Signal::Cancel) => continue,
            None => break,
        };

        // Drain further values until the window elapses quietly
        let fire = loop {
            match tokio::time::timeout(window, receiver.recv()).await {
                Ok(Some(Signal::Push(value))) => pending = value,
                Ok(Some(Signal::Cancel)) => break false,
                Ok(None) => return,
                Err(_) => break true,
            }
        };

        if fire {
            on_fire(pending).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tokio::time::sleep;

    const WINDOW: Duration = Duration::from_millis(500);

    fn recording() -> (Arc<Mutex<Vec<String>>>, Debouncer<String>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let debouncer = Debouncer::new(WINDOW, move |value: String| {
            let sink = sink.clone();
            async move {
                sink.lock().push(value);
            }
        });
        (fired, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let (fired, debouncer) = recording();

        for text in ["n", "nu", "nuz", "nuzh"] {
            debouncer.push(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(fired.lock().is_empty());

        sleep(WINDOW).await;
        assert_eq!(*fired.lock(), vec!["nuzh"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_push_restarts_window() {
        let (fired, debouncer) = recording();

        debouncer.push("a".to_string());
        sleep(Duration::from_millis(400)).await;
        debouncer.push("ab".to_string());
        sleep(Duration::from_millis(400)).await;
        assert!(fired.lock().is_empty());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(*fired.lock(), vec!["ab"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let (fired, debouncer) = recording();

        debouncer.push("first".to_string());
        sleep(Duration::from_millis(600)).await;
        debouncer.push("second".to_string());
        sleep(Duration::from_millis(600)).await;

        assert_eq!(*fired.lock(), vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (fired, debouncer) = recording();

        debouncer.push("x".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.cancel();
        sleep(Duration::from_secs(2)).await;

        assert!(fired.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_prevents_firing() {
        let (fired, debouncer) = recording();

        debouncer.push("x".to_string());
        sleep(Duration::from_millis(100)).await;
        drop(debouncer);
        sleep(Duration::from_secs(2)).await;

        assert!(fired.lock().is_empty());
    }
}
