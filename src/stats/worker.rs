use std::sync::Arc;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

/// A piece of stats state mutated by exactly one worker task.
pub trait Domain: Send + Sync + 'static {
    type Event: Send + 'static;

    /// Used in log lines.
    const NAME: &'static str;

    fn apply(&mut self, event: Self::Event);
}

pub enum Message<E> {
    Apply(E),
    /// Acknowledged once every earlier message has been applied.
    Flush(oneshot::Sender<()>),
}

/// Sending half of a domain's queue plus read access to its state.
pub struct DomainHandle<D: Domain> {
    tx: mpsc::UnboundedSender<Message<D::Event>>,
    state: Arc<RwLock<D>>,
}

impl<D: Domain> DomainHandle<D> {
    /// Spawns the owning worker on `runtime`.
    pub fn spawn(runtime: &Handle, domain: D) -> Self {
        let state = Arc::new(RwLock::new(domain));
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run(rx, Arc::clone(&state)));
        Self { tx, state }
    }

    /// Fire-and-forget; never blocks the producer.
    pub fn send(&self, event: D::Event) {
        if self.tx.send(Message::Apply(event)).is_err() {
            tracing::warn!(domain = D::NAME, "stats worker gone, event dropped");
        }
    }

    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Runs `f` against a consistent view of the domain.
    pub fn read<T>(&self, f: impl FnOnce(&D) -> T) -> T {
        f(&self.state.read())
    }
}

// ─── Worker loop ─────────────────────────────────────────────────

async fn run<D: Domain>(mut rx: mpsc::UnboundedReceiver<Message<D::Event>>, state: Arc<RwLock<D>>) {
    tracing::debug!(domain = D::NAME, "stats worker started");

    while let Some(message) = rx.recv().await {
        match message {
            Message::Apply(event) => {
                state.write().apply(event);
            }
            Message::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    tracing::debug!(domain = D::NAME, "stats worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sum(u64);

    impl Domain for Sum {
        type Event = u64;
        const NAME: &'static str = "sum";

        fn apply(&mut self, event: u64) {
            self.0 += event;
        }
    }

    #[tokio::test]
    async fn flush_waits_for_earlier_events() {
        let handle = DomainHandle::spawn(&Handle::current(), Sum::default());
        for i in 1..=100 {
            handle.send(i);
        }
        handle.flush().await;
        assert_eq!(handle.read(|s| s.0), 5050);
    }
}
