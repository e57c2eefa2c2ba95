//! Single-context FIFO job queue.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Barrier(oneshot::Sender<()>),
}

/// Runs submitted jobs one at a time, in submission order, on a dedicated
/// tokio task.
///
/// This is the main execution context: configuration reloads and document
/// write-backs are serialized through it.
pub struct MainExecutor {
    sender: mpsc::UnboundedSender<Message>,
    cancel: CancellationToken,
    handle: Handle,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl MainExecutor {
    /// Starts the executor on `handle`.
    pub fn start(handle: &Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = handle.spawn(run(receiver, cancel.clone()));

        Self {
            sender,
            cancel,
            handle: handle.clone(),
            task: Mutex::new(Some(task)),
        }
    }

    /// Runtime the executor lives on.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Queues `job` behind everything submitted before it.
    ///
    /// Returns `false` when the executor has stopped; the job is dropped.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> bool {
        self.sender.send(Message::Run(Box::new(job))).is_ok()
    }

    /// Waits until every job submitted before this call has run.
    ///
    /// Returns immediately once the executor has stopped.
    pub async fn barrier(&self) {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Message::Barrier(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Stops the executor. Jobs still queued are dropped without running.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            error!("Main executor task failed: {}", e);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.sender.is_closed()
    }
}

impl Drop for MainExecutor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for MainExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainExecutor")
            .field("running", &self.is_running())
            .finish()
    }
}

async fn run(mut receiver: mpsc::UnboundedReceiver<Message>, cancel: CancellationToken) {
    debug!("Main executor started");
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            message = receiver.recv() => match message {
                Some(Message::Run(job)) => {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("Main executor job panicked");
                    }
                }
                Some(Message::Barrier(done)) => {
                    let _ = done.send(());
                }
                None => break,
            },
        }
    }
    debug!("Main executor stopped");
}
