use std::future::Future;

use tokio::task::JoinHandle;

/// Handle to a scheduled background task that can be cancelled.
///
/// Dropping the handle does not cancel the task; only `cancel` does.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawns `work` on the current tokio runtime.
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        TimerHandle {
            task: tokio::spawn(work),
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
