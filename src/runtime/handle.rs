use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::runtime::error::Error;

/// State shared between a handle and its background task.
pub(crate) struct Shared<O> {
    pub(crate) paused: AtomicBool,
    /// Bumped on every pause and resume; output from an older epoch is stale.
    pub(crate) epoch: AtomicU64,
    pub(crate) output: watch::Sender<Option<(u64, O)>>,
}

impl<O> Shared<O> {
    pub(crate) fn new(output: watch::Sender<Option<(u64, O)>>) -> Self {
        Self {
            paused: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            output,
        }
    }

    /// Publish `value` computed during `epoch`, unless a pause or resume
    /// happened since.
    pub(crate) fn publish(&self, epoch: u64, value: O) {
        if self.paused.load(Ordering::SeqCst) || self.epoch.load(Ordering::SeqCst) != epoch {
            return;
        }
        self.output.send_replace(Some((epoch, value)));
    }
}

/// Handle to a background planning task.
///
/// Inputs are pushed with [`submit`](Self::submit) and the most recent plan is
/// read with [`latest`](Self::latest). Nothing here ever blocks: pausing only
/// stops the task from publishing and hides whatever it published before, it
/// does not wait for an in-flight plan to finish.
pub struct PlannerHandle<I, O> {
    id: Uuid,
    shared: Arc<Shared<O>>,
    input: watch::Sender<Option<I>>,
    output: watch::Receiver<Option<(u64, O)>>,
    task: Option<JoinHandle<()>>,
}

// Manual Debug implementation - works regardless of whether I or O implement Debug
impl<I, O> fmt::Debug for PlannerHandle<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerHandle")
            .field("id", &self.id)
            .field("paused", &self.shared.paused.load(Ordering::SeqCst))
            .field("epoch", &self.shared.epoch.load(Ordering::SeqCst))
            .field("finished", &self.is_finished())
            .field("output_type", &std::any::type_name::<O>())
            .finish()
    }
}

impl<I, O> PlannerHandle<I, O> {
    pub(crate) fn new(
        id: Uuid,
        shared: Arc<Shared<O>>,
        input: watch::Sender<Option<I>>,
        output: watch::Receiver<Option<(u64, O)>>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            shared,
            input,
            output,
            task: Some(task),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Replace the planner's input; the task picks it up on its next round.
    pub fn submit(&self, input: I) {
        self.input.send_replace(Some(input));
    }

    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
        self.invalidate();
    }

    pub fn resume(&self) {
        self.invalidate();
        self.shared.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop the task. Safe to call more than once.
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancel and wait for the task to wind down.
    pub async fn shutdown(mut self) -> Result<(), Error> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        task.abort();
        match task.await {
            Ok(()) => Ok(()),
            Err(err) => match Error::from(err) {
                Error::Canceled => Ok(()),
                other => Err(other),
            },
        }
    }

    fn invalidate(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.output.send_replace(None);
    }
}

impl<I, O: Clone> PlannerHandle<I, O> {
    /// Most recent plan from the current epoch. Always `None` while paused.
    pub fn latest(&self) -> Option<O> {
        if self.is_paused() {
            return None;
        }
        let epoch = self.shared.epoch.load(Ordering::SeqCst);
        match &*self.output.borrow() {
            Some((e, value)) if *e == epoch => Some(value.clone()),
            _ => None,
        }
    }
}

impl<I, O> Drop for PlannerHandle<I, O> {
    fn drop(&mut self) {
        self.cancel();
    }
}
