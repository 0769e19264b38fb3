use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::runtime::error::Error;
use crate::runtime::handle::{PlannerHandle, Shared};

/// Spawn `plan` on the current tokio runtime, re-running it every `period` on
/// the latest submitted input.
pub fn spawn_planner<I, O, F>(period: Duration, mut plan: F) -> Result<PlannerHandle<I, O>, Error>
where
    I: Clone + Send + Sync + 'static,
    O: Send + Sync + 'static,
    F: FnMut(&I) -> O + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
    let id = Uuid::new_v4();

    let (input_tx, mut input_rx) = watch::channel::<Option<I>>(None);
    let (output_tx, output_rx) = watch::channel::<Option<(u64, O)>>(None);
    let shared = Arc::new(Shared::new(output_tx));
    let task_shared = Arc::clone(&shared);

    let task = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if task_shared.paused.load(Ordering::SeqCst) {
                continue;
            }
            let epoch = task_shared.epoch.load(Ordering::SeqCst);
            let Some(input) = input_rx.borrow_and_update().clone() else {
                continue;
            };
            let output = plan(&input);
            task_shared.publish(epoch, output);
        }
    });
    tracing::debug!(%id, ?period, "planner spawned");

    Ok(PlannerHandle::new(id, shared, input_tx, output_rx, task))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wait_for<O: Clone>(handle: &PlannerHandle<u32, O>) -> Option<O> {
        for _ in 0..200 {
            if let Some(out) = handle.latest() {
                return Some(out);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        None
    }

    #[test]
    fn spawning_without_runtime_fails() {
        let result = spawn_planner::<u32, u32, _>(Duration::from_millis(1), |x| *x);
        assert!(matches!(result, Err(Error::NoRuntime)));
    }

    #[tokio::test]
    async fn publishes_plans_for_latest_input() {
        let handle = spawn_planner(Duration::from_millis(1), |x: &u32| x * 2).unwrap();
        assert_eq!(handle.latest(), None);
        handle.submit(21);
        assert_eq!(wait_for(&handle).await, Some(42));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn paused_planner_hides_output() {
        let handle = spawn_planner(Duration::from_millis(1), |x: &u32| x + 1).unwrap();
        handle.submit(1);
        assert_eq!(wait_for(&handle).await, Some(2));

        handle.pause();
        assert!(handle.is_paused());
        assert_eq!(handle.latest(), None);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(handle.latest(), None);

        handle.submit(10);
        handle.resume();
        assert!(!handle.is_paused());
        assert_eq!(wait_for(&handle).await, Some(11));
    }

    #[tokio::test]
    async fn cancel_stops_the_task() {
        let handle = spawn_planner(Duration::from_millis(1), |x: &u32| *x).unwrap();
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
    }
}
