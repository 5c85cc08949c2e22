//! Ownership of running subscription tasks.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::metrics;

/// Holds one unit of the active-subscriptions gauge for as long as a task
/// lives, whether it ends on its own, is cancelled or is aborted.
#[derive(Debug)]
struct ActiveSubscription;

impl ActiveSubscription {
    fn start() -> Self {
        metrics::subscription_started();
        Self
    }
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        metrics::subscription_stopped();
    }
}

/// Owns every task a push builder starts.
///
/// Tasks receive a child of the set's cancellation token. Dropping the set
/// cancels the token and aborts the tasks, so a construction step that fails
/// tears down every subscription started before it.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    token: CancellationToken,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl SubscriptionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task. `task` receives a token it must stop on.
    pub fn spawn<F, Fut>(&mut self, name: impl Into<String>, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let active = ActiveSubscription::start();
        let task = task(self.token.child_token());
        let handle = tokio::spawn(async move {
            let _active = active;
            task.await;
        });
        self.tasks.push((name.into(), handle));
    }

    /// Number of tasks still running.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Names of the tasks still running.
    #[must_use]
    pub fn active_names(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Cancel every task and wait for them to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        for (name, handle) in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!(task = %name, error = %e, "Subscription task failed");
                }
            }
        }
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        self.token.cancel();
        for (_, handle) in &self.tasks {
            handle.abort();
        }
        tracing::debug!(tasks = self.tasks.len(), "Subscriptions torn down");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use metrics_exporter_prometheus::PrometheusBuilder;

    use super::*;

    #[tokio::test]
    async fn spawned_tasks_are_counted() {
        let mut set = SubscriptionSet::new();
        set.spawn("group", |token| async move { token.cancelled().await });
        set.spawn("account", |token| async move { token.cancelled().await });

        assert_eq!(set.active_count(), 2);
        assert_eq!(set.active_names(), vec!["group", "account"]);
        set.shutdown().await;
    }

    #[tokio::test]
    async fn drop_cancels_tasks() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);
        let mut set = SubscriptionSet::new();
        set.spawn("price", move |token| async move {
            token.cancelled().await;
            let _ = tx.send(()).await;
        });

        drop(set);

        // Either the task observed cancellation and signalled, or it was
        // aborted and the sender was dropped. Both end the channel wait.
        let waited = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(waited.is_ok());
    }

    #[test]
    fn gauge_follows_task_lifetimes() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            let first = ActiveSubscription::start();
            let second = ActiveSubscription::start();
            let third = ActiveSubscription::start();
            drop(first);
            drop(second);
            assert!(handle
                .render()
                .contains("market_maker_active_subscriptions 1"));
            drop(third);
        });

        assert!(handle.render().contains("market_maker_active_subscriptions 0"));
    }
}
