//! View models - UI-facing state over the repositories.
//!
//! A list view model subscribes to its repository's observe stream for the
//! lifetime of the screen and publishes render-ready state through a watch
//! channel. The refresh gesture forwards to the repository; a failed
//! refresh surfaces as a transient error message and never clears content
//! that is already on screen.

use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::entities::CacheEntity;
use crate::refresh_bus::RefreshBus;
use crate::repo::Repository;

/// Three-state wrapper for streamed UI data.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    /// No data delivered yet
    Loading,
    /// Last-known-good data
    Ready(T),
    /// The stream failed before any data arrived
    Failed(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            UiState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Render state for one entity list screen.
#[derive(Debug, Clone)]
pub struct ListState<E> {
    /// Cached entity list, newest snapshot
    pub items: UiState<Vec<E>>,
    /// Error from the most recent failed refresh, cleared on the next one
    pub last_error: Option<String>,
    /// Whether a user-triggered refresh is in flight
    pub refreshing: bool,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: UiState::Loading,
            last_error: None,
            refreshing: false,
        }
    }
}

/// View model for an entity list screen.
///
/// Holds no cache of its own beyond the last snapshot in the watch channel;
/// the repository is the single source of truth. Dropping the view model
/// (or calling [`close`](Self::close)) cancels the observe subscription.
pub struct ListViewModel<E: CacheEntity> {
    repo: Repository<E>,
    tx: watch::Sender<ListState<E>>,
    observe_task: JoinHandle<()>,
    bus_task: Option<JoinHandle<()>>,
}

impl<E: CacheEntity> ListViewModel<E> {
    pub fn new(repo: Repository<E>) -> Self {
        let (tx, _) = watch::channel(ListState::default());

        let observe_task = tokio::spawn({
            let repo = repo.clone();
            let tx = tx.clone();
            async move {
                let mut stream = Box::pin(repo.observe());
                while let Some(snapshot) = stream.next().await {
                    tx.send_modify(|state| match snapshot {
                        Ok(items) => state.items = UiState::Ready(items),
                        Err(err) => {
                            // Keep whatever is already on screen; only a
                            // screen that never got data shows the failure
                            // as its primary state.
                            if state.items.is_loading() {
                                state.items = UiState::Failed(err.to_string());
                            } else {
                                state.last_error = Some(err.to_string());
                            }
                        }
                    });
                }
            }
        });

        Self {
            repo,
            tx,
            observe_task,
            bus_task: None,
        }
    }

    /// Subscribe to render state. The receiver always holds the latest state.
    pub fn state(&self) -> watch::Receiver<ListState<E>> {
        self.tx.subscribe()
    }

    /// User-triggered refresh (pull-to-refresh or retry button).
    ///
    /// Failure is surfaced as `last_error`; the displayed list is never
    /// cleared by a failed refresh.
    pub async fn refresh(&self) {
        run_refresh(&self.repo, &self.tx).await;
    }

    /// Start honoring cross-screen refresh commands while this screen is
    /// the active one. Replaces any previous binding.
    pub fn bind_refresh_bus(&mut self, bus: &RefreshBus) {
        if let Some(task) = self.bus_task.take() {
            task.abort();
        }

        let mut rx = bus.subscribe();
        let repo = self.repo.clone();
        let tx = self.tx.clone();
        self.bus_task = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(_) => run_refresh(&repo, &tx).await,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Stop honoring cross-screen refresh commands (screen went inactive).
    pub fn unbind_refresh_bus(&mut self) {
        if let Some(task) = self.bus_task.take() {
            task.abort();
        }
    }

    /// Tear down the screen: cancels the observe subscription. Any refresh
    /// already in flight keeps running to completion; it is one atomic unit
    /// and needs no rollback.
    pub fn close(&mut self) {
        self.observe_task.abort();
        self.unbind_refresh_bus();
    }
}

impl<E: CacheEntity> Drop for ListViewModel<E> {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_refresh<E: CacheEntity>(repo: &Repository<E>, tx: &watch::Sender<ListState<E>>) {
    tx.send_modify(|state| {
        state.refreshing = true;
        state.last_error = None;
    });

    let result = repo.refresh().await;

    tx.send_modify(|state| {
        state.refreshing = false;
        if let Err(err) = result {
            state.last_error = Some(err.to_string());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteSource;
    use crate::entities::launch::{Launch, LaunchDto};
    use crate::error::{Error, Result};
    use crate::store::Store;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct FakeRemote {
        responses: Mutex<VecDeque<Result<Vec<LaunchDto>>>>,
    }

    #[async_trait::async_trait]
    impl RemoteSource<Launch> for FakeRemote {
        async fn fetch_all(&self) -> Result<Vec<LaunchDto>> {
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Api { status: 500 }))
        }
    }

    fn dto(id: &str) -> LaunchDto {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Mission {id}"),
            "date_utc": "2022-01-01T00:00:00.000Z",
            "date_unix": 1,
        }))
        .unwrap()
    }

    fn repo(responses: Vec<Result<Vec<LaunchDto>>>) -> Repository<Launch> {
        Repository::new(
            Arc::new(FakeRemote {
                responses: Mutex::new(responses.into()),
            }),
            Store::open_in_memory().unwrap(),
        )
    }

    async fn wait_for<E: CacheEntity>(
        rx: &mut watch::Receiver<ListState<E>>,
        mut predicate: impl FnMut(&ListState<E>) -> bool,
    ) {
        loop {
            if predicate(&rx.borrow()) {
                return;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_successful_refresh_reaches_ui_state() {
        let vm = ListViewModel::new(repo(vec![Ok(vec![dto("a"), dto("b")])]));
        let mut rx = vm.state();

        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.is_empty())).await;

        vm.refresh().await;

        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.len() == 2)).await;
        assert!(rx.borrow().last_error.is_none());
        assert!(!rx.borrow().refreshing);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_content_and_surfaces_error() {
        let vm = ListViewModel::new(repo(vec![
            Ok(vec![dto("a")]),
            Err(Error::Api { status: 503 }),
        ]));
        let mut rx = vm.state();

        vm.refresh().await;
        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.len() == 1)).await;

        vm.refresh().await;

        let state = rx.borrow().clone();
        assert!(state.last_error.is_some());
        // Failed refresh never clears what is already displayed.
        assert!(matches!(&state.items, UiState::Ready(v) if v.len() == 1));
    }

    #[tokio::test]
    async fn test_next_refresh_clears_previous_error() {
        let vm = ListViewModel::new(repo(vec![
            Err(Error::Api { status: 500 }),
            Ok(vec![dto("a")]),
        ]));
        let mut rx = vm.state();

        vm.refresh().await;
        assert!(rx.borrow().last_error.is_some());

        vm.refresh().await;
        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.len() == 1)).await;
        assert!(rx.borrow().last_error.is_none());
    }

    #[tokio::test]
    async fn test_refresh_bus_triggers_bound_view_model() {
        let bus = RefreshBus::new();
        let mut vm = ListViewModel::new(repo(vec![Ok(vec![dto("a")])]));
        vm.bind_refresh_bus(&bus);
        let mut rx = vm.state();

        bus.request_refresh();

        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.len() == 1)).await;
    }

    #[tokio::test]
    async fn test_unbound_view_model_ignores_bus() {
        let bus = RefreshBus::new();
        let mut vm = ListViewModel::new(repo(vec![Ok(vec![dto("a")])]));
        vm.bind_refresh_bus(&bus);
        vm.unbind_refresh_bus();
        let mut rx = vm.state();

        wait_for(&mut rx, |s| matches!(&s.items, UiState::Ready(v) if v.is_empty())).await;
        bus.request_refresh();
        tokio::task::yield_now().await;

        assert!(matches!(&rx.borrow().items, UiState::Ready(v) if v.is_empty()));
    }
}
