//! List Controller
//!
//! Runs a `ListStore` on a tokio task. Screens plug in through
//! `TodoListScreen`; views observe `ListViewState` through a `watch` channel.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::error::{ClientError, ClientResult};
use crate::models::Todo;
use crate::store::{
    FocusId, ListCommand, ListEvent, ListStore, ListViewState, LoadParams, ScreenOptions, TodoPage,
};

/// What a list screen supplies to the controller
#[async_trait]
pub trait TodoListScreen: Send + Sync + 'static {
    fn options(&self) -> ScreenOptions;

    /// Fetch and group one page of todos
    async fn load_todos(&self, params: &LoadParams) -> ClientResult<TodoPage>;

    async fn create_todo(&self, _name: &str) -> ClientResult<()> {
        Err(ClientError::Unsupported("creating todos"))
    }

    fn press_todo(&self, todo: &Todo);
}

/// Builder for a running list controller
pub struct ListController {
    screen: Arc<dyn TodoListScreen>,
    debounce: Duration,
    initial_search: String,
}

impl ListController {
    pub fn new(screen: Arc<dyn TodoListScreen>) -> Self {
        Self {
            screen,
            debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            initial_search: String::new(),
        }
    }

    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn initial_search(mut self, search_text: impl Into<String>) -> Self {
        self.initial_search = search_text.into();
        self
    }

    /// Mount the screen. Must be called inside a tokio runtime.
    pub fn spawn(self) -> ListHandle {
        let store = ListStore::new(self.screen.options(), self.debounce)
            .with_search_text(self.initial_search);
        let (state_tx, state_rx) = watch::channel(store.state().clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(self.screen, store, events_rx, state_tx));
        let handle = ListHandle {
            events: events_tx,
            state: state_rx,
            task: Some(task),
        };
        handle.send(ListEvent::Mounted);
        handle
    }
}

/// Handle to a mounted list screen. Dropping it unmounts the screen.
pub struct ListHandle {
    events: mpsc::UnboundedSender<ListEvent>,
    state: watch::Receiver<ListViewState>,
    task: Option<JoinHandle<()>>,
}

impl ListHandle {
    pub fn focus(&self, focus: FocusId) {
        self.send(ListEvent::FocusGained(focus));
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.send(ListEvent::SearchTextChanged(text.into()));
    }

    pub fn load_more(&self) {
        self.send(ListEvent::LoadMore);
    }

    pub fn retry(&self) {
        self.send(ListEvent::Retry);
    }

    pub fn create_todo(&self, name: impl Into<String>) {
        self.send(ListEvent::CreateSubmitted(name.into()));
    }

    pub fn press_todo(&self, todo: Todo) {
        self.send(ListEvent::TodoPressed(todo));
    }

    /// Latest published state
    pub fn state(&self) -> ListViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    ///
    /// Returns `None` if the screen unmounts first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&ListViewState) -> bool,
    ) -> Option<ListViewState> {
        let mut state = self.state.clone();
        let result = state.wait_for(predicate).await;
        result.ok().map(|current| current.clone())
    }

    /// Unmount and wait for the runner to stop
    pub async fn unmount(mut self) {
        self.send(ListEvent::Unmounted);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::error!("list controller task failed: {}", err);
            }
        }
    }

    fn send(&self, event: ListEvent) {
        if self.events.send(event).is_err() {
            log::debug!("list controller already stopped");
        }
    }
}

impl Drop for ListHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.events.send(ListEvent::Unmounted);
        }
    }
}

// ========================
// Runner
// ========================

async fn run(
    screen: Arc<dyn TodoListScreen>,
    mut store: ListStore,
    mut events: mpsc::UnboundedReceiver<ListEvent>,
    state: watch::Sender<ListViewState>,
) {
    let mut tasks: JoinSet<ListEvent> = JoinSet::new();

    loop {
        let event = tokio::select! {
            event = events.recv() => event.unwrap_or(ListEvent::Unmounted),
            Some(joined) = tasks.join_next() => match joined {
                Ok(event) => event,
                Err(err) => {
                    if !err.is_cancelled() {
                        log::error!("list effect panicked: {}", err);
                    }
                    continue;
                }
            },
        };

        let commands = store.dispatch(event);
        if store.is_unmounted() {
            tasks.abort_all();
            break;
        }

        state.send_if_modified(|published| {
            if published == store.state() {
                return false;
            }
            *published = store.state().clone();
            true
        });

        for command in commands {
            execute(&screen, &mut tasks, command);
        }
    }

    log::debug!("list controller stopped");
}

fn execute(screen: &Arc<dyn TodoListScreen>, tasks: &mut JoinSet<ListEvent>, command: ListCommand) {
    match command {
        ListCommand::Load { request, params } => {
            let screen = Arc::clone(screen);
            tasks.spawn(async move {
                match screen.load_todos(&params).await {
                    Ok(page) => ListEvent::LoadSucceeded { request, page },
                    Err(err) => ListEvent::LoadFailed {
                        request,
                        reason: err.to_string(),
                    },
                }
            });
        }
        ListCommand::Create { name } => {
            let screen = Arc::clone(screen);
            tasks.spawn(async move {
                match screen.create_todo(&name).await {
                    Ok(()) => ListEvent::CreateSucceeded,
                    Err(err) => ListEvent::CreateFailed {
                        reason: err.to_string(),
                    },
                }
            });
        }
        ListCommand::ScheduleSearch { token, delay } => {
            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                ListEvent::SearchSettled(token)
            });
        }
        ListCommand::OpenTodo(todo) => screen.press_todo(&todo),
    }
}
