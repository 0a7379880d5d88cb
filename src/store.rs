//! List View State Store
//!
//! Pure reducer behind every todo list screen. `ListStore::dispatch` takes one
//! event and returns the effects to run; it never touches the network or the
//! clock, so the controller and the tests drive it the same way.

use serde::Serialize;
use std::time::Duration;

use crate::error::ErrorKind;
use crate::grouping::merge_page;
use crate::models::{Todo, TodoGroup};

/// Monotonically increasing id of an issued load
pub type RequestId = u64;
/// Identity of one "screen gained focus" occurrence
pub type FocusId = u64;

/// Capabilities a screen opts into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenOptions {
    pub search: bool,
    pub paginate: bool,
    pub create: bool,
}

/// Arguments passed to a screen's load function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadParams {
    pub search_text: String,
    pub page_number: u32,
}

impl LoadParams {
    pub fn first_page(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            page_number: 1,
        }
    }
}

/// How a load result is applied to the current groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

/// What a screen's load function resolves to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPage {
    pub todo_groups: Vec<TodoGroup>,
    /// Last page number, when the view is paginated
    pub max_page_number: Option<u32>,
}

/// Snapshot published to whoever renders the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewState {
    pub todo_groups: Vec<TodoGroup>,
    pub is_loading: bool,
    pub error: Option<ErrorKind>,
    pub search_text: String,
    pub page_number: u32,
    pub max_page_number: Option<u32>,
}

impl ListViewState {
    pub fn new() -> Self {
        Self {
            todo_groups: Vec::new(),
            is_loading: true,
            error: None,
            search_text: String::new(),
            page_number: 1,
            max_page_number: None,
        }
    }

    pub fn can_load_more(&self) -> bool {
        matches!(self.max_page_number, Some(max) if self.page_number < max)
    }

    pub fn todo_count(&self) -> usize {
        self.todo_groups.iter().map(|group| group.todos.len()).sum()
    }
}

impl Default for ListViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Inputs to the reducer: user intents plus results of earlier commands
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Mounted,
    FocusGained(FocusId),
    SearchTextChanged(String),
    /// Debounce timer for the given search token elapsed
    SearchSettled(u64),
    LoadMore,
    Retry,
    CreateSubmitted(String),
    TodoPressed(Todo),
    LoadSucceeded { request: RequestId, page: TodoPage },
    LoadFailed { request: RequestId, reason: String },
    CreateSucceeded,
    CreateFailed { reason: String },
    Unmounted,
}

/// Effects the reducer asks the runner to perform
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    Load { request: RequestId, params: LoadParams },
    Create { name: String },
    ScheduleSearch { token: u64, delay: Duration },
    OpenTodo(Todo),
}

#[derive(Debug, Clone)]
struct IssuedLoad {
    request: RequestId,
    params: LoadParams,
    mode: LoadMode,
}

/// Single owner of one list screen's state
#[derive(Debug)]
pub struct ListStore {
    options: ScreenOptions,
    debounce: Duration,
    state: ListViewState,
    phase: ListPhase,
    next_request: RequestId,
    /// Most recently issued load; only its response may land
    last_load: Option<IssuedLoad>,
    in_flight: bool,
    search_token: u64,
    last_focus: Option<FocusId>,
    mounted: bool,
    unmounted: bool,
}

impl ListStore {
    pub fn new(options: ScreenOptions, debounce: Duration) -> Self {
        Self {
            options,
            debounce,
            state: ListViewState::new(),
            phase: ListPhase::Idle,
            next_request: 0,
            last_load: None,
            in_flight: false,
            search_token: 0,
            last_focus: None,
            mounted: false,
            unmounted: false,
        }
    }

    /// Start with a search already entered
    pub fn with_search_text(mut self, search_text: impl Into<String>) -> Self {
        if self.options.search {
            self.state.search_text = search_text.into();
        }
        self
    }

    pub fn state(&self) -> &ListViewState {
        &self.state
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn options(&self) -> ScreenOptions {
        self.options
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    pub fn dispatch(&mut self, event: ListEvent) -> Vec<ListCommand> {
        if self.unmounted {
            log::debug!("ignoring {:?} after unmount", event);
            return Vec::new();
        }

        match event {
            ListEvent::Mounted => {
                if self.mounted {
                    return Vec::new();
                }
                self.mounted = true;
                let params = LoadParams::first_page(self.state.search_text.clone());
                vec![self.issue_load(params, LoadMode::Replace)]
            }

            ListEvent::FocusGained(focus) => {
                if self.last_focus == Some(focus) {
                    return Vec::new();
                }
                self.last_focus = Some(focus);

                let params = LoadParams::first_page(self.state.search_text.clone());
                if self.is_loading(&params, LoadMode::Replace) {
                    // the same load is already on its way
                    return Vec::new();
                }
                vec![self.issue_load(params, LoadMode::Replace)]
            }

            ListEvent::SearchTextChanged(text) => {
                if !self.options.search {
                    return Vec::new();
                }
                self.state.search_text = text;
                self.search_token += 1;
                vec![ListCommand::ScheduleSearch {
                    token: self.search_token,
                    delay: self.debounce,
                }]
            }

            ListEvent::SearchSettled(token) => {
                if token != self.search_token {
                    return Vec::new();
                }
                self.state.todo_groups.clear();
                self.state.page_number = 1;
                self.state.max_page_number = None;
                let params = LoadParams::first_page(self.state.search_text.clone());
                vec![self.issue_load(params, LoadMode::Replace)]
            }

            ListEvent::LoadMore => {
                if !self.options.paginate || self.state.is_loading || !self.state.can_load_more() {
                    return Vec::new();
                }
                let params = LoadParams {
                    search_text: self.state.search_text.clone(),
                    page_number: self.state.page_number + 1,
                };
                vec![self.issue_load(params, LoadMode::Append)]
            }

            ListEvent::Retry => match self.last_load.clone() {
                Some(last) => vec![self.issue_load(last.params, last.mode)],
                None => {
                    let params = LoadParams::first_page(self.state.search_text.clone());
                    vec![self.issue_load(params, LoadMode::Replace)]
                }
            },

            ListEvent::CreateSubmitted(name) => {
                if !self.options.create {
                    return Vec::new();
                }
                let name = name.trim();
                if name.is_empty() {
                    return Vec::new();
                }
                vec![ListCommand::Create {
                    name: name.to_string(),
                }]
            }

            ListEvent::CreateSucceeded => {
                // an appended page only makes sense on top of the pages before it
                let params = match &self.last_load {
                    Some(last) if last.mode == LoadMode::Replace => last.params.clone(),
                    _ => LoadParams::first_page(self.state.search_text.clone()),
                };
                vec![self.issue_load(params, LoadMode::Replace)]
            }

            ListEvent::CreateFailed { reason } => {
                log::warn!("create failed: {}", reason);
                self.state.error = Some(ErrorKind::CreateFailed);
                Vec::new()
            }

            ListEvent::TodoPressed(todo) => vec![ListCommand::OpenTodo(todo)],

            ListEvent::LoadSucceeded { request, page } => {
                let Some(last) = self.take_current(request) else {
                    return Vec::new();
                };
                match last.mode {
                    LoadMode::Replace => {
                        self.state.todo_groups = page.todo_groups;
                        self.state.max_page_number = page.max_page_number;
                    }
                    LoadMode::Append => {
                        merge_page(&mut self.state.todo_groups, page.todo_groups);
                        if page.max_page_number.is_some() {
                            self.state.max_page_number = page.max_page_number;
                        }
                    }
                }
                self.state.page_number = last.params.page_number;
                self.state.error = None;
                self.state.is_loading = false;
                self.phase = ListPhase::Loaded;
                Vec::new()
            }

            ListEvent::LoadFailed { request, reason } => {
                if self.take_current(request).is_none() {
                    return Vec::new();
                }
                log::warn!("load #{} failed: {}", request, reason);
                self.state.error = Some(ErrorKind::LoadFailed);
                self.state.is_loading = false;
                self.phase = ListPhase::Errored;
                Vec::new()
            }

            ListEvent::Unmounted => {
                self.unmounted = true;
                self.in_flight = false;
                Vec::new()
            }
        }
    }

    fn issue_load(&mut self, params: LoadParams, mode: LoadMode) -> ListCommand {
        self.next_request += 1;
        let request = self.next_request;
        log::debug!("issuing load #{} {:?} ({:?})", request, params, mode);

        self.last_load = Some(IssuedLoad {
            request,
            params: params.clone(),
            mode,
        });
        self.in_flight = true;
        self.state.is_loading = true;
        self.phase = ListPhase::Loading;
        ListCommand::Load { request, params }
    }

    fn is_loading(&self, params: &LoadParams, mode: LoadMode) -> bool {
        self.in_flight
            && matches!(&self.last_load, Some(last) if &last.params == params && last.mode == mode)
    }

    /// The issued load `request` answers, if it is still the latest one
    fn take_current(&mut self, request: RequestId) -> Option<IssuedLoad> {
        match &self.last_load {
            Some(last) if self.in_flight && last.request == request => {
                self.in_flight = false;
                Some(last.clone())
            }
            _ => {
                log::debug!("discarding stale response to load #{}", request);
                None
            }
        }
    }
}
