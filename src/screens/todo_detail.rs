//! Todo Detail
//!
//! Loads one todo with its category and applies status actions to it.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use super::start_of_day_after;
use crate::commands::{find_todo, Resource};
use crate::context::Router;
use crate::error::{ClientError, ClientResult, DetailError};
use crate::models::{Category, Todo, TodoChanges};

/// Status change requested from the detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Complete,
    Uncomplete,
    Delete,
    Undelete,
    /// Defer to the start of the local day N days from now
    DeferDays(u32),
    /// Defer to the start of the given local day
    DeferUntil(NaiveDate),
}

impl TodoAction {
    /// Attribute changes for this action, with `now` as the action time
    pub fn changes_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ClientResult<TodoChanges> {
        let timestamp = now.with_timezone(&Utc);
        let changes = match self {
            TodoAction::Complete => TodoChanges {
                completed_at: Some(Some(timestamp)),
                ..Default::default()
            },
            TodoAction::Uncomplete => TodoChanges {
                completed_at: Some(None),
                ..Default::default()
            },
            TodoAction::Delete => TodoChanges {
                deleted_at: Some(Some(timestamp)),
                ..Default::default()
            },
            TodoAction::Undelete => TodoChanges {
                deleted_at: Some(None),
                ..Default::default()
            },
            TodoAction::DeferDays(days) => TodoChanges {
                deferred_at: Some(Some(timestamp)),
                deferred_until: Some(Some(start_of_day_after(now, u64::from(*days))?)),
                ..Default::default()
            },
            TodoAction::DeferUntil(day) => {
                let today = now.date_naive();
                if *day < today {
                    return Err(ClientError::InvalidInput(format!(
                        "cannot defer to {}, which is before {}",
                        day, today
                    )));
                }
                let days = (*day - today).num_days().unsigned_abs();
                TodoChanges {
                    deferred_at: Some(Some(timestamp)),
                    deferred_until: Some(Some(start_of_day_after(now, days)?)),
                    ..Default::default()
                }
            }
        };
        Ok(changes)
    }

    /// Whether a successful action leaves the detail screen
    pub fn navigates_back(&self) -> bool {
        !matches!(self, TodoAction::Uncomplete | TodoAction::Undelete)
    }

    pub fn error(&self) -> DetailError {
        match self {
            TodoAction::Complete => DetailError::Complete,
            TodoAction::Uncomplete => DetailError::Uncomplete,
            TodoAction::Delete => DetailError::Delete,
            TodoAction::Undelete => DetailError::Undelete,
            TodoAction::DeferDays(_) | TodoAction::DeferUntil(_) => DetailError::Defer,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoDetailState {
    pub todo: Option<Todo>,
    pub category: Option<Category>,
    pub is_loading: bool,
    pub error: Option<DetailError>,
}

pub struct TodoDetail {
    id: String,
    todos: Arc<dyn Resource<Todo>>,
    router: Arc<dyn Router>,
    state: TodoDetailState,
}

impl TodoDetail {
    pub fn new(id: impl Into<String>, todos: Arc<dyn Resource<Todo>>, router: Arc<dyn Router>) -> Self {
        Self {
            id: id.into(),
            todos,
            router,
            state: TodoDetailState::default(),
        }
    }

    pub fn state(&self) -> &TodoDetailState {
        &self.state
    }

    /// Fetch the todo and its category; a failure keeps what was shown
    pub async fn load(&mut self) {
        self.state.is_loading = true;
        match find_todo(self.todos.as_ref(), &self.id).await {
            Ok((todo, category)) => {
                self.state.todo = Some(todo);
                self.state.category = category;
                self.state.error = None;
            }
            Err(err) => {
                log::warn!("failed to load todo {}: {}", self.id, err);
                self.state.error = Some(DetailError::Load);
            }
        }
        self.state.is_loading = false;
    }

    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Apply `action` now. Returns whether it succeeded.
    pub async fn perform(&mut self, action: TodoAction) -> bool {
        self.perform_at(action, &Local::now()).await
    }

    pub async fn perform_at<Tz: TimeZone>(&mut self, action: TodoAction, now: &DateTime<Tz>) -> bool {
        let result = match action.changes_at(now) {
            Ok(changes) => self.todos.update(&self.id, &changes).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(updated) => {
                log::info!("{:?} applied to todo {}", action, self.id);
                if updated.is_some() {
                    self.state.todo = updated;
                }
                self.state.error = None;
                if action.navigates_back() {
                    self.router.back();
                }
                true
            }
            Err(err) => {
                log::warn!("{:?} failed for todo {}: {}", action, self.id, err);
                self.state.error = Some(action.error());
                false
            }
        }
    }
}
