//! Todo List Views
//!
//! The five status views. Each composes a client query with a grouping and
//! hands the result to the list controller.

use async_trait::async_trait;
use chrono::Local;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::start_of_day_after;
use crate::commands::{create_named_todo, list_todos, Query, Resource, TodoStatus};
use crate::context::Router;
use crate::controller::TodoListScreen;
use crate::error::{ClientError, ClientResult};
use crate::grouping::{group_by_category, group_by_date};
use crate::models::{DateAttribute, Todo, TodoChanges, TodoGroup, TodoResponse};
use crate::store::{LoadParams, ScreenOptions, TodoPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoView {
    Available,
    Tomorrow,
    Future,
    Completed,
    Deleted,
}

impl TodoView {
    pub const ALL: [TodoView; 5] = [
        TodoView::Available,
        TodoView::Tomorrow,
        TodoView::Future,
        TodoView::Completed,
        TodoView::Deleted,
    ];

    /// Route segment, same as the status filter value
    pub fn name(&self) -> &'static str {
        self.status().as_str()
    }

    pub fn title(&self) -> &'static str {
        match self {
            TodoView::Available => "Available",
            TodoView::Tomorrow => "Tomorrow",
            TodoView::Future => "Future",
            TodoView::Completed => "Completed",
            TodoView::Deleted => "Deleted",
        }
    }

    pub fn status(&self) -> TodoStatus {
        match self {
            TodoView::Available => TodoStatus::Available,
            TodoView::Tomorrow => TodoStatus::Tomorrow,
            TodoView::Future => TodoStatus::Future,
            TodoView::Completed => TodoStatus::Completed,
            TodoView::Deleted => TodoStatus::Deleted,
        }
    }

    pub fn options(&self) -> ScreenOptions {
        match self {
            TodoView::Available | TodoView::Tomorrow => ScreenOptions {
                search: false,
                paginate: false,
                create: true,
            },
            TodoView::Future => ScreenOptions {
                search: true,
                paginate: false,
                create: false,
            },
            TodoView::Completed | TodoView::Deleted => ScreenOptions {
                search: true,
                paginate: true,
                create: false,
            },
        }
    }

    pub fn query(&self, params: &LoadParams) -> Query {
        let query = Query::new().status(self.status());
        match self {
            TodoView::Available | TodoView::Tomorrow => query.include("category"),
            TodoView::Future => query.search(&params.search_text).sort("name"),
            TodoView::Completed => query
                .search(&params.search_text)
                .sort("-completedAt")
                .page(params.page_number),
            TodoView::Deleted => query
                .search(&params.search_text)
                .sort("-deletedAt")
                .page(params.page_number),
        }
    }

    pub fn group(&self, response: &TodoResponse) -> Vec<TodoGroup> {
        match self {
            TodoView::Available | TodoView::Tomorrow => group_by_category(response),
            TodoView::Future => group_by_date(&response.data, DateAttribute::DeferredUntil, false),
            TodoView::Completed => group_by_date(&response.data, DateAttribute::CompletedAt, true),
            TodoView::Deleted => group_by_date(&response.data, DateAttribute::DeletedAt, true),
        }
    }

    pub fn todo_route(&self, todo_id: &str) -> String {
        format!("/todos/{}/{}", self.name(), todo_id)
    }

    /// Shown when a loaded view has no todos
    pub fn empty_message(&self, search_text: &str) -> &'static str {
        let searching = self.options().search && !search_text.trim().is_empty();
        match (self, searching) {
            (TodoView::Available, _) => "You have no available todos. Nice work!",
            (TodoView::Tomorrow, _) => "You have no todos for tomorrow. Nice work!",
            (TodoView::Future, false) => "You have no future todos. Nice work!",
            (TodoView::Future, true) => "No future todos matched your search",
            (TodoView::Completed, false) => "You have no completed todos. You'll get there!",
            (TodoView::Completed, true) => "No completed todos matched your search",
            (TodoView::Deleted, false) => "You have no deleted todos.",
            (TodoView::Deleted, true) => "No deleted todos matched your search",
        }
    }
}

impl fmt::Display for TodoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TodoView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoView::ALL
            .into_iter()
            .find(|view| view.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = TodoView::ALL.iter().map(|view| view.name()).collect();
                format!("unknown view `{}`, expected one of: {}", s, names.join(", "))
            })
    }
}

/// A `TodoView` bound to a todo client and a router
pub struct StatusListScreen {
    view: TodoView,
    todos: Arc<dyn Resource<Todo>>,
    router: Arc<dyn Router>,
}

impl StatusListScreen {
    pub fn new(view: TodoView, todos: Arc<dyn Resource<Todo>>, router: Arc<dyn Router>) -> Self {
        Self { view, todos, router }
    }

    pub fn view(&self) -> TodoView {
        self.view
    }
}

#[async_trait]
impl TodoListScreen for StatusListScreen {
    fn options(&self) -> ScreenOptions {
        self.view.options()
    }

    async fn load_todos(&self, params: &LoadParams) -> ClientResult<TodoPage> {
        let response = list_todos(self.todos.as_ref(), &self.view.query(params)).await?;
        let max_page_number = if self.view.options().paginate {
            response.page_count
        } else {
            None
        };
        Ok(TodoPage {
            todo_groups: self.view.group(&response),
            max_page_number,
        })
    }

    async fn create_todo(&self, name: &str) -> ClientResult<()> {
        match self.view {
            TodoView::Available => {
                create_named_todo(self.todos.as_ref(), name).await?;
            }
            TodoView::Tomorrow => {
                let changes = TodoChanges {
                    deferred_until: Some(Some(start_of_day_after(&Local::now(), 1)?)),
                    ..TodoChanges::named(name)
                };
                self.todos.create(&changes).await?;
            }
            _ => return Err(ClientError::Unsupported("creating todos")),
        }
        log::info!("created {} todo {:?}", self.view, name);
        Ok(())
    }

    fn press_todo(&self, todo: &Todo) {
        self.router.push(&self.view.todo_route(&todo.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HistoryRouter;
    use crate::controller::ListController;
    use crate::grouping::UNCATEGORIZED;
    use crate::models::Category;
    use crate::testing::FakeResource;
    use chrono::{DateTime, Utc};

    fn screen(view: TodoView, todos: &Arc<FakeResource<Todo>>) -> (StatusListScreen, Arc<HistoryRouter>) {
        let router = Arc::new(HistoryRouter::new(format!("/todos/{}", view)));
        (StatusListScreen::new(view, todos.clone(), router.clone()), router)
    }

    fn completed(id: &str, at: &str) -> Todo {
        let mut todo = Todo::new(id, format!("Todo {}", id));
        todo.completed_at = Some(DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc));
        todo
    }

    fn pairs(query: &Query) -> Vec<String> {
        query
            .to_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect()
    }

    #[test]
    fn test_view_queries() {
        let first = LoadParams::first_page("");
        let search = LoadParams {
            search_text: "milk".to_string(),
            page_number: 3,
        };

        assert_eq!(
            pairs(&TodoView::Tomorrow.query(&search)),
            vec!["filter[status]=tomorrow", "include=category"]
        );
        assert_eq!(
            pairs(&TodoView::Future.query(&first)),
            vec!["filter[status]=future", "sort=name"]
        );
        assert_eq!(
            pairs(&TodoView::Completed.query(&search)),
            vec![
                "filter[status]=completed",
                "filter[search]=milk",
                "sort=-completedAt",
                "page[number]=3"
            ]
        );
        assert_eq!(
            pairs(&TodoView::Deleted.query(&first)),
            vec!["filter[status]=deleted", "sort=-deletedAt", "page[number]=1"]
        );
    }

    #[test]
    fn test_view_from_str() {
        assert_eq!("completed".parse::<TodoView>(), Ok(TodoView::Completed));
        assert_eq!(" Tomorrow ".parse::<TodoView>(), Ok(TodoView::Tomorrow));
        assert!("someday".parse::<TodoView>().is_err());
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(
            TodoView::Available.empty_message(""),
            "You have no available todos. Nice work!"
        );
        assert_eq!(
            TodoView::Completed.empty_message("milk"),
            "No completed todos matched your search"
        );
        assert_eq!(
            TodoView::Future.empty_message("  "),
            "You have no future todos. Nice work!"
        );
    }

    #[tokio::test]
    async fn test_available_groups_by_category() {
        let todos = Arc::new(
            FakeResource::new(vec![
                Todo::new("1", "Buy milk").with_category("home"),
                Todo::new("2", "File taxes"),
            ])
            .with_categories(&[Category::new("home", "Home", 1)]),
        );
        let (screen, _) = screen(TodoView::Available, &todos);

        let page = screen.load_todos(&LoadParams::first_page("")).await.unwrap();

        let labels: Vec<_> = page.todo_groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", UNCATEGORIZED]);
        assert_eq!(page.max_page_number, None);
    }

    #[tokio::test]
    async fn test_completed_reports_page_count() {
        let todos = Arc::new(
            FakeResource::new(vec![
                completed("1", "2021-08-26T12:00:00Z"),
                completed("2", "2021-08-27T12:00:00Z"),
            ])
            .with_page_count(4),
        );
        let (screen, _) = screen(TodoView::Completed, &todos);

        let page = screen
            .load_todos(&LoadParams {
                search_text: "milk".to_string(),
                page_number: 2,
            })
            .await
            .unwrap();

        assert_eq!(page.max_page_number, Some(4));
        assert_eq!(page.todo_groups.len(), 2);
        assert_eq!(todos.last_query().unwrap().page_number, Some(2));
    }

    #[tokio::test]
    async fn test_tomorrow_create_defers_to_midnight() {
        let todos = Arc::new(FakeResource::new(vec![Todo::new("1", "Existing")]));
        let (screen, _) = screen(TodoView::Tomorrow, &todos);

        screen.create_todo("Buy milk").await.unwrap();

        let created = todos.created.lock().unwrap();
        assert_eq!(created[0]["name"], "Buy milk");
        assert!(created[0]["deferred-until"].is_string());
    }

    #[tokio::test]
    async fn test_create_unsupported_on_date_views() {
        let todos = Arc::new(FakeResource::new(Vec::new()));
        let (screen, _) = screen(TodoView::Future, &todos);

        assert!(matches!(
            screen.create_todo("Buy milk").await,
            Err(ClientError::Unsupported(_))
        ));
        assert!(todos.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_press_todo_pushes_view_route() {
        let todos = Arc::new(FakeResource::new(Vec::new()));
        let (screen, router) = screen(TodoView::Completed, &todos);

        screen.press_todo(&Todo::new("abc123", "Buy milk"));

        assert_eq!(router.current().as_deref(), Some("/todos/completed/abc123"));
    }

    #[tokio::test]
    async fn test_available_screen_under_controller() {
        let todos = Arc::new(FakeResource::new(vec![Todo::new("1", "Buy milk")]));
        let (screen, _) = screen(TodoView::Available, &todos);

        let handle = ListController::new(Arc::new(screen)).spawn();
        let state = handle.wait_for(|state| !state.is_loading).await.unwrap();

        assert_eq!(state.todo_count(), 1);
        assert_eq!(state.todo_groups[0].label, UNCATEGORIZED);
        handle.unmount().await;
    }
}
