//! In-memory `Resource` used by screen tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::commands::{Query, Resource};
use crate::error::{ClientError, ClientResult};
use crate::jsonapi::{FindResponse, ListResponse, ResourceObject};
use crate::models::{Category, CategoryChanges, Entity, Todo, TodoChanges};

/// Build or patch an entity from its attribute changes, as a server would
pub trait FromChanges: Entity {
    fn created(id: String, changes: &Self::Changes) -> Self;

    fn apply(&mut self, changes: &Self::Changes);
}

impl FromChanges for Todo {
    fn created(id: String, changes: &TodoChanges) -> Self {
        let mut todo = Todo::new(id, String::new());
        todo.apply(changes);
        todo
    }

    fn apply(&mut self, changes: &TodoChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(notes) = &changes.notes {
            self.notes = notes.clone();
        }
        if let Some(completed_at) = changes.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(deleted_at) = changes.deleted_at {
            self.deleted_at = deleted_at;
        }
        if let Some(deferred_at) = changes.deferred_at {
            self.deferred_at = deferred_at;
        }
        if let Some(deferred_until) = changes.deferred_until {
            self.deferred_until = deferred_until;
        }
    }
}

impl FromChanges for Category {
    fn created(id: String, changes: &CategoryChanges) -> Self {
        let mut category = Category::new(id, String::new(), 0);
        category.apply(changes);
        category
    }

    fn apply(&mut self, changes: &CategoryChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(sort_order) = changes.sort_order {
            self.sort_order = sort_order;
        }
    }
}

/// Serves `items` and records every call; `fail` makes every call error
pub struct FakeResource<T> {
    pub items: Mutex<Vec<T>>,
    pub included: Vec<ResourceObject>,
    pub page_count: Option<u32>,
    pub queries: Mutex<Vec<Query>>,
    pub created: Mutex<Vec<Value>>,
    pub updated: Mutex<Vec<(String, Value)>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl<T: Entity> FakeResource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            included: Vec::new(),
            page_count: None,
            queries: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.included = categories.iter().map(category_resource).collect();
        self
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn last_query(&self) -> Option<Query> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn check(&self) -> ClientResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(ClientError::Status {
                status: 500,
                body: "{}".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn get(&self, id: &str) -> ClientResult<T> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(not_found)
    }
}

fn not_found() -> ClientError {
    ClientError::Status {
        status: 404,
        body: String::new(),
    }
}

#[async_trait]
impl<T: FromChanges + 'static> Resource<T> for FakeResource<T> {
    async fn list(&self, query: &Query) -> ClientResult<ListResponse<T>> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        Ok(ListResponse {
            data: self.items.lock().unwrap().clone(),
            included: self.included.clone(),
            page_count: self.page_count,
        })
    }

    async fn find(&self, id: &str, query: &Query) -> ClientResult<FindResponse<T>> {
        self.queries.lock().unwrap().push(query.clone());
        self.check()?;
        Ok(FindResponse {
            data: self.get(id)?,
            included: self.included.clone(),
        })
    }

    async fn create(&self, changes: &T::Changes) -> ClientResult<Option<T>> {
        let mut created = self.created.lock().unwrap();
        created.push(serde_json::to_value(changes)?);
        self.check()?;
        let entity = T::created(format!("created-{}", created.len()), changes);
        self.items.lock().unwrap().push(entity.clone());
        Ok(Some(entity))
    }

    async fn update(&self, id: &str, changes: &T::Changes) -> ClientResult<Option<T>> {
        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), serde_json::to_value(changes)?));
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.id() == id).ok_or_else(not_found)?;
        item.apply(changes);
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        self.deleted.lock().unwrap().push(id.to_string());
        self.check()?;
        self.items.lock().unwrap().retain(|item| item.id() != id);
        Ok(())
    }
}

/// A category as it appears in `included`
pub fn category_resource(category: &Category) -> ResourceObject {
    serde_json::from_value(json!({
        "type": "categories",
        "id": category.id,
        "attributes": {"name": category.name, "sort-order": category.sort_order}
    }))
    .unwrap()
}
