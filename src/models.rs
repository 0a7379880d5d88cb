//! Client Models
//!
//! Data structures matching the backend's todo and category resources, plus
//! the UI-only `TodoGroup`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Core trait for everything the resource client can fetch
pub trait Entity: Sized + Send + Sync + Clone {
    /// JSON:API resource type, also the collection path segment
    const TYPE: &'static str;

    /// Attribute set accepted by create/update
    type Changes: Serialize + Send + Sync;

    /// Returns the entity's opaque identifier
    fn id(&self) -> &str;
}

/// Todo data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deferred_at: Option<DateTime<Utc>>,
    pub deferred_until: Option<DateTime<Utc>>,
    /// Related category id, if any
    pub category_id: Option<String>,
}

impl Todo {
    /// A bare todo with only id and name set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: None,
            created_at: None,
            updated_at: None,
            completed_at: None,
            deleted_at: None,
            deferred_at: None,
            deferred_until: None,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Todo {
    const TYPE: &'static str = "todos";
    type Changes = TodoChanges;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Category data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sort_order,
        }
    }

    /// Display order: `sort_order` ascending, ties broken by name
    pub fn display_order(&self, other: &Category) -> Ordering {
        self.sort_order
            .cmp(&other.sort_order)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Entity for Category {
    const TYPE: &'static str = "categories";
    type Changes = CategoryChanges;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Sort categories for display
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| a.display_order(b));
}

/// Which timestamp a date grouping buckets on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAttribute {
    CreatedAt,
    UpdatedAt,
    CompletedAt,
    DeletedAt,
    DeferredAt,
    DeferredUntil,
}

impl DateAttribute {
    pub fn value(&self, todo: &Todo) -> Option<DateTime<Utc>> {
        match self {
            DateAttribute::CreatedAt => todo.created_at,
            DateAttribute::UpdatedAt => todo.updated_at,
            DateAttribute::CompletedAt => todo.completed_at,
            DateAttribute::DeletedAt => todo.deleted_at,
            DateAttribute::DeferredAt => todo.deferred_at,
            DateAttribute::DeferredUntil => todo.deferred_until,
        }
    }

    /// Attribute name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            DateAttribute::CreatedAt => "created-at",
            DateAttribute::UpdatedAt => "updated-at",
            DateAttribute::CompletedAt => "completed-at",
            DateAttribute::DeletedAt => "deleted-at",
            DateAttribute::DeferredAt => "deferred-at",
            DateAttribute::DeferredUntil => "deferred-until",
        }
    }
}

/// A labelled run of todos shown under one header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoGroup {
    /// Category id, date bucket, or a sentinel for the catch-all group
    pub key: String,
    pub label: String,
    pub todos: Vec<Todo>,
}

impl TodoGroup {
    pub fn new(key: impl Into<String>, label: impl Into<String>, todos: Vec<Todo>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            todos,
        }
    }
}

/// Todo list response with its included categories resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoResponse {
    pub data: Vec<Todo>,
    pub included: Vec<Category>,
    /// `meta.page-count`, present on paginated queries
    pub page_count: Option<u32>,
}

// ========================
// Attribute changes
// ========================

/// Attributes sent on todo create/update.
///
/// `None` leaves an attribute untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TodoChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred_until: Option<Option<DateTime<Utc>>>,
}

impl TodoChanges {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Attributes sent on category create/update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
