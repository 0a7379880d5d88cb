//! Category Screens
//!
//! Category list plus a create/edit form. Every successful change returns to
//! the category list.

use std::sync::Arc;

use crate::commands::{get_category, list_categories, Resource};
use crate::context::{Router, CATEGORIES_ROUTE};
use crate::error::{ClientError, ClientResult, CategoryError};
use crate::models::{Category, CategoryChanges};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryListState {
    pub categories: Vec<Category>,
    pub is_loading: bool,
    pub error: Option<CategoryError>,
}

pub struct CategoryList {
    categories: Arc<dyn Resource<Category>>,
    router: Arc<dyn Router>,
    state: CategoryListState,
}

impl CategoryList {
    pub fn new(categories: Arc<dyn Resource<Category>>, router: Arc<dyn Router>) -> Self {
        Self {
            categories,
            router,
            state: CategoryListState::default(),
        }
    }

    pub fn state(&self) -> &CategoryListState {
        &self.state
    }

    pub async fn load(&mut self) {
        self.state.is_loading = true;
        match list_categories(self.categories.as_ref()).await {
            Ok(categories) => {
                self.state.categories = categories;
                self.state.error = None;
            }
            Err(err) => {
                log::warn!("failed to load categories: {}", err);
                self.state.error = Some(CategoryError::Load);
            }
        }
        self.state.is_loading = false;
    }

    pub fn press_category(&self, category: &Category) {
        self.router
            .push(&format!("{}/{}", CATEGORIES_ROUTE, category.id));
    }

    pub fn add_category(&self) {
        self.router.push(&format!("{}/new", CATEGORIES_ROUTE));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryEditorState {
    pub category: Option<Category>,
    pub error: Option<CategoryError>,
}

/// Form for a new category, or for editing an existing one
pub struct CategoryEditor {
    id: Option<String>,
    categories: Arc<dyn Resource<Category>>,
    router: Arc<dyn Router>,
    state: CategoryEditorState,
}

impl CategoryEditor {
    pub fn create(categories: Arc<dyn Resource<Category>>, router: Arc<dyn Router>) -> Self {
        Self {
            id: None,
            categories,
            router,
            state: CategoryEditorState::default(),
        }
    }

    pub fn edit(
        id: impl Into<String>,
        categories: Arc<dyn Resource<Category>>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::create(categories, router)
        }
    }

    pub fn state(&self) -> &CategoryEditorState {
        &self.state
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Load the category being edited; no-op for a new one
    pub async fn load(&mut self) {
        let Some(id) = self.id.clone() else {
            return;
        };
        match get_category(self.categories.as_ref(), &id).await {
            Ok(category) => {
                self.state.category = Some(category);
                self.state.error = None;
            }
            Err(err) => {
                log::warn!("failed to load category {}: {}", id, err);
                self.state.error = Some(CategoryError::Load);
            }
        }
    }

    pub async fn save(&mut self, name: &str, sort_order: Option<i32>) -> bool {
        match self.try_save(name, sort_order).await {
            Ok(saved) => {
                log::info!("saved category {:?}", name.trim());
                if saved.is_some() {
                    self.state.category = saved;
                }
                self.state.error = None;
                self.router.push(CATEGORIES_ROUTE);
                true
            }
            Err(err) => {
                log::warn!("failed to save category: {}", err);
                self.state.error = Some(CategoryError::Save);
                false
            }
        }
    }

    async fn try_save(&self, name: &str, sort_order: Option<i32>) -> ClientResult<Option<Category>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::InvalidInput("category name is empty".to_string()));
        }
        let changes = CategoryChanges {
            name: Some(name.to_string()),
            sort_order,
        };
        match &self.id {
            Some(id) => self.categories.update(id, &changes).await,
            None => self.categories.create(&changes).await,
        }
    }

    pub async fn delete(&mut self) -> bool {
        let Some(id) = self.id.clone() else {
            return false;
        };
        match self.categories.delete(&id).await {
            Ok(()) => {
                log::info!("deleted category {}", id);
                self.router.push(CATEGORIES_ROUTE);
                true
            }
            Err(err) => {
                log::warn!("failed to delete category {}: {}", id, err);
                self.state.error = Some(CategoryError::Delete);
                false
            }
        }
    }

    pub fn cancel(&self) {
        self.router.push(CATEGORIES_ROUTE);
    }
}
