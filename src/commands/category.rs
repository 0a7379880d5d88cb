//! Category Commands
//!
//! Category-specific calls on top of `Resource<Category>`.

use super::{Query, Resource};
use crate::error::ClientResult;
use crate::models::{sort_categories, Category};

/// All categories in display order
pub async fn list_categories(categories: &dyn Resource<Category>) -> ClientResult<Vec<Category>> {
    let mut list = categories.list(&Query::new()).await?.data;
    sort_categories(&mut list);
    Ok(list)
}

pub async fn get_category(categories: &dyn Resource<Category>, id: &str) -> ClientResult<Category> {
    Ok(categories.find(id, &Query::new()).await?.data)
}
