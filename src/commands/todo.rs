//! Todo Commands
//!
//! Todo-specific calls on top of `Resource<Todo>`.

use super::{Query, Resource};
use crate::error::ClientResult;
use crate::jsonapi::FromResource;
use crate::models::{Category, Entity, Todo, TodoChanges, TodoResponse};

/// List todos with their included categories resolved
pub async fn list_todos(todos: &dyn Resource<Todo>, query: &Query) -> ClientResult<TodoResponse> {
    Ok(todos.list(query).await?.into())
}

/// Fetch one todo together with its category
pub async fn find_todo(todos: &dyn Resource<Todo>, id: &str) -> ClientResult<(Todo, Option<Category>)> {
    let response = todos.find(id, &Query::new().include("category")).await?;
    let category = response.data.category_id.as_deref().and_then(|category_id| {
        response
            .included
            .iter()
            .filter(|resource| resource.kind == Category::TYPE && resource.id == category_id)
            .find_map(|resource| Category::from_resource(resource).ok())
    });
    Ok((response.data, category))
}

/// Create a todo with just a name
pub async fn create_named_todo(todos: &dyn Resource<Todo>, name: &str) -> ClientResult<Option<Todo>> {
    todos.create(&TodoChanges::named(name)).await
}
