//! Resource Client
//!
//! Bindings to the todos backend, organized by resource. Screens only see the
//! `Resource` trait; `HttpResource` is the JSON:API implementation.

mod category;
mod http;
mod query;
mod todo;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::jsonapi::{FindResponse, ListResponse};
use crate::models::Entity;

pub use category::*;
pub use http::*;
pub use query::*;
pub use todo::*;

/// CRUD access to one resource type on the backend.
///
/// All operations are async; callers treat the backend as a black box.
#[async_trait]
pub trait Resource<T: Entity>: Send + Sync {
    /// Fetch a collection (`GET /<type>?filter[..]=..`)
    async fn list(&self, query: &Query) -> ClientResult<ListResponse<T>>;

    /// Fetch one resource by id
    async fn find(&self, id: &str, query: &Query) -> ClientResult<FindResponse<T>>;

    /// Create a resource from its attributes.
    ///
    /// Any success status counts; the echoed resource is `None` when the
    /// server sends back nothing decodable.
    async fn create(&self, changes: &T::Changes) -> ClientResult<Option<T>>;

    /// Patch the given attributes of an existing resource
    async fn update(&self, id: &str, changes: &T::Changes) -> ClientResult<Option<T>>;

    /// Delete a resource
    async fn delete(&self, id: &str) -> ClientResult<()>;
}
