//! JSON:API Documents
//!
//! Wire shapes for the todos backend: `{data, included, meta}` documents
//! whose resources carry dashed attribute names and to-one relationships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{ClientError, ClientResult};
use crate::models::{Category, Entity, Todo, TodoResponse};

/// `{type, id}` pointer to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationshipData>,
}

impl Relationship {
    /// Target of a to-one relationship
    pub fn to_one(&self) -> Option<&ResourceIdentifier> {
        match &self.data {
            Some(RelationshipData::One(identifier)) => Some(identifier),
            _ => None,
        }
    }
}

/// A resource as it appears in `data` or `included`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

/// Top-level response document
#[derive(Debug, Clone, Deserialize)]
pub struct Document<D> {
    pub data: D,
    #[serde(default)]
    pub included: Vec<ResourceObject>,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl<D> Document<D> {
    /// `meta["page-count"]`, when the server paginated the query
    pub fn page_count(&self) -> Option<u32> {
        self.meta
            .get("page-count")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Decoding a typed entity from a resource object
pub trait FromResource: Entity {
    fn from_resource(resource: &ResourceObject) -> ClientResult<Self>;
}

fn check_type<T: Entity>(resource: &ResourceObject) -> ClientResult<()> {
    if resource.kind == T::TYPE {
        Ok(())
    } else {
        Err(ClientError::UnexpectedType {
            expected: T::TYPE,
            actual: resource.kind.clone(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TodoAttributes {
    name: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    deferred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    deferred_until: Option<DateTime<Utc>>,
}

impl FromResource for Todo {
    fn from_resource(resource: &ResourceObject) -> ClientResult<Self> {
        check_type::<Todo>(resource)?;
        let attrs: TodoAttributes = serde_json::from_value(Value::Object(resource.attributes.clone()))?;
        let category_id = resource
            .relationships
            .get("category")
            .and_then(Relationship::to_one)
            .filter(|identifier| identifier.kind == Category::TYPE)
            .map(|identifier| identifier.id.clone());

        Ok(Todo {
            id: resource.id.clone(),
            name: attrs.name,
            notes: attrs.notes,
            created_at: attrs.created_at,
            updated_at: attrs.updated_at,
            completed_at: attrs.completed_at,
            deleted_at: attrs.deleted_at,
            deferred_at: attrs.deferred_at,
            deferred_until: attrs.deferred_until,
            category_id,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CategoryAttributes {
    name: String,
    #[serde(default)]
    sort_order: i32,
}

impl FromResource for Category {
    fn from_resource(resource: &ResourceObject) -> ClientResult<Self> {
        check_type::<Category>(resource)?;
        let attrs: CategoryAttributes = serde_json::from_value(Value::Object(resource.attributes.clone()))?;
        Ok(Category {
            id: resource.id.clone(),
            name: attrs.name,
            sort_order: attrs.sort_order,
        })
    }
}

/// Decoded collection response
#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub included: Vec<ResourceObject>,
    pub page_count: Option<u32>,
}

impl<T: FromResource> ListResponse<T> {
    pub fn from_document(document: Document<Vec<ResourceObject>>) -> ClientResult<Self> {
        let page_count = document.page_count();
        let data = document
            .data
            .iter()
            .map(T::from_resource)
            .collect::<ClientResult<Vec<_>>>()?;
        Ok(Self {
            data,
            included: document.included,
            page_count,
        })
    }
}

impl<T> ListResponse<T> {
    /// Included resources of type `U`. Entries that fail to decode are skipped.
    pub fn included<U: FromResource>(&self) -> Vec<U> {
        self.included
            .iter()
            .filter(|resource| resource.kind == U::TYPE)
            .filter_map(|resource| match U::from_resource(resource) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    log::warn!("skipping included {} {}: {}", U::TYPE, resource.id, e);
                    None
                }
            })
            .collect()
    }
}

impl From<ListResponse<Todo>> for TodoResponse {
    fn from(response: ListResponse<Todo>) -> Self {
        let included = response.included::<Category>();
        TodoResponse {
            data: response.data,
            included,
            page_count: response.page_count,
        }
    }
}

/// Decoded single-resource response
#[derive(Debug, Clone, PartialEq)]
pub struct FindResponse<T> {
    pub data: T,
    pub included: Vec<ResourceObject>,
}

impl<T: FromResource> FindResponse<T> {
    pub fn from_document(document: Document<ResourceObject>) -> ClientResult<Self> {
        Ok(Self {
            data: T::from_resource(&document.data)?,
            included: document.included,
        })
    }
}

// ========================
// Request bodies
// ========================

#[derive(Debug, Serialize)]
struct NewResource<'a, A: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    attributes: &'a A,
}

#[derive(Debug, Serialize)]
struct ExistingResource<'a, A: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    id: &'a str,
    attributes: &'a A,
}

#[derive(Debug, Serialize)]
struct Body<R> {
    data: R,
}

/// `{"data": {"type": ..., "attributes": ...}}`
pub fn create_body<T: Entity>(changes: &T::Changes) -> ClientResult<Value> {
    Ok(serde_json::to_value(Body {
        data: NewResource {
            kind: T::TYPE,
            attributes: changes,
        },
    })?)
}

/// `{"data": {"type": ..., "id": ..., "attributes": ...}}`
pub fn update_body<T: Entity>(id: &str, changes: &T::Changes) -> ClientResult<Value> {
    Ok(serde_json::to_value(Body {
        data: ExistingResource {
            kind: T::TYPE,
            id,
            attributes: changes,
        },
    })?)
}
