//! HTTP Resource Client
//!
//! JSON:API client over reqwest. One instance per resource type; the type's
//! `Entity::TYPE` is the collection path.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use std::marker::PhantomData;

use super::{Query, Resource};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::jsonapi::{self, Document, FindResponse, FromResource, ListResponse, ResourceObject};
use crate::models::{Category, Todo};

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Characters left as-is in a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// reqwest-backed `Resource<T>`
#[derive(Debug, Clone)]
pub struct HttpResource<T> {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    _entity: PhantomData<fn() -> T>,
}

pub type TodoClient = HttpResource<Todo>;
pub type CategoryClient = HttpResource<Category>;

impl<T: FromResource> HttpResource<T> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Share one connection pool between resource clients
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            _entity: PhantomData,
        }
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, T::TYPE)
    }

    pub fn member_url(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(),
            utf8_percent_encode(id, PATH_SEGMENT)
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url).header(ACCEPT, JSON_API_MEDIA_TYPE);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn json_request(&self, method: Method, url: &str, body: &Value) -> ClientResult<RequestBuilder> {
        Ok(self
            .request(method, url)
            .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
            .body(serde_json::to_vec(body)?))
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            log::warn!("{} request failed with status {}", T::TYPE, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }

    /// Resource echoed back by a write, if the body holds one
    fn written(body: &[u8]) -> Option<T> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        let decoded = serde_json::from_slice::<Document<ResourceObject>>(body)
            .map_err(ClientError::from)
            .and_then(|document| T::from_resource(&document.data));
        match decoded {
            Ok(entity) => Some(entity),
            Err(e) => {
                log::debug!("{} write succeeded without a usable body: {}", T::TYPE, e);
                None
            }
        }
    }
}

#[async_trait]
impl<T> Resource<T> for HttpResource<T>
where
    T: FromResource + 'static,
{
    async fn list(&self, query: &Query) -> ClientResult<ListResponse<T>> {
        let url = self.collection_url();
        log::debug!("GET {} {:?}", url, query.to_pairs());
        let body = self
            .send(self.request(Method::GET, &url).query(&query.to_pairs()))
            .await?;
        let document: Document<Vec<ResourceObject>> = serde_json::from_slice(&body)?;
        ListResponse::from_document(document)
    }

    async fn find(&self, id: &str, query: &Query) -> ClientResult<FindResponse<T>> {
        let url = self.member_url(id);
        log::debug!("GET {}", url);
        let body = self
            .send(self.request(Method::GET, &url).query(&query.to_pairs()))
            .await?;
        let document: Document<ResourceObject> = serde_json::from_slice(&body)?;
        FindResponse::from_document(document)
    }

    async fn create(&self, changes: &T::Changes) -> ClientResult<Option<T>> {
        let url = self.collection_url();
        log::debug!("POST {}", url);
        let payload = jsonapi::create_body::<T>(changes)?;
        let body = self.send(self.json_request(Method::POST, &url, &payload)?).await?;
        Ok(Self::written(&body))
    }

    async fn update(&self, id: &str, changes: &T::Changes) -> ClientResult<Option<T>> {
        let url = self.member_url(id);
        log::debug!("PATCH {}", url);
        let payload = jsonapi::update_body::<T>(id, changes)?;
        let body = self.send(self.json_request(Method::PATCH, &url, &payload)?).await?;
        Ok(Self::written(&body))
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.member_url(id);
        log::debug!("DELETE {}", url);
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }
}
