//! Query Parameters
//!
//! Collection queries in the backend's bracketed form:
//! `filter[status]=completed&filter[search]=milk&sort=-completedAt&page[number]=2`.

/// Server-side list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoStatus {
    Available,
    Tomorrow,
    Future,
    Completed,
    Deleted,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Available => "available",
            TodoStatus::Tomorrow => "tomorrow",
            TodoStatus::Future => "future",
            TodoStatus::Completed => "completed",
            TodoStatus::Deleted => "deleted",
        }
    }
}

/// Filters plus `include`/`sort`/`page[number]` options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Vec<(String, String)>,
    pub include: Option<String>,
    pub sort: Option<String>,
    pub page_number: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.filter.push((key.to_string(), value.into()));
        self
    }

    pub fn status(self, status: TodoStatus) -> Self {
        self.filter("status", status.as_str())
    }

    /// Free-text search; empty text adds nothing
    pub fn search(self, text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            self
        } else {
            self.filter("search", text)
        }
    }

    pub fn include(mut self, relationship: &str) -> Self {
        self.include = Some(relationship.to_string());
        self
    }

    pub fn sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    pub fn page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Key/value pairs in request order
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filter
            .iter()
            .map(|(key, value)| (format!("filter[{}]", key), value.clone()))
            .collect();
        if let Some(include) = &self.include {
            pairs.push(("include".to_string(), include.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        if let Some(page) = self.page_number {
            pairs.push(("page[number]".to_string(), page.to_string()));
        }
        pairs
    }
}
