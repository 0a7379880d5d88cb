//! Navigation Context
//!
//! Screens navigate through a `Router` handed to them at construction;
//! the host decides what a route actually shows.

use std::sync::Mutex;

/// Route of the category list
pub const CATEGORIES_ROUTE: &str = "/categories";

pub trait Router: Send + Sync {
    /// Navigate forward to `route`
    fn push(&self, route: &str);

    /// Return to the previous route
    fn back(&self);

    fn can_go_back(&self) -> bool;
}

/// In-memory history stack, used by the CLI host and in tests
#[derive(Debug)]
pub struct HistoryRouter {
    stack: Mutex<Vec<String>>,
}

impl HistoryRouter {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(vec![initial.into()]),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Full history, oldest first
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // a poisoned history is still a valid list of routes
        self.stack.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Router for HistoryRouter {
    fn push(&self, route: &str) {
        log::debug!("navigate to {}", route);
        self.lock().push(route.to_string());
    }

    fn back(&self) {
        let mut stack = self.lock();
        if stack.len() > 1 {
            stack.pop();
        } else {
            log::debug!("back requested with no history");
        }
    }

    fn can_go_back(&self) -> bool {
        self.lock().len() > 1
    }
}
