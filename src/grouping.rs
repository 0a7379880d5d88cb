//! Grouping Utilities
//!
//! Pure transforms from a flat, server-ordered todo list to display groups.

use chrono::{Local, NaiveDate, TimeZone};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Category, DateAttribute, Todo, TodoGroup, TodoResponse};

/// Label of the catch-all category group
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Key of the catch-all category group; never a real category id
pub const UNCATEGORIZED_KEY: &str = "__uncategorized__";
/// Label of the group for todos without the grouped date
pub const NO_DATE: &str = "No date";
pub const NO_DATE_KEY: &str = "__no_date__";

/// Group todos under their categories.
///
/// Groups follow category display order; todos whose category is missing or
/// not in `included` land in a trailing "Uncategorized" group. Empty groups
/// are never produced.
pub fn group_by_category(response: &TodoResponse) -> Vec<TodoGroup> {
    let categories: HashMap<&str, &Category> = response
        .included
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect();

    // Buckets in first-seen order, looked up by category id
    let mut buckets: Vec<(&Category, Vec<Todo>)> = Vec::new();
    let mut bucket_index: HashMap<&str, usize> = HashMap::new();
    let mut uncategorized = Vec::new();

    for todo in &response.data {
        let category = todo
            .category_id
            .as_deref()
            .and_then(|id| categories.get(id).copied());

        match category {
            Some(category) => {
                let index = *bucket_index.entry(category.id.as_str()).or_insert_with(|| {
                    buckets.push((category, Vec::new()));
                    buckets.len() - 1
                });
                buckets[index].1.push(todo.clone());
            }
            None => {
                if let Some(id) = &todo.category_id {
                    log::warn!("todo {} references category {} not in included", todo.id, id);
                }
                uncategorized.push(todo.clone());
            }
        }
    }

    buckets.sort_by(|(a, _), (b, _)| a.display_order(b));

    let mut groups: Vec<TodoGroup> = buckets
        .into_iter()
        .map(|(category, todos)| TodoGroup::new(category.id.clone(), category.name.clone(), todos))
        .collect();

    if !uncategorized.is_empty() {
        groups.push(TodoGroup::new(UNCATEGORIZED_KEY, UNCATEGORIZED, uncategorized));
    }
    groups
}

/// Group todos by the local calendar day of `attribute`
pub fn group_by_date(todos: &[Todo], attribute: DateAttribute, reverse: bool) -> Vec<TodoGroup> {
    group_by_date_in(todos, attribute, reverse, &Local)
}

/// `group_by_date` with an explicit time zone for day boundaries.
///
/// Days ascend (descend with `reverse`); "No date" is always last.
pub fn group_by_date_in<Tz: TimeZone>(
    todos: &[Todo],
    attribute: DateAttribute,
    reverse: bool,
    tz: &Tz,
) -> Vec<TodoGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<Todo>> = BTreeMap::new();
    let mut undated = Vec::new();

    for todo in todos {
        match attribute.value(todo) {
            Some(timestamp) => {
                let day = timestamp.with_timezone(tz).date_naive();
                days.entry(day).or_default().push(todo.clone());
            }
            None => undated.push(todo.clone()),
        }
    }

    let mut groups: Vec<TodoGroup> = days
        .into_iter()
        .map(|(day, todos)| TodoGroup::new(day_key(day), day_label(day), todos))
        .collect();

    if reverse {
        groups.reverse();
    }
    if !undated.is_empty() {
        groups.push(TodoGroup::new(NO_DATE_KEY, NO_DATE, undated));
    }
    groups
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// "August 27, 2021"
fn day_label(day: NaiveDate) -> String {
    day.format("%B %-d, %Y").to_string()
}

/// Append a later page of groups.
///
/// When the page boundary splits a group (same key on both sides), the
/// incoming todos continue that group instead of starting a second one.
pub fn merge_page(existing: &mut Vec<TodoGroup>, incoming: Vec<TodoGroup>) {
    let mut incoming = incoming.into_iter();
    if let Some(first) = incoming.next() {
        match existing.last_mut() {
            Some(last) if last.key == first.key => last.todos.extend(first.todos),
            _ => existing.push(first),
        }
    }
    existing.extend(incoming);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn make_todo(id: &str, category_id: Option<&str>) -> Todo {
        let todo = Todo::new(id, format!("Todo {}", id));
        match category_id {
            Some(category_id) => todo.with_category(category_id),
            None => todo,
        }
    }

    fn at(timestamp: &str) -> Option<DateTime<Utc>> {
        Some(DateTime::parse_from_rfc3339(timestamp).unwrap().with_timezone(&Utc))
    }

    fn deferred(id: &str, until: Option<DateTime<Utc>>) -> Todo {
        let mut todo = Todo::new(id, format!("Todo {}", id));
        todo.deferred_until = until;
        todo
    }

    fn ids(group: &TodoGroup) -> Vec<&str> {
        group.todos.iter().map(|t| t.id.as_str()).collect()
    }

    fn labels(groups: &[TodoGroup]) -> Vec<String> {
        groups.iter().map(|g| g.label.clone()).collect()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_group_by_category_orders_by_sort_order() {
        let response = TodoResponse {
            data: vec![
                make_todo("1", Some("home")),
                make_todo("2", None),
                make_todo("3", Some("work")),
                make_todo("4", Some("home")),
            ],
            included: vec![Category::new("home", "Home", 2), Category::new("work", "Work", 1)],
            page_count: None,
        };

        let groups = group_by_category(&response);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label, "Work");
        assert_eq!(ids(&groups[0]), vec!["3"]);
        assert_eq!(groups[1].label, "Home");
        assert_eq!(ids(&groups[1]), vec!["1", "4"]);
        assert_eq!(groups[2].label, UNCATEGORIZED);
        assert_eq!(ids(&groups[2]), vec!["2"]);
    }

    #[test]
    fn test_group_by_category_keeps_every_todo_once() {
        let response = TodoResponse {
            data: (0..20)
                .map(|i| {
                    let category = ["a", "b", "c", "missing"].get(i % 5).copied();
                    make_todo(&i.to_string(), category)
                })
                .collect(),
            included: vec![
                Category::new("a", "A", 3),
                Category::new("b", "B", 1),
                Category::new("c", "C", 2),
            ],
            page_count: None,
        };

        let groups = group_by_category(&response);

        let mut seen: Vec<String> = groups
            .iter()
            .flat_map(|g| g.todos.iter().map(|t| t.id.clone()))
            .collect();
        let mut expected: Vec<String> = response.data.iter().map(|t| t.id.clone()).collect();
        seen.sort();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(groups.last().unwrap().key, UNCATEGORIZED_KEY);
    }

    #[test]
    fn test_group_by_category_empty_input() {
        let response = TodoResponse {
            data: vec![],
            included: vec![Category::new("a", "A", 1)],
            page_count: None,
        };
        assert!(group_by_category(&response).is_empty());
    }

    #[test]
    fn test_group_by_category_unknown_category_is_uncategorized() {
        let response = TodoResponse {
            data: vec![make_todo("1", Some("gone"))],
            included: vec![],
            page_count: None,
        };

        let groups = group_by_category(&response);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, UNCATEGORIZED);
    }

    #[test]
    fn test_group_by_category_ties_break_on_name() {
        let response = TodoResponse {
            data: vec![make_todo("1", Some("z")), make_todo("2", Some("a"))],
            included: vec![Category::new("z", "Zeta", 1), Category::new("a", "Alpha", 1)],
            page_count: None,
        };

        let labels: Vec<_> = group_by_category(&response).into_iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_group_by_date_single_undated_todo() {
        let todos = vec![deferred("1", None)];

        let groups = group_by_date(&todos, DateAttribute::DeferredUntil, false);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "No date");
        assert_eq!(groups[0].todos[0].name, "Todo 1");
    }

    #[test]
    fn test_group_by_date_same_day_shares_group() {
        let todos = vec![
            deferred("1", at("2021-08-27T08:00:00Z")),
            deferred("2", at("2021-08-27T21:30:00Z")),
            deferred("3", at("2021-08-28T00:00:00Z")),
        ];

        let groups = group_by_date_in(&todos, DateAttribute::DeferredUntil, false, &utc());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "August 27, 2021");
        assert_eq!(groups[0].key, "2021-08-27");
        assert_eq!(ids(&groups[0]), vec!["1", "2"]);
        assert_eq!(groups[1].label, "August 28, 2021");
    }

    #[test]
    fn test_group_by_date_uses_local_day_boundary() {
        // 23:30 UTC on the 27th is already the 28th at UTC+2
        let todos = vec![deferred("1", at("2021-08-27T23:30:00Z"))];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        let groups = group_by_date_in(&todos, DateAttribute::DeferredUntil, false, &plus_two);

        assert_eq!(groups[0].label, "August 28, 2021");
    }

    #[test]
    fn test_group_by_date_reverse_keeps_no_date_last() {
        let todos = vec![
            deferred("1", None),
            deferred("2", at("2021-08-01T12:00:00Z")),
            deferred("3", at("2021-09-01T12:00:00Z")),
        ];

        let forward = group_by_date_in(&todos, DateAttribute::DeferredUntil, false, &utc());
        let reversed = group_by_date_in(&todos, DateAttribute::DeferredUntil, true, &utc());

        assert_eq!(
            labels(&forward),
            vec!["August 1, 2021", "September 1, 2021", "No date"]
        );
        assert_eq!(
            labels(&reversed),
            vec!["September 1, 2021", "August 1, 2021", "No date"]
        );
    }

    #[test]
    fn test_group_by_date_keeps_server_order_within_day() {
        let mut first = Todo::new("b", "Second alphabetically");
        first.completed_at = at("2021-08-27T20:00:00Z");
        let mut second = Todo::new("a", "First alphabetically");
        second.completed_at = at("2021-08-27T09:00:00Z");

        let groups = group_by_date_in(&[first, second], DateAttribute::CompletedAt, true, &utc());

        assert_eq!(ids(&groups[0]), vec!["b", "a"]);
    }

    #[test]
    fn test_merge_page_continues_matching_group() {
        let mut existing = vec![TodoGroup::new("catA", "A", vec![make_todo("t1", None)])];
        let incoming = vec![
            TodoGroup::new("catA", "A", vec![make_todo("t2", None)]),
            TodoGroup::new("catB", "B", vec![make_todo("t3", None)]),
        ];

        merge_page(&mut existing, incoming);

        assert_eq!(existing.len(), 2);
        assert_eq!(ids(&existing[0]), vec!["t1", "t2"]);
        assert_eq!(existing[1].key, "catB");
    }

    #[test]
    fn test_merge_page_appends_distinct_groups() {
        let mut existing = vec![TodoGroup::new("2021-08-02", "August 2, 2021", vec![make_todo("t1", None)])];
        let incoming = vec![TodoGroup::new("2021-08-01", "August 1, 2021", vec![make_todo("t2", None)])];

        merge_page(&mut existing, incoming);

        assert_eq!(existing.len(), 2);
        assert_eq!(existing[1].key, "2021-08-01");
    }

    #[test]
    fn test_merge_page_into_empty() {
        let mut existing = Vec::new();
        merge_page(&mut existing, vec![TodoGroup::new("k", "K", vec![make_todo("t1", None)])]);
        assert_eq!(existing.len(), 1);
    }
}
