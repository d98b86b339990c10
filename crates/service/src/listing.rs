//! Admin table queries: free-text search, column sort, pagination.

use common::utils::sorting::{stable_sort, SortOrder, Sortable};
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination, DEFAULT_PER_PAGE};

/// Query string shared by every admin list endpoint. Entity filters
/// (`status`, `active`, ...) are parsed separately from the same query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page, DEFAULT_PER_PAGE)
    }

    pub fn search(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    /// Requested sort column and direction, or `default` when no column is
    /// given. An explicit `order` overrides the default direction.
    pub fn sort_spec<'a>(&'a self, default: (&'a str, SortOrder)) -> Result<(&'a str, SortOrder), ServiceError> {
        let order = match self.order.as_deref() {
            Some(o) => o.parse::<SortOrder>()?,
            None if self.sort.is_some() => SortOrder::Asc,
            None => default.1,
        };
        let field = match self.sort.as_deref().map(str::trim) {
            Some(f) if !f.is_empty() => f,
            _ => default.0,
        };
        Ok((field, order))
    }

    /// Filter with `keep`, sort, then cut the requested page.
    pub fn apply<T, F>(&self, rows: Vec<T>, default_sort: (&str, SortOrder), keep: F) -> Result<Page<T>, ServiceError>
    where
        T: Sortable,
        F: Fn(&T) -> bool,
    {
        let (field, order) = self.sort_spec(default_sort)?;
        let filtered: Vec<T> = rows.into_iter().filter(|r| keep(r)).collect();
        let sorted = stable_sort(filtered, field, order)?;
        Ok(Page::from_vec(sorted, self.pagination()))
    }
}

/// `since` cursor for polling endpoints.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SinceQuery {
    pub since: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::utils::sorting::SortValue;

    #[derive(Debug, Clone)]
    struct Row(&'static str, i64);

    impl Sortable for Row {
        const SORT_FIELDS: &'static [&'static str] = &["name", "n"];
        fn sort_value(&self, field: &str) -> SortValue {
            match field {
                "name" => SortValue::text(self.0),
                "n" => SortValue::Int(self.1),
                _ => SortValue::Null,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![Row("cedar", 3), Row("aspen", 1), Row("birch", 2), Row("alder", 4)]
    }

    #[test]
    fn default_sort_applies_without_params() {
        let page = ListQuery::default().apply(rows(), ("n", SortOrder::Desc), |_| true).unwrap();
        let names: Vec<_> = page.items.iter().map(|r| r.0).collect();
        assert_eq!(names, ["alder", "cedar", "birch", "aspen"]);
    }

    #[test]
    fn explicit_sort_defaults_to_ascending() {
        let q = ListQuery { sort: Some("name".into()), ..Default::default() };
        let page = q.apply(rows(), ("n", SortOrder::Desc), |_| true).unwrap();
        assert_eq!(page.items[0].0, "alder");
    }

    #[test]
    fn filters_before_paginating() {
        let q = ListQuery { q: Some("A".into()), per_page: Some(1), page: Some(2), ..Default::default() };
        let page = q
            .apply(rows(), ("name", SortOrder::Asc), |r| common::utils::filter::matches_query([r.0], q.search()))
            .unwrap();
        // cedar, aspen, alder match "a"; page 2 of size 1 is aspen
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].0, "aspen");
    }

    #[test]
    fn bad_sort_inputs_are_validation_errors() {
        let q = ListQuery { sort: Some("height".into()), ..Default::default() };
        assert!(matches!(q.apply(rows(), ("n", SortOrder::Asc), |_| true), Err(ServiceError::Validation(_))));
        let q = ListQuery { order: Some("up".into()), ..Default::default() };
        assert!(matches!(q.apply(rows(), ("n", SortOrder::Asc), |_| true), Err(ServiceError::Validation(_))));
    }
}
