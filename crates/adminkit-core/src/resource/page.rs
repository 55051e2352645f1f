//! Pagination types.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside a list page.
///
/// The backend spells these fields in camelCase on some endpoints and
/// snake_case on others; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based index of the first item on this page (absent when empty).
    #[serde(default)]
    pub from: Option<u64>,
    /// 1-based index of the last item on this page (absent when empty).
    #[serde(default)]
    pub to: Option<u64>,
    pub total: u64,
    #[serde(alias = "per_page")]
    pub per_page: u32,
    #[serde(alias = "last_page")]
    pub last_page: u32,
    #[serde(alias = "current_page")]
    pub current_page: u32,
}

impl PageMeta {
    /// Returns true if a later page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// A page of entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Query parameters selecting a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// The request for the page after this one.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn meta_accepts_camel_case() {
        let meta: PageMeta = serde_json::from_value(json!({
            "from": 1, "to": 10, "total": 42,
            "perPage": 10, "lastPage": 5, "currentPage": 1
        }))
        .unwrap();
        assert_eq!(meta.per_page, 10);
        assert!(meta.has_next());
    }

    #[test]
    fn meta_accepts_snake_case_and_null_bounds() {
        let meta: PageMeta = serde_json::from_value(json!({
            "from": null, "to": null, "total": 0,
            "per_page": 15, "last_page": 1, "current_page": 1
        }))
        .unwrap();
        assert_eq!(meta.from, None);
        assert_eq!(meta.per_page, 15);
        assert!(!meta.has_next());
    }

    #[test]
    fn page_request_serializes_as_query_names() {
        let value = serde_json::to_value(PageRequest::default()).unwrap();
        assert_eq!(value, json!({"page": 1, "perPage": 10}));
        assert_eq!(PageRequest::default().next().page, 2);
    }

    #[test]
    fn next_page_saturates_at_the_last_representable_page() {
        let last = PageRequest::new(u32::MAX, 25);
        assert_eq!(last.next(), last);
    }
}
