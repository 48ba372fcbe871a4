use serde::Serialize;

use crate::request::Request;

/// A resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
}

impl PageWindow {
    /// Offset of the window's first item.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// Derives a [`PageWindow`] from a request.
pub trait RequestPagination: Send + Sync {
    fn window(&self, req: &Request) -> PageWindow;
}

/// Default pagination: `page` and `per_page` query parameters, with a floor of
/// page 1 and a hard per-page cap.
#[derive(Debug, Clone)]
pub struct QueryPagination {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for QueryPagination {
    fn default() -> Self {
        Self {
            default_per_page: 25,
            max_per_page: 100,
        }
    }
}

impl RequestPagination for QueryPagination {
    fn window(&self, req: &Request) -> PageWindow {
        let page = req
            .query_param("page")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let per_page = req
            .query_param("per_page")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(self.default_per_page)
            .min(self.max_per_page);
        PageWindow { page, per_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_defaults_when_absent() {
        let req = Request::new(Method::GET, "/pets");
        let window = QueryPagination::default().window(&req);
        assert_eq!(window, PageWindow { page: 1, per_page: 25 });
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_per_page_is_capped() {
        let req = Request::new(Method::GET, "/pets?page=3&per_page=5000");
        let window = QueryPagination::default().window(&req);
        assert_eq!(window, PageWindow { page: 3, per_page: 100 });
        assert_eq!(window.offset(), 200);
    }

    #[test]
    fn test_garbage_falls_back() {
        let req = Request::new(Method::GET, "/pets?page=zero&per_page=-2");
        let window = QueryPagination::default().window(&req);
        assert_eq!(window, PageWindow { page: 1, per_page: 25 });
    }
}
