//! Pagination envelope for list endpoints.
//!
//! Deterministic page slicing over an already filtered, ordered
//! collection. The envelope carries the total count plus next/previous
//! links that preserve the request's other query parameters.

use serde::Serialize;
use url::form_urlencoded;

/// Response envelope for a single page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Page slicer with a fixed, configuration-supplied page size.
#[derive(Clone, Copy, Debug)]
pub struct Paginator {
    pub page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self { page_size: page_size.max(1) }
    }

    /// Slice `items` down to the requested 1-based `page`.
    /// A zero page is clamped to the first page; a page past the end
    /// yields an empty result set with the count intact.
    pub fn paginate<T>(
        &self,
        items: Vec<T>,
        page: usize,
        path: &str,
        params: &[(&str, String)],
    ) -> Page<T> {
        let page = page.max(1);
        let count = items.len();
        let start = (page - 1).saturating_mul(self.page_size);

        let results: Vec<T> = items.into_iter().skip(start).take(self.page_size).collect();
        let next = (start + self.page_size < count).then(|| page_link(path, params, page + 1));
        let previous = (page > 1).then(|| page_link(path, params, page - 1));

        Page { count, next, previous, results }
    }
}

/// Build a link with the carried parameters form-urlencoded, so values
/// containing spaces or `&`/`=` stay a single parameter.
fn page_link(path: &str, params: &[(&str, String)], page: usize) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    query.append_pair("page", &page.to_string());
    format!("{path}?{}", query.finish())
}
