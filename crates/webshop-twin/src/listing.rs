// Product listing controls - sort order, page size, view mode, paging
//
// Search and category pages share these. Every control is a plain link:
// the select boxes carry full URLs as option values and navigate on change.

use serde::Deserialize;
use url::form_urlencoded;

use crate::catalog::{SortOrder, page_size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Grid, ViewMode::List];

    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("list") => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        }
    }
}

/// Listing query string as sent by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub orderby: Option<u32>,
    pub pagesize: Option<usize>,
    pub viewmode: Option<String>,
    pub pagenumber: Option<usize>,
}

/// Resolved listing state for one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: String,
    pub term: Option<String>,
    pub order: SortOrder,
    pub page_size: usize,
    pub view: ViewMode,
    pub page: usize,
}

impl Listing {
    pub fn new(path: impl Into<String>, params: &ListingParams) -> Self {
        Self {
            path: path.into(),
            term: params.q.clone(),
            order: params.orderby.map(SortOrder::from_code).unwrap_or_default(),
            page_size: page_size(params.pagesize),
            view: ViewMode::from_param(params.viewmode.as_deref()),
            page: params.pagenumber.unwrap_or(1).max(1),
        }
    }

    fn href(&self, order: SortOrder, page_size: usize, view: ViewMode, page: usize) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(term) = &self.term {
            query.append_pair("q", term);
        }
        query.append_pair("orderby", &order.code().to_string());
        query.append_pair("pagesize", &page_size.to_string());
        query.append_pair("viewmode", view.param());
        if page > 1 {
            query.append_pair("pagenumber", &page.to_string());
        }
        format!("{}?{}", self.path, query.finish())
    }

    /// Changing any control starts again from the first page.
    pub fn order_href(&self, order: SortOrder) -> String {
        self.href(order, self.page_size, self.view, 1)
    }

    pub fn page_size_href(&self, page_size: usize) -> String {
        self.href(self.order, page_size, self.view, 1)
    }

    pub fn view_href(&self, view: ViewMode) -> String {
        self.href(self.order, self.page_size, view, 1)
    }

    pub fn page_href(&self, page: usize) -> String {
        self.href(self.order, self.page_size, self.view, page)
    }
}

/// One page of `items` plus the number of pages (at least one).
///
/// Out-of-range page numbers are clamped to the last page.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> (&[T], usize) {
    let page_size = page_size.max(1);
    let pages = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    (&items[start.min(end)..end], pages)
}
