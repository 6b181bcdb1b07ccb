//! Data table component types.
//!
//! These types describe the filter bar and pager rendered above and below
//! the list tables. Filters submit as a plain `GET` form, so every option
//! carries the wire value the backend expects.

use helper_admin_core::Page;

/// Value sent for the catch-all option of a select filter.
pub const ALL: &str = "ALL";

/// Option for a select filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Option value (query-string wire value).
    pub value: String,
    /// Display label.
    pub label: String,
    /// Whether this option is the current selection.
    pub selected: bool,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Single-select dropdown in a list page's filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectFilter {
    /// Query parameter key.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Available options, in display order.
    pub options: Vec<FilterOption>,
}

impl SelectFilter {
    /// Create a select filter with no options.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            options: Vec::new(),
        }
    }

    /// Add an "All ..." option, selected when nothing else is.
    #[must_use]
    pub fn with_all(mut self, label: &str, selected: bool) -> Self {
        self.options.push(FilterOption::new(ALL, label, selected));
        self
    }

    /// Add an option.
    #[must_use]
    pub fn option(mut self, value: &str, label: &str, selected: bool) -> Self {
        self.options.push(FilterOption::new(value, label, selected));
        self
    }
}

/// Previous/next pager for a backend [`Page`].
///
/// Only shown when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// "Page x of y".
    pub label: String,
    /// Link to the previous page, if there is one.
    pub previous_href: Option<String>,
    /// Link to the next page, if there is one.
    pub next_href: Option<String>,
    /// Whether the pager should be rendered at all.
    pub visible: bool,
}

impl Pagination {
    /// Build the pager for `page`; `href` maps a zero-based page number to
    /// its URL.
    #[must_use]
    pub fn new<T>(page: &Page<T>, href: impl Fn(u32) -> String) -> Self {
        Self {
            label: format!("Page {} of {}", page.number + 1, page.total_pages.max(1)),
            previous_href: page
                .has_previous()
                .then(|| href(page.number.saturating_sub(1))),
            next_href: page.has_next().then(|| href(page.number + 1)),
            visible: page.total_pages > 1,
        }
    }
}
