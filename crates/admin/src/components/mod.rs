//! Reusable view pieces for the admin pages.

pub mod data_table;

pub use data_table::{FilterOption, Pagination, SelectFilter};
