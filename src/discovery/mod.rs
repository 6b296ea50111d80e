pub mod error;
pub mod link_lister;
pub mod month_filter;
