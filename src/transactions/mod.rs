//! The transactions page: one tab per collection, each with its own search
//! text, filter chips and column choice.

mod columns;
mod filter_endpoints;
mod page;
mod view;

pub use columns::update_columns_endpoint;
pub use filter_endpoints::{
    select_date_endpoint, select_status_endpoint, set_query_endpoint, toggle_filter_endpoint,
};
pub use page::get_transactions_page;
