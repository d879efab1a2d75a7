//! Display formatting for terminal output

pub mod item;

pub use item::{format_item_details, format_item_list};
